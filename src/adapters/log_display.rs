//! Log-mirrored text display.
//!
//! Keeps a row buffer the size of the 128x64 OLED text grid and mirrors
//! every rendered row to the logger.  The glyph-level panel driver sits
//! behind the same [`DisplayPort`].

use heapless::String;
use log::info;

use crate::app::ports::{DisplayError, DisplayPort};
use crate::pins;

/// Text rows on a 128x64 panel with an 8-pixel font.
pub const ROWS: usize = 8;

pub struct LogDisplay {
    rows: [String<32>; ROWS],
}

impl Default for LogDisplay {
    fn default() -> Self {
        Self::new()
    }
}

impl LogDisplay {
    pub fn new() -> Self {
        info!(
            "OLED | 128x64 on I2C (SDA={}, SCL={})",
            pins::I2C_SDA_GPIO,
            pins::I2C_SCL_GPIO
        );
        Self {
            rows: core::array::from_fn(|_| String::new()),
        }
    }

    pub fn row(&self, row: usize) -> Option<&str> {
        self.rows.get(row).map(|s| s.as_str())
    }
}

impl DisplayPort for LogDisplay {
    fn clear(&mut self) -> Result<(), DisplayError> {
        for row in self.rows.iter_mut() {
            row.clear();
        }
        Ok(())
    }

    fn render_line(&mut self, row: u8, text: &str) -> Result<(), DisplayError> {
        let slot = self
            .rows
            .get_mut(usize::from(row))
            .ok_or(DisplayError::RowOutOfRange(row))?;
        slot.clear();
        for ch in text.chars() {
            if slot.push(ch).is_err() {
                break;
            }
        }
        info!("OLED | {}:{}", row, slot);
        Ok(())
    }
}
