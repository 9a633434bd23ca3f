use crate::display::{TextDisplay, COLS, ROWS};
use crate::log::*;

/// Renders the two panel rows into the host log on every repaint.
pub struct ConsoleDisplay {
    cells: [[u8; COLS]; ROWS],
}

impl ConsoleDisplay {
    pub const fn new() -> Self {
        Self {
            cells: [[b' '; COLS]; ROWS],
        }
    }

    fn flush(&self) {
        for row in &self.cells {
            info!("|{}|", core::str::from_utf8(row).unwrap_or("<bad row>"));
        }
    }
}

impl TextDisplay for ConsoleDisplay {
    async fn clear(&mut self) {
        self.cells = [[b' '; COLS]; ROWS];
    }

    async fn write(&mut self, row: u8, col: u8, text: &str) {
        let row = (row as usize).min(ROWS - 1);
        for (i, byte) in text.bytes().enumerate() {
            let cell = col as usize + i;
            if cell < COLS {
                self.cells[row][cell] = byte;
            }
        }
        self.flush();
    }
}
