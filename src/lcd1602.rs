use embassy_time::Timer;
use embedded_hal_async::i2c::I2c;

use crate::display::{TextDisplay, COLS};

/// Usual address of the PCF8574 backpack.
pub const LCD_I2C_ADDR: u8 = 0x27;

// Backpack bit assignments: P0 = RS, P2 = EN, P3 = backlight, P4..P7 = data.
const BACKLIGHT: u8 = 0x08;
const ENABLE: u8 = 0x04;
const REG_SELECT: u8 = 0x01;

const CMD_CLEAR: u8 = 0x01;
const CMD_FUNCTION_4BIT_2LINE: u8 = 0x28;
const CMD_DISPLAY_ON: u8 = 0x0C;
const CMD_ENTRY_INCREMENT: u8 = 0x06;
const CMD_SET_DDRAM: u8 = 0x80;

/// HD44780 1602 behind the common PCF8574 I2C backpack, 4-bit mode.
pub struct Lcd1602<I2C> {
    addr: u8,
    i2c: I2C,
}

impl<I2C, E> Lcd1602<I2C>
where
    I2C: I2c<Error = E>,
{
    pub const fn new(i2c: I2C, addr: u8) -> Self {
        Self { addr, i2c }
    }

    /// Power-on handshake straight from the datasheet: three 8-bit function
    /// sets, drop to 4-bit, then the mode commands.
    pub async fn init(&mut self) -> Result<(), E> {
        Timer::after_millis(50).await;
        self.write_nibble(0x30, false).await?;
        Timer::after_millis(5).await;
        self.write_nibble(0x30, false).await?;
        Timer::after_micros(150).await;
        self.write_nibble(0x30, false).await?;
        self.write_nibble(0x20, false).await?;

        self.command(CMD_FUNCTION_4BIT_2LINE).await?;
        self.command(CMD_DISPLAY_ON).await?;
        self.command(CMD_ENTRY_INCREMENT).await?;
        self.command(CMD_CLEAR).await?;
        Timer::after_millis(2).await;
        Ok(())
    }

    /// Clock out the high nibble of `value` with an EN strobe.
    async fn write_nibble(&mut self, value: u8, data: bool) -> Result<(), E> {
        let rs = if data { REG_SELECT } else { 0 };
        let byte = (value & 0xF0) | BACKLIGHT | rs;
        self.i2c.write(self.addr, &[byte | ENABLE]).await?;
        self.i2c.write(self.addr, &[byte]).await?;
        Ok(())
    }

    async fn command(&mut self, cmd: u8) -> Result<(), E> {
        self.write_nibble(cmd, false).await?;
        self.write_nibble(cmd << 4, false).await?;
        Timer::after_micros(50).await;
        Ok(())
    }

    async fn data(&mut self, byte: u8) -> Result<(), E> {
        self.write_nibble(byte, true).await?;
        self.write_nibble(byte << 4, true).await?;
        Timer::after_micros(50).await;
        Ok(())
    }

    async fn set_cursor(&mut self, row: u8, col: u8) -> Result<(), E> {
        let base = if row == 0 { 0x00 } else { 0x40 };
        self.command(CMD_SET_DDRAM | (base + col)).await
    }
}

impl<I2C, E> TextDisplay for Lcd1602<I2C>
where
    I2C: I2c<Error = E>,
{
    async fn clear(&mut self) {
        if self.command(CMD_CLEAR).await.is_ok() {
            Timer::after_millis(2).await;
        }
    }

    async fn write(&mut self, row: u8, col: u8, text: &str) {
        if self.set_cursor(row, col).await.is_err() {
            return;
        }
        for byte in text.bytes().take(COLS.saturating_sub(col as usize)) {
            if self.data(byte).await.is_err() {
                return;
            }
        }
    }
}
