use embassy_rp::gpio::Flex;
use embassy_time::{block_for, Duration, Timer};

use crate::{SensorError, TemperatureSensor};

const CMD_SKIP_ROM: u8 = 0xCC;
const CMD_CONVERT_T: u8 = 0x44;
const CMD_READ_SCRATCHPAD: u8 = 0xBE;

/// DS18B20 probe on a single bit-banged one-wire pin. Relies on the external
/// 4.7 kΩ pull-up; the pin only ever drives low or floats.
pub struct Ds18b20 {
    pin: Flex<'static>,
}

impl Ds18b20 {
    pub fn new(mut pin: Flex<'static>) -> Self {
        pin.set_low();
        pin.set_as_input();
        Self { pin }
    }

    /// Bus reset; Ok when a device answers the presence slot.
    fn reset(&mut self) -> Result<(), SensorError> {
        self.pin.set_as_output();
        block_for(Duration::from_micros(480));
        self.pin.set_as_input();
        block_for(Duration::from_micros(70));
        let present = self.pin.is_low();
        block_for(Duration::from_micros(410));
        if present {
            Ok(())
        } else {
            Err(SensorError::Disconnected)
        }
    }

    fn write_bit(&mut self, bit: bool) {
        self.pin.set_as_output();
        block_for(Duration::from_micros(if bit { 6 } else { 60 }));
        self.pin.set_as_input();
        block_for(Duration::from_micros(if bit { 64 } else { 10 }));
    }

    fn read_bit(&mut self) -> bool {
        self.pin.set_as_output();
        block_for(Duration::from_micros(6));
        self.pin.set_as_input();
        block_for(Duration::from_micros(9));
        let bit = self.pin.is_high();
        block_for(Duration::from_micros(55));
        bit
    }

    fn write_byte(&mut self, byte: u8) {
        for i in 0..8 {
            self.write_bit(byte & (1 << i) != 0);
        }
    }

    fn read_byte(&mut self) -> u8 {
        let mut byte = 0;
        for i in 0..8 {
            byte |= (self.read_bit() as u8) << i;
        }
        byte
    }
}

/// Dallas CRC-8, reflected polynomial 0x8C.
fn crc8(data: &[u8]) -> u8 {
    let mut crc = 0u8;
    for &byte in data {
        let mut byte = byte;
        for _ in 0..8 {
            let mix = (crc ^ byte) & 0x01;
            crc >>= 1;
            if mix != 0 {
                crc ^= 0x8C;
            }
            byte >>= 1;
        }
    }
    crc
}

impl TemperatureSensor for Ds18b20 {
    async fn read(&mut self) -> Result<i16, SensorError> {
        self.reset()?;
        self.write_byte(CMD_SKIP_ROM);
        self.write_byte(CMD_CONVERT_T);

        // 12-bit conversion time; this wait is what paces the control loop.
        Timer::after_millis(750).await;

        self.reset()?;
        self.write_byte(CMD_SKIP_ROM);
        self.write_byte(CMD_READ_SCRATCHPAD);

        let mut scratchpad = [0u8; 9];
        for byte in scratchpad.iter_mut() {
            *byte = self.read_byte();
        }
        if crc8(&scratchpad[..8]) != scratchpad[8] {
            return Err(SensorError::Disconnected);
        }

        // Sixteenths of a degree, two's complement.
        let raw = i16::from_le_bytes([scratchpad[0], scratchpad[1]]);
        Ok(raw >> 4)
    }
}
