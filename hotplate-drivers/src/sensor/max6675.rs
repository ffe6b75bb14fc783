//! MAX6675 K-type thermocouple converter
//!
//! Read-only SPI device. Each read clocks out one 16-bit frame:
//!
//! | bits  | meaning                            |
//! |-------|------------------------------------|
//! | 15    | dummy sign bit, always 0           |
//! | 14..3 | temperature, 0.25 °C per LSB       |
//! | 2     | thermocouple input open            |
//! | 1..0  | device id and tri-state            |
//!
//! Pulling CS low aborts the running conversion; a fresh one starts when CS
//! goes high again and takes up to 220 ms. Poll no faster than that.

use embedded_hal::digital::OutputPin;
use embedded_hal::spi::SpiBus;
use hotplate_core::traits::{SensorError, TemperatureSensor};

/// Minimum time between reads (ms)
pub const CONVERSION_TIME_MS: u32 = 220;

const OPEN_INPUT: u16 = 1 << 2;
const SIGN: u16 = 1 << 15;

/// Decode one raw frame into degrees Celsius
pub fn decode_frame(frame: u16) -> Result<f32, SensorError> {
    if frame & OPEN_INPUT != 0 {
        return Err(SensorError::OpenCircuit);
    }
    if frame & SIGN != 0 {
        return Err(SensorError::OutOfRange);
    }
    Ok((frame >> 3) as f32 * 0.25)
}

/// MAX6675 on a dedicated chip-select line
pub struct Max6675<SPI, CS> {
    spi: SPI,
    cs: CS,
}

impl<SPI: SpiBus, CS: OutputPin> Max6675<SPI, CS> {
    /// Create the driver; CS is driven high (idle, converting)
    pub fn new(spi: SPI, mut cs: CS) -> Self {
        let _ = cs.set_high();
        Self { spi, cs }
    }

    /// Clock out one raw frame
    pub fn read_frame(&mut self) -> Result<u16, SensorError> {
        let mut buf = [0u8; 2];

        self.cs.set_low().map_err(|_| SensorError::Bus)?;
        let transfer = self.spi.read(&mut buf).and_then(|_| self.spi.flush());
        let release = self.cs.set_high();

        transfer.map_err(|_| SensorError::Bus)?;
        release.map_err(|_| SensorError::Bus)?;
        Ok(u16::from_be_bytes(buf))
    }

    /// Give back the bus and chip select
    pub fn release(self) -> (SPI, CS) {
        (self.spi, self.cs)
    }
}

impl<SPI: SpiBus, CS: OutputPin> TemperatureSensor for Max6675<SPI, CS> {
    fn read_celsius(&mut self) -> Result<f32, SensorError> {
        decode_frame(self.read_frame()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::convert::Infallible;
    use embedded_hal::digital;
    use embedded_hal::spi::{self, ErrorKind};

    struct MockCs {
        high: bool,
        selects: usize,
    }

    impl digital::ErrorType for MockCs {
        type Error = Infallible;
    }

    impl OutputPin for MockCs {
        fn set_low(&mut self) -> Result<(), Self::Error> {
            self.high = false;
            self.selects += 1;
            Ok(())
        }

        fn set_high(&mut self) -> Result<(), Self::Error> {
            self.high = true;
            Ok(())
        }
    }

    /// SPI bus that returns a fixed frame, or fails
    struct MockSpi {
        frame: Option<u16>,
    }

    impl spi::ErrorType for MockSpi {
        type Error = ErrorKind;
    }

    impl SpiBus for MockSpi {
        fn read(&mut self, words: &mut [u8]) -> Result<(), Self::Error> {
            let frame = self.frame.ok_or(ErrorKind::Other)?;
            words.copy_from_slice(&frame.to_be_bytes());
            Ok(())
        }

        fn write(&mut self, _words: &[u8]) -> Result<(), Self::Error> {
            Ok(())
        }

        fn transfer(&mut self, read: &mut [u8], _write: &[u8]) -> Result<(), Self::Error> {
            self.read(read)
        }

        fn transfer_in_place(&mut self, words: &mut [u8]) -> Result<(), Self::Error> {
            self.read(words)
        }

        fn flush(&mut self) -> Result<(), Self::Error> {
            Ok(())
        }
    }

    fn sensor(frame: Option<u16>) -> Max6675<MockSpi, MockCs> {
        Max6675::new(
            MockSpi { frame },
            MockCs {
                high: false,
                selects: 0,
            },
        )
    }

    #[test]
    fn test_decode_temperature() {
        // 100.25 °C = 401 counts
        assert_eq!(decode_frame(401 << 3), Ok(100.25));
        assert_eq!(decode_frame(0), Ok(0.0));
        // Full scale
        assert_eq!(decode_frame(0x7FF8), Ok(1023.75));
    }

    #[test]
    fn test_open_thermocouple() {
        assert_eq!(decode_frame((100 << 3) | OPEN_INPUT), Err(SensorError::OpenCircuit));
    }

    #[test]
    fn test_sign_bit_rejected() {
        assert_eq!(decode_frame(SIGN | (100 << 3)), Err(SensorError::OutOfRange));
    }

    #[test]
    fn test_read_selects_and_releases() {
        let mut sensor = sensor(Some(1000 << 3));
        assert_eq!(sensor.read_celsius(), Ok(250.0));

        let (_, cs) = sensor.release();
        assert!(cs.high);
        assert_eq!(cs.selects, 1);
    }

    #[test]
    fn test_bus_error() {
        let mut sensor = sensor(None);
        assert_eq!(sensor.read_celsius(), Err(SensorError::Bus));

        // Chip select is released even when the transfer fails
        let (_, cs) = sensor.release();
        assert!(cs.high);
    }
}
