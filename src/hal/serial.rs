//! UART sinks for the hub data link and the debug logs.
//!
//! ```text
//! Hub data link : UART0 TX GPIO43, 921600, CSV lines only
//! Hub debug     : UART1 TX on HUB_DEBUG_TX_PIN, 115200
//! Sensor debug  : UART0 TX GPIO43, 115200
//! ```

use core::fmt;

use esp_idf_svc::hal::gpio::{self, OutputPin};
use esp_idf_svc::hal::peripheral::Peripheral;
use esp_idf_svc::hal::uart::{self, Uart, UartTxDriver};
use esp_idf_svc::hal::units::Hertz;

use crate::error::InitError;

/// TX-only UART that implements `core::fmt::Write`.
///
/// `write_str` returns only once every byte is queued, so a line handed over
/// in one call is never split by another writer on this sink.
pub struct UartSink<'d> {
    tx: UartTxDriver<'d>,
}

impl<'d> UartSink<'d> {
    /// Install a TX-only driver on `uart` at `baud`.
    pub fn open<U: Uart>(
        uart: impl Peripheral<P = U> + 'd,
        tx_pin: impl Peripheral<P = impl OutputPin> + 'd,
        baud: u32,
    ) -> Result<Self, InitError> {
        let config = uart::config::Config::default().baudrate(Hertz(baud));

        UartTxDriver::new(
            uart,
            tx_pin,
            Option::<gpio::AnyIOPin>::None, // CTS
            Option::<gpio::AnyIOPin>::None, // RTS
            &config,
        )
        .map(|tx| Self { tx })
        .map_err(|e| InitError::SerialInit(e.code()))
    }
}

impl fmt::Write for UartSink<'_> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        let mut bytes = s.as_bytes();
        while !bytes.is_empty() {
            match self.tx.write(bytes) {
                Ok(0) | Err(_) => return Err(fmt::Error),
                Ok(n) => bytes = &bytes[n..],
            }
        }
        Ok(())
    }
}
