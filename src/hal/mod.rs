//! ESP-IDF platform layer.
//!
//! Everything that touches the chip lives here: Wi-Fi station bring-up,
//! ESP-NOW, the touch peripheral, UART sinks, the millisecond clock.
//! Compiled only for `target_os = "espidf"`.

pub mod clock;
pub mod radio;
pub mod serial;
pub mod touch;

use core::fmt::Write;

use esp_idf_svc::sys;

use crate::error::InitError;

/// Init-fatal path: print one line, then park forever.
///
/// A node that cannot communicate has no useful degraded mode. With no debug
/// sink the line goes to the ROM console.
pub fn halt(sink: Option<&mut dyn Write>, err: &InitError) -> ! {
    let mut line: heapless::String<128> = heapless::String::new();
    let _ = writeln!(line, "{}", err);

    match sink {
        Some(out) => {
            let _ = out.write_str(&line);
        }
        None => {
            let _ = line.push('\0');
            // SAFETY: both strings are NUL-terminated
            unsafe {
                sys::esp_rom_printf(b"%s\0".as_ptr() as *const _, line.as_ptr());
            }
        }
    }

    loop {
        clock::delay_ms(100);
    }
}
