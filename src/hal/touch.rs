//! Touch peripheral driver over the ESP-IDF legacy touch API.
//!
//! Pads run in timer FSM mode, so a read returns the latest hardware
//! measurement without waiting for a conversion.

use esp_idf_svc::sys::{self, esp, EspError};

use crate::error::{InitError, TouchError};
use crate::sampler::TouchSource;

pub struct EspTouch {
    _initialised: (),
}

impl EspTouch {
    /// Configure every pad in `pads` and start continuous measurement.
    pub fn new(pads: &[u8]) -> Result<Self, InitError> {
        Self::init(pads).map_err(|e| InitError::TouchInit(e.code()))?;
        Ok(Self { _initialised: () })
    }

    fn init(pads: &[u8]) -> Result<(), EspError> {
        // SAFETY: plain driver calls, pad numbers validated by the driver
        unsafe {
            esp!(sys::touch_pad_init())?;
            for &pad in pads {
                esp!(sys::touch_pad_config(pad as sys::touch_pad_t))?;
            }
            esp!(sys::touch_pad_set_fsm_mode(sys::touch_fsm_mode_t_TOUCH_FSM_MODE_TIMER))?;
            esp!(sys::touch_pad_fsm_start())?;
        }
        Ok(())
    }
}

impl TouchSource for EspTouch {
    #[inline]
    fn read(&mut self, channel: u8) -> Result<u32, TouchError> {
        let mut raw = 0u32;
        // SAFETY: `raw` outlives the call
        esp!(unsafe { sys::touch_pad_read_raw_data(channel as sys::touch_pad_t, &mut raw) })
            .map_err(|e| TouchError::Read {
                channel,
                code: e.code(),
            })?;
        Ok(raw)
    }
}
