//! touch-link hub node.
//!
//! 1. Data link UART0 at 921600 (CSV only), optional debug UART1
//! 2. Wi-Fi station + ESP-NOW, receive callback into the mailbox
//! 3. `HUB_MAC AA:BB:CC:DD:EE:FF` once
//! 4. Loop: drain mailbox, one `touch,...` line per datagram

#[cfg(target_os = "espidf")]
mod firmware {
    use core::convert::Infallible;

    use esp_idf_svc::hal::gpio::AnyOutputPin;
    use esp_idf_svc::hal::peripherals::Peripherals;

    use touch_link::debug_log::DebugDrain;
    use touch_link::hal::radio;
    use touch_link::hal::serial::UartSink;
    use touch_link::hal::{self, clock};
    use touch_link::mailbox::Mailbox;
    use touch_link::{
        link_debug, link_info, link_warn, Hub, HubConfig, InitError, PollOutcome, LOG_STREAM,
        VERSION,
    };

    static MAILBOX: Mailbox = Mailbox::new();

    /// How often mailbox counters go to the debug log.
    const STATS_INTERVAL_MS: u32 = 5_000;

    pub fn main() {
        esp_idf_svc::sys::link_patches();

        let config = HubConfig::DEFAULT;
        let peripherals = match Peripherals::take() {
            Ok(p) => p,
            Err(e) => hal::halt(None, &InitError::SerialInit(e.code())),
        };

        let mut debug = match config.debug_tx_pin {
            // SAFETY: the pin number comes from the board configuration and is
            // not claimed anywhere else
            Some(pin) => match UartSink::open(
                peripherals.uart1,
                unsafe { AnyOutputPin::new(pin as i32) },
                config.debug_baud,
            ) {
                Ok(sink) => Some(sink),
                Err(e) => hal::halt(None, &e),
            },
            None => None,
        };

        let mut link = match UartSink::open(peripherals.uart0, peripherals.pins.gpio43, config.baud) {
            Ok(sink) => sink,
            Err(e) => {
                let sink = debug.as_mut().map(|d| d as &mut dyn core::fmt::Write);
                hal::halt(sink, &e)
            }
        };

        let mut drain = DebugDrain::new(4);
        let e = match run(peripherals.modem, &config, &mut link, debug.as_mut(), &mut drain) {
            Ok(never) => match never {},
            Err(e) => e,
        };
        match debug.as_mut() {
            Some(out) => {
                drain.flush(&LOG_STREAM, out);
                hal::halt(Some(out), &e)
            }
            None => hal::halt(None, &e),
        }
    }

    fn run(
        modem: esp_idf_svc::hal::modem::Modem,
        config: &HubConfig,
        link: &mut UartSink<'_>,
        mut debug: Option<&mut UartSink<'_>>,
        drain: &mut DebugDrain,
    ) -> Result<Infallible, InitError> {
        config.validate()?;
        link_info!(LOG_STREAM, clock::millis(), "{} hub booting", VERSION);

        let _wifi = radio::start_station(modem, config.radio_channel)?;
        let espnow = radio::open_espnow()?;
        radio::attach_mailbox(&espnow, &MAILBOX)?;

        let mac = radio::station_mac()?;
        let mut hub = Hub::new(&MAILBOX);
        hub.announce(link, &mac).map_err(|_| InitError::SerialInit(-1))?;
        link_info!(LOG_STREAM, clock::millis(), "listening as {}", mac);

        let mut stats_at = clock::millis();

        loop {
            let now = clock::millis();

            match hub.poll(link) {
                PollOutcome::Idle | PollOutcome::Emitted { .. } => {}
                PollOutcome::Dropped(err) => link_debug!(LOG_STREAM, now, "dropped: {}", err),
                PollOutcome::SinkError => link_warn!(LOG_STREAM, now, "data link write failed"),
            }

            if now.wrapping_sub(stats_at) >= STATS_INTERVAL_MS {
                let mb = MAILBOX.stats();
                let hs = hub.stats();
                link_info!(
                    LOG_STREAM,
                    now,
                    "rx stored={} overwritten={} rejected={} emitted={} dropped={}",
                    mb.stored,
                    mb.overwritten,
                    mb.rejected,
                    hs.emitted,
                    hs.dropped
                );
                stats_at = now;
            }

            if let Some(out) = debug.as_deref_mut() {
                drain.service(&LOG_STREAM, out, now);
            }
        }
    }
}

#[cfg(target_os = "espidf")]
fn main() {
    firmware::main();
}

#[cfg(not(target_os = "espidf"))]
fn main() {
    eprintln!("touch-link hub: firmware only, build for an ESP-IDF target (e.g. xtensa-esp32s3-espidf)");
    std::process::exit(1);
}
