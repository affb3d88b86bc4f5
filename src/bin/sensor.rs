//! touch-link sensor node.
//!
//! 1. Debug UART0 at 115200
//! 2. Wi-Fi station + ESP-NOW, broadcast peer
//! 3. Touch pads, baseline seeding (32 samples per channel, 3 ms apart)
//! 4. Loop: filter every iteration, broadcast at TARGET_HZ, drain debug log

#[cfg(target_os = "espidf")]
mod firmware {
    use core::convert::Infallible;

    use esp_idf_svc::hal::peripherals::Peripherals;

    use touch_link::debug_log::DebugDrain;
    use touch_link::hal::radio::{self, EspNowLink};
    use touch_link::hal::serial::UartSink;
    use touch_link::hal::touch::EspTouch;
    use touch_link::hal::{self, clock};
    use touch_link::{link_info, link_warn, InitError, SensorConfig, SensorNode, LOG_STREAM, VERSION};

    /// How often transmit counters go to the debug log.
    const STATS_INTERVAL_MS: u32 = 5_000;

    pub fn main() {
        esp_idf_svc::sys::link_patches();

        let config = SensorConfig::DEFAULT;
        let peripherals = match Peripherals::take() {
            Ok(p) => p,
            Err(e) => hal::halt(None, &InitError::SerialInit(e.code())),
        };

        let mut debug = match UartSink::open(
            peripherals.uart0,
            peripherals.pins.gpio43,
            config.debug_baud,
        ) {
            Ok(sink) => sink,
            Err(e) => hal::halt(None, &e),
        };

        let mut drain = DebugDrain::new(4);
        let e = match run(peripherals.modem, &config, &mut debug, &mut drain) {
            Ok(never) => match never {},
            Err(e) => e,
        };
        drain.flush(&LOG_STREAM, &mut debug);
        hal::halt(Some(&mut debug), &e);
    }

    fn run(
        modem: esp_idf_svc::hal::modem::Modem,
        config: &SensorConfig,
        debug: &mut UartSink<'_>,
        drain: &mut DebugDrain,
    ) -> Result<Infallible, InitError> {
        config.validate()?;
        link_info!(LOG_STREAM, clock::millis(), "{} sensor booting", VERSION);

        let _wifi = radio::start_station(modem, config.radio_channel)?;
        let link = EspNowLink::new(radio::open_espnow()?)?;
        let mac = radio::station_mac()?;
        let touch = EspTouch::new(config.pins)?;

        let mut node = SensorNode::bring_up(touch, link, mac, config, clock::delay_ms)?;
        link_info!(
            LOG_STREAM,
            clock::millis(),
            "mac {} id {} channels {} period {} ms",
            mac,
            node.short_id(),
            node.sampler().num_channels(),
            config.period_ms()
        );

        let mut stats_at = clock::millis();
        let mut sent_at_last = 0u32;

        loop {
            let now = clock::millis();
            node.tick(now);

            let elapsed = now.wrapping_sub(stats_at);
            if elapsed >= STATS_INTERVAL_MS {
                let stats = node.tx_stats();
                let sent = stats.sent.wrapping_sub(sent_at_last);
                link_info!(
                    LOG_STREAM,
                    now,
                    "tx sent={} failed={} rate={}Hz",
                    stats.sent,
                    stats.failed,
                    sent.saturating_mul(1000) / elapsed
                );
                if let Some(err) = stats.last_error {
                    link_warn!(LOG_STREAM, now, "last tx error: {}", err);
                }
                if let Some(err) = node.sampler().last_error() {
                    link_warn!(
                        LOG_STREAM,
                        now,
                        "touch read errors={} last: {}",
                        node.sampler().read_errors(),
                        err
                    );
                }
                sent_at_last = stats.sent;
                stats_at = now;
            }

            drain.service(&LOG_STREAM, debug, now);
        }
    }
}

#[cfg(target_os = "espidf")]
fn main() {
    firmware::main();
}

#[cfg(not(target_os = "espidf"))]
fn main() {
    eprintln!("touch-link sensor: firmware only, build for an ESP-IDF target (e.g. xtensa-esp32s3-espidf)");
    std::process::exit(1);
}
