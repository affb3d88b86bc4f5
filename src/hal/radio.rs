//! Wi-Fi station bring-up and the ESP-NOW link.
//!
//! Both roles run the radio in station mode and never associate. Sensors
//! register a single unencrypted broadcast peer; the hub registers a receive
//! callback that feeds the [`Mailbox`].

use esp_idf_svc::espnow::{EspNow, PeerInfo, ReceiveInfo, BROADCAST};
use esp_idf_svc::eventloop::EspSystemEventLoop;
use esp_idf_svc::hal::modem::Modem;
use esp_idf_svc::hal::peripheral::Peripheral;
use esp_idf_svc::nvs::EspDefaultNvsPartition;
use esp_idf_svc::sys::{self, esp, EspError};
use esp_idf_svc::wifi::{ClientConfiguration, Configuration, EspWifi};

use crate::broadcaster::RadioLink;
use crate::error::{InitError, LinkError};
use crate::identity::MacAddress;
use crate::mailbox::Mailbox;

fn radio_init(e: EspError) -> InitError {
    InitError::RadioInit(e.code())
}

/// Start Wi-Fi in station mode, optionally pinned to `channel`.
///
/// The returned driver must stay alive for as long as ESP-NOW is used.
pub fn start_station(
    modem: impl Peripheral<P = Modem> + 'static,
    channel: Option<u8>,
) -> Result<EspWifi<'static>, InitError> {
    let sysloop = EspSystemEventLoop::take().map_err(radio_init)?;
    let nvs = EspDefaultNvsPartition::take().map_err(radio_init)?;

    let mut wifi = EspWifi::new(modem, sysloop, Some(nvs)).map_err(radio_init)?;
    wifi.set_configuration(&Configuration::Client(ClientConfiguration::default()))
        .map_err(radio_init)?;
    wifi.start().map_err(radio_init)?;

    if let Some(ch) = channel {
        // SAFETY: Wi-Fi is started
        esp!(unsafe { sys::esp_wifi_set_channel(ch, sys::wifi_second_chan_t_WIFI_SECOND_CHAN_NONE) })
            .map_err(radio_init)?;
    }

    Ok(wifi)
}

/// Station interface MAC.
pub fn station_mac() -> Result<MacAddress, InitError> {
    let mut mac = [0u8; 6];
    // SAFETY: `mac` is 6 bytes as esp_read_mac requires
    esp!(unsafe { sys::esp_read_mac(mac.as_mut_ptr(), sys::esp_mac_type_t_ESP_MAC_WIFI_STA) })
        .map_err(radio_init)?;
    Ok(MacAddress::new(mac))
}

/// Initialise ESP-NOW. Wi-Fi must already be started.
pub fn open_espnow() -> Result<EspNow<'static>, InitError> {
    EspNow::take().map_err(radio_init)
}

/// Sensor side: ESP-NOW with the broadcast peer installed.
pub struct EspNowLink {
    espnow: EspNow<'static>,
}

impl EspNowLink {
    /// Register the (ignored) send callback and the broadcast peer.
    ///
    /// Broadcast cannot be encrypted. Channel 0 means "current channel".
    pub fn new(espnow: EspNow<'static>) -> Result<Self, InitError> {
        espnow.register_send_cb(|_, _| {}).map_err(radio_init)?;

        let peer = PeerInfo {
            peer_addr: BROADCAST,
            channel: 0,
            ifidx: sys::wifi_interface_t_WIFI_IF_STA,
            encrypt: false,
            ..Default::default()
        };
        espnow
            .add_peer(peer)
            .map_err(|e| InitError::PeerRegistration(e.code()))?;

        Ok(Self { espnow })
    }
}

impl RadioLink for EspNowLink {
    #[inline]
    fn broadcast(&mut self, frame: &[u8]) -> Result<(), LinkError> {
        self.espnow
            .send(MacAddress::BROADCAST.octets(), frame)
            .map_err(|e| LinkError::Send(e.code()))
    }
}

/// Hub side: route every received frame into `mailbox`.
///
/// The callback runs in the Wi-Fi task. It does one bounded copy and returns.
pub fn attach_mailbox(espnow: &EspNow<'static>, mailbox: &'static Mailbox) -> Result<(), InitError> {
    espnow
        .register_recv_cb(move |info: &ReceiveInfo<'_>, data: &[u8]| {
            mailbox.deliver(info.src_addr, data);
        })
        .map_err(radio_init)
}
