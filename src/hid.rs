//! hidapi transport for a paired Wii Remote.
//!
//! The remote shows up as a hidraw device once BlueZ has connected it. Input
//! reports are read with a short timeout so the bridge loop can notice
//! shutdown; output reports go out through the same handle.

use std::time::Duration;

use anyhow::Context;
use hidapi::{DeviceInfo, HidApi, HidDevice};
use tracing::{info, warn};

use wiimote_bridge::transport::{Address, Transport};

pub const VENDOR_ID: u16 = 0x057E;
pub const PRODUCT_ID_WIIMOTE: u16 = 0x0306;
/// RVL-CNT-01-TR (Wii Remote Plus).
pub const PRODUCT_ID_WIIMOTE_PLUS: u16 = 0x0330;

/// Largest input report the remote sends is 22 bytes.
pub const MAX_REPORT_LEN: usize = 32;
pub const READ_TIMEOUT_MS: i32 = 100;

const OPEN_ATTEMPTS: u32 = 10;
const OPEN_RETRY_DELAY: Duration = Duration::from_millis(500);

fn is_wiimote(info: &DeviceInfo) -> bool {
    info.vendor_id() == VENDOR_ID
        && (info.product_id() == PRODUCT_ID_WIIMOTE || info.product_id() == PRODUCT_ID_WIIMOTE_PLUS)
}

/// BlueZ reports the remote's Bluetooth address as the HID serial number.
fn device_address(info: &DeviceInfo) -> Option<Address> {
    info.serial_number()?.parse().ok()
}

/// Open Wii Remote over hidraw.
pub struct HidTransport {
    device: HidDevice,
}

impl HidTransport {
    /// Open the remote with `address`, or the first remote found.
    ///
    /// Retries a few times, since the hidraw node may appear a moment after
    /// the Bluetooth connection.
    pub fn open(address: Option<Address>) -> anyhow::Result<(Self, Address)> {
        let mut api = HidApi::new().context("could not initialize hidapi")?;

        for attempt in 1..=OPEN_ATTEMPTS {
            let found = api
                .device_list()
                .filter(|d| is_wiimote(d))
                .find(|d| address.is_none() || device_address(d) == address);

            match found {
                Some(info) => {
                    let device = info
                        .open_device(&api)
                        .context("could not open Wii Remote hidraw device")?;
                    let addr = device_address(info).unwrap_or(Address::any());
                    info!("[HID] Opened Wii Remote {addr} ({:04X})", info.product_id());
                    return Ok((Self { device }, addr));
                }
                None if attempt < OPEN_ATTEMPTS => {
                    warn!("[HID] Attempt {attempt}/{OPEN_ATTEMPTS}: no Wii Remote found, retrying...");
                    std::thread::sleep(OPEN_RETRY_DELAY);
                    api.refresh_devices()?;
                }
                None => {}
            }
        }

        match address {
            Some(addr) => anyhow::bail!("Wii Remote {addr} not found after {OPEN_ATTEMPTS} attempts"),
            None => anyhow::bail!("no Wii Remote found after {OPEN_ATTEMPTS} attempts"),
        }
    }

    /// Read one input report. Returns 0 on timeout.
    pub fn read_timeout(&self, buf: &mut [u8], timeout_ms: i32) -> anyhow::Result<usize> {
        self.device
            .read_timeout(buf, timeout_ms)
            .context("Wii Remote read failed")
    }
}

impl Transport for HidTransport {
    fn send(&mut self, _address: &Address, report: &[u8]) -> anyhow::Result<()> {
        self.device
            .write(report)
            .with_context(|| format!("Wii Remote write failed: {report:02X?}"))?;
        Ok(())
    }
}
