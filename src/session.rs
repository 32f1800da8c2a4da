//! Per-connection Wii Remote session.
//!
//! Owns the remote's mutable state (extension, battery, report mode) and
//! turns each raw input report into one normalized 0x30 frame. Commands the
//! decode needs (extension init, identification reads, report mode changes)
//! are sent inline through the session's [`Transport`].
//!
//! Extension lifecycle:
//!   Absent --status(connected)--> Identifying --read @0x00FA--> Identified(variant)
//!   any    --status(disconnected)--> Absent

use tracing::{debug, info, warn};

use crate::gamepad::GamepadState;
use crate::transport::{Address, Clock, MonotonicClock, Transport};
use crate::wii::command::{OutputBuffer, OutputCommand};
use crate::wii::extension::{
    self, ExtensionVariant, IDENTITY_ADDRESS, IDENTITY_LEN, INIT1_ADDRESS, INIT1_DATA,
    INIT2_ADDRESS, INIT2_DATA, MODE_CORE,
};
use crate::wii::mapping::{self, ExtensionFrame};
use crate::wii::report::{CoreButtons, InputReport};

/// Battery byte units per reported level step.
const BATTERY_STEP: u8 = 52;

/// The low 16 bits of the identity register, as echoed in 0x21 replies.
const IDENTITY_READ_ADDRESS: u16 = (IDENTITY_ADDRESS & 0xFFFF) as u16;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ExtensionState {
    Absent,
    /// Init written and identity read requested, reply pending.
    Identifying,
    Identified(ExtensionVariant),
}

/// One connected Wii Remote.
pub struct ControllerSession<T, C = MonotonicClock> {
    address: Address,
    transport: T,
    clock: C,
    output: OutputBuffer,
    extension: ExtensionState,
    report_mode: Option<u8>,
    battery: u8,
    charging: bool,
}

impl<T: Transport> ControllerSession<T> {
    pub fn new(address: Address, transport: T) -> Self {
        Self::with_clock(address, transport, MonotonicClock::new())
    }
}

impl<T: Transport, C: Clock> ControllerSession<T, C> {
    pub fn with_clock(address: Address, transport: T, clock: C) -> Self {
        Self {
            address,
            transport,
            clock,
            output: OutputBuffer::new(),
            extension: ExtensionState::Absent,
            report_mode: None,
            battery: 0,
            charging: false,
        }
    }

    /// Probe the remote's status. The reply arrives as a 0x20 report and
    /// drives extension detection from there.
    pub fn initialize(&mut self) -> anyhow::Result<()> {
        info!("[WII] {}: requesting status", self.address);
        self.query_status()
    }

    /// Convert one raw input report into a normalized frame.
    ///
    /// Never fails: unknown or malformed reports still yield a frame carrying
    /// the current battery state.
    pub fn convert(&mut self, raw: &[u8]) -> GamepadState {
        let mut state = GamepadState::default();

        match InputReport::parse(raw) {
            Ok(report) => self.handle_report(report, &mut state),
            Err(e) => warn!("[WII] {}: dropping report: {e}", self.address),
        }

        state.conn_info = 0;
        state.battery = self.battery | u8::from(self.charging);
        state.timer = (self.clock.millis() & 0xFF) as u8;
        state
    }

    pub fn address(&self) -> Address {
        self.address
    }

    /// Identified extension. `None` while nothing is plugged in or the
    /// identity read is still pending.
    pub fn extension(&self) -> ExtensionVariant {
        match self.extension {
            ExtensionState::Identified(variant) => variant,
            ExtensionState::Absent | ExtensionState::Identifying => ExtensionVariant::None,
        }
    }

    pub fn is_identifying(&self) -> bool {
        self.extension == ExtensionState::Identifying
    }

    /// Last report mode requested from the remote.
    pub fn report_mode(&self) -> Option<u8> {
        self.report_mode
    }

    pub fn battery(&self) -> u8 {
        self.battery
    }

    pub fn charging(&self) -> bool {
        self.charging
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    // --- Commands ---

    pub fn query_status(&mut self) -> anyhow::Result<()> {
        self.send(&OutputCommand::QueryStatus)
    }

    pub fn set_report_mode(&mut self, mode: u8) -> anyhow::Result<()> {
        self.send(&OutputCommand::SetReportMode { mode })
    }

    pub fn write_memory(&mut self, address: u32, data: &[u8]) -> anyhow::Result<()> {
        let cmd = OutputCommand::write_memory(address, data)?;
        self.send(&cmd)
    }

    pub fn read_memory(&mut self, address: u32, size: u16) -> anyhow::Result<()> {
        self.send(&OutputCommand::ReadMemory { address, size })
    }

    /// Write the LED byte as-is (LED 1 = 0x10 ... LED 4 = 0x80).
    pub fn set_led_byte(&mut self, leds: u8) -> anyhow::Result<()> {
        self.send(&OutputCommand::SetPlayerLed { mask: leds })
    }

    /// Light LEDs from a 4-bit mask (bit 0 = LED 1).
    pub fn set_player_leds(&mut self, mask: u8) -> anyhow::Result<()> {
        self.send(&OutputCommand::player_leds(mask))
    }

    fn send(&mut self, cmd: &OutputCommand) -> anyhow::Result<()> {
        if let OutputCommand::SetReportMode { mode } = *cmd {
            self.report_mode = Some(mode);
        }
        let report = self.output.encode(cmd);
        debug!("[WII] {}: send {:02X?}", self.address, report);
        self.transport.send(&self.address, report)
    }

    /// Send from inside a decode. The frame is produced regardless, so a
    /// failed send is only logged.
    fn issue(&mut self, cmd: OutputCommand) {
        if let Err(e) = self.send(&cmd) {
            warn!(
                "[WII] {}: failed to send report 0x{:02X}: {e:#}",
                self.address,
                cmd.id()
            );
        }
    }

    // --- Input handlers ---

    fn handle_report(&mut self, report: InputReport, state: &mut GamepadState) {
        match report {
            InputReport::Status {
                extension_connected,
                battery,
                ..
            } => self.handle_status(extension_connected, battery),
            InputReport::ReadData {
                error,
                address,
                data,
                ..
            } => self.handle_read_data(address, error, &data),
            InputReport::Ack { report, error, .. } => {
                debug!(
                    "[WII] {}: ack for report 0x{report:02X} (error {error})",
                    self.address
                );
            }
            InputReport::Buttons { buttons } | InputReport::ButtonsAccel { buttons, .. } => {
                // Accelerometer data is not forwarded
                mapping::map_core_horizontal(&buttons, state);
            }
            InputReport::ButtonsExt8 { buttons, extension } => {
                self.handle_extension_report(&buttons, &extension, state);
            }
            InputReport::ButtonsExt19 { buttons, extension } => {
                self.handle_extension_report(&buttons, &extension, state);
            }
            InputReport::Unknown { id } => {
                debug!("[WII] {}: received report 0x{id:02X}", self.address);
            }
        }
    }

    fn handle_status(&mut self, extension_connected: bool, battery: u8) {
        if !extension_connected {
            if self.extension != ExtensionState::Absent {
                info!("[WII] {}: extension disconnected", self.address);
            }
            self.extension = ExtensionState::Absent;
            self.charging = false;
            self.issue(OutputCommand::SetReportMode { mode: MODE_CORE });
        } else if self.extension == ExtensionState::Absent {
            info!("[WII] {}: extension connected, identifying...", self.address);
            self.charging = false;
            self.issue(OutputCommand::write_byte(INIT1_ADDRESS, INIT1_DATA));
            self.issue(OutputCommand::write_byte(INIT2_ADDRESS, INIT2_DATA));
            self.issue(OutputCommand::ReadMemory {
                address: IDENTITY_ADDRESS,
                size: IDENTITY_LEN,
            });
            self.extension = ExtensionState::Identifying;
        }

        self.battery = (battery / BATTERY_STEP) << 1;
    }

    fn handle_read_data(&mut self, address: u16, error: u8, data: &[u8; 16]) {
        if address != IDENTITY_READ_ADDRESS {
            debug!(
                "[WII] {}: ignoring memory read at 0x{address:04X}",
                self.address
            );
            return;
        }

        // Error replies still identify; garbage bytes come out unsupported.
        if error != 0 {
            warn!(
                "[WII] {}: extension identity read failed (error {error})",
                self.address
            );
        }

        let mut id_bytes = [0u8; 6];
        id_bytes.copy_from_slice(&data[..6]);
        let identity = extension::identity_from_bytes(&id_bytes);
        let (variant, mode) = extension::identify(identity);

        if variant == ExtensionVariant::Unsupported {
            warn!(
                "[WII] {}: unsupported extension connected: 0x{identity:012X}",
                self.address
            );
        } else {
            info!("[WII] {}: {variant:?} connected", self.address);
        }

        self.extension = ExtensionState::Identified(variant);
        self.issue(OutputCommand::SetReportMode { mode });
    }

    fn handle_extension_report(
        &mut self,
        buttons: &CoreButtons,
        ext: &[u8],
        state: &mut GamepadState,
    ) {
        let variant = self.extension();
        if variant.uses_vertical_remote() {
            mapping::map_core_vertical(buttons, state);
        }

        match mapping::map_extension(variant, ext, state) {
            ExtensionFrame::Mapped {
                charging: Some(charging),
            } => self.charging = charging,
            ExtensionFrame::Mapped { charging: None } | ExtensionFrame::Skipped => {}
            ExtensionFrame::Short { needed } => {
                debug!(
                    "[WII] {}: {variant:?} needs {needed} extension bytes, report has {}",
                    self.address,
                    ext.len()
                );
            }
        }
    }
}
