//! Wii Remote input report parsing.
//!
//! Every report is `[id] [payload...]`, and every payload starts with the two
//! core button bytes:
//!   byte 0: LEFT=01 RIGHT=02 DOWN=04 UP=08 PLUS=10
//!   byte 1: TWO=01 ONE=02 B=04 A=08 MINUS=10 HOME=80
//!
//! | id   | payload | layout after buttons                                  |
//! |------|---------|-------------------------------------------------------|
//! | 0x20 | 6       | flags, reserved(2), battery                           |
//! | 0x21 | 21      | size/error, address (BE u16), data(16)                |
//! | 0x22 | 4       | acknowledged report id, error code                    |
//! | 0x30 | 2       | -                                                     |
//! | 0x31 | 5       | accelerometer(3)                                      |
//! | 0x32 | 10      | extension(8)                                          |
//! | 0x34 | 21      | extension(19)                                         |

use crate::error::ReportError;

pub const REPORT_STATUS: u8 = 0x20;
pub const REPORT_READ_DATA: u8 = 0x21;
pub const REPORT_ACK: u8 = 0x22;
pub const REPORT_BUTTONS: u8 = 0x30;
pub const REPORT_BUTTONS_ACCEL: u8 = 0x31;
pub const REPORT_BUTTONS_EXT8: u8 = 0x32;
pub const REPORT_BUTTONS_EXT19: u8 = 0x34;

/// Status flag: an extension is plugged in.
const FLAG_EXTENSION_CONNECTED: u8 = 0x02;

/// Core Wii Remote buttons, raw two-byte bitfield (active-high).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CoreButtons(pub [u8; 2]);

/// Physical Wii Remote buttons.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WiiButton {
    DpadLeft,
    DpadRight,
    DpadDown,
    DpadUp,
    Plus,
    Two,
    One,
    B,
    A,
    Minus,
    Home,
}

impl WiiButton {
    /// (byte_index, bitmask) within [`CoreButtons`].
    pub const fn position(self) -> (usize, u8) {
        match self {
            WiiButton::DpadLeft => (0, 0x01),
            WiiButton::DpadRight => (0, 0x02),
            WiiButton::DpadDown => (0, 0x04),
            WiiButton::DpadUp => (0, 0x08),
            WiiButton::Plus => (0, 0x10),
            WiiButton::Two => (1, 0x01),
            WiiButton::One => (1, 0x02),
            WiiButton::B => (1, 0x04),
            WiiButton::A => (1, 0x08),
            WiiButton::Minus => (1, 0x10),
            WiiButton::Home => (1, 0x80),
        }
    }
}

impl CoreButtons {
    pub fn get(&self, btn: WiiButton) -> bool {
        let (byte_idx, mask) = btn.position();
        self.0[byte_idx] & mask != 0
    }
}

/// One parsed input report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputReport {
    /// 0x20
    Status {
        buttons: CoreButtons,
        extension_connected: bool,
        battery: u8,
    },
    /// 0x21
    ReadData {
        buttons: CoreButtons,
        /// Number of valid bytes in `data` (1..=16).
        size: u8,
        error: u8,
        address: u16,
        data: [u8; 16],
    },
    /// 0x22
    Ack {
        buttons: CoreButtons,
        report: u8,
        error: u8,
    },
    /// 0x30
    Buttons { buttons: CoreButtons },
    /// 0x31
    ButtonsAccel {
        buttons: CoreButtons,
        accel: [u8; 3],
    },
    /// 0x32
    ButtonsExt8 {
        buttons: CoreButtons,
        extension: [u8; 8],
    },
    /// 0x34
    ButtonsExt19 {
        buttons: CoreButtons,
        extension: [u8; 19],
    },
    /// Any other report id. The payload is not inspected.
    Unknown { id: u8 },
}

/// Payload length each known report id needs, `None` for unknown ids.
fn payload_len(id: u8) -> Option<usize> {
    match id {
        REPORT_STATUS => Some(6),
        REPORT_READ_DATA => Some(21),
        REPORT_ACK => Some(4),
        REPORT_BUTTONS => Some(2),
        REPORT_BUTTONS_ACCEL => Some(5),
        REPORT_BUTTONS_EXT8 => Some(10),
        REPORT_BUTTONS_EXT19 => Some(21),
        _ => None,
    }
}

fn array<const N: usize>(data: &[u8]) -> [u8; N] {
    let mut out = [0u8; N];
    out.copy_from_slice(&data[..N]);
    out
}

impl InputReport {
    /// Parse a raw report (`[id] [payload...]`).
    ///
    /// Extra trailing bytes are ignored; a payload shorter than the id's
    /// layout is rejected.
    pub fn parse(raw: &[u8]) -> Result<Self, ReportError> {
        let (&id, payload) = raw.split_first().ok_or(ReportError::Empty)?;

        let Some(expected) = payload_len(id) else {
            return Ok(InputReport::Unknown { id });
        };
        if payload.len() < expected {
            return Err(ReportError::Truncated {
                id,
                expected,
                actual: payload.len(),
            });
        }

        let buttons = CoreButtons([payload[0], payload[1]]);
        let report = match id {
            REPORT_STATUS => InputReport::Status {
                buttons,
                extension_connected: payload[2] & FLAG_EXTENSION_CONNECTED != 0,
                battery: payload[5],
            },
            REPORT_READ_DATA => InputReport::ReadData {
                buttons,
                size: (payload[2] >> 4) + 1,
                error: payload[2] & 0x0F,
                address: u16::from_be_bytes([payload[3], payload[4]]),
                data: array(&payload[5..]),
            },
            REPORT_ACK => InputReport::Ack {
                buttons,
                report: payload[2],
                error: payload[3],
            },
            REPORT_BUTTONS => InputReport::Buttons { buttons },
            REPORT_BUTTONS_ACCEL => InputReport::ButtonsAccel {
                buttons,
                accel: array(&payload[2..]),
            },
            REPORT_BUTTONS_EXT8 => InputReport::ButtonsExt8 {
                buttons,
                extension: array(&payload[2..]),
            },
            REPORT_BUTTONS_EXT19 => InputReport::ButtonsExt19 {
                buttons,
                extension: array(&payload[2..]),
            },
            _ => InputReport::Unknown { id },
        };
        Ok(report)
    }

    /// Report id this value was parsed from.
    pub fn id(&self) -> u8 {
        match self {
            InputReport::Status { .. } => REPORT_STATUS,
            InputReport::ReadData { .. } => REPORT_READ_DATA,
            InputReport::Ack { .. } => REPORT_ACK,
            InputReport::Buttons { .. } => REPORT_BUTTONS,
            InputReport::ButtonsAccel { .. } => REPORT_BUTTONS_ACCEL,
            InputReport::ButtonsExt8 { .. } => REPORT_BUTTONS_EXT8,
            InputReport::ButtonsExt19 { .. } => REPORT_BUTTONS_EXT19,
            InputReport::Unknown { id } => *id,
        }
    }
}
