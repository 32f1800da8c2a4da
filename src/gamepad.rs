//! Normalized gamepad state and its Pro Controller 0x30 wire encoding.
//!
//! Report format (49 bytes):
//!   [0]      = Report ID (0x30)
//!   [1]      = Timer
//!   [2]      = Battery nibble (high) | connection info (low)
//!   [3..6]   = Button bitfields (3 bytes)
//!   [6..9]   = Left stick (12-bit packed X/Y)
//!   [9..12]  = Right stick (12-bit packed X/Y)
//!   [12]     = Vibrator
//!   [13..49] = Motion frames (unused, zero)

use serde::{Serialize, Serializer};

/// Report id of every normalized report.
pub const REPORT_ID: u8 = 0x30;
/// Total normalized report size, id byte included.
pub const REPORT_LEN: usize = 49;
/// Centered stick coordinate.
pub const STICK_ZERO: u16 = 0x800;
/// Largest 12-bit stick coordinate.
pub const STICK_MAX: u16 = 0xFFF;

/// Button name enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Button {
    Y,
    X,
    B,
    A,
    R,
    ZR,
    Minus,
    Plus,
    R3,
    L3,
    Home,
    Capture,
    DpadDown,
    DpadUp,
    DpadRight,
    DpadLeft,
    L,
    ZL,
}

impl Button {
    pub const ALL: [Button; 18] = [
        Button::Y,
        Button::X,
        Button::B,
        Button::A,
        Button::R,
        Button::ZR,
        Button::Minus,
        Button::Plus,
        Button::R3,
        Button::L3,
        Button::Home,
        Button::Capture,
        Button::DpadDown,
        Button::DpadUp,
        Button::DpadRight,
        Button::DpadLeft,
        Button::L,
        Button::ZL,
    ];

    /// (byte_index_in_button_field, bitmask) in the 0x30 report.
    pub fn position(self) -> (usize, u8) {
        match self {
            // Byte 0 (right-side): Y X B A _ _ R ZR
            Button::Y => (0, 0x01),
            Button::X => (0, 0x02),
            Button::B => (0, 0x04),
            Button::A => (0, 0x08),
            Button::R => (0, 0x40),
            Button::ZR => (0, 0x80),
            // Byte 1 (shared): MINUS PLUS RSTICK LSTICK HOME CAP _ _
            Button::Minus => (1, 0x01),
            Button::Plus => (1, 0x02),
            Button::R3 => (1, 0x04),
            Button::L3 => (1, 0x08),
            Button::Home => (1, 0x10),
            Button::Capture => (1, 0x20),
            // Byte 2 (left-side): DD DU DR DL _ _ L ZL
            Button::DpadDown => (2, 0x01),
            Button::DpadUp => (2, 0x02),
            Button::DpadRight => (2, 0x04),
            Button::DpadLeft => (2, 0x08),
            Button::L => (2, 0x40),
            Button::ZL => (2, 0x80),
        }
    }
}

/// All button states packed as the 3 button bytes of the 0x30 report.
///
/// Use [`Button`] with `get()`/`set()` to access individual buttons.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ButtonState {
    bytes: [u8; 3],
}

impl ButtonState {
    pub fn from_bytes(bytes: [u8; 3]) -> Self {
        Self { bytes }
    }

    pub fn to_bytes(&self) -> [u8; 3] {
        self.bytes
    }

    pub fn get(&self, btn: Button) -> bool {
        let (byte_idx, mask) = btn.position();
        self.bytes[byte_idx] & mask != 0
    }

    pub fn set(&mut self, btn: Button, val: bool) {
        let (byte_idx, mask) = btn.position();
        if val {
            self.bytes[byte_idx] |= mask;
        } else {
            self.bytes[byte_idx] &= !mask;
        }
    }

    /// Buttons currently held, in report bit order.
    pub fn pressed(&self) -> Vec<Button> {
        Button::ALL.into_iter().filter(|b| self.get(*b)).collect()
    }
}

impl Serialize for ButtonState {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.pressed())
    }
}

/// One normalized controller frame.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct GamepadState {
    pub buttons: ButtonState,
    /// Left stick 12-bit values.
    pub left_stick: (u16, u16),
    /// Right stick 12-bit values.
    pub right_stick: (u16, u16),
    /// Connection info nibble, always 0 for this bridge.
    pub conn_info: u8,
    /// Battery level with the charging flag in bit 0.
    pub battery: u8,
    pub timer: u8,
}

impl Default for GamepadState {
    fn default() -> Self {
        Self {
            buttons: ButtonState::default(),
            left_stick: (STICK_ZERO, STICK_ZERO),
            right_stick: (STICK_ZERO, STICK_ZERO),
            conn_info: 0,
            battery: 0,
            timer: 0,
        }
    }
}

/// Pack a 12-bit stick position into 3 bytes.
/// Byte layout: [lo8_x] [hi4_x | lo4_y] [hi8_y]
fn pack_stick_12bit(out: &mut [u8], (x, y): (u16, u16)) {
    let x = x & STICK_MAX;
    let y = y & STICK_MAX;
    out[0] = (x & 0xFF) as u8;
    out[1] = ((x >> 8) & 0x0F) as u8 | (((y & 0x0F) as u8) << 4);
    out[2] = ((y >> 4) & 0xFF) as u8;
}

impl GamepadState {
    /// Build the 0x30 report bytes.
    pub fn to_report(&self) -> [u8; REPORT_LEN] {
        let mut report = [0u8; REPORT_LEN];

        report[0] = REPORT_ID;
        report[1] = self.timer;
        report[2] = ((self.battery & 0x0F) << 4) | (self.conn_info & 0x0F);

        let [b0, b1, b2] = self.buttons.to_bytes();
        report[3] = b0;
        report[4] = b1;
        report[5] = b2;

        pack_stick_12bit(&mut report[6..9], self.left_stick);
        pack_stick_12bit(&mut report[9..12], self.right_stick);

        report
    }
}
