//! Wii Remote and extension input → normalized gamepad mapping.
//!
//! Button tables are data: each entry names a source bit and the output
//! button, and each table says whether its source bits are active-low.

use crate::gamepad::{Button, ButtonState, GamepadState, STICK_MAX, STICK_ZERO};

use super::extension::ExtensionVariant;
use super::report::{CoreButtons, WiiButton};

/// Nunchuck stick: 8-bit, centered at 0x80, ~0xB8 usable travel.
const NUNCHUCK_CENTER: u8 = 0x80;
const NUNCHUCK_SCALE: f32 = STICK_MAX as f32 / 184.0;
/// Classic left stick: 6-bit, centered at 0x20.
const CLASSIC_LEFT_CENTER: u8 = 0x20;
const CLASSIC_LEFT_SCALE: f32 = STICK_MAX as f32 / 63.0;
/// Classic right stick: 5-bit, centered at 0x10.
const CLASSIC_RIGHT_CENTER: u8 = 0x10;
const CLASSIC_RIGHT_SCALE: f32 = STICK_MAX as f32 / 31.0;

/// Byte length of each extension layout.
const NUNCHUCK_LEN: usize = 6;
const CLASSIC_LEN: usize = 6;
const WIIU_PRO_LEN: usize = 11;

/// Wii U Pro axis offsets, each a little-endian u16.
const WIIU_PRO_LX: usize = 0;
const WIIU_PRO_RX: usize = 2;
const WIIU_PRO_LY: usize = 4;
const WIIU_PRO_RY: usize = 6;

/// Wii U Pro status byte: charging flag (active-low).
const WIIU_PRO_STATUS: usize = 10;
const WIIU_PRO_CHARGING: u8 = 0x04;

/// Bit-to-button mapping for one source layout.
pub struct ButtonTable {
    /// Source bits read 0 while the button is held.
    pub active_low: bool,
    /// (source byte, source mask, output button)
    pub entries: &'static [(usize, u8, Button)],
}

impl ButtonTable {
    /// Write every mapped button from `src` into `out`.
    pub fn apply(&self, src: &[u8], out: &mut ButtonState) {
        for &(byte_idx, mask, btn) in self.entries {
            let Some(byte) = src.get(byte_idx) else {
                continue;
            };
            let bit = byte & mask != 0;
            out.set(btn, bit != self.active_low);
        }
    }
}

const fn core(src: WiiButton, dst: Button) -> (usize, u8, Button) {
    let (byte_idx, mask) = src.position();
    (byte_idx, mask, dst)
}

/// Remote held sideways like a classic pad: dpad rotated a quarter turn.
pub const HORIZONTAL: ButtonTable = ButtonTable {
    active_low: false,
    entries: &[
        core(WiiButton::DpadLeft, Button::DpadDown),
        core(WiiButton::DpadRight, Button::DpadUp),
        core(WiiButton::DpadDown, Button::DpadRight),
        core(WiiButton::DpadUp, Button::DpadLeft),
        core(WiiButton::Two, Button::A),
        core(WiiButton::One, Button::B),
        core(WiiButton::A, Button::R),
        core(WiiButton::B, Button::L),
        core(WiiButton::Minus, Button::Minus),
        core(WiiButton::Plus, Button::Plus),
        core(WiiButton::Home, Button::Home),
    ],
};

/// Remote held upright beside an extension. The bare remote has no
/// shoulders, so 1/2 land on R/ZR.
pub const VERTICAL: ButtonTable = ButtonTable {
    active_low: false,
    entries: &[
        core(WiiButton::DpadDown, Button::DpadDown),
        core(WiiButton::DpadUp, Button::DpadUp),
        core(WiiButton::DpadRight, Button::DpadRight),
        core(WiiButton::DpadLeft, Button::DpadLeft),
        core(WiiButton::A, Button::A),
        core(WiiButton::B, Button::B),
        core(WiiButton::One, Button::R),
        core(WiiButton::Two, Button::ZR),
        core(WiiButton::Minus, Button::Minus),
        core(WiiButton::Plus, Button::Plus),
        core(WiiButton::Home, Button::Home),
    ],
};

/// Nunchuck byte 5: Z=01 C=02.
pub const NUNCHUCK_BUTTONS: ButtonTable = ButtonTable {
    active_low: true,
    entries: &[(5, 0x02, Button::L), (5, 0x01, Button::ZL)],
};

/// Classic / Classic Pro bytes 4-5.
pub const CLASSIC_BUTTONS: ButtonTable = ButtonTable {
    active_low: true,
    entries: &[
        (4, 0x02, Button::R),
        (4, 0x04, Button::Plus),
        (4, 0x08, Button::Home),
        (4, 0x10, Button::Minus),
        (4, 0x20, Button::L),
        (4, 0x40, Button::DpadDown),
        (4, 0x80, Button::DpadRight),
        (5, 0x01, Button::DpadUp),
        (5, 0x02, Button::DpadLeft),
        (5, 0x04, Button::ZR),
        (5, 0x08, Button::X),
        (5, 0x10, Button::A),
        (5, 0x20, Button::Y),
        (5, 0x40, Button::B),
        (5, 0x80, Button::ZL),
    ],
};

/// Wii U Pro bytes 8-10: the Classic layout plus stick clicks.
pub const WIIU_PRO_BUTTONS: ButtonTable = ButtonTable {
    active_low: true,
    entries: &[
        (8, 0x02, Button::R),
        (8, 0x04, Button::Plus),
        (8, 0x08, Button::Home),
        (8, 0x10, Button::Minus),
        (8, 0x20, Button::L),
        (8, 0x40, Button::DpadDown),
        (8, 0x80, Button::DpadRight),
        (9, 0x01, Button::DpadUp),
        (9, 0x02, Button::DpadLeft),
        (9, 0x04, Button::ZR),
        (9, 0x08, Button::X),
        (9, 0x10, Button::A),
        (9, 0x20, Button::Y),
        (9, 0x40, Button::B),
        (9, 0x80, Button::ZL),
        (10, 0x01, Button::R3),
        (10, 0x02, Button::L3),
    ],
};

/// Result of decoding one extension payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtensionFrame {
    /// Variant has no extension layout (none plugged in, or unsupported).
    Skipped,
    /// Payload is shorter than the variant's layout; nothing was mapped.
    Short { needed: usize },
    /// Sticks and buttons were written. `charging` is set when the
    /// extension reports its own charge state.
    Mapped { charging: Option<bool> },
}

/// Clamp to the 12-bit stick range.
fn clamp_axis(value: i32) -> u16 {
    value.clamp(0, i32::from(STICK_MAX)) as u16
}

/// Scale a raw axis around its center onto the 12-bit range.
fn scale_axis(raw: u8, center: u8, scale: f32) -> u16 {
    let offset = f32::from(raw) - f32::from(center);
    clamp_axis((offset * scale).round() as i32 + i32::from(STICK_ZERO))
}

/// Wii U Pro sticks are already 12-bit but only span ~2/3 of the range.
fn expand_wiiu_axis(raw: u16) -> u16 {
    let centered = i32::from(raw) - i32::from(STICK_ZERO);
    clamp_axis(((3 * centered) >> 1) + i32::from(STICK_ZERO))
}

fn fixed<const N: usize>(ext: &[u8]) -> Option<&[u8; N]> {
    ext.get(..N)?.try_into().ok()
}

/// Core-button-only reports (0x30/0x31): sticks centered, sideways layout.
pub fn map_core_horizontal(buttons: &CoreButtons, state: &mut GamepadState) {
    state.left_stick = (STICK_ZERO, STICK_ZERO);
    state.right_stick = (STICK_ZERO, STICK_ZERO);
    HORIZONTAL.apply(&buttons.0, &mut state.buttons);
}

/// Core buttons alongside an extension (0x32/0x34).
pub fn map_core_vertical(buttons: &CoreButtons, state: &mut GamepadState) {
    VERTICAL.apply(&buttons.0, &mut state.buttons);
}

/// Decode an extension payload for the identified variant.
pub fn map_extension(
    variant: ExtensionVariant,
    ext: &[u8],
    state: &mut GamepadState,
) -> ExtensionFrame {
    match variant {
        ExtensionVariant::Nunchuck => match fixed::<NUNCHUCK_LEN>(ext) {
            Some(ext) => {
                map_nunchuck(ext, state);
                ExtensionFrame::Mapped { charging: None }
            }
            None => ExtensionFrame::Short {
                needed: NUNCHUCK_LEN,
            },
        },
        ExtensionVariant::Classic | ExtensionVariant::ClassicPro => {
            match fixed::<CLASSIC_LEN>(ext) {
                Some(ext) => {
                    map_classic(ext, state);
                    ExtensionFrame::Mapped { charging: None }
                }
                None => ExtensionFrame::Short {
                    needed: CLASSIC_LEN,
                },
            }
        }
        ExtensionVariant::WiiUPro => match fixed::<WIIU_PRO_LEN>(ext) {
            Some(ext) => ExtensionFrame::Mapped {
                charging: Some(map_wiiu_pro(ext, state)),
            },
            None => ExtensionFrame::Short {
                needed: WIIU_PRO_LEN,
            },
        },
        ExtensionVariant::None | ExtensionVariant::Unsupported => ExtensionFrame::Skipped,
    }
}

fn map_nunchuck(ext: &[u8; NUNCHUCK_LEN], state: &mut GamepadState) {
    state.left_stick = (
        scale_axis(ext[0], NUNCHUCK_CENTER, NUNCHUCK_SCALE),
        scale_axis(ext[1], NUNCHUCK_CENTER, NUNCHUCK_SCALE),
    );
    NUNCHUCK_BUTTONS.apply(ext, &mut state.buttons);
}

fn map_classic(ext: &[u8; CLASSIC_LEN], state: &mut GamepadState) {
    state.left_stick = (
        scale_axis(ext[0] & 0x3F, CLASSIC_LEFT_CENTER, CLASSIC_LEFT_SCALE),
        scale_axis(ext[1] & 0x3F, CLASSIC_LEFT_CENTER, CLASSIC_LEFT_SCALE),
    );

    // RX is split across the top bits of bytes 0-2: [4:3] [2:1] [0]
    let rx = ((ext[0] >> 3) & 0x18) | ((ext[1] >> 5) & 0x06) | (ext[2] >> 7);
    let ry = ext[2] & 0x1F;
    state.right_stick = (
        scale_axis(rx, CLASSIC_RIGHT_CENTER, CLASSIC_RIGHT_SCALE),
        scale_axis(ry, CLASSIC_RIGHT_CENTER, CLASSIC_RIGHT_SCALE),
    );

    CLASSIC_BUTTONS.apply(ext, &mut state.buttons);
}

/// Returns whether the controller reports it is charging.
fn map_wiiu_pro(ext: &[u8; WIIU_PRO_LEN], state: &mut GamepadState) -> bool {
    let axis = |i: usize| expand_wiiu_axis(u16::from_le_bytes([ext[i], ext[i + 1]]));

    state.left_stick = (axis(WIIU_PRO_LX), axis(WIIU_PRO_LY));
    state.right_stick = (axis(WIIU_PRO_RX), axis(WIIU_PRO_RY));

    WIIU_PRO_BUTTONS.apply(ext, &mut state.buttons);

    ext[WIIU_PRO_STATUS] & WIIU_PRO_CHARGING == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Classic payload with sticks centered and no buttons held.
    fn classic_rest() -> [u8; 6] {
        // LX=0x20, LY=0x20, RX=0x10 (bits 4:3 = 0b10 in byte0[7:6]), RY=0x10
        [0x80 | 0x20, 0x20, 0x10, 0x00, 0xFF, 0xFF]
    }

    /// Wii U Pro payload with sticks centered and no buttons held.
    fn wiiu_rest() -> [u8; 11] {
        let mut ext = [0u8; 11];
        for i in (0..8).step_by(2) {
            ext[i..i + 2].copy_from_slice(&0x800u16.to_le_bytes());
        }
        ext[8] = 0xFF;
        ext[9] = 0xFF;
        ext[10] = 0xFF;
        ext
    }

    #[test]
    fn test_horizontal_rotates_dpad() {
        let mut state = GamepadState::default();
        // left + right + two + A
        map_core_horizontal(&CoreButtons([0x01 | 0x02, 0x01 | 0x08]), &mut state);
        assert!(state.buttons.get(Button::DpadDown));
        assert!(state.buttons.get(Button::DpadUp));
        assert!(!state.buttons.get(Button::DpadLeft));
        assert!(!state.buttons.get(Button::DpadRight));
        assert!(state.buttons.get(Button::A));
        assert!(state.buttons.get(Button::R));
        assert!(!state.buttons.get(Button::B));
        assert!(!state.buttons.get(Button::L));

        let mut state = GamepadState::default();
        // down + up + one + B + home
        map_core_horizontal(&CoreButtons([0x04 | 0x08, 0x02 | 0x04 | 0x80]), &mut state);
        assert!(state.buttons.get(Button::DpadRight));
        assert!(state.buttons.get(Button::DpadLeft));
        assert!(state.buttons.get(Button::B));
        assert!(state.buttons.get(Button::L));
        assert!(state.buttons.get(Button::Home));
    }

    #[test]
    fn test_horizontal_centers_sticks() {
        let mut state = GamepadState {
            left_stick: (0, 0),
            right_stick: (0xFFF, 0xFFF),
            ..Default::default()
        };
        map_core_horizontal(&CoreButtons::default(), &mut state);
        assert_eq!(state.left_stick, (0x800, 0x800));
        assert_eq!(state.right_stick, (0x800, 0x800));
        assert!(state.buttons.pressed().is_empty());
    }

    #[test]
    fn test_vertical_layout() {
        let mut state = GamepadState::default();
        // left + plus, one + two + A + minus
        map_core_vertical(&CoreButtons([0x01 | 0x10, 0x01 | 0x02 | 0x08 | 0x10]), &mut state);
        assert_eq!(
            state.buttons.pressed(),
            vec![
                Button::A,
                Button::R,
                Button::ZR,
                Button::Minus,
                Button::Plus,
                Button::DpadLeft
            ]
        );
    }

    #[test]
    fn test_nunchuck_rest_is_centered() {
        let mut state = GamepadState::default();
        let frame = map_extension(
            ExtensionVariant::Nunchuck,
            &[0x80, 0x80, 0, 0, 0, 0x03, 0, 0],
            &mut state,
        );
        assert_eq!(frame, ExtensionFrame::Mapped { charging: None });
        assert_eq!(state.left_stick, (0x800, 0x800));
        assert!(!state.buttons.get(Button::L));
        assert!(!state.buttons.get(Button::ZL));
    }

    #[test]
    fn test_nunchuck_extremes_clamp() {
        let mut state = GamepadState::default();
        map_extension(
            ExtensionVariant::Nunchuck,
            &[0x00, 0xFF, 0, 0, 0, 0x00],
            &mut state,
        );
        assert_eq!(state.left_stick, (0, 0xFFF));
        // C and Z both held (active-low)
        assert!(state.buttons.get(Button::L));
        assert!(state.buttons.get(Button::ZL));
    }

    #[test]
    fn test_nunchuck_scaling() {
        let mut state = GamepadState::default();
        // +0x20 → round(32 * 4095 / 184) = 712
        map_extension(ExtensionVariant::Nunchuck, &[0xA0, 0x60, 0, 0, 0, 0x03], &mut state);
        assert_eq!(state.left_stick, (0x800 + 712, 0x800 - 712));
    }

    #[test]
    fn test_nunchuck_c_only() {
        let mut state = GamepadState::default();
        // C held: bit1 low, Z released: bit0 high
        map_extension(ExtensionVariant::Nunchuck, &[0x80, 0x80, 0, 0, 0, 0x01], &mut state);
        assert!(state.buttons.get(Button::L));
        assert!(!state.buttons.get(Button::ZL));
    }

    #[test]
    fn test_classic_rest_is_centered() {
        let mut state = GamepadState::default();
        map_extension(ExtensionVariant::Classic, &classic_rest(), &mut state);
        assert_eq!(state.left_stick, (0x800, 0x800));
        assert_eq!(state.right_stick, (0x800, 0x800));
        assert!(state.buttons.pressed().is_empty());
    }

    #[test]
    fn test_classic_stick_range() {
        let mut state = GamepadState::default();
        // LX=0, LY=0x3F, RX=0, RY=0x1F
        map_extension(
            ExtensionVariant::ClassicPro,
            &[0x00, 0x3F, 0x1F, 0x00, 0xFF, 0xFF],
            &mut state,
        );
        assert_eq!(state.left_stick.0, 0);
        assert_eq!(state.left_stick.1, 0x800 + 2015);
        assert_eq!(state.right_stick.0, 0);
        assert_eq!(state.right_stick.1, 0x800 + 1981);

        // RX=0x1F: every split field set
        map_extension(
            ExtensionVariant::Classic,
            &[0xC0 | 0x20, 0xE0 | 0x20, 0x80 | 0x10, 0x00, 0xFF, 0xFF],
            &mut state,
        );
        assert_eq!(state.right_stick.0, 0x800 + 1981);
        assert_eq!(state.left_stick, (0x800, 0x800));
    }

    #[test]
    fn test_classic_buttons_active_low() {
        let mut ext = classic_rest();
        ext[4] &= !(0x02 | 0x08); // R, Home
        ext[5] &= !(0x10 | 0x80); // A, ZL
        let mut state = GamepadState::default();
        map_extension(ExtensionVariant::Classic, &ext, &mut state);
        assert_eq!(
            state.buttons.pressed(),
            vec![Button::A, Button::R, Button::Home, Button::ZL]
        );
    }

    #[test]
    fn test_wiiu_pro_rest_and_charging() {
        let mut state = GamepadState::default();
        let frame = map_extension(ExtensionVariant::WiiUPro, &wiiu_rest(), &mut state);
        assert_eq!(frame, ExtensionFrame::Mapped { charging: Some(false) });
        assert_eq!(state.left_stick, (0x800, 0x800));
        assert_eq!(state.right_stick, (0x800, 0x800));
        assert!(state.buttons.pressed().is_empty());

        let mut ext = wiiu_rest();
        ext[10] &= !WIIU_PRO_CHARGING;
        let frame = map_extension(ExtensionVariant::WiiUPro, &ext, &mut state);
        assert_eq!(frame, ExtensionFrame::Mapped { charging: Some(true) });
    }

    #[test]
    fn test_wiiu_pro_axes() {
        let mut ext = wiiu_rest();
        let mut set = |at: usize, v: u16| ext[at..at + 2].copy_from_slice(&v.to_le_bytes());
        set(WIIU_PRO_LX, 0x900);
        set(WIIU_PRO_RX, 0x700);
        set(WIIU_PRO_LY, 0xE00); // expands past the top
        set(WIIU_PRO_RY, 0x100); // expands past the bottom
        let mut state = GamepadState::default();
        map_extension(ExtensionVariant::WiiUPro, &ext, &mut state);
        assert_eq!(state.left_stick, (0x980, 0xFFF));
        assert_eq!(state.right_stick, (0x680, 0));
    }

    #[test]
    fn test_wiiu_pro_stick_clicks() {
        let mut ext = wiiu_rest();
        ext[10] &= !(0x01 | 0x02);
        ext[9] &= !0x08; // X
        let mut state = GamepadState::default();
        map_extension(ExtensionVariant::WiiUPro, &ext, &mut state);
        assert_eq!(
            state.buttons.pressed(),
            vec![Button::X, Button::R3, Button::L3]
        );
    }

    #[test]
    fn test_short_extension_payload() {
        let mut state = GamepadState::default();
        // 0x32 only carries 8 bytes, not enough for the Wii U Pro layout
        let frame = map_extension(ExtensionVariant::WiiUPro, &[0u8; 8], &mut state);
        assert_eq!(frame, ExtensionFrame::Short { needed: 11 });
        assert_eq!(state, GamepadState::default());
    }

    #[test]
    fn test_no_extension_is_skipped() {
        let mut state = GamepadState::default();
        for variant in [ExtensionVariant::None, ExtensionVariant::Unsupported] {
            assert_eq!(map_extension(variant, &[0u8; 19], &mut state), ExtensionFrame::Skipped);
        }
        assert_eq!(state, GamepadState::default());
    }

    #[test]
    fn test_sticks_always_in_range() {
        for raw in 0..=u8::MAX {
            assert!(scale_axis(raw, NUNCHUCK_CENTER, NUNCHUCK_SCALE) <= STICK_MAX);
            assert!(scale_axis(raw & 0x3F, CLASSIC_LEFT_CENTER, CLASSIC_LEFT_SCALE) <= STICK_MAX);
            assert!(scale_axis(raw & 0x1F, CLASSIC_RIGHT_CENTER, CLASSIC_RIGHT_SCALE) <= STICK_MAX);
        }
        for raw in [0u16, 0x400, 0x800, 0xC00, 0xFFF, 0xFFFF] {
            assert!(expand_wiiu_axis(raw) <= STICK_MAX);
        }
    }
}
