//! Extension controller identification.
//!
//! The 6-byte identity lives at register 0x04A400FA and is read after the
//! two-step unencrypted init (0x55 to 0x04A400F0, 0x00 to 0x04A400FB).

use serde::Serialize;

/// Register write that starts extension init.
pub const INIT1_ADDRESS: u32 = 0x04A4_00F0;
pub const INIT1_DATA: u8 = 0x55;
/// Register write that disables extension payload encryption.
pub const INIT2_ADDRESS: u32 = 0x04A4_00FB;
pub const INIT2_DATA: u8 = 0x00;
/// Extension identity register.
pub const IDENTITY_ADDRESS: u32 = 0x04A4_00FA;
pub const IDENTITY_LEN: u16 = 6;

/// Report mode for a bare remote: core buttons + accelerometer.
pub const MODE_CORE: u8 = 0x31;
/// Core buttons + 8 extension bytes.
pub const MODE_EXT8: u8 = 0x32;
/// Core buttons + 19 extension bytes.
pub const MODE_EXT19: u8 = 0x34;

/// What is plugged into the expansion port.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
pub enum ExtensionVariant {
    #[default]
    None,
    Nunchuck,
    Classic,
    ClassicPro,
    WiiUPro,
    Unsupported,
}

impl ExtensionVariant {
    /// Variants held upright next to the remote, which use the vertical
    /// core button layout.
    pub fn uses_vertical_remote(self) -> bool {
        matches!(
            self,
            ExtensionVariant::Nunchuck | ExtensionVariant::Classic | ExtensionVariant::ClassicPro
        )
    }
}

/// Assemble the 48-bit big-endian identity from the first 6 bytes of a read.
pub fn identity_from_bytes(bytes: &[u8; 6]) -> u64 {
    bytes
        .iter()
        .fold(0u64, |acc, &b| (acc << 8) | u64::from(b))
}

/// Map an extension identity to its variant and the report mode it runs in.
pub fn identify(identity: u64) -> (ExtensionVariant, u8) {
    match identity & 0xFFFF_FFFF_FFFF {
        0x0000_A420_0000 | 0xFF00_A420_0000 => (ExtensionVariant::Nunchuck, MODE_EXT8),
        0x0000_A420_0101 => (ExtensionVariant::Classic, MODE_EXT8),
        0x0100_A420_0101 => (ExtensionVariant::ClassicPro, MODE_EXT8),
        0x0000_A420_0120 => (ExtensionVariant::WiiUPro, MODE_EXT19),
        _ => (ExtensionVariant::Unsupported, MODE_CORE),
    }
}
