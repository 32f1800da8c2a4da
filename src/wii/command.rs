//! Wii Remote output reports.
//!
//!   0x11 = player LEDs        [leds]
//!   0x12 = data reporting     [reserved] [mode]
//!   0x15 = status request     [reserved]
//!   0x16 = write memory       [addr BE u32] [size] [data x16]
//!   0x17 = read memory        [addr BE u32] [size BE u16]

use crate::error::CommandError;

pub const OUTPUT_LEDS: u8 = 0x11;
pub const OUTPUT_REPORT_MODE: u8 = 0x12;
pub const OUTPUT_STATUS: u8 = 0x15;
pub const OUTPUT_WRITE_MEMORY: u8 = 0x16;
pub const OUTPUT_READ_MEMORY: u8 = 0x17;

/// Most data bytes a single memory write can carry.
pub const WRITE_DATA_MAX: usize = 16;
/// Largest output report (memory write), id byte included.
pub const MAX_OUTPUT_LEN: usize = 1 + 4 + 1 + WRITE_DATA_MAX;

/// A command for the remote.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputCommand {
    WriteMemory {
        address: u32,
        data: [u8; WRITE_DATA_MAX],
        size: u8,
    },
    ReadMemory {
        address: u32,
        size: u16,
    },
    SetReportMode {
        mode: u8,
    },
    SetPlayerLed {
        mask: u8,
    },
    QueryStatus,
}

impl OutputCommand {
    /// Memory write of up to 16 bytes.
    pub fn write_memory(address: u32, data: &[u8]) -> Result<Self, CommandError> {
        if data.len() > WRITE_DATA_MAX {
            return Err(CommandError::PayloadTooLong {
                len: data.len(),
                max: WRITE_DATA_MAX,
            });
        }
        let mut buf = [0u8; WRITE_DATA_MAX];
        buf[..data.len()].copy_from_slice(data);
        Ok(OutputCommand::WriteMemory {
            address,
            data: buf,
            size: data.len() as u8,
        })
    }

    /// Single-byte register write.
    pub fn write_byte(address: u32, value: u8) -> Self {
        let mut data = [0u8; WRITE_DATA_MAX];
        data[0] = value;
        OutputCommand::WriteMemory {
            address,
            data,
            size: 1,
        }
    }

    /// LED command from a 4-bit mask (bit 0 = LED 1), moved into the
    /// high nibble where the remote expects it.
    pub fn player_leds(mask: u8) -> Self {
        OutputCommand::SetPlayerLed {
            mask: (mask << 4) & 0xF0,
        }
    }

    pub fn id(&self) -> u8 {
        match self {
            OutputCommand::WriteMemory { .. } => OUTPUT_WRITE_MEMORY,
            OutputCommand::ReadMemory { .. } => OUTPUT_READ_MEMORY,
            OutputCommand::SetReportMode { .. } => OUTPUT_REPORT_MODE,
            OutputCommand::SetPlayerLed { .. } => OUTPUT_LEDS,
            OutputCommand::QueryStatus => OUTPUT_STATUS,
        }
    }

    /// Encoded length, id byte included.
    pub fn encoded_len(&self) -> usize {
        match self {
            OutputCommand::WriteMemory { .. } => MAX_OUTPUT_LEN,
            OutputCommand::ReadMemory { .. } => 7,
            OutputCommand::SetReportMode { .. } => 3,
            OutputCommand::SetPlayerLed { .. } | OutputCommand::QueryStatus => 2,
        }
    }
}

/// Reusable scratch space for building one output report at a time.
#[derive(Debug, Clone)]
pub struct OutputBuffer {
    data: [u8; MAX_OUTPUT_LEN],
}

impl Default for OutputBuffer {
    fn default() -> Self {
        Self {
            data: [0u8; MAX_OUTPUT_LEN],
        }
    }
}

impl OutputBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Encode `cmd` and return the bytes to hand to the transport.
    pub fn encode(&mut self, cmd: &OutputCommand) -> &[u8] {
        let len = cmd.encoded_len();
        let out = &mut self.data[..len];
        out.fill(0);
        out[0] = cmd.id();

        match *cmd {
            OutputCommand::WriteMemory {
                address,
                data,
                size,
            } => {
                out[1..5].copy_from_slice(&address.to_be_bytes());
                out[5] = size;
                out[6..].copy_from_slice(&data);
            }
            OutputCommand::ReadMemory { address, size } => {
                out[1..5].copy_from_slice(&address.to_be_bytes());
                out[5..7].copy_from_slice(&size.to_be_bytes());
            }
            OutputCommand::SetReportMode { mode } => {
                out[2] = mode;
            }
            OutputCommand::SetPlayerLed { mask } => {
                out[1] = mask;
            }
            OutputCommand::QueryStatus => {}
        }

        &self.data[..len]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_write_memory() {
        let mut buf = OutputBuffer::new();
        let cmd = OutputCommand::write_memory(0x04A4_00F0, &[0x55]).unwrap();
        let bytes = buf.encode(&cmd);
        assert_eq!(bytes.len(), 22);
        assert_eq!(&bytes[..7], &[0x16, 0x04, 0xA4, 0x00, 0xF0, 0x01, 0x55]);
        assert!(bytes[7..].iter().all(|&b| b == 0));

        assert_eq!(OutputCommand::write_byte(0x04A4_00F0, 0x55), cmd);
    }

    #[test]
    fn test_write_memory_rejects_long_payload() {
        assert!(OutputCommand::write_memory(0, &[0xAA; 16]).is_ok());
        assert_eq!(
            OutputCommand::write_memory(0, &[0xAA; 17]),
            Err(CommandError::PayloadTooLong { len: 17, max: 16 })
        );
    }

    #[test]
    fn test_encode_read_memory() {
        let mut buf = OutputBuffer::new();
        let cmd = OutputCommand::ReadMemory {
            address: 0x04A4_00FA,
            size: 6,
        };
        assert_eq!(
            buf.encode(&cmd),
            &[0x17, 0x04, 0xA4, 0x00, 0xFA, 0x00, 0x06]
        );
    }

    #[test]
    fn test_encode_small_commands() {
        let mut buf = OutputBuffer::new();
        assert_eq!(
            buf.encode(&OutputCommand::SetReportMode { mode: 0x34 }),
            &[0x12, 0x00, 0x34]
        );
        assert_eq!(
            buf.encode(&OutputCommand::SetPlayerLed { mask: 0x10 }),
            &[0x11, 0x10]
        );
        assert_eq!(buf.encode(&OutputCommand::QueryStatus), &[0x15, 0x00]);
    }

    #[test]
    fn test_player_leds_high_nibble() {
        assert_eq!(
            OutputCommand::player_leds(0x01),
            OutputCommand::SetPlayerLed { mask: 0x10 }
        );
        assert_eq!(
            OutputCommand::player_leds(0x0F),
            OutputCommand::SetPlayerLed { mask: 0xF0 }
        );
        // Only the low nibble survives
        assert_eq!(
            OutputCommand::player_leds(0x19),
            OutputCommand::SetPlayerLed { mask: 0x90 }
        );
    }

    #[test]
    fn test_buffer_reuse_clears_previous_command() {
        let mut buf = OutputBuffer::new();
        let long = OutputCommand::write_memory(0xFFFF_FFFF, &[0xFF; 16]).unwrap();
        buf.encode(&long);
        let short = OutputCommand::write_memory(0x04A4_00FB, &[0x00]).unwrap();
        let bytes = buf.encode(&short);
        assert_eq!(&bytes[..7], &[0x16, 0x04, 0xA4, 0x00, 0xFB, 0x01, 0x00]);
        assert!(bytes[7..].iter().all(|&b| b == 0));

        buf.encode(&long);
        assert_eq!(
            buf.encode(&OutputCommand::SetReportMode { mode: 0x31 }),
            &[0x12, 0x00, 0x31]
        );
    }
}
