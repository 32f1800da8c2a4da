//! Wii Remote wire protocol: input report parsing, extension identification,
//! input mapping and output commands.

pub mod command;
pub mod extension;
pub mod mapping;
pub mod report;

pub use command::{OutputBuffer, OutputCommand};
pub use extension::ExtensionVariant;
pub use report::InputReport;
