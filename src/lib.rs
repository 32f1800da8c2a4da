//! Wii Remote → Pro Controller report translation.
//!
//! A [`ControllerSession`] wraps one connected Wii Remote. Feed it raw input
//! reports in arrival order and it returns normalized 0x30 frames, running the
//! extension identification handshake through its [`Transport`] as needed.

pub mod error;
pub mod gamepad;
pub mod session;
pub mod transport;
pub mod wii;

pub use error::{CommandError, ReportError};
pub use gamepad::{Button, ButtonState, GamepadState};
pub use session::ControllerSession;
pub use transport::{Address, Clock, MonotonicClock, Transport};
pub use wii::ExtensionVariant;
