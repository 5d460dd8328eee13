//! Error types for MIDI output devices.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DeviceError {
    #[error("bad device id {index}, {count} device(s) available")]
    BadDeviceId { index: usize, count: usize },

    #[error("device is not open")]
    NotOpen,

    #[error("device error: {0}")]
    Device(String),

    #[error("message {message:#08x} rejected: {reason}")]
    Rejected { message: u32, reason: String },
}

pub type Result<T> = std::result::Result<T, DeviceError>;

#[cfg(feature = "midi-out")]
impl From<midir::InitError> for DeviceError {
    fn from(e: midir::InitError) -> Self {
        DeviceError::Device(e.to_string())
    }
}

#[cfg(feature = "midi-out")]
impl From<&midir::ConnectError<midir::MidiOutput>> for DeviceError {
    fn from(e: &midir::ConnectError<midir::MidiOutput>) -> Self {
        DeviceError::Device(e.to_string())
    }
}
