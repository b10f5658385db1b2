//! Common USB utilities shared by the PadBridge protocol crates and engine.
//!
//! This crate provides the report parsing primitives used by the per-family
//! decoders, the abstract [`UsbTransport`] collaborator trait the engine
//! polls through, and an in-memory mock transport for tests.

#![deny(clippy::unwrap_used)]
#![deny(static_mut_refs)]

pub mod device_info;
pub mod report_parser;
pub mod transport;

pub use device_info::*;
pub use report_parser::*;
pub use transport::*;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum HidCommonError {
    #[error("Device not found: {0}")]
    DeviceNotFound(u64),

    #[error("Failed to open device: {0}")]
    OpenError(String),

    #[error("Failed to claim interface: {0}")]
    ClaimError(String),

    #[error("Transfer timed out")]
    Timeout,

    #[error("Failed to read from device: {0}")]
    ReadError(String),

    #[error("Failed to write to device: {0}")]
    WriteError(String),

    #[error("Invalid report format: {0}")]
    InvalidReport(&'static str),

    #[error("Device disconnected")]
    Disconnected,

    #[error("Transport unavailable: {0}")]
    TransportUnavailable(String),
}

pub type HidCommonResult<T> = Result<T, HidCommonError>;
