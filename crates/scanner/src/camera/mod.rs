//! Decoder capability used by the scan controller.
//!
//! A [`Camera`] enumerates devices and starts decoder sessions. A started
//! session is a subscription: a stream of [`DecodeEvent`]s plus a
//! [`DecoderHandle`] that stops and releases the device.

mod line;

use std::{fmt, pin::Pin, str::FromStr};

use async_trait::async_trait;
use futures::Stream;
use serde::Serialize;

use crate::error::CameraError;

pub use line::LineCamera;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Facing {
    User,
    #[default]
    Environment,
    Unknown,
}

impl FromStr for Facing {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "user" | "front" => Ok(Self::User),
            "environment" | "back" | "rear" => Ok(Self::Environment),
            other => Err(format!("unknown facing mode '{}'", other)),
        }
    }
}

impl fmt::Display for Facing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::User => write!(f, "user"),
            Self::Environment => write!(f, "environment"),
            Self::Unknown => write!(f, "unknown"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CameraDevice {
    pub id: String,
    pub label: String,
    pub facing: Facing,
}

/// Decoder configuration, reused unchanged on every restart
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanConfig {
    pub fps: u32,
    /// Edge length of the square scan region, in pixels
    pub qr_box: u32,
    pub facing: Facing,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            fps: 10,
            qr_box: 250,
            facing: Facing::Environment,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodeEvent {
    Decoded(String),
    /// Per-frame "nothing found"; steady-state noise
    NoCodeInFrame,
    Error(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecoderState {
    NotStarted,
    Scanning,
    Paused,
}

pub type DecodeStream = Pin<Box<dyn Stream<Item = DecodeEvent> + Send>>;

#[async_trait]
pub trait DecoderHandle: Send {
    fn state(&self) -> DecoderState;

    /// Stops capture. Only meaningful while scanning or paused.
    async fn stop(&mut self) -> Result<(), CameraError>;

    /// Releases the device. Safe to call in any state.
    fn clear(&mut self) -> Result<(), CameraError>;
}

pub struct DecoderSession {
    pub handle: Box<dyn DecoderHandle>,
    pub events: DecodeStream,
}

#[async_trait]
pub trait Camera: Send + Sync {
    async fn list_devices(&self) -> Result<Vec<CameraDevice>, CameraError>;

    async fn start(
        &self,
        device: &CameraDevice,
        config: &ScanConfig,
    ) -> Result<DecoderSession, CameraError>;
}

/// Prefers a device facing the configured way, falling back to the first one.
pub fn pick_device(devices: &[CameraDevice], facing: Facing) -> Option<&CameraDevice> {
    devices
        .iter()
        .find(|d| d.facing == facing)
        .or_else(|| devices.first())
}
