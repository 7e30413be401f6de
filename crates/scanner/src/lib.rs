pub mod camera;
pub mod checkin;
pub mod controller;
pub mod error;
pub mod gate;
pub mod notice;
pub mod payload;

pub use camera::{Camera, CameraDevice, DecodeEvent, DecoderHandle, DecoderSession, Facing, ScanConfig};
pub use checkin::{ScanOutcome, process_payload};
pub use controller::{ScanCommand, ScanController, ScanHandle, ScanState};
pub use error::{CameraError, ScanError, ScanFailure};
pub use gate::{CheckInGate, GatePermit};
pub use notice::{NoticeLevel, ScanNotice};
pub use payload::{PayloadRejection, QrPayload};
