pub mod booking;
pub mod camera;
pub mod scan;

pub use booking::{BookingSummary, ConfirmRequest, ConfirmResult, ErrorInfo};
pub use camera::{CameraDescriptor, DecodeSettings};
pub use scan::{PendingEntry, ScanPhase, ScanSession};
