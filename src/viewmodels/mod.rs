pub mod scan_panel;
pub mod scan_viewmodel;

pub use scan_panel::ScanPanel;
pub use scan_viewmodel::{LifecycleSettings, ScanPorts, ScanViewModel};
