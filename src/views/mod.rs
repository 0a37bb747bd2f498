use std::rc::Rc;

pub mod scan_modal;
pub mod scanner;

pub use scan_modal::render_scan_modal;
pub use scanner::{render_scanner_page, render_toolbar, MODAL_HOST_ID, TOOLBAR_HOST_ID};

/// Callbacks que las vistas disparan (las vistas no conocen el viewmodel)
#[derive(Clone)]
pub struct ScanActions {
    pub close: Rc<dyn Fn()>,
    pub confirm: Rc<dyn Fn()>,
    pub select_count: Rc<dyn Fn(u32)>,
    pub edit_note: Rc<dyn Fn(String)>,
    pub switch_camera: Rc<dyn Fn()>,
    pub retry_camera: Rc<dyn Fn()>,
}
