// ============================================================================
// SCANNER VIEW - Página de control de acceso con html5-qrcode (Rust puro)
// ============================================================================
// El viewport del vídeo se crea UNA vez y nunca se re-renderiza (html5-qrcode
// monta el <video> dentro). Toolbar y modal viven en hosts propios.
// ============================================================================

use wasm_bindgen::prelude::*;
use web_sys::Element;

use crate::dom::{append_child, on_click, ElementBuilder};
use crate::utils::constants::SCANNER_VIEWPORT_ID;
use crate::utils::i18n::t;
use crate::viewmodels::scan_panel::ToolbarState;
use crate::views::ScanActions;

pub const TOOLBAR_HOST_ID: &str = "scanner-toolbar";
pub const MODAL_HOST_ID: &str = "scan-modal-host";

/// Renderizar la página (estructura fija)
pub fn render_scanner_page(lang: &str) -> Result<Element, JsValue> {
    let page = ElementBuilder::new("div")?
        .class("scanner-page")
        .build();

    let header = ElementBuilder::new("div")?
        .class("scanner-header")
        .child(ElementBuilder::new("h1")?.text(&t("scanner_title", lang)).build())?
        .build();
    append_child(&page, &header)?;

    // Container para html5-qrcode (ID debe coincidir con Html5QrBackend)
    let viewport = ElementBuilder::new("div")?
        .id(SCANNER_VIEWPORT_ID)?
        .class("scanner-viewport")
        .build();
    // Marco fijo encima del vídeo
    let target = ElementBuilder::new("div")?
        .class("scan-target")
        .attr("aria-hidden", "true")?
        .build();
    let frame = ElementBuilder::new("div")?
        .class("viewport-frame")
        .child(viewport)?
        .child(target)?
        .build();
    append_child(&page, &frame)?;

    let toolbar_host = ElementBuilder::new("div")?
        .id(TOOLBAR_HOST_ID)?
        .class("scanner-toolbar")
        .build();
    append_child(&page, &toolbar_host)?;

    let modal_host = ElementBuilder::new("div")?
        .id(MODAL_HOST_ID)?
        .build();
    append_child(&page, &modal_host)?;

    Ok(page)
}

/// Toggle de cámara + banner de diagnóstico
pub fn render_toolbar(state: &ToolbarState, actions: &ScanActions, lang: &str) -> Result<Element, JsValue> {
    let toolbar = ElementBuilder::new("div")?
        .class("toolbar-content")
        .build();
    let idle = state.controls_enabled;

    if state.show_toggle {
        let switch_btn = ElementBuilder::new("button")?
            .class("btn-switch-camera")
            .text(&format!("🔄 {}", t("switch_camera", lang)))
            .flag("disabled", !idle)?
            .build();
        let switch_camera = actions.switch_camera.clone();
        on_click(&switch_btn, move |_| switch_camera())?;
        append_child(&toolbar, &switch_btn)?;
    }

    if let Some(error) = &state.camera_error {
        let banner = ElementBuilder::new("div")?
            .class("camera-error-banner")
            .child(
                ElementBuilder::new("span")?
                    .text(&format!("📷 {}: {}", t("camera_unavailable", lang), error))
                    .build(),
            )?
            .build();

        let retry_btn = ElementBuilder::new("button")?
            .class("btn-retry-camera")
            .text(&t("retry_camera", lang))
            .flag("disabled", !idle)?
            .build();
        let retry_camera = actions.retry_camera.clone();
        on_click(&retry_btn, move |_| retry_camera())?;
        append_child(&banner, &retry_btn)?;
        append_child(&toolbar, &banner)?;
    }

    Ok(toolbar)
}
