// ============================================================================
// SCAN MODAL VIEW - Validando / confirmar / éxito / error (Rust puro)
// ============================================================================

use wasm_bindgen::prelude::*;
use web_sys::Element;

use crate::dom::{
    append_child, on_click, on_input_value, on_select_value, stop_click_propagation,
    ElementBuilder,
};
use crate::utils::i18n::t;
use crate::viewmodels::scan_panel::{ConfirmPanel, ScanPanel};
use crate::views::ScanActions;

/// Renderizar modal del escaneo
pub fn render_scan_modal(panel: &ScanPanel, actions: &ScanActions, lang: &str) -> Result<Element, JsValue> {
    let tone = match panel {
        ScanPanel::Validating { .. } | ScanPanel::Confirm(_) => "pending",
        ScanPanel::Success { .. } => "success",
        ScanPanel::Error { .. } => "error",
    };

    let modal = ElementBuilder::new("div")?
        .id("scan-modal")?
        .class("modal active")
        .build();

    // Overlay (cierra al hacer click)
    let overlay = ElementBuilder::new("div")?
        .class("modal-overlay")
        .build();
    let close = actions.close.clone();
    on_click(&overlay, move |_| close())?;
    append_child(&modal, &overlay)?;

    // Content (previene cierre al click dentro)
    let content = ElementBuilder::new("div")?
        .class(&format!("modal-content scan-panel {}", tone))
        .build();
    stop_click_propagation(&content)?;

    let close_btn = ElementBuilder::new("button")?
        .class("btn-close")
        .attr("aria-label", &t("close", lang))?
        .text("✕")
        .build();
    let close = actions.close.clone();
    on_click(&close_btn, move |_| close())?;
    append_child(&content, &close_btn)?;

    let body = match panel {
        ScanPanel::Validating { message } => ElementBuilder::new("div")?
            .class("scan-validating")
            .child(ElementBuilder::new("div")?.class("spinner").build())?
            .child(ElementBuilder::new("p")?.text(message).build())?
            .build(),
        ScanPanel::Confirm(confirm) => render_confirm(confirm, actions, lang)?,
        ScanPanel::Success { marked, remaining } => ElementBuilder::new("div")?
            .class("scan-result")
            .child(ElementBuilder::new("div")?.class("result-icon").text("✅").build())?
            .child(ElementBuilder::new("h2")?.text(marked).build())?
            .child(ElementBuilder::new("p")?.text(remaining).build())?
            .build(),
        ScanPanel::Error { title, detail } => ElementBuilder::new("div")?
            .class("scan-result")
            .child(ElementBuilder::new("div")?.class("result-icon").text("❌").build())?
            .child(ElementBuilder::new("h2")?.text(title).build())?
            .child(ElementBuilder::new("p")?.text(detail).build())?
            .build(),
    };
    append_child(&content, &body)?;
    append_child(&modal, &content)?;

    Ok(modal)
}

fn detail_row(label: &str, value: &str) -> Result<Element, JsValue> {
    Ok(ElementBuilder::new("div")?
        .class("detail-row")
        .child(ElementBuilder::new("span")?.class("detail-label").text(label).build())?
        .child(ElementBuilder::new("span")?.class("detail-value").text(value).build())?
        .build())
}

fn render_confirm(panel: &ConfirmPanel, actions: &ScanActions, lang: &str) -> Result<Element, JsValue> {
    let container = ElementBuilder::new("div")?
        .class("scan-confirm")
        .child(ElementBuilder::new("h2")?.text(&panel.event_title).build())?
        .build();

    append_child(&container, &detail_row(&t("booking", lang), &panel.booking_id)?)?;
    if let Some(starts_at) = &panel.starts_at {
        append_child(&container, &detail_row(&t("starts_at", lang), starts_at)?)?;
    }
    append_child(&container, &detail_row(&t("attendee", lang), &panel.attendee)?)?;
    append_child(
        &container,
        &detail_row(&t("remaining", lang), &panel.remaining_scans.to_string())?,
    )?;

    // Selector de cantidad
    let select = ElementBuilder::new("select")?
        .class("count-select")
        .flag("disabled", panel.busy)?
        .build();
    for count in &panel.count_options {
        let option = ElementBuilder::new("option")?
            .attr("value", &count.to_string())?
            .text(&count.to_string())
            .flag("selected", *count == panel.selected_count)?
            .build();
        append_child(&select, &option)?;
    }
    let select_count = actions.select_count.clone();
    on_select_value(&select, move |value| {
        if let Ok(count) = value.parse::<u32>() {
            select_count(count);
        }
    })?;
    let count_field = ElementBuilder::new("label")?
        .class("field")
        .child(ElementBuilder::new("span")?.text(&t("entries", lang)).build())?
        .child(select)?
        .build();
    append_child(&container, &count_field)?;

    // Nota libre
    let note = ElementBuilder::new("input")?
        .class("note-input")
        .attr("type", "text")?
        .attr("value", &panel.note)?
        .attr("placeholder", &t("note", lang))?
        .flag("disabled", panel.busy)?
        .build();
    let edit_note = actions.edit_note.clone();
    on_input_value(&note, move |value| edit_note(value))?;
    append_child(&container, &note)?;

    let label = if panel.busy {
        t("confirming", lang)
    } else {
        t("confirm_entry", lang)
    };
    let confirm_btn = ElementBuilder::new("button")?
        .class("btn-confirm")
        .text(&label)
        .flag("disabled", panel.busy)?
        .build();
    let confirm = actions.confirm.clone();
    on_click(&confirm_btn, move |_| confirm())?;
    append_child(&container, &confirm_btn)?;

    Ok(container)
}
