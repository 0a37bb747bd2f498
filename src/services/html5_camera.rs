// ============================================================================
// HTML5-QRCODE BACKEND - CameraBackend sobre la librería JS
// ============================================================================
// GESTIÓN DE CLOSURES:
// Los closures de decodificación se guardan aquí (no forget()) y se liberan
// DESPUÉS de que el stop() de JS termine, para que JS nunca invoque un
// closure ya destruido.
// ============================================================================

use std::cell::RefCell;

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;

use crate::models::{CameraDescriptor, DecodeSettings};
use crate::services::camera_service::{CameraBackend, CameraError, DecodeCallback};
use crate::utils::qr_ffi::Html5Qrcode;

struct ScanClosures {
    _on_decoded: Closure<dyn FnMut(String, JsValue)>,
    _on_frame_error: Closure<dyn FnMut(JsValue)>,
}

pub struct Html5QrBackend {
    viewport_id: String,
    scanner: RefCell<Option<Html5Qrcode>>,
    closures: RefCell<Option<ScanClosures>>,
}

impl Html5QrBackend {
    pub fn new(viewport_id: &str) -> Self {
        Self {
            viewport_id: viewport_id.to_string(),
            scanner: RefCell::new(None),
            closures: RefCell::new(None),
        }
    }

    /// Instancia única ligada al viewport (se crea al primer start)
    fn scanner(&self) -> Html5Qrcode {
        self.scanner
            .borrow_mut()
            .get_or_insert_with(|| Html5Qrcode::new(&self.viewport_id))
            .clone()
    }
}

/// Mensaje legible de un error JS (string, Error.message o Debug)
fn js_error_message(error: &JsValue) -> String {
    error
        .as_string()
        .or_else(|| {
            js_sys::Reflect::get(error, &JsValue::from_str("message"))
                .ok()
                .and_then(|m| m.as_string())
        })
        .unwrap_or_else(|| format!("{:?}", error))
}

/// Permiso denegado vs cualquier otro fallo de arranque
pub(crate) fn classify_start_error(message: String) -> CameraError {
    let lower = message.to_lowercase();
    if lower.contains("notallowederror") || lower.contains("permission") {
        CameraError::PermissionDenied(message)
    } else {
        CameraError::StartFailed(message)
    }
}

fn scan_config(settings: DecodeSettings) -> Result<JsValue, JsValue> {
    let qrbox = js_sys::Object::new();
    js_sys::Reflect::set(&qrbox, &"width".into(), &JsValue::from(settings.scan_box_size))?;
    js_sys::Reflect::set(&qrbox, &"height".into(), &JsValue::from(settings.scan_box_size))?;

    let config = js_sys::Object::new();
    js_sys::Reflect::set(&config, &"fps".into(), &JsValue::from(settings.fps))?;
    js_sys::Reflect::set(&config, &"qrbox".into(), &qrbox)?;
    Ok(config.into())
}

impl CameraBackend for Html5QrBackend {
    async fn list_devices(&self) -> Result<Vec<CameraDescriptor>, CameraError> {
        let devices = Html5Qrcode::get_cameras()
            .await
            .map_err(|e| classify_start_error(js_error_message(&e)))?;

        let cameras = js_sys::Array::from(&devices)
            .iter()
            .filter_map(|device| {
                let id = js_sys::Reflect::get(&device, &"id".into()).ok()?.as_string()?;
                let label = js_sys::Reflect::get(&device, &"label".into())
                    .ok()
                    .and_then(|l| l.as_string())
                    .unwrap_or_default();
                Some(CameraDescriptor::new(id, label))
            })
            .collect();
        Ok(cameras)
    }

    async fn start(
        &self,
        camera_id: &str,
        settings: DecodeSettings,
        on_decode: DecodeCallback,
    ) -> Result<(), CameraError> {
        let config = scan_config(settings)
            .map_err(|e| CameraError::StartFailed(js_error_message(&e)))?;

        let on_decoded = Closure::wrap(Box::new(move |text: String, _result: JsValue| {
            on_decode(text);
        }) as Box<dyn FnMut(String, JsValue)>);
        // html5-qrcode llama a este callback en cada frame sin QR: se ignora
        let on_frame_error = Closure::wrap(Box::new(move |_error: JsValue| {})
            as Box<dyn FnMut(JsValue)>);

        let scanner = self.scanner();
        scanner
            .start(
                camera_id,
                &config,
                on_decoded.as_ref().unchecked_ref(),
                on_frame_error.as_ref().unchecked_ref(),
            )
            .await
            .map_err(|e| classify_start_error(js_error_message(&e)))?;

        *self.closures.borrow_mut() = Some(ScanClosures {
            _on_decoded: on_decoded,
            _on_frame_error: on_frame_error,
        });
        Ok(())
    }

    async fn stop(&self) -> Result<(), CameraError> {
        let scanner = self.scanner.borrow().clone();
        let result = match scanner {
            Some(scanner) if scanner.is_scanning() => scanner
                .stop()
                .await
                .map(|_| ())
                .map_err(|e| CameraError::StopFailed(js_error_message(&e))),
            _ => Ok(()),
        };
        self.closures.borrow_mut().take();
        result
    }

    fn release(&self) {
        let scanner = self.scanner.borrow_mut().take();
        let closures = self.closures.borrow_mut().take();
        if let Some(scanner) = scanner {
            wasm_bindgen_futures::spawn_local(async move {
                if let Err(e) = scanner.stop().await {
                    log::warn!("⚠️ [CAMERA] Error liberando cámara: {}", js_error_message(&e));
                }
                drop(closures);
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn permission_errors_are_classified() {
        assert!(matches!(
            classify_start_error("NotAllowedError: Permission denied".to_string()),
            CameraError::PermissionDenied(_)
        ));
        assert!(matches!(
            classify_start_error("Could not start video source".to_string()),
            CameraError::StartFailed(_)
        ));
    }
}
