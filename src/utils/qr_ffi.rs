// ============================================================================
// QR SCANNER FFI - Bindings a html5-qrcode (window.Html5Qrcode)
// ============================================================================
// Wrappers sin estado ni lógica; el ciclo de vida vive en CameraSession
// ============================================================================

use wasm_bindgen::prelude::*;

#[wasm_bindgen]
extern "C" {
    #[derive(Clone, Debug)]
    pub type Html5Qrcode;

    #[wasm_bindgen(constructor)]
    pub fn new(element_id: &str) -> Html5Qrcode;

    /// Promise<Array<{ id, label }>>
    #[wasm_bindgen(static_method_of = Html5Qrcode, js_name = getCameras, catch)]
    pub async fn get_cameras() -> Result<JsValue, JsValue>;

    #[wasm_bindgen(method, catch)]
    pub async fn start(
        this: &Html5Qrcode,
        camera_id: &str,
        config: &JsValue,
        on_decoded: &js_sys::Function,
        on_frame_error: &js_sys::Function,
    ) -> Result<JsValue, JsValue>;

    #[wasm_bindgen(method, catch)]
    pub async fn stop(this: &Html5Qrcode) -> Result<JsValue, JsValue>;

    #[wasm_bindgen(method, getter, js_name = isScanning)]
    pub fn is_scanning(this: &Html5Qrcode) -> bool;
}
