// ============================================================================
// GATE SCANNER - CONTROL DE ACCESO POR QR (RUST PURO + WASM)
// ============================================================================
// Arquitectura MVVM:
// - Views: Funciones que renderizan DOM (sin lógica)
// - ViewModels: Ciclo de vida del escaneo + paneles
// - Services: HTTP, cámara, feedback y timers detrás de traits
// - State: ScanState reactivo (Rc<RefCell>)
// - Models: Reservas, cámaras y sesiones de escaneo
// ============================================================================

mod app;
mod config;
mod dom;
mod models;
mod services;
mod state;
mod utils;
mod viewmodels;
mod views;

#[cfg(test)]
mod testing;

use std::cell::RefCell;

use wasm_bindgen::prelude::*;

use crate::app::App;
use crate::config::CONFIG;

// Variable estática global para mantener la instancia de App
thread_local! {
    static APP: RefCell<Option<App>> = const { RefCell::new(None) };
}

#[wasm_bindgen(start)]
pub fn main() -> Result<(), JsValue> {
    // Inicializar panic hook para mejor debugging
    console_error_panic_hook::set_once();

    wasm_logger::init(wasm_logger::Config::new(CONFIG.log_level()));
    log::info!(
        "🚀 [APP] Gate Scanner ({}) - backend {}",
        CONFIG.environment,
        CONFIG.backend_url()
    );

    let app = App::new()?;
    app.render()?;
    app.mount();

    APP.with(|app_cell| {
        *app_cell.borrow_mut() = Some(app);
    });

    Ok(())
}

/// Re-renderizar toolbar y modal con el estado actual
pub fn rerender_app() {
    APP.with(|app_cell| {
        if let Some(app) = app_cell.borrow().as_ref() {
            if let Err(e) = app.render() {
                log::error!("❌ [APP] Error re-renderizando: {:?}", e);
            }
        } else {
            log::warn!("⚠️ [APP] App no está inicializada");
        }
    });
}
