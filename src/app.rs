// ============================================================================
// APP - Aplicación principal: monta la página y conecta vistas <-> viewmodel
// ============================================================================

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use wasm_bindgen::prelude::*;
use web_sys::Element;

use crate::config::CONFIG;
use crate::dom::{append_child, clear_children, get_element_by_id};
use crate::services::{ApiClient, BrowserRunner, Html5QrBackend, WebFeedback};
use crate::utils::constants::SCANNER_VIEWPORT_ID;
use crate::utils::storage::{load_camera_preference, save_camera_preference};
use crate::viewmodels::scan_panel::ToolbarState;
use crate::viewmodels::{LifecycleSettings, ScanPanel, ScanPorts, ScanViewModel};
use crate::views::{
    render_scan_modal, render_scanner_page, render_toolbar, ScanActions, MODAL_HOST_ID,
    TOOLBAR_HOST_ID,
};

/// Colaboradores reales del navegador
pub struct BrowserPorts;

impl ScanPorts for BrowserPorts {
    type Api = ApiClient;
    type Camera = Html5QrBackend;
    type Feedback = WebFeedback;
    type Runner = BrowserRunner;
}

/// Un solo render pendiente por tick: los updates que llegan antes de que
/// dispare el Timeout(0) se pintan juntos
#[derive(Clone, Default)]
struct RenderGate(Rc<Cell<bool>>);

impl RenderGate {
    /// true si este update es el que debe programar el render
    fn request(&self) -> bool {
        !self.0.replace(true)
    }

    /// Llamar al empezar el render programado
    fn begin(&self) {
        self.0.set(false);
    }
}

/// Aplicación principal
pub struct App {
    vm: ScanViewModel<BrowserPorts>,
    actions: ScanActions,
    lang: String,
    toolbar_host: Element,
    modal_host: Element,
    rendered_toolbar: RefCell<Option<ToolbarState>>,
    /// Último panel pintado (None = modal cerrado)
    rendered_panel: RefCell<Option<ScanPanel>>,
}

impl App {
    /// Crear nueva aplicación
    pub fn new() -> Result<Self, JsValue> {
        let root = get_element_by_id("app")
            .ok_or_else(|| JsValue::from_str("No #app element found"))?;
        let lang = CONFIG.language.clone();

        // La página (con el viewport del vídeo) se monta UNA vez
        clear_children(&root);
        append_child(&root, &render_scanner_page(&lang)?)?;
        let toolbar_host = get_element_by_id(TOOLBAR_HOST_ID)
            .ok_or_else(|| JsValue::from_str("No toolbar host"))?;
        let modal_host = get_element_by_id(MODAL_HOST_ID)
            .ok_or_else(|| JsValue::from_str("No modal host"))?;

        let preferred_camera = load_camera_preference();
        if let Some(id) = &preferred_camera {
            log::info!("💾 [APP] Cámara preferida en storage: {}", id);
        }

        let vm = ScanViewModel::<BrowserPorts>::new(
            ApiClient::new(),
            Html5QrBackend::new(SCANNER_VIEWPORT_ID),
            WebFeedback,
            BrowserRunner,
            LifecycleSettings::from_config(&CONFIG),
            preferred_camera,
        );

        // Varios updates en el mismo tick comparten un único render
        let gate = RenderGate::default();
        vm.subscribe(move || {
            use gloo_timers::callback::Timeout;
            if !gate.request() {
                return;
            }
            let gate = gate.clone();
            Timeout::new(0, move || {
                gate.begin();
                crate::rerender_app();
            })
            .forget();
        });

        let actions = Self::build_actions(&vm);

        Ok(Self {
            vm,
            actions,
            lang,
            toolbar_host,
            modal_host,
            rendered_toolbar: RefCell::new(None),
            rendered_panel: RefCell::new(None),
        })
    }

    fn build_actions(vm: &ScanViewModel<BrowserPorts>) -> ScanActions {
        let close = {
            let vm = vm.clone();
            Rc::new(move || {
                let vm = vm.clone();
                wasm_bindgen_futures::spawn_local(async move { vm.close().await });
            }) as Rc<dyn Fn()>
        };
        let confirm = {
            let vm = vm.clone();
            Rc::new(move || {
                let vm = vm.clone();
                wasm_bindgen_futures::spawn_local(async move { vm.confirm().await });
            }) as Rc<dyn Fn()>
        };
        let select_count = {
            let vm = vm.clone();
            Rc::new(move |count: u32| vm.set_selected_count(count)) as Rc<dyn Fn(u32)>
        };
        let edit_note = {
            let vm = vm.clone();
            Rc::new(move |note: String| vm.set_note(&note)) as Rc<dyn Fn(String)>
        };
        let switch_camera = {
            let vm = vm.clone();
            Rc::new(move || {
                let vm = vm.clone();
                wasm_bindgen_futures::spawn_local(async move {
                    vm.switch_camera().await;
                    if let Some(id) = vm.current_camera_id() {
                        if let Err(e) = save_camera_preference(&id) {
                            log::warn!("⚠️ [APP] No se pudo guardar la cámara preferida: {}", e);
                        }
                    }
                });
            }) as Rc<dyn Fn()>
        };
        let retry_camera = {
            let vm = vm.clone();
            Rc::new(move || {
                let vm = vm.clone();
                wasm_bindgen_futures::spawn_local(async move { vm.retry_camera().await });
            }) as Rc<dyn Fn()>
        };

        ScanActions {
            close,
            confirm,
            select_count,
            edit_note,
            switch_camera,
            retry_camera,
        }
    }

    /// Enumerar cámaras y arrancar el escaneo
    pub fn mount(&self) {
        let vm = self.vm.clone();
        wasm_bindgen_futures::spawn_local(async move { vm.mount().await });
    }

    /// Renderizar toolbar y modal a partir del estado actual
    pub fn render(&self) -> Result<(), JsValue> {
        let state = self.vm.state();

        let toolbar = ToolbarState::for_state(&state);
        if self.rendered_toolbar.borrow().as_ref() != Some(&toolbar) {
            clear_children(&self.toolbar_host);
            append_child(
                &self.toolbar_host,
                &render_toolbar(&toolbar, &self.actions, &self.lang)?,
            )?;
            *self.rendered_toolbar.borrow_mut() = Some(toolbar);
        }

        let panel = ScanPanel::for_state(&state, &self.lang);
        let unchanged = match (&*self.rendered_panel.borrow(), &panel) {
            (Some(previous), Some(next)) => previous.same_layout(next),
            (None, None) => true,
            _ => false,
        };
        if unchanged {
            // Solo cambió la nota: no tocar el input que tiene el foco
            *self.rendered_panel.borrow_mut() = panel;
            return Ok(());
        }

        clear_children(&self.modal_host);
        if let Some(panel) = &panel {
            append_child(
                &self.modal_host,
                &render_scan_modal(panel, &self.actions, &self.lang)?,
            )?;
        }
        *self.rendered_panel.borrow_mut() = panel;
        Ok(())
    }
}
