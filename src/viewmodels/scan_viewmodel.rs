// ============================================================================
// SCAN VIEWMODEL - Máquina de estados del escaneo en puerta
// ============================================================================
// Idle (cámara armada) -> Pending (check + confirmación) -> Success | Error
// -> auto-dismiss / cierre manual -> Idle (cámara re-arrancada)
//
// Reglas:
// - la cámara se para ANTES de abrir la sesión y se re-arranca DESPUÉS de
//   limpiarla
// - un solo request (check o confirm) en vuelo; lo demás se descarta en silencio
// - el timer de auto-dismiss pertenece a la sesión: cerrar lo cancela
// - con la cámara ocupada (arrancando o cambiando) toggle y reintento se
//   ignoran
// ============================================================================

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use crate::config::AppConfig;
use crate::models::{ConfirmRequest, DecodeSettings, ErrorInfo, PendingEntry, ScanPhase};
use crate::services::api_client::{ApiError, BookingApi};
use crate::services::camera_service::{CameraBackend, CameraSession};
use crate::services::feedback_service::{FeedbackCue, FeedbackSink};
use crate::services::task_runner::TaskRunner;
use crate::state::{ReactiveState, ScanState};

/// Colaboradores externos del escáner (navegador en producción, mocks en tests)
pub trait ScanPorts: 'static {
    type Api: BookingApi + 'static;
    type Camera: CameraBackend + 'static;
    type Feedback: FeedbackSink + 'static;
    type Runner: TaskRunner + 'static;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LifecycleSettings {
    pub success_dismiss_ms: u32,
    pub error_dismiss_ms: u32,
    pub entry_point_label: String,
    pub decode: DecodeSettings,
}

impl Default for LifecycleSettings {
    fn default() -> Self {
        Self::from_config(&AppConfig::default())
    }
}

impl LifecycleSettings {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            success_dismiss_ms: config.scanner.success_dismiss_ms,
            error_dismiss_ms: config.scanner.error_dismiss_ms,
            entry_point_label: config.entry_point_label.clone(),
            decode: config.scanner.decode_settings(),
        }
    }
}

type DismissHandle<P> = <<P as ScanPorts>::Runner as TaskRunner>::Handle;

struct Inner<P: ScanPorts> {
    api: P::Api,
    camera: CameraSession<P::Camera>,
    feedback: P::Feedback,
    runner: P::Runner,
    settings: LifecycleSettings,
    state: ReactiveState<ScanState>,
    dismiss_timer: RefCell<Option<DismissHandle<P>>>,
}

pub struct ScanViewModel<P: ScanPorts> {
    inner: Rc<Inner<P>>,
}

impl<P: ScanPorts> Clone for ScanViewModel<P> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<P: ScanPorts> ScanViewModel<P> {
    pub fn new(
        api: P::Api,
        camera: P::Camera,
        feedback: P::Feedback,
        runner: P::Runner,
        settings: LifecycleSettings,
        preferred_camera: Option<String>,
    ) -> Self {
        let inner = Rc::new_cyclic(|weak: &Weak<Inner<P>>| {
            let camera = CameraSession::new(camera, settings.decode, preferred_camera);
            let weak = weak.clone();
            // Cada payload que pasa el gate de la cámara entra por intake()
            camera.bind_intake(Rc::new(move |code: String| {
                if let Some(inner) = weak.upgrade() {
                    let vm = ScanViewModel { inner };
                    let task = vm.clone();
                    vm.inner.runner.spawn(Box::pin(async move { task.intake(code).await }));
                }
            }));
            Inner {
                api,
                camera,
                feedback,
                runner,
                settings,
                state: ReactiveState::new(ScanState::default()),
                dismiss_timer: RefCell::new(None),
            }
        });
        Self { inner }
    }

    // ------------------------------------------------------------------------
    // Lectura
    // ------------------------------------------------------------------------

    pub fn state(&self) -> ScanState {
        self.inner.state.snapshot()
    }

    pub fn current_camera_id(&self) -> Option<String> {
        self.inner.camera.current_camera_id()
    }

    pub fn subscribe<F>(&self, callback: F)
    where
        F: Fn() + 'static,
    {
        self.inner.state.subscribe(callback);
    }

    // ------------------------------------------------------------------------
    // Cámara
    // ------------------------------------------------------------------------

    /// Enumerar cámaras y arrancar la elegida (al montar la vista)
    pub async fn mount(&self) {
        self.inner.state.update(|s| s.camera_busy = true);
        self.enumerate_and_start().await;
        self.inner.state.update(|s| s.camera_busy = false);
    }

    /// Botón "Reintentar cámara" (solo con la cámara libre)
    pub async fn retry_camera(&self) {
        if !self.claim_camera("Reintento") {
            return;
        }
        self.enumerate_and_start().await;
        self.inner.state.update(|s| s.camera_busy = false);
    }

    /// Toggle de cámara; ignorado con una sesión abierta o la cámara ocupada
    pub async fn switch_camera(&self) {
        if !self.claim_camera("Cambio de cámara") {
            return;
        }
        let result = self.inner.camera.switch_to_next().await;
        self.inner.state.update(|s| {
            s.camera_busy = false;
            match &result {
                Ok(true) => s.camera_error = None,
                Ok(false) => {}
                Err(e) => s.camera_error = Some(e.to_string()),
            }
        });
        if let Err(e) = result {
            log::warn!("⚠️ [SCANNER] Error cambiando de cámara: {}", e);
        }
    }

    /// Marca la cámara como ocupada si está libre y no hay sesión
    fn claim_camera(&self, action: &str) -> bool {
        if !self.inner.state.read(ScanState::camera_controls_enabled) {
            log::debug!("📷 [SCANNER] {} ignorado: sesión abierta o cámara ocupada", action);
            return false;
        }
        self.inner.state.update(|s| s.camera_busy = true);
        true
    }

    async fn enumerate_and_start(&self) {
        match self.inner.camera.list_cameras().await {
            Ok(cameras) => {
                self.inner.state.update(|s| s.camera_count = cameras.len());
            }
            Err(e) => {
                log::warn!("⚠️ [SCANNER] Sin cámaras: {}", e);
                self.inner.state.update(|s| {
                    s.camera_count = 0;
                    s.camera_error = Some(e.to_string());
                });
                return;
            }
        }
        self.restart_camera().await;
    }

    async fn restart_camera(&self) {
        match self.inner.camera.start_current().await {
            Ok(()) => {
                if self.inner.state.read(|s| s.camera_error.is_some()) {
                    self.inner.state.update(|s| s.camera_error = None);
                }
            }
            Err(e) => {
                log::warn!("⚠️ [SCANNER] La cámara no arrancó: {}", e);
                self.inner.state.update(|s| s.camera_error = Some(e.to_string()));
            }
        }
    }

    // ------------------------------------------------------------------------
    // Ciclo de vida
    // ------------------------------------------------------------------------

    /// Idle -> Pending: parar cámara, abrir sesión, llamar al check
    pub async fn intake(&self, raw_code: String) {
        if raw_code.trim().is_empty() {
            return;
        }
        if !self.inner.state.read(ScanState::accepts_decode) {
            log::debug!("📱 [SCANNER] Código descartado: escáner ocupado");
            return;
        }
        self.inner.state.update(|s| s.request_in_flight = true);
        log::info!("📱 [SCANNER] Código detectado");

        if let Err(e) = self.inner.camera.stop().await {
            log::warn!("⚠️ [SCANNER] Error parando la cámara: {}", e);
        }
        let session_id = self.inner.state.update(|s| s.open_session(raw_code.clone()));

        let result = self.inner.api.check(&raw_code).await;
        self.inner.state.update(|s| s.request_in_flight = false);

        match result {
            Ok(booking) => {
                let opened = self.inner.state.update(|s| match s.session_mut(session_id) {
                    Some(session) => {
                        session.phase = ScanPhase::Pending(PendingEntry::new(booking));
                        true
                    }
                    None => false,
                });
                if opened {
                    self.inner.feedback.emit(FeedbackCue::Pending);
                }
            }
            Err(e) => self.fail(session_id, &e),
        }
    }

    /// Selector de cantidad (clamp a [1, remaining_scans])
    pub fn set_selected_count(&self, count: u32) {
        self.inner.state.update(|s| {
            if let Some(entry) = s.session.as_mut().and_then(|session| session.pending_mut()) {
                entry.select_count(count);
            }
        });
    }

    pub fn set_note(&self, note: &str) {
        self.inner.state.update(|s| {
            if let Some(entry) = s.session.as_mut().and_then(|session| session.pending_mut()) {
                entry.set_note(note);
            }
        });
    }

    /// Pending -> confirm. Un segundo toque con el request en vuelo se ignora
    pub async fn confirm(&self) {
        let prepared = self.inner.state.read(|s| {
            if s.request_in_flight {
                return None;
            }
            let session = s.session.as_ref()?;
            let entry = session.pending()?;
            Some((
                session.id,
                ConfirmRequest {
                    qr_code: session.raw_code.clone(),
                    count: entry.selected_count(),
                    entry_point: self.inner.settings.entry_point_label.clone(),
                    note: entry.note().trim().to_string(),
                },
            ))
        });
        let Some((session_id, request)) = prepared else {
            log::debug!("🎟️ [SCANNER] Confirm ignorado");
            return;
        };

        self.inner.state.update(|s| s.request_in_flight = true);
        let result = self.inner.api.confirm(&request).await;
        self.inner.state.update(|s| s.request_in_flight = false);

        match result {
            Ok(confirmed) => {
                let applied = self.inner.state.update(|s| match s.session_mut(session_id) {
                    Some(session) => {
                        session.phase = ScanPhase::Success(confirmed);
                        true
                    }
                    None => false,
                });
                if applied {
                    log::info!(
                        "✅ [SCANNER] {} entrada(s) marcadas, {} restantes",
                        confirmed.just_scanned,
                        confirmed.remaining_scans
                    );
                    self.inner.feedback.emit(FeedbackCue::Success);
                    self.schedule_dismiss(session_id, self.inner.settings.success_dismiss_ms);
                }
            }
            Err(e) => self.fail(session_id, &e),
        }
    }

    /// Cierre manual (overlay / botón). Ignorado con un request en vuelo
    pub async fn close(&self) {
        let closable = self
            .inner
            .state
            .read(|s| s.session.is_some() && !s.request_in_flight);
        if !closable {
            log::debug!("🚪 [SCANNER] Cierre ignorado");
            return;
        }
        self.cancel_dismiss();
        self.clear_and_rearm().await;
    }

    /// Disparado por el timer de auto-dismiss de `session_id`
    async fn dismiss_expired(&self, session_id: u64) {
        let still_current = self.inner.state.read(|s| {
            s.session
                .as_ref()
                .is_some_and(|session| session.id == session_id && session.phase.is_terminal())
        });
        if !still_current {
            log::debug!("⏰ [SCANNER] Auto-dismiss obsoleto ignorado");
            return;
        }
        self.cancel_dismiss();
        self.clear_and_rearm().await;
    }

    fn fail(&self, session_id: u64, error: &ApiError) {
        let info = ErrorInfo::from(error);
        log::error!("❌ [SCANNER] {}: {} ({})", info.title, info.detail, error);
        let applied = self.inner.state.update(|s| match s.session_mut(session_id) {
            Some(session) => {
                session.phase = ScanPhase::Error(info);
                true
            }
            None => false,
        });
        if applied {
            self.inner.feedback.emit(FeedbackCue::Error);
            self.schedule_dismiss(session_id, self.inner.settings.error_dismiss_ms);
        }
    }

    fn schedule_dismiss(&self, session_id: u64, delay_ms: u32) {
        let weak = Rc::downgrade(&self.inner);
        let handle = self.inner.runner.schedule(
            delay_ms,
            Box::pin(async move {
                if let Some(inner) = weak.upgrade() {
                    ScanViewModel { inner }.dismiss_expired(session_id).await;
                }
            }),
        );
        // replace() suelta (y cancela) cualquier handle anterior
        let previous = self.inner.dismiss_timer.replace(Some(handle));
        drop(previous);
    }

    fn cancel_dismiss(&self) {
        let handle = self.inner.dismiss_timer.borrow_mut().take();
        drop(handle);
    }

    /// Sesión -> Idle y cámara re-arrancada (en ese orden). La cámara queda
    /// ocupada en la misma actualización que limpia la sesión
    async fn clear_and_rearm(&self) {
        self.inner.state.update(|s| {
            s.clear_session();
            s.camera_busy = true;
        });
        log::info!("🔄 [SCANNER] Sesión cerrada, re-armando cámara");
        self.restart_camera().await;
        self.inner.state.update(|s| s.camera_busy = false);
    }
}
