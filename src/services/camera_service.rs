// ============================================================================
// CAMERA SESSION - Ciclo de vida exclusivo de la cámara
// ============================================================================
// - Una sola sesión de decodificación activa a la vez: start/stop se
//   serializan con un lock async y siempre se para antes de arrancar
// - Un solo payload aceptado por periodo "armado" (cada start re-arma)
// - Drop libera la cámara aunque nadie haya llamado a stop()
// ============================================================================

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use futures::lock::Mutex;

use crate::models::{CameraDescriptor, DecodeSettings};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CameraError {
    #[error("No camera found")]
    NoCameraFound,
    #[error("Camera permission denied: {0}")]
    PermissionDenied(String),
    #[error("Camera start failed: {0}")]
    StartFailed(String),
    #[error("Camera stop failed: {0}")]
    StopFailed(String),
}

/// Callback que recibe cada payload decodificado
pub type DecodeCallback = Rc<dyn Fn(String)>;

/// Librería de cámara/decodificación (html5-qrcode en el navegador)
#[allow(async_fn_in_trait)]
pub trait CameraBackend {
    async fn list_devices(&self) -> Result<Vec<CameraDescriptor>, CameraError>;

    async fn start(
        &self,
        camera_id: &str,
        settings: DecodeSettings,
        on_decode: DecodeCallback,
    ) -> Result<(), CameraError>;

    async fn stop(&self) -> Result<(), CameraError>;

    /// Liberación sin await (usada desde Drop)
    fn release(&self);
}

pub struct CameraSession<B: CameraBackend> {
    backend: B,
    settings: DecodeSettings,
    preferred_id: Option<String>,
    cameras: RefCell<Vec<CameraDescriptor>>,
    current: Cell<Option<usize>>,
    active: Cell<bool>,
    armed: Rc<Cell<bool>>,
    intake: RefCell<Option<DecodeCallback>>,
    /// Tomado durante stop+start: nunca dos llamadas al backend solapadas
    op_lock: Mutex<()>,
}

impl<B: CameraBackend> CameraSession<B> {
    pub fn new(backend: B, settings: DecodeSettings, preferred_id: Option<String>) -> Self {
        Self {
            backend,
            settings,
            preferred_id,
            cameras: RefCell::new(Vec::new()),
            current: Cell::new(None),
            active: Cell::new(false),
            armed: Rc::new(Cell::new(false)),
            intake: RefCell::new(None),
            op_lock: Mutex::new(()),
        }
    }

    /// Conectar el callback de entrada del ciclo de vida
    pub fn bind_intake(&self, intake: DecodeCallback) {
        *self.intake.borrow_mut() = Some(intake);
    }

    #[cfg(test)]
    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn current_camera_id(&self) -> Option<String> {
        let index = self.current.get()?;
        self.cameras.borrow().get(index).map(|c| c.id.clone())
    }

    #[cfg(test)]
    pub fn is_active(&self) -> bool {
        self.active.get()
    }

    /// Enumerar cámaras y elegir: actual > preferida guardada > frontal > primera
    pub async fn list_cameras(&self) -> Result<Vec<CameraDescriptor>, CameraError> {
        let cameras = self.backend.list_devices().await?;
        if cameras.is_empty() {
            log::warn!("📷 [CAMERA] Ninguna cámara disponible");
            return Err(CameraError::NoCameraFound);
        }

        let position_of = |id: &str| cameras.iter().position(|c| c.id == id);
        let index = self
            .current_camera_id()
            .and_then(|id| position_of(&id))
            .or_else(|| self.preferred_id.as_deref().and_then(position_of))
            .or_else(|| cameras.iter().position(CameraDescriptor::is_front_facing))
            .unwrap_or(0);

        log::info!(
            "📷 [CAMERA] {} cámara(s), seleccionada: {}",
            cameras.len(),
            cameras[index].label
        );
        *self.cameras.borrow_mut() = cameras.clone();
        self.current.set(Some(index));
        Ok(cameras)
    }

    /// Arrancar la decodificación en `camera_id` (para cualquier stream previo)
    pub async fn start(&self, camera_id: &str) -> Result<(), CameraError> {
        let _guard = self.op_lock.lock().await;
        if let Err(e) = self.stop_locked().await {
            log::warn!("⚠️ [CAMERA] Error parando stream previo: {}", e);
        }

        let intake = self
            .intake
            .borrow()
            .clone()
            .ok_or_else(|| CameraError::StartFailed("decode intake not bound".to_string()))?;

        if let Some(index) = self.cameras.borrow().iter().position(|c| c.id == camera_id) {
            self.current.set(Some(index));
        }

        self.armed.set(true);
        let armed = self.armed.clone();
        let gate: DecodeCallback = Rc::new(move |code: String| {
            if code.trim().is_empty() {
                return;
            }
            if armed.replace(false) {
                intake(code);
            } else {
                log::debug!("📷 [CAMERA] Payload descartado (no armado)");
            }
        });

        if let Err(e) = self.backend.start(camera_id, self.settings, gate).await {
            self.armed.set(false);
            return Err(e);
        }
        self.active.set(true);
        log::info!("📷 [CAMERA] Stream activo en {}", camera_id);
        Ok(())
    }

    /// Re-arrancar la cámara actual
    pub async fn start_current(&self) -> Result<(), CameraError> {
        let camera_id = self.current_camera_id().ok_or(CameraError::NoCameraFound)?;
        self.start(&camera_id).await
    }

    /// Parar el stream; no-op si no hay ninguno activo
    pub async fn stop(&self) -> Result<(), CameraError> {
        let _guard = self.op_lock.lock().await;
        self.stop_locked().await
    }

    async fn stop_locked(&self) -> Result<(), CameraError> {
        if !self.active.replace(false) {
            return Ok(());
        }
        self.armed.set(false);
        log::info!("📷 [CAMERA] Parando stream");
        self.backend.stop().await
    }

    /// Pasar a la siguiente cámara (circular). Devuelve false si hay < 2
    pub async fn switch_to_next(&self) -> Result<bool, CameraError> {
        let next_id = {
            let cameras = self.cameras.borrow();
            if cameras.len() < 2 {
                return Ok(false);
            }
            let next = self.current.get().map_or(0, |i| (i + 1) % cameras.len());
            cameras[next].id.clone()
        };
        self.start(&next_id).await?;
        Ok(true)
    }
}

impl<B: CameraBackend> Drop for CameraSession<B> {
    fn drop(&mut self) {
        if self.active.replace(false) {
            log::info!("📷 [CAMERA] Liberando cámara (drop)");
            self.backend.release();
        }
    }
}
