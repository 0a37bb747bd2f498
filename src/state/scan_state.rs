// ============================================================================
// SCAN STATE - Única fuente de verdad de lo que muestra el escáner
// ============================================================================

use crate::models::ScanSession;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScanState {
    /// None = Idle (cámara armada)
    pub session: Option<ScanSession>,
    /// check o confirm en vuelo
    pub request_in_flight: bool,
    /// Diagnóstico de cámara (no bloquea la página)
    pub camera_error: Option<String>,
    pub camera_count: usize,
    /// Arranque o cambio de cámara en curso
    pub camera_busy: bool,
    pub(crate) next_session_id: u64,
}

impl ScanState {
    /// Idle y sin requests: puede aceptar un código nuevo
    pub fn accepts_decode(&self) -> bool {
        self.session.is_none() && !self.request_in_flight
    }

    /// Toggle y reintento: sin sesión, sin request y sin cámara arrancando
    pub fn camera_controls_enabled(&self) -> bool {
        self.accepts_decode() && !self.camera_busy
    }

    /// Abrir sesión en Validating; devuelve su id
    pub fn open_session(&mut self, raw_code: String) -> u64 {
        self.next_session_id += 1;
        let id = self.next_session_id;
        self.session = Some(ScanSession::open(id, raw_code));
        id
    }

    /// Sesión actual solo si sigue siendo `session_id`
    pub fn session_mut(&mut self, session_id: u64) -> Option<&mut ScanSession> {
        self.session.as_mut().filter(|s| s.id == session_id)
    }

    pub fn clear_session(&mut self) {
        self.session = None;
    }
}
