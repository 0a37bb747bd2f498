// ============================================================================
// SCAN SESSION - Estado explícito de un intento de escaneo
// ============================================================================
// Cada fase lleva SOLO los datos válidos en ella: un Success nunca tiene
// error_info, un Error nunca tiene booking, etc.
// ============================================================================

use crate::models::booking::{BookingSummary, ConfirmResult, ErrorInfo};

/// Reserva validada esperando confirmación del operador
#[derive(Debug, Clone, PartialEq)]
pub struct PendingEntry {
    booking: BookingSummary,
    selected_count: u32,
    note: String,
}

impl PendingEntry {
    /// Cada entrada en Pending arranca con count = 1
    pub fn new(booking: BookingSummary) -> Self {
        Self {
            booking,
            selected_count: 1,
            note: String::new(),
        }
    }

    pub fn booking(&self) -> &BookingSummary {
        &self.booking
    }

    pub fn selected_count(&self) -> u32 {
        self.selected_count
    }

    pub fn note(&self) -> &str {
        &self.note
    }

    /// Máximo seleccionable (nunca menor que 1)
    pub fn max_count(&self) -> u32 {
        self.booking.remaining_scans.max(1)
    }

    /// Clamp a [1, remaining_scans]; devuelve el valor final
    pub fn select_count(&mut self, count: u32) -> u32 {
        self.selected_count = count.clamp(1, self.max_count());
        self.selected_count
    }

    pub fn set_note(&mut self, note: &str) {
        self.note = note.to_string();
    }
}

/// Fase de una sesión abierta
#[derive(Debug, Clone, PartialEq)]
pub enum ScanPhase {
    /// Código decodificado, esperando respuesta del check
    Validating,
    Pending(PendingEntry),
    Success(ConfirmResult),
    Error(ErrorInfo),
}

impl ScanPhase {
    /// Success y Error son terminales: solo salen por dismiss
    pub fn is_terminal(&self) -> bool {
        matches!(self, ScanPhase::Success(_) | ScanPhase::Error(_))
    }
}

/// Un intento de escaneo (efímero)
#[derive(Debug, Clone, PartialEq)]
pub struct ScanSession {
    pub id: u64,
    pub raw_code: String,
    pub phase: ScanPhase,
}

impl ScanSession {
    pub fn open(id: u64, raw_code: String) -> Self {
        Self {
            id,
            raw_code,
            phase: ScanPhase::Validating,
        }
    }

    pub fn pending(&self) -> Option<&PendingEntry> {
        match &self.phase {
            ScanPhase::Pending(entry) => Some(entry),
            _ => None,
        }
    }

    pub fn pending_mut(&mut self) -> Option<&mut PendingEntry> {
        match &mut self.phase {
            ScanPhase::Pending(entry) => Some(entry),
            _ => None,
        }
    }
}
