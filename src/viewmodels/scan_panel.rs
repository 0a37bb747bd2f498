// ============================================================================
// SCAN PANEL - Qué muestra el modal en cada fase (sin DOM)
// ============================================================================

use chrono::{DateTime, Local, Utc};

use crate::models::ScanPhase;
use crate::state::ScanState;
use crate::utils::i18n::t;

#[derive(Debug, Clone, PartialEq)]
pub struct ConfirmPanel {
    pub booking_id: String,
    pub event_title: String,
    pub starts_at: Option<String>,
    pub attendee: String,
    pub remaining_scans: u32,
    pub selected_count: u32,
    /// Opciones del selector: 1..=remaining (al menos [1])
    pub count_options: Vec<u32>,
    pub note: String,
    /// Confirm en vuelo: botón deshabilitado
    pub busy: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ScanPanel {
    Validating { message: String },
    Confirm(ConfirmPanel),
    Success { marked: String, remaining: String },
    Error { title: String, detail: String },
}

impl ScanPanel {
    /// Panel para el estado actual; None en Idle (sin modal)
    pub fn for_state(state: &ScanState, lang: &str) -> Option<Self> {
        let session = state.session.as_ref()?;
        let panel = match &session.phase {
            ScanPhase::Validating => ScanPanel::Validating {
                message: t("validating", lang),
            },
            ScanPhase::Pending(entry) => {
                let booking = entry.booking();
                ScanPanel::Confirm(ConfirmPanel {
                    booking_id: booking.booking_id.clone(),
                    event_title: booking.event_title.clone(),
                    starts_at: booking.event_start.map(format_local_start),
                    attendee: booking.attendee_name(),
                    remaining_scans: booking.remaining_scans,
                    selected_count: entry.selected_count(),
                    count_options: (1..=entry.max_count()).collect(),
                    note: entry.note().to_string(),
                    busy: state.request_in_flight,
                })
            }
            ScanPhase::Success(result) => ScanPanel::Success {
                marked: format!("{} {}", result.just_scanned, t("entries_marked", lang)),
                remaining: format!("{} {}", result.remaining_scans, t("remaining", lang)),
            },
            ScanPhase::Error(info) => ScanPanel::Error {
                title: info.title.clone(),
                detail: info.detail.clone(),
            },
        };
        Some(panel)
    }

    /// Igual salvo la nota: teclear en el input no obliga a re-renderizar
    pub fn same_layout(&self, other: &ScanPanel) -> bool {
        match (self, other) {
            (ScanPanel::Confirm(a), ScanPanel::Confirm(b)) => {
                let strip = |panel: &ConfirmPanel| ConfirmPanel {
                    note: String::new(),
                    ..panel.clone()
                };
                strip(a) == strip(b)
            }
            _ => self == other,
        }
    }
}

/// El toggle solo aparece con 2+ cámaras
pub fn show_camera_toggle(camera_count: usize) -> bool {
    camera_count >= 2
}

/// Lo que pinta la toolbar; si no cambia no se reconstruye
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolbarState {
    pub show_toggle: bool,
    pub controls_enabled: bool,
    pub camera_error: Option<String>,
}

impl ToolbarState {
    pub fn for_state(state: &ScanState) -> Self {
        Self {
            show_toggle: show_camera_toggle(state.camera_count),
            controls_enabled: state.camera_controls_enabled(),
            camera_error: state.camera_error.clone(),
        }
    }
}

/// Fecha de inicio en la zona horaria del dispositivo
fn format_local_start(start: DateTime<Utc>) -> String {
    start
        .with_timezone(&Local)
        .format("%a %d %b %Y, %H:%M")
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ConfirmResult, ErrorInfo, PendingEntry};
    use crate::testing::booking;

    fn state_with(phase: ScanPhase) -> ScanState {
        let mut state = ScanState::default();
        let id = state.open_session("BOOK123".to_string());
        if let Some(session) = state.session_mut(id) {
            session.phase = phase;
        }
        state
    }

    #[test]
    fn idle_has_no_panel() {
        assert_eq!(ScanPanel::for_state(&ScanState::default(), "EN"), None);
    }

    #[test]
    fn validating_shows_progress_message() {
        let panel = ScanPanel::for_state(&state_with(ScanPhase::Validating), "EN");
        assert_eq!(
            panel,
            Some(ScanPanel::Validating {
                message: "Checking code...".to_string()
            })
        );
    }

    #[test]
    fn confirm_panel_offers_counts_up_to_remaining() {
        let mut entry = PendingEntry::new(booking(3));
        entry.select_count(2);
        let panel = ScanPanel::for_state(&state_with(ScanPhase::Pending(entry)), "EN");
        let Some(ScanPanel::Confirm(confirm)) = panel else {
            panic!("expected confirm panel");
        };
        assert_eq!(confirm.count_options, vec![1, 2, 3]);
        assert_eq!(confirm.selected_count, 2);
        assert_eq!(confirm.attendee, "Ada Lovelace");
        assert_eq!(confirm.starts_at, None);
        assert!(!confirm.busy);
    }

    #[test]
    fn exhausted_booking_still_offers_one() {
        let entry = PendingEntry::new(booking(0));
        let panel = ScanPanel::for_state(&state_with(ScanPhase::Pending(entry)), "EN");
        let Some(ScanPanel::Confirm(confirm)) = panel else {
            panic!("expected confirm panel");
        };
        assert_eq!(confirm.count_options, vec![1]);
    }

    #[test]
    fn success_panel_reports_marked_and_remaining() {
        let result = ConfirmResult {
            just_scanned: 2,
            remaining_scans: 1,
        };
        let panel = ScanPanel::for_state(&state_with(ScanPhase::Success(result)), "EN");
        assert_eq!(
            panel,
            Some(ScanPanel::Success {
                marked: "2 entry(s) marked".to_string(),
                remaining: "1 remaining".to_string(),
            })
        );
    }

    #[test]
    fn error_panel_shows_title_and_detail() {
        let info = ErrorInfo::new(Some("Invalid QR Code".to_string()), Some("Booking not found".to_string()));
        let panel = ScanPanel::for_state(&state_with(ScanPhase::Error(info)), "EN");
        assert_eq!(
            panel,
            Some(ScanPanel::Error {
                title: "Invalid QR Code".to_string(),
                detail: "Booking not found".to_string(),
            })
        );
    }

    #[test]
    fn note_edits_keep_the_same_layout() {
        let mut entry = PendingEntry::new(booking(2));
        let before = ScanPanel::for_state(&state_with(ScanPhase::Pending(entry.clone())), "EN").unwrap();
        entry.set_note("VIP");
        let typed = ScanPanel::for_state(&state_with(ScanPhase::Pending(entry.clone())), "EN").unwrap();
        entry.select_count(2);
        let recounted = ScanPanel::for_state(&state_with(ScanPhase::Pending(entry)), "EN").unwrap();

        assert!(before.same_layout(&typed));
        assert!(!typed.same_layout(&recounted));
    }

    #[test]
    fn toggle_needs_two_cameras() {
        assert!(!show_camera_toggle(0));
        assert!(!show_camera_toggle(1));
        assert!(show_camera_toggle(2));
    }

    #[test]
    fn toolbar_ignores_changes_it_does_not_show() {
        let mut state = ScanState {
            camera_count: 2,
            ..ScanState::default()
        };
        let idle = ToolbarState::for_state(&state);
        assert!(idle.show_toggle);
        assert!(idle.controls_enabled);

        let id = state.open_session("BOOK123".to_string());
        let pending = ToolbarState::for_state(&state);
        assert!(!pending.controls_enabled);

        if let Some(session) = state.session_mut(id) {
            session.phase = ScanPhase::Pending(PendingEntry::new(booking(3)));
        }
        assert_eq!(ToolbarState::for_state(&state), pending);

        state.clear_session();
        state.camera_busy = true;
        assert!(!ToolbarState::for_state(&state).controls_enabled);
    }

    #[test]
    fn start_time_is_rendered() {
        let start = DateTime::parse_from_rfc3339("2026-06-01T18:30:00Z")
            .map(|d| d.with_timezone(&Utc))
            .unwrap();
        let text = format_local_start(start);
        assert!(text.contains("2026"));
    }
}
