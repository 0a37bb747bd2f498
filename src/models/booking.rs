// ============================================================================
// BOOKING - Modelos del contrato check/confirm con el backend
// ============================================================================

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Título genérico cuando el backend no manda `message`
pub const GENERIC_ERROR_TITLE: &str = "Invalid QR Code";
/// Detalle genérico cuando el backend no manda `reason`
pub const GENERIC_ERROR_DETAIL: &str = "This code could not be verified";

/// Resumen de reserva que el panel de confirmación necesita mostrar
#[derive(Debug, Clone, PartialEq)]
pub struct BookingSummary {
    pub booking_id: String,
    pub event_title: String,
    pub event_start: Option<DateTime<Utc>>,
    pub first_name: String,
    pub last_name: String,
    pub remaining_scans: u32,
}

impl BookingSummary {
    /// Nombre del asistente tal como se muestra ("Nombre Apellido")
    pub fn attendee_name(&self) -> String {
        let full = format!("{} {}", self.first_name.trim(), self.last_name.trim());
        full.trim().to_string()
    }
}

/// Resultado de un confirm exitoso
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfirmResult {
    pub just_scanned: u32,
    pub remaining_scans: u32,
}

/// Texto del panel de error
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorInfo {
    pub title: String,
    pub detail: String,
}

impl ErrorInfo {
    pub fn new(title: Option<String>, detail: Option<String>) -> Self {
        let non_empty = |s: Option<String>| s.filter(|v| !v.trim().is_empty());
        Self {
            title: non_empty(title).unwrap_or_else(|| GENERIC_ERROR_TITLE.to_string()),
            detail: non_empty(detail).unwrap_or_else(|| GENERIC_ERROR_DETAIL.to_string()),
        }
    }
}

// ----------------------------------------------------------------------------
// Wire DTOs
// ----------------------------------------------------------------------------

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckRequest<'a> {
    pub qr_code: &'a str,
}

/// Body del confirm (`POST /api/bookings/scan-qr`)
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfirmRequest {
    pub qr_code: String,
    pub count: u32,
    pub entry_point: String,
    pub note: String,
}

#[derive(Debug, Deserialize)]
pub struct CheckResponse {
    pub booking: BookingDto,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingDto {
    /// Mongo puede mandar `_id`, `id` (virtual) o los dos
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default, rename = "_id")]
    pub mongo_id: Option<String>,
    #[serde(default)]
    pub event: Option<EventDto>,
    #[serde(default)]
    pub user: Option<AttendeeDto>,
    #[serde(default)]
    pub remaining_scans: u32,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventDto {
    #[serde(default)]
    pub title: String,
    #[serde(default, deserialize_with = "lenient_datetime")]
    pub start_date: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "lenient_datetime")]
    pub start_time: Option<DateTime<Utc>>,
}

/// Fecha solo informativa: un formato inesperado da None, nunca un error
fn lenient_datetime<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(raw.as_ref().and_then(parse_event_date))
}

fn parse_event_date(value: &serde_json::Value) -> Option<DateTime<Utc>> {
    match value {
        serde_json::Value::String(text) => {
            let text = text.trim();
            if let Ok(parsed) = DateTime::parse_from_rfc3339(text) {
                return Some(parsed.with_timezone(&Utc));
            }
            if let Ok(naive) = NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S%.f") {
                return Some(Utc.from_utc_datetime(&naive));
            }
            NaiveDate::parse_from_str(text, "%Y-%m-%d")
                .ok()
                .and_then(|date| date.and_hms_opt(0, 0, 0))
                .map(|naive| Utc.from_utc_datetime(&naive))
        }
        // epoch en milisegundos
        serde_json::Value::Number(millis) => millis
            .as_i64()
            .and_then(|ms| Utc.timestamp_millis_opt(ms).single()),
        _ => None,
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendeeDto {
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
}

/// Body de error del backend (ambas operaciones)
#[derive(Debug, Default, Deserialize)]
pub struct FailureBody {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub reason: Option<String>,
}

impl FailureBody {
    /// Parsear el body de error; un body vacío o no-JSON da los genéricos
    pub fn parse(text: &str) -> Self {
        serde_json::from_str(text).unwrap_or_default()
    }
}

impl From<CheckResponse> for BookingSummary {
    fn from(response: CheckResponse) -> Self {
        let booking = response.booking;
        let (event_title, event_start) = booking
            .event
            .map(|e| (e.title, e.start_date.or(e.start_time)))
            .unwrap_or_default();
        let (first_name, last_name) = booking
            .user
            .map(|u| (u.first_name, u.last_name))
            .unwrap_or_default();

        Self {
            booking_id: booking.id.or(booking.mongo_id).unwrap_or_default(),
            event_title,
            event_start,
            first_name,
            last_name,
            remaining_scans: booking.remaining_scans,
        }
    }
}
