// ============================================================================
// API CLIENT - SOLO COMUNICACIÓN HTTP (Stateless)
// ============================================================================
// NO tiene lógica de negocio, solo hace requests HTTP al backend de reservas
// ============================================================================

use futures::future::{select, Either};
use gloo_net::http::Request;
use gloo_timers::future::TimeoutFuture;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::config::CONFIG;
use crate::models::booking::{CheckRequest, CheckResponse, FailureBody};
use crate::models::{BookingSummary, ConfirmRequest, ConfirmResult, ErrorInfo};
use crate::utils::constants::{CHECK_QR_PATH, SCAN_QR_PATH};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
    /// El backend respondió non-2xx (código inválido, agotado, conflicto...)
    #[error("HTTP {status}: request rejected")]
    Rejected {
        status: u16,
        title: Option<String>,
        detail: Option<String>,
    },
    #[error("Network error: {0}")]
    Network(String),
    #[error("Request timed out after {0}s")]
    Timeout(u32),
    #[error("Parse error: {0}")]
    Parse(String),
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<&ApiError> for ErrorInfo {
    fn from(error: &ApiError) -> Self {
        match error {
            ApiError::Rejected { title, detail, .. } => ErrorInfo::new(title.clone(), detail.clone()),
            other => ErrorInfo::new(None, Some(other.to_string())),
        }
    }
}

/// Contrato con el servicio de validación de reservas
#[allow(async_fn_in_trait)]
pub trait BookingApi {
    /// Validar un código escaneado sin consumir entradas
    async fn check(&self, raw_code: &str) -> Result<BookingSummary, ApiError>;

    /// Marcar `count` entradas para el código
    async fn confirm(&self, request: &ConfirmRequest) -> Result<ConfirmResult, ApiError>;
}

/// Cliente API - SOLO comunicación HTTP (stateless)
#[derive(Clone)]
pub struct ApiClient {
    base_url: String,
    api_key: Option<String>,
    timeout_seconds: u32,
}

impl ApiClient {
    pub fn new() -> Self {
        Self {
            base_url: CONFIG.backend_url().to_string(),
            api_key: CONFIG.api_key.clone(),
            timeout_seconds: CONFIG.network_timeout_seconds,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), path)
    }

    async fn post_json<B, T>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize,
        T: DeserializeOwned,
    {
        let url = self.url(path);
        let mut builder = Request::post(&url);
        if let Some(key) = &self.api_key {
            builder = builder.header("Authorization", &format!("Bearer {}", key));
        }
        let request = builder
            .json(body)
            .map_err(|e| ApiError::Serialization(e.to_string()))?;

        // gloo-net no tiene timeout propio
        let send = Box::pin(request.send());
        let timeout = Box::pin(TimeoutFuture::new(self.timeout_seconds.saturating_mul(1000)));
        let response = match select(send, timeout).await {
            Either::Left((result, _)) => result.map_err(|e| ApiError::Network(e.to_string()))?,
            Either::Right(_) => {
                log::error!("⏱️ [API] {} sin respuesta tras {}s", path, self.timeout_seconds);
                return Err(ApiError::Timeout(self.timeout_seconds));
            }
        };

        if !response.ok() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            let body = FailureBody::parse(&text);
            log::error!("❌ [API] {} -> HTTP {}: {:?} / {:?}", path, status, body.message, body.reason);
            return Err(ApiError::Rejected {
                status,
                title: body.message,
                detail: body.reason,
            });
        }

        response
            .json::<T>()
            .await
            .map_err(|e| ApiError::Parse(e.to_string()))
    }
}

impl Default for ApiClient {
    fn default() -> Self {
        Self::new()
    }
}

impl BookingApi for ApiClient {
    async fn check(&self, raw_code: &str) -> Result<BookingSummary, ApiError> {
        log::info!("🔍 [API] Verificando código QR");
        let response: CheckResponse = self
            .post_json(CHECK_QR_PATH, &CheckRequest { qr_code: raw_code })
            .await?;
        let summary = BookingSummary::from(response);
        log::info!(
            "✅ [API] Reserva {} válida ({} entradas restantes)",
            summary.booking_id,
            summary.remaining_scans
        );
        Ok(summary)
    }

    async fn confirm(&self, request: &ConfirmRequest) -> Result<ConfirmResult, ApiError> {
        log::info!("🎟️ [API] Confirmando {} entrada(s) en {}", request.count, request.entry_point);
        let result: ConfirmResult = self.post_json(SCAN_QR_PATH, request).await?;
        log::info!(
            "✅ [API] {} entrada(s) marcadas, {} restantes",
            result.just_scanned,
            result.remaining_scans
        );
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn url_joins_without_double_slash() {
        let client = ApiClient {
            base_url: "https://api.test/".to_string(),
            api_key: None,
            timeout_seconds: 5,
        };
        assert_eq!(client.url(CHECK_QR_PATH), "https://api.test/api/bookings/check-qr");
    }

    #[test]
    fn rejected_error_carries_server_text_to_panel() {
        let error = ApiError::Rejected {
            status: 404,
            title: Some("Invalid QR Code".to_string()),
            detail: Some("Booking not found".to_string()),
        };
        let info = ErrorInfo::from(&error);
        assert_eq!(info.title, "Invalid QR Code");
        assert_eq!(info.detail, "Booking not found");
    }

    #[test]
    fn transport_errors_use_generic_title() {
        let info = ErrorInfo::from(&ApiError::Timeout(15));
        assert_eq!(info.title, crate::models::booking::GENERIC_ERROR_TITLE);
        assert_eq!(info.detail, "Request timed out after 15s");
    }
}
