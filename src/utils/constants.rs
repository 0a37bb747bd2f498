/// Clave de localStorage para la cámara preferida
pub const CAMERA_PREFERENCE_KEY: &str = "gateScanner_cameraId";

/// ID del contenedor donde html5-qrcode monta el vídeo
pub const SCANNER_VIEWPORT_ID: &str = "scanner-viewport";

/// Rutas del backend de reservas
pub const CHECK_QR_PATH: &str = "/api/bookings/check-qr";
pub const SCAN_QR_PATH: &str = "/api/bookings/scan-qr";
