// Servicios: HTTP, cámara, feedback y tareas. Sin estado de UI.

pub mod api_client;
pub mod camera_service;
pub mod feedback_service;
pub mod html5_camera;
pub mod task_runner;

pub use api_client::ApiClient;
pub use feedback_service::WebFeedback;
pub use html5_camera::Html5QrBackend;
pub use task_runner::BrowserRunner;
