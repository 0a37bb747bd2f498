use serde::{Deserialize, Serialize};

/// Cámara de vídeo enumerada por el navegador
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CameraDescriptor {
    pub id: String,
    pub label: String,
}

impl CameraDescriptor {
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
        }
    }

    /// El label sugiere el sensor frontal ("Front Camera", "camera2 1, facing front")
    pub fn is_front_facing(&self) -> bool {
        self.label.to_lowercase().contains("front")
    }
}

/// Parámetros fijos de decodificación
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodeSettings {
    pub fps: u32,
    pub scan_box_size: u32,
}

impl Default for DecodeSettings {
    fn default() -> Self {
        Self {
            fps: 10,
            scan_box_size: 250,
        }
    }
}
