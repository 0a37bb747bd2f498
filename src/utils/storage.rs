// ============================================================================
// STORAGE - Preferencias locales del escáner (localStorage)
// ============================================================================
// Solo se guarda la cámara elegida; nunca historial de escaneos.
// ============================================================================

use serde::{de::DeserializeOwned, Serialize};
use web_sys::Storage;

use crate::utils::constants::CAMERA_PREFERENCE_KEY;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StorageError {
    #[error("localStorage no disponible")]
    Unavailable,
    #[error("Error serializando {key}: {reason}")]
    Serialize { key: String, reason: String },
    #[error("Error guardando {0} en localStorage")]
    Write(String),
}

fn local_storage() -> Option<Storage> {
    web_sys::window()?.local_storage().ok()?
}

fn save_json<T: Serialize>(key: &str, value: &T) -> Result<(), StorageError> {
    let storage = local_storage().ok_or(StorageError::Unavailable)?;
    let json = serde_json::to_string(value).map_err(|e| StorageError::Serialize {
        key: key.to_string(),
        reason: e.to_string(),
    })?;
    storage
        .set_item(key, &json)
        .map_err(|_| StorageError::Write(key.to_string()))
}

fn load_json<T: DeserializeOwned>(key: &str) -> Option<T> {
    let json = local_storage()?.get_item(key).ok()??;
    parse_stored(&json)
}

/// Valores corruptos o de otra versión se tratan como ausentes
fn parse_stored<T: DeserializeOwned>(json: &str) -> Option<T> {
    serde_json::from_str(json).ok()
}

/// Cámara usada la última vez (si la hay)
pub fn load_camera_preference() -> Option<String> {
    load_json::<String>(CAMERA_PREFERENCE_KEY).filter(|id| !id.trim().is_empty())
}

pub fn save_camera_preference(camera_id: &str) -> Result<(), StorageError> {
    save_json(CAMERA_PREFERENCE_KEY, &camera_id)
}
