// ============================================================================
// MÓDULO DE INTERNACIONALIZACIÓN
// ============================================================================

use std::collections::HashMap;

/// Obtener diccionario de traducciones para un idioma
fn get_translations(lang: &str) -> HashMap<&'static str, &'static str> {
    let mut translations = HashMap::new();
    let lang_upper = lang.to_uppercase();

    match lang_upper.as_str() {
        "ES" => {
            // Scanner
            translations.insert("scanner_title", "Control de acceso");
            translations.insert("switch_camera", "Cambiar cámara");
            translations.insert("retry_camera", "Reintentar cámara");
            translations.insert("camera_unavailable", "Cámara no disponible");
            translations.insert("validating", "Verificando código...");

            // Confirm panel
            translations.insert("booking", "Reserva");
            translations.insert("attendee", "Asistente");
            translations.insert("starts_at", "Inicio");
            translations.insert("remaining", "restantes");
            translations.insert("entries", "Entradas");
            translations.insert("note", "Nota");
            translations.insert("confirm_entry", "Confirmar entrada");
            translations.insert("confirming", "Confirmando...");

            // Result panels
            translations.insert("entries_marked", "entrada(s) marcada(s)");
            translations.insert("close", "Cerrar");
        }
        "FR" => {
            // Scanner
            translations.insert("scanner_title", "Contrôle d'accès");
            translations.insert("switch_camera", "Changer de caméra");
            translations.insert("retry_camera", "Relancer la caméra");
            translations.insert("camera_unavailable", "Caméra indisponible");
            translations.insert("validating", "Vérification du code...");

            // Confirm panel
            translations.insert("booking", "Réservation");
            translations.insert("attendee", "Participant");
            translations.insert("starts_at", "Début");
            translations.insert("remaining", "restant(s)");
            translations.insert("entries", "Entrées");
            translations.insert("note", "Note");
            translations.insert("confirm_entry", "Confirmer l'entrée");
            translations.insert("confirming", "Confirmation...");

            // Result panels
            translations.insert("entries_marked", "entrée(s) validée(s)");
            translations.insert("close", "Fermer");
        }
        _ => {
            // Scanner
            translations.insert("scanner_title", "Gate Entry");
            translations.insert("switch_camera", "Switch camera");
            translations.insert("retry_camera", "Retry camera");
            translations.insert("camera_unavailable", "Camera unavailable");
            translations.insert("validating", "Checking code...");

            // Confirm panel
            translations.insert("booking", "Booking");
            translations.insert("attendee", "Attendee");
            translations.insert("starts_at", "Starts");
            translations.insert("remaining", "remaining");
            translations.insert("entries", "Entries");
            translations.insert("note", "Note");
            translations.insert("confirm_entry", "Confirm entry");
            translations.insert("confirming", "Confirming...");

            // Result panels
            translations.insert("entries_marked", "entry(s) marked");
            translations.insert("close", "Close");
        }
    }

    translations
}

/// Función de traducción
///
/// # Arguments
/// * `key` - Clave de traducción
/// * `lang` - Idioma ("EN", "FR" o "ES")
///
/// # Returns
/// String traducida o la clave si no se encuentra traducción
pub fn t(key: &str, lang: &str) -> String {
    let translations = get_translations(lang);

    if let Some(translation) = translations.get(key) {
        return translation.to_string();
    }

    // Fallback: devolver la clave si no hay traducción
    key.to_string()
}
