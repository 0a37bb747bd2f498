// ============================================================================
// STATE MODULE - State Management con RefCell + notificaciones
// ============================================================================

pub mod reactivity;
pub mod scan_state;

pub use reactivity::*;
pub use scan_state::*;
