// ============================================================================
// TASK RUNNER - spawn de futures + tareas diferidas cancelables
// ============================================================================
// Las tareas diferidas (auto-dismiss) devuelven un handle: hacer drop del
// handle cancela la tarea si aún no se ejecutó.
// ============================================================================

use futures::future::LocalBoxFuture;
use gloo_timers::callback::Timeout;

pub trait TaskRunner {
    /// Handle de la tarea diferida; drop = cancelar
    type Handle;

    fn spawn(&self, task: LocalBoxFuture<'static, ()>);

    fn schedule(&self, delay_ms: u32, task: LocalBoxFuture<'static, ()>) -> Self::Handle;
}

/// Runner del navegador: spawn_local + setTimeout
#[derive(Clone, Copy, Default)]
pub struct BrowserRunner;

/// gloo Timeout hace clearTimeout en su Drop
pub struct TimeoutHandle {
    _timeout: Timeout,
}

impl TaskRunner for BrowserRunner {
    type Handle = TimeoutHandle;

    fn spawn(&self, task: LocalBoxFuture<'static, ()>) {
        wasm_bindgen_futures::spawn_local(task);
    }

    fn schedule(&self, delay_ms: u32, task: LocalBoxFuture<'static, ()>) -> TimeoutHandle {
        let timeout = Timeout::new(delay_ms, move || {
            wasm_bindgen_futures::spawn_local(task);
        });
        TimeoutHandle { _timeout: timeout }
    }
}
