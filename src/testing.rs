// ============================================================================
// TESTING - Dobles de prueba para cámara, API, feedback y timers
// ============================================================================
// Todos comparten estado vía Rc: el clon que guarda el test ve lo mismo que
// el clon que vive dentro del viewmodel.
// ============================================================================

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::future::Future;
use std::rc::Rc;

use futures::channel::oneshot;
use futures::executor::{LocalPool, LocalSpawner};
use futures::future::LocalBoxFuture;
use futures::task::LocalSpawnExt;

use crate::models::{
    BookingSummary, CameraDescriptor, ConfirmRequest, ConfirmResult, DecodeSettings, ScanPhase,
};
use crate::services::api_client::{ApiError, BookingApi};
use crate::services::camera_service::{CameraBackend, CameraError, DecodeCallback};
use crate::services::feedback_service::{FeedbackCue, FeedbackSink};
use crate::services::task_runner::TaskRunner;
use crate::state::ScanState;
use crate::viewmodels::scan_viewmodel::{LifecycleSettings, ScanPorts, ScanViewModel};

pub fn block_on_local<F: Future>(future: F) -> F::Output {
    futures::executor::block_on(future)
}

pub fn booking(remaining_scans: u32) -> BookingSummary {
    BookingSummary {
        booking_id: "bk-1".to_string(),
        event_title: "Summer Gala".to_string(),
        event_start: None,
        first_name: "Ada".to_string(),
        last_name: "Lovelace".to_string(),
        remaining_scans,
    }
}

/// Fase vista por el operador (Validating cuenta como Pending)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhaseKind {
    Idle,
    Pending,
    Success,
    Error,
}

pub fn phase_of(state: &ScanState) -> PhaseKind {
    match state.session.as_ref().map(|s| &s.phase) {
        None => PhaseKind::Idle,
        Some(ScanPhase::Validating | ScanPhase::Pending(_)) => PhaseKind::Pending,
        Some(ScanPhase::Success(_)) => PhaseKind::Success,
        Some(ScanPhase::Error(_)) => PhaseKind::Error,
    }
}

/// Registro ordenado de efectos observables
#[derive(Clone, Default)]
pub struct EventLog(Rc<RefCell<Vec<String>>>);

impl EventLog {
    pub fn push(&self, entry: impl Into<String>) {
        self.0.borrow_mut().push(entry.into());
    }

    pub fn entries(&self) -> Vec<String> {
        self.0.borrow().clone()
    }

    pub fn clear(&self) {
        self.0.borrow_mut().clear();
    }
}

// ----------------------------------------------------------------------------
// Cámara
// ----------------------------------------------------------------------------

#[derive(Clone)]
pub struct MockCamera {
    log: EventLog,
    devices: Rc<Vec<CameraDescriptor>>,
    on_decode: Rc<RefCell<Option<DecodeCallback>>>,
    streaming: Rc<Cell<bool>>,
    next_start_error: Rc<RefCell<Option<CameraError>>>,
    held_start: Rc<RefCell<Option<oneshot::Receiver<()>>>>,
    starts_in_flight: Rc<Cell<usize>>,
    max_concurrent_starts: Rc<Cell<usize>>,
}

impl MockCamera {
    pub fn new(log: EventLog, devices: &[(&str, &str)]) -> Self {
        Self {
            log,
            devices: Rc::new(
                devices
                    .iter()
                    .map(|(id, label)| CameraDescriptor::new(*id, *label))
                    .collect(),
            ),
            on_decode: Rc::new(RefCell::new(None)),
            streaming: Rc::new(Cell::new(false)),
            next_start_error: Rc::new(RefCell::new(None)),
            held_start: Rc::new(RefCell::new(None)),
            starts_in_flight: Rc::new(Cell::new(0)),
            max_concurrent_starts: Rc::new(Cell::new(0)),
        }
    }

    /// Simula un frame decodificado (solo con stream activo)
    pub fn decode(&self, code: &str) {
        if !self.streaming.get() {
            return;
        }
        let callback = self.on_decode.borrow().clone();
        if let Some(callback) = callback {
            callback(code.to_string());
        }
    }

    pub fn fail_next_start(&self, error: CameraError) {
        *self.next_start_error.borrow_mut() = Some(error);
    }

    /// El próximo start no resuelve hasta que se envíe por el Sender
    pub fn hold_next_start(&self) -> oneshot::Sender<()> {
        let (sender, receiver) = oneshot::channel();
        *self.held_start.borrow_mut() = Some(receiver);
        sender
    }

    /// Máximo de starts del backend que llegaron a solaparse
    pub fn max_concurrent_starts(&self) -> usize {
        self.max_concurrent_starts.get()
    }

    pub fn is_streaming(&self) -> bool {
        self.streaming.get()
    }

    fn shut_down(&self) {
        self.streaming.set(false);
        self.on_decode.borrow_mut().take();
    }
}

impl CameraBackend for MockCamera {
    async fn list_devices(&self) -> Result<Vec<CameraDescriptor>, CameraError> {
        Ok(self.devices.to_vec())
    }

    async fn start(
        &self,
        camera_id: &str,
        _settings: DecodeSettings,
        on_decode: DecodeCallback,
    ) -> Result<(), CameraError> {
        self.log.push(format!("camera.start:{}", camera_id));
        let in_flight = self.starts_in_flight.get() + 1;
        self.starts_in_flight.set(in_flight);
        self.max_concurrent_starts
            .set(self.max_concurrent_starts.get().max(in_flight));
        let held = self.held_start.borrow_mut().take();
        if let Some(release) = held {
            let _ = release.await;
        }
        self.starts_in_flight.set(self.starts_in_flight.get() - 1);

        let failure = self.next_start_error.borrow_mut().take();
        if let Some(error) = failure {
            return Err(error);
        }
        *self.on_decode.borrow_mut() = Some(on_decode);
        self.streaming.set(true);
        Ok(())
    }

    async fn stop(&self) -> Result<(), CameraError> {
        self.log.push("camera.stop");
        self.shut_down();
        Ok(())
    }

    fn release(&self) {
        self.log.push("camera.release");
        self.shut_down();
    }
}

// ----------------------------------------------------------------------------
// API
// ----------------------------------------------------------------------------

pub enum Reply<T> {
    Now(Result<T, ApiError>),
    Later(oneshot::Receiver<Result<T, ApiError>>),
}

impl<T> Reply<T> {
    async fn resolve(reply: Option<Self>) -> Result<T, ApiError> {
        match reply {
            Some(Reply::Now(result)) => result,
            Some(Reply::Later(receiver)) => receiver
                .await
                .unwrap_or_else(|_| Err(ApiError::Network("reply dropped".to_string()))),
            None => Err(ApiError::Network("no scripted reply".to_string())),
        }
    }
}

#[derive(Clone)]
pub struct MockApi {
    log: EventLog,
    checks: Rc<RefCell<VecDeque<Reply<BookingSummary>>>>,
    confirms: Rc<RefCell<VecDeque<Reply<ConfirmResult>>>>,
    check_calls: Rc<Cell<usize>>,
    confirm_requests: Rc<RefCell<Vec<ConfirmRequest>>>,
}

impl MockApi {
    pub fn new(log: EventLog) -> Self {
        Self {
            log,
            checks: Rc::new(RefCell::new(VecDeque::new())),
            confirms: Rc::new(RefCell::new(VecDeque::new())),
            check_calls: Rc::new(Cell::new(0)),
            confirm_requests: Rc::new(RefCell::new(Vec::new())),
        }
    }

    pub fn reply_check(&self, result: Result<BookingSummary, ApiError>) {
        self.checks.borrow_mut().push_back(Reply::Now(result));
    }

    pub fn reply_confirm(&self, result: Result<ConfirmResult, ApiError>) {
        self.confirms.borrow_mut().push_back(Reply::Now(result));
    }

    /// El próximo check queda colgado hasta que el test envíe la respuesta
    pub fn defer_check(&self) -> oneshot::Sender<Result<BookingSummary, ApiError>> {
        let (sender, receiver) = oneshot::channel();
        self.checks.borrow_mut().push_back(Reply::Later(receiver));
        sender
    }

    pub fn defer_confirm(&self) -> oneshot::Sender<Result<ConfirmResult, ApiError>> {
        let (sender, receiver) = oneshot::channel();
        self.confirms.borrow_mut().push_back(Reply::Later(receiver));
        sender
    }

    pub fn check_calls(&self) -> usize {
        self.check_calls.get()
    }

    pub fn confirm_requests(&self) -> Vec<ConfirmRequest> {
        self.confirm_requests.borrow().clone()
    }
}

impl BookingApi for MockApi {
    async fn check(&self, raw_code: &str) -> Result<BookingSummary, ApiError> {
        self.log.push(format!("api.check:{}", raw_code));
        self.check_calls.set(self.check_calls.get() + 1);
        let reply = self.checks.borrow_mut().pop_front();
        Reply::resolve(reply).await
    }

    async fn confirm(&self, request: &ConfirmRequest) -> Result<ConfirmResult, ApiError> {
        self.log.push("api.confirm");
        self.confirm_requests.borrow_mut().push(request.clone());
        let reply = self.confirms.borrow_mut().pop_front();
        Reply::resolve(reply).await
    }
}

// ----------------------------------------------------------------------------
// Feedback
// ----------------------------------------------------------------------------

#[derive(Clone)]
pub struct RecordingFeedback {
    log: EventLog,
    cues: Rc<RefCell<Vec<FeedbackCue>>>,
}

impl RecordingFeedback {
    pub fn new(log: EventLog) -> Self {
        Self {
            log,
            cues: Rc::new(RefCell::new(Vec::new())),
        }
    }

    pub fn cues(&self) -> Vec<FeedbackCue> {
        self.cues.borrow().clone()
    }
}

impl FeedbackSink for RecordingFeedback {
    fn emit(&self, cue: FeedbackCue) {
        self.log.push(format!("feedback:{:?}", cue));
        self.cues.borrow_mut().push(cue);
    }
}

// ----------------------------------------------------------------------------
// Runner con timers manuales
// ----------------------------------------------------------------------------

type TimerSlot = Rc<RefCell<Option<LocalBoxFuture<'static, ()>>>>;

#[derive(Clone)]
pub struct FakeRunner {
    spawner: LocalSpawner,
    timers: Rc<RefCell<Vec<(u32, TimerSlot)>>>,
}

/// Drop vacía el slot: el timer ya no puede dispararse
pub struct FakeTimerHandle {
    slot: TimerSlot,
}

impl Drop for FakeTimerHandle {
    fn drop(&mut self) {
        let cancelled = self.slot.borrow_mut().take();
        drop(cancelled);
    }
}

impl FakeRunner {
    pub fn new(spawner: LocalSpawner) -> Self {
        Self {
            spawner,
            timers: Rc::new(RefCell::new(Vec::new())),
        }
    }

    /// Delays de los timers programados que siguen vivos
    pub fn live_timers(&self) -> Vec<u32> {
        self.timers
            .borrow()
            .iter()
            .filter(|(_, slot)| slot.borrow().is_some())
            .map(|(delay, _)| *delay)
            .collect()
    }

    fn take_next(&self) -> Option<LocalBoxFuture<'static, ()>> {
        let mut timers = self.timers.borrow_mut();
        timers.retain(|(_, slot)| slot.borrow().is_some());
        let task = timers.first().and_then(|(_, slot)| slot.borrow_mut().take());
        timers.retain(|(_, slot)| slot.borrow().is_some());
        task
    }
}

impl TaskRunner for FakeRunner {
    type Handle = FakeTimerHandle;

    fn spawn(&self, task: LocalBoxFuture<'static, ()>) {
        self.spawner.spawn_local(task).expect("local pool alive");
    }

    fn schedule(&self, delay_ms: u32, task: LocalBoxFuture<'static, ()>) -> FakeTimerHandle {
        let slot: TimerSlot = Rc::new(RefCell::new(Some(task)));
        self.timers.borrow_mut().push((delay_ms, slot.clone()));
        FakeTimerHandle { slot }
    }
}

// ----------------------------------------------------------------------------
// Harness del viewmodel
// ----------------------------------------------------------------------------

pub struct TestPorts;

impl ScanPorts for TestPorts {
    type Api = MockApi;
    type Camera = MockCamera;
    type Feedback = RecordingFeedback;
    type Runner = FakeRunner;
}

pub struct Harness {
    pool: LocalPool,
    pub log: EventLog,
    pub api: MockApi,
    pub camera: MockCamera,
    pub feedback: RecordingFeedback,
    pub runner: FakeRunner,
    pub vm: ScanViewModel<TestPorts>,
}

impl Harness {
    pub fn new(cameras: &[(&str, &str)]) -> Self {
        let pool = LocalPool::new();
        let log = EventLog::default();
        let api = MockApi::new(log.clone());
        let camera = MockCamera::new(log.clone(), cameras);
        let feedback = RecordingFeedback::new(log.clone());
        let runner = FakeRunner::new(pool.spawner());
        let vm = ScanViewModel::new(
            api.clone(),
            camera.clone(),
            feedback.clone(),
            runner.clone(),
            LifecycleSettings::default(),
            None,
        );
        Self {
            pool,
            log,
            api,
            camera,
            feedback,
            runner,
            vm,
        }
    }

    /// Harness con la cámara ya arrancada y el log limpio
    pub fn mounted(cameras: &[(&str, &str)]) -> Self {
        let mut harness = Self::new(cameras);
        harness.run(harness.vm.clone(), |vm| async move { vm.mount().await });
        assert!(harness.camera.is_streaming(), "camera should stream after mount");
        harness.log.clear();
        harness
    }

    /// Ejecuta la operación hasta terminar y luego todo lo que haya quedado listo
    pub fn run<F, Fut>(&mut self, vm: ScanViewModel<TestPorts>, operation: F)
    where
        F: FnOnce(ScanViewModel<TestPorts>) -> Fut,
        Fut: Future<Output = ()>,
    {
        self.pool.run_until(operation(vm));
        self.pool.run_until_stalled();
    }

    /// Lanza la operación sin esperarla (para requests colgados)
    pub fn spawn<F, Fut>(&mut self, vm: ScanViewModel<TestPorts>, operation: F)
    where
        F: FnOnce(ScanViewModel<TestPorts>) -> Fut,
        Fut: Future<Output = ()> + 'static,
    {
        self.runner.spawn(Box::pin(operation(vm)));
    }

    pub fn phase(&self) -> PhaseKind {
        phase_of(&self.vm.state())
    }

    pub fn settle(&mut self) {
        self.pool.run_until_stalled();
    }

    /// Dispara el siguiente timer vivo; false si no queda ninguno
    pub fn fire_timer(&mut self) -> bool {
        match self.runner.take_next() {
            Some(task) => {
                self.pool.run_until(task);
                self.pool.run_until_stalled();
                true
            }
            None => false,
        }
    }
}
