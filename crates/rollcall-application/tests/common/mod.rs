//! Mock collaborators shared by the coordinator tests.

#![allow(dead_code)]

use async_trait::async_trait;
use rollcall_core::auth::{AuthError, Credentials, Session, SessionGate};
use rollcall_core::error::{Result, RollcallError};
use rollcall_core::listener::QueryListener;
use rollcall_core::patient::Patient;
use rollcall_core::query::{Outcome, QueryResult, RequestId};
use rollcall_core::search_mode::{SearchMode, SearchModeStore};
use rollcall_core::source::PatientSource;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;

pub fn patient(uuid: &str) -> Patient {
    Patient {
        uuid: uuid.to_string(),
        identifier: format!("MRN-{uuid}"),
        given_name: uuid.to_uppercase(),
        middle_name: String::new(),
        family_name: "Test".to_string(),
        gender: "M".to_string(),
        birthdate: None,
    }
}

pub fn credentials() -> Credentials {
    Credentials::new("admin", "Admin123", "https://clinic.example.org/openmrs")
}

// ============================================================================
// Search mode store
// ============================================================================

#[derive(Default)]
pub struct MemoryModeStore {
    mode: Mutex<Option<SearchMode>>,
    pub writes: AtomicUsize,
    pub fail_writes: bool,
    pub panic_on_write: bool,
}

impl MemoryModeStore {
    pub fn failing() -> Self {
        Self {
            fail_writes: true,
            ..Self::default()
        }
    }

    pub fn panicking() -> Self {
        Self {
            panic_on_write: true,
            ..Self::default()
        }
    }

    pub fn stored(&self) -> Option<SearchMode> {
        *self.mode.lock().unwrap()
    }
}

#[async_trait]
impl SearchModeStore for MemoryModeStore {
    async fn set(&self, mode: SearchMode) -> Result<()> {
        if self.panic_on_write {
            panic!("preference storage exploded");
        }
        if self.fail_writes {
            return Err(RollcallError::io("disk full"));
        }
        *self.mode.lock().unwrap() = Some(mode);
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn get(&self) -> SearchMode {
        self.stored().unwrap_or_default()
    }
}

// ============================================================================
// Patient source
// ============================================================================

/// Canned answers per operation; `None` means "fail".
pub struct MockSource {
    pub all: Option<Vec<Patient>>,
    pub cohort: Option<Vec<Patient>>,
    pub local: Option<Vec<Patient>>,
    pub remote: Option<Vec<Patient>>,
    pub panic_on_remote: bool,
    /// Searches for these texts wait until notified
    pub holds: Mutex<HashMap<String, Arc<Notify>>>,
    pub remote_calls: AtomicUsize,
    pub local_calls: Mutex<Vec<(String, Option<String>)>>,
    /// Mode store contents observed when a search reached the source
    pub mode_store: Option<Arc<MemoryModeStore>>,
    pub modes_seen: Mutex<Vec<Option<SearchMode>>>,
}

impl Default for MockSource {
    fn default() -> Self {
        Self {
            all: Some(Vec::new()),
            cohort: Some(Vec::new()),
            local: Some(Vec::new()),
            remote: Some(Vec::new()),
            panic_on_remote: false,
            holds: Mutex::new(HashMap::new()),
            remote_calls: AtomicUsize::new(0),
            local_calls: Mutex::new(Vec::new()),
            mode_store: None,
            modes_seen: Mutex::new(Vec::new()),
        }
    }
}

impl MockSource {
    /// Makes searches for `text` block until the returned notifier fires.
    pub fn hold(&self, text: &str) -> Arc<Notify> {
        let notify = Arc::new(Notify::new());
        self.holds
            .lock()
            .unwrap()
            .insert(text.to_string(), notify.clone());
        notify
    }

    async fn wait_if_held(&self, text: &str) {
        let hold = self.holds.lock().unwrap().get(text).cloned();
        if let Some(notify) = hold {
            notify.notified().await;
        }
    }

    fn observe_mode(&self) {
        if let Some(store) = &self.mode_store {
            self.modes_seen.lock().unwrap().push(store.stored());
        }
    }

    fn answer(canned: &Option<Vec<Patient>>) -> Result<Vec<Patient>> {
        canned
            .clone()
            .ok_or_else(|| RollcallError::io("patient load failed"))
    }
}

#[async_trait]
impl PatientSource for MockSource {
    async fn fetch_by_cohort(&self, _cohort_id: &str) -> Result<Vec<Patient>> {
        Self::answer(&self.cohort)
    }

    async fn fetch_all(&self) -> Result<Vec<Patient>> {
        Self::answer(&self.all)
    }

    async fn search_local(&self, text: &str, cohort_id: Option<&str>) -> Result<Vec<Patient>> {
        self.observe_mode();
        self.local_calls
            .lock()
            .unwrap()
            .push((text.to_string(), cohort_id.map(str::to_string)));
        self.wait_if_held(text).await;
        match text {
            // Lets ordering tests tell results apart.
            "first" => Ok(vec![patient("first-1"), patient("first-2")]),
            "second" => Ok(vec![patient("second-1")]),
            _ => Self::answer(&self.local),
        }
    }

    async fn search_remote(&self, _session: &dyn Session, text: &str) -> Result<Vec<Patient>> {
        self.observe_mode();
        self.remote_calls.fetch_add(1, Ordering::SeqCst);
        self.wait_if_held(text).await;
        if self.panic_on_remote {
            panic!("remote search exploded");
        }
        Self::answer(&self.remote)
    }
}

// ============================================================================
// Session gate
// ============================================================================

pub struct CountingSession {
    closes: Arc<AtomicUsize>,
}

impl Session for CountingSession {
    fn id(&self) -> &str {
        "session-under-test"
    }

    fn close(&self) {
        self.closes.fetch_add(1, Ordering::SeqCst);
    }
}

pub struct MockGate {
    pub accept: bool,
    pub panic: bool,
    pub attempts: AtomicUsize,
    pub closes: Arc<AtomicUsize>,
    pub last_username: Mutex<Option<String>>,
}

impl MockGate {
    pub fn accepting() -> Self {
        Self {
            accept: true,
            panic: false,
            attempts: AtomicUsize::new(0),
            closes: Arc::new(AtomicUsize::new(0)),
            last_username: Mutex::new(None),
        }
    }

    pub fn rejecting() -> Self {
        Self {
            accept: false,
            ..Self::accepting()
        }
    }

    pub fn panicking() -> Self {
        Self {
            panic: true,
            ..Self::accepting()
        }
    }

    pub fn close_count(&self) -> usize {
        self.closes.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SessionGate for MockGate {
    async fn authenticate(
        &self,
        credentials: &Credentials,
    ) -> std::result::Result<Box<dyn Session>, AuthError> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        *self.last_username.lock().unwrap() = Some(credentials.username.clone());
        if self.panic {
            panic!("auth backend exploded");
        }
        if !self.accept {
            return Err(AuthError::InvalidCredentials);
        }
        Ok(Box::new(CountingSession {
            closes: self.closes.clone(),
        }))
    }
}

// ============================================================================
// Listener
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Started(RequestId),
    Result {
        request_id: RequestId,
        outcome: Outcome,
        uuids: Vec<String>,
    },
    Finished(RequestId),
}

#[derive(Default)]
pub struct RecordingListener {
    events: Mutex<Vec<Event>>,
}

impl RecordingListener {
    pub fn events(&self) -> Vec<Event> {
        self.events.lock().unwrap().clone()
    }

    pub fn events_for(&self, request_id: RequestId) -> Vec<Event> {
        self.events()
            .into_iter()
            .filter(|e| match e {
                Event::Started(id) | Event::Finished(id) => *id == request_id,
                Event::Result { request_id: id, .. } => *id == request_id,
            })
            .collect()
    }
}

impl QueryListener for RecordingListener {
    fn on_started(&self, request_id: RequestId) {
        self.events.lock().unwrap().push(Event::Started(request_id));
    }

    fn on_result(&self, result: &QueryResult) {
        self.events.lock().unwrap().push(Event::Result {
            request_id: result.request_id(),
            outcome: result.outcome(),
            uuids: result.records().iter().map(|p| p.uuid.clone()).collect(),
        });
    }

    fn on_finished(&self, request_id: RequestId) {
        self.events.lock().unwrap().push(Event::Finished(request_id));
    }
}
