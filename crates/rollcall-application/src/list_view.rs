//! Display state for a patient list.

use rollcall_core::listener::QueryListener;
use rollcall_core::patient::Patient;
use rollcall_core::query::{Outcome, QueryResult, RequestId};
use std::sync::{PoisonError, RwLock};

/// Notice shown when the last delivered result was not a success.
pub const FETCH_FAILED_NOTICE: &str = "Something went wrong while fetching patients";

/// A consistent copy of the list view's state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListSnapshot {
    pub patients: Vec<Patient>,
    /// Outcome of the last applied result, `None` before the first one
    pub last_outcome: Option<Outcome>,
    /// Request whose result was applied last
    pub last_request: Option<RequestId>,
    /// Number of results applied so far, failures included
    pub applied: u64,
    /// Requests started but not yet finished
    pub in_flight: usize,
}

impl ListSnapshot {
    pub fn is_busy(&self) -> bool {
        self.in_flight > 0
    }

    /// The "could not load" notice, distinct from an empty successful list.
    pub fn notice(&self) -> Option<&'static str> {
        match self.last_outcome {
            Some(outcome) if !outcome.is_success() => Some(FETCH_FAILED_NOTICE),
            _ => None,
        }
    }
}

/// A [`QueryListener`] that keeps the displayed patient list.
///
/// A successful result replaces the whole list in one critical section, so a
/// reader never sees a mix of two results. A failed result leaves the list as
/// it was and only records the outcome.
#[derive(Debug, Default)]
pub struct PatientListView {
    state: RwLock<ListSnapshot>,
}

impl PatientListView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> ListSnapshot {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn patients(&self) -> Vec<Patient> {
        self.snapshot().patients
    }

    fn update(&self, f: impl FnOnce(&mut ListSnapshot)) {
        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        f(&mut state);
    }
}

impl QueryListener for PatientListView {
    fn on_started(&self, _request_id: RequestId) {
        self.update(|state| state.in_flight += 1);
    }

    fn on_result(&self, result: &QueryResult) {
        self.update(|state| {
            if result.outcome().is_success() {
                state.patients = result.records().to_vec();
            }
            state.last_outcome = Some(result.outcome());
            state.last_request = Some(result.request_id());
            state.applied += 1;
        });
    }

    fn on_finished(&self, _request_id: RequestId) {
        self.update(|state| state.in_flight = state.in_flight.saturating_sub(1));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rollcall_core::query::{Request, RequestKind};

    fn patient(uuid: &str) -> Patient {
        Patient {
            uuid: uuid.to_string(),
            identifier: uuid.to_uppercase(),
            given_name: "Given".to_string(),
            middle_name: String::new(),
            family_name: "Family".to_string(),
            gender: "F".to_string(),
            birthdate: None,
        }
    }

    #[test]
    fn test_success_replaces_list() {
        let view = PatientListView::new();
        let first = Request::new(1, RequestKind::AllRecords);
        let second = Request::new(2, RequestKind::LocalSearch("b".into()));

        view.on_result(&QueryResult::success(&first, vec![patient("a"), patient("b")]));
        view.on_result(&QueryResult::success(&second, vec![patient("b")]));

        let snapshot = view.snapshot();
        assert_eq!(snapshot.patients, vec![patient("b")]);
        assert_eq!(snapshot.last_request, Some(2));
        assert_eq!(snapshot.applied, 2);
        assert_eq!(snapshot.notice(), None);
    }

    #[test]
    fn test_failure_keeps_list_and_sets_notice() {
        let view = PatientListView::new();
        let first = Request::new(1, RequestKind::AllRecords);
        let second = Request::new(2, RequestKind::RemoteSearch("x".into()));

        view.on_result(&QueryResult::success(&first, vec![patient("a")]));
        view.on_result(&QueryResult::failed(&second, Outcome::AuthFailure));

        let snapshot = view.snapshot();
        assert_eq!(snapshot.patients, vec![patient("a")]);
        assert_eq!(snapshot.last_outcome, Some(Outcome::AuthFailure));
        assert_eq!(snapshot.notice(), Some(FETCH_FAILED_NOTICE));
    }

    #[test]
    fn test_empty_success_has_no_notice() {
        let view = PatientListView::new();
        let request = Request::new(1, RequestKind::LocalSearch("john".into()));
        view.on_result(&QueryResult::success(&request, Vec::new()));

        let snapshot = view.snapshot();
        assert!(snapshot.patients.is_empty());
        assert_eq!(snapshot.notice(), None);
    }

    #[test]
    fn test_busy_tracking() {
        let view = PatientListView::new();
        view.on_started(1);
        view.on_started(2);
        assert!(view.snapshot().is_busy());
        view.on_finished(2);
        view.on_finished(1);
        assert!(!view.snapshot().is_busy());
        view.on_finished(3);
        assert_eq!(view.snapshot().in_flight, 0);
    }
}
