//! Application layer for Rollcall.
//!
//! Coordinates the domain collaborators: the [`QueryCoordinator`] runs patient
//! list and search requests against the local cache or the remote server, and
//! [`PatientListView`] is a ready-made listener holding the displayed list.

pub mod coordinator;
pub mod list_view;

pub use coordinator::{Delivery, QueryCoordinator, QueryCoordinatorBuilder, QueryHandle};
pub use list_view::{FETCH_FAILED_NOTICE, ListSnapshot, PatientListView};
