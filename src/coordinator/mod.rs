pub mod controller;
pub mod error;
pub mod replay;
pub mod state;

pub use controller::{CoordinatorConfig, SessionCoordinator};
pub use error::CoordinatorError;
pub use state::{
    CoordinatorSnapshot, CoordinatorState, DropReason, FocusOutcome, Readiness, StatusMessage,
};
