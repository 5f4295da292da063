pub mod controller;
pub mod phase;
pub mod state;
pub mod view;

pub use controller::{Outcome, Ticket, WorkflowController};
pub use phase::{OperationFlags, OperationKind, OperationToken, WorkflowPhase};
pub use state::{DraftState, ErrorKind, ErrorState, SelectedMessage};
pub use view::{WorkflowView, project};
