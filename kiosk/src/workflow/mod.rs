//! The visitor booking workflow.
//!
//! Run it inside a [`Store`](festival_kiosk_runtime::Store) so delayed idle
//! checks are fed back automatically.

mod idle;
mod reducer;
mod types;

pub use idle::{IdleCheck, IdleTimer};
pub use reducer::{WorkflowEnvironment, WorkflowReducer};
pub use types::{ActivityKind, FormData, Step, WorkflowAction, WorkflowState};
