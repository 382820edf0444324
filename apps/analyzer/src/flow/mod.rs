// Upload → Analyzing → Results state machine and the controller that owns it.

pub mod controller;
pub mod state;

pub use controller::FlowController;
pub use state::{FlowState, Stage};
