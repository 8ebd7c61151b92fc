//! Proximity and interaction machine

pub mod proximity;
pub mod state;

pub use proximity::scan;
pub use state::{InteractState, Transition};
