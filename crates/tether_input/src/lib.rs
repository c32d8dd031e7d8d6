//! Input handling for Tether
//!
//! Raw window events are folded into an [`InputController`] as they arrive;
//! once per tick the simulation takes an [`InputSnapshot`], so it only ever
//! sees one consistent view of the input for that tick.

mod controller;
mod mapper;
mod snapshot;

pub use controller::InputController;
pub use mapper::{InputAction, InputMapper};
pub use snapshot::{InputSnapshot, Intent};
