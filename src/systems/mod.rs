//! Application systems
//!
//! The per-frame simulation coordinator and the headless session that
//! drives it.

mod session;
mod simulation;

pub use session::{demo_script, ScriptedEvent, ScriptedSession, SessionEvent, SessionSummary};
pub use simulation::{Simulation, SimulationResult};
