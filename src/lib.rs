//! Tether - local-gravity locomotion with a grapple rope
//!
//! The root crate ties the workspace together: layered configuration and
//! the per-frame simulation that runs player, collision, camera and grapple
//! in a fixed order.

pub mod config;
pub mod systems;
