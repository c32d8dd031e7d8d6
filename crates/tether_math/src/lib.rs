//! 3D Mathematics Library
//!
//! This crate provides the vector and rotation primitives used by the
//! tether simulation.
//!
//! ## Core Types
//!
//! - [`Vec3`] - 3D vector with x, y, z components
//! - [`Quat`] - unit quaternion for 3D rotations, including the minimal-arc
//!   rotation between two directions

mod vec3;
mod quat;

pub use vec3::Vec3;
pub use quat::Quat;
