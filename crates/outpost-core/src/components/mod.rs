//! Component definitions for the ECS simulation.
//!
//! Components are pure data structs attached to entities.
//! Behavior lives in the logic crate and in systems.

mod common;
mod unit;

pub use common::*;
pub use unit::*;
