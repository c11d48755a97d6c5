//! Systems - logic that operates on components

mod energy;
mod garrison;
mod movement;

pub use energy::*;
pub use garrison::*;
pub use movement::*;

pub(crate) use garrison::unit_name;
