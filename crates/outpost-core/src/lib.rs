//! Outpost Core - RTS Unit Simulation Engine
//!
//! An ECS-based simulation of transports, bunkers and spellcasters: units
//! that follow waypoint paths, carry other units, and spend energy on
//! abilities.
//!
//! # Architecture
//!
//! The simulation uses an Entity Component System (ECS) architecture via `hecs`:
//! - **Entities**: Units spawned from roster profiles
//! - **Components**: Pure data attached to entities (Position, PathFollower, Garrison, etc.)
//! - **Systems**: Logic that queries and updates components
//!
//! A unit's capabilities are exactly the components it carries. Nothing in
//! this crate branches on what kind of unit it is looking at.
//!
//! # Example
//!
//! ```rust
//! use outpost_core::prelude::*;
//!
//! let mut field = Battlefield::with_builtin_roster().unwrap();
//! let bunker = field.spawn("bunker", Vec3::ZERO).unwrap();
//! let marine = field.spawn("marine", Vec3::new(6.0, 0.0, 0.0)).unwrap();
//!
//! let mut status = StatusLog::default();
//! field.order_garrison(&[marine], bunker, &mut status);
//!
//! for _ in 0..120 {
//!     field.update(1.0 / 30.0);
//! }
//! assert_eq!(field.occupants(bunker), vec![marine]);
//! ```

pub mod components;
pub mod dispatch;
pub mod engine;
pub mod snapshot;
pub mod systems;

/// Commonly used types for convenient importing
pub mod prelude {
    pub use crate::components::*;
    pub use crate::engine::Battlefield;
    pub use crate::snapshot::{GarrisonSnapshot, UnitSnapshot};
    pub use hecs::Entity;
    pub use outpost_logic::collaborators::{
        CommandContext, EffectLog, FlatTerrain, GameState, HeightFn, NoEffects, NullStatus,
        StatusLog,
    };
    pub use outpost_logic::commands::{CommandCard, CommandId};
    pub use outpost_logic::{GarrisonContainer, Movable, ResourceUser};
}
