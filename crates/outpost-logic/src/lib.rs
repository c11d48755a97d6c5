//! Pure unit logic for Outpost.
//!
//! This crate contains the rules for transports, bunkers and spellcasters
//! independent of any ECS, renderer, or runtime. Functions and types take
//! plain data and return results, so they are unit-testable and can back
//! any engine.
//!
//! # Module Overview
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`abilities`] | Ability catalog entries, research flags, the energy/research gate |
//! | [`capability`] | `Movable`, `GarrisonContainer`, `ResourceUser` capability traits |
//! | [`collaborators`] | Terrain, effect, status and research interfaces |
//! | [`commands`] | Command ids and fixed-slot command cards |
//! | [`config`] | Unit roster: per-type profiles loaded from JSON |
//! | [`energy`] | Bounded regenerating energy pools |
//! | [`garrison`] | Capacity-bounded garrisons and radial unload layout |
//! | [`health`] | Clamped hit points |
//! | [`movement`] | Waypoint following, idle/moving state, hover bobbing |
//! | [`vector`] | `Vec3` world coordinates |

pub mod abilities;
pub mod capability;
pub mod collaborators;
pub mod commands;
pub mod config;
pub mod energy;
pub mod garrison;
pub mod health;
pub mod movement;
pub mod vector;

pub use capability::{GarrisonContainer, Movable, ResourceUser};
pub use vector::Vec3;
