//! Shared math routines and reference data records.
//!
//! # Invariants
//! - Math routines never fail; zero norms are guarded.
//! - Reference records are immutable for the duration of a session.

pub mod math;
pub mod types;

pub use math::{Quat, Vec3};
pub use types::{
    DroneDef, DroneType, EnemyKind, FlightMode, MapDef, ParseModeError, Rates, Weapon,
};
