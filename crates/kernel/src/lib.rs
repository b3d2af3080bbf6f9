//! Simulation kernel: drone flight dynamics, enemy population, fire control.
//!
//! # Invariants
//! - `World::step` is a pure function of the previous state, `dt` and the input
//!   sample; all randomness comes from the map-seeded [`Lcg`].
//! - The drone orientation is a unit quaternion after every step.
//! - Kills replace the victim one-for-one, so only waves grow the population.
//! - The kernel knows nothing about rendering.

pub mod economy;
pub mod rng;
pub mod world;

pub use economy::{DEFAULT_REWARD, EconomyConfig, SpawnConfig};
pub use rng::Lcg;
pub use world::{Enemy, EnemyId, World, WorldEvent};
