//! Game content: drone, map and economy tables, and the garage.
//!
//! Tables ship inside the binary as JSON and can be overridden from a
//! directory holding `drones.json`, `maps.json` and `economy.json`. Schema
//! checks stop at what serde enforces; the kernel defaults anything missing.

mod catalog;
mod garage;

pub use catalog::{Catalog, ContentError};
pub use garage::{Garage, GarageError};
