use crate::catalog::{Catalog, ContentError};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::Path;
use strikewing_common::{DroneDef, FlightMode, MapDef};
use strikewing_kernel::World;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GarageError {
    #[error("no drone with id `{0}`")]
    UnknownDrone(String),
    #[error("no map with id `{0}`")]
    UnknownMap(String),
    #[error("`{item}` costs {cost} coins, only {coins} available")]
    InsufficientCoins { item: String, cost: u64, coins: u64 },
    #[error("`{0}` is locked")]
    Locked(String),
}

/// The player's wallet, unlocks and current selection.
///
/// This is the shop side of the coin flow: it hands its balance to a new
/// [`World`] and takes the balance back with [`Garage::settle`]. It never
/// touches enemies or the drone pose.
///
/// Fields missing from a save file take their default values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Garage {
    pub coins: u64,
    pub mode: FlightMode,
    pub owned_drones: BTreeSet<String>,
    pub owned_maps: BTreeSet<String>,
    pub selected_drone: String,
    pub selected_map: String,
}

impl Default for Garage {
    fn default() -> Self {
        Self {
            coins: 0,
            mode: FlightMode::Acro,
            owned_drones: BTreeSet::from(["armed_1".to_string()]),
            owned_maps: BTreeSet::from(["map1".to_string(), "map2".to_string()]),
            selected_drone: "armed_1".into(),
            selected_map: "map1".into(),
        }
    }
}

impl Garage {
    /// Read a saved garage. A missing or unreadable save starts a fresh one.
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        let data = match std::fs::read_to_string(path) {
            Ok(data) => data,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::info!(path = %path.display(), "no save found, starting fresh");
                return Self::default();
            }
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "save unreadable, starting fresh");
                return Self::default();
            }
        };
        match serde_json::from_str(&data) {
            Ok(garage) => garage,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "save corrupt, starting fresh");
                Self::default()
            }
        }
    }

    /// Write the garage as JSON, creating the parent directory if needed.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ContentError> {
        let path = path.as_ref();
        let io_err = |source| ContentError::Io {
            path: path.to_path_buf(),
            source,
        };
        if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
            std::fs::create_dir_all(dir).map_err(io_err)?;
        }
        let json = serde_json::to_string_pretty(self).map_err(|source| ContentError::Json {
            table: "garage",
            source,
        })?;
        std::fs::write(path, json).map_err(io_err)?;
        tracing::debug!(path = %path.display(), coins = self.coins, "garage saved");
        Ok(())
    }

    /// Free items are always unlocked.
    pub fn is_drone_unlocked(&self, drone: &DroneDef) -> bool {
        drone.cost == 0 || self.owned_drones.contains(&drone.id)
    }

    pub fn is_map_unlocked(&self, map: &MapDef) -> bool {
        map.cost == 0 || self.owned_maps.contains(&map.id)
    }

    /// Own everything in the catalog.
    pub fn unlock_all(&mut self, catalog: &Catalog) {
        self.owned_drones
            .extend(catalog.drones.iter().map(|d| d.id.clone()));
        self.owned_maps.extend(catalog.maps.iter().map(|m| m.id.clone()));
    }

    fn charge(&mut self, item: &str, cost: u64) -> Result<(), GarageError> {
        if self.coins < cost {
            return Err(GarageError::InsufficientCoins {
                item: item.to_string(),
                cost,
                coins: self.coins,
            });
        }
        self.coins -= cost;
        Ok(())
    }

    /// Buy a drone. Buying something already unlocked costs nothing.
    pub fn buy_drone(&mut self, catalog: &Catalog, id: &str) -> Result<(), GarageError> {
        let drone = catalog
            .drone(id)
            .ok_or_else(|| GarageError::UnknownDrone(id.to_string()))?;
        if self.is_drone_unlocked(drone) {
            return Ok(());
        }
        self.charge(&drone.id, drone.cost)?;
        self.owned_drones.insert(drone.id.clone());
        tracing::info!(drone = %drone.id, cost = drone.cost, coins = self.coins, "drone bought");
        Ok(())
    }

    pub fn buy_map(&mut self, catalog: &Catalog, id: &str) -> Result<(), GarageError> {
        let map = catalog
            .map(id)
            .ok_or_else(|| GarageError::UnknownMap(id.to_string()))?;
        if self.is_map_unlocked(map) {
            return Ok(());
        }
        self.charge(&map.id, map.cost)?;
        self.owned_maps.insert(map.id.clone());
        tracing::info!(map = %map.id, cost = map.cost, coins = self.coins, "map bought");
        Ok(())
    }

    pub fn select_drone(&mut self, catalog: &Catalog, id: &str) -> Result<(), GarageError> {
        let drone = catalog
            .drone(id)
            .ok_or_else(|| GarageError::UnknownDrone(id.to_string()))?;
        if !self.is_drone_unlocked(drone) {
            return Err(GarageError::Locked(drone.id.clone()));
        }
        self.selected_drone = drone.id.clone();
        Ok(())
    }

    pub fn select_map(&mut self, catalog: &Catalog, id: &str) -> Result<(), GarageError> {
        let map = catalog
            .map(id)
            .ok_or_else(|| GarageError::UnknownMap(id.to_string()))?;
        if !self.is_map_unlocked(map) {
            return Err(GarageError::Locked(map.id.clone()));
        }
        self.selected_map = map.id.clone();
        Ok(())
    }

    /// The selected drone and map, falling back to the first catalog entries
    /// for stale ids. Fails if either is locked.
    pub fn loadout<'a>(
        &self,
        catalog: &'a Catalog,
    ) -> Result<(&'a DroneDef, &'a MapDef), GarageError> {
        let drone = catalog.drone_or_first(&self.selected_drone);
        let map = catalog.map_or_first(&self.selected_map);
        if !self.is_map_unlocked(map) {
            return Err(GarageError::Locked(map.id.clone()));
        }
        if !self.is_drone_unlocked(drone) {
            return Err(GarageError::Locked(drone.id.clone()));
        }
        Ok((drone, map))
    }

    /// Build a world for the current loadout, carrying the wallet into it.
    pub fn start_session(&self, catalog: &Catalog) -> Result<World, GarageError> {
        let (drone, map) = self.loadout(catalog)?;
        let mut world =
            World::with_economy(drone.clone(), map.clone(), self.mode, catalog.economy.clone());
        world.coins = self.coins;
        tracing::info!(drone = %drone.id, map = %map.id, mode = %self.mode, "session started");
        Ok(world)
    }

    /// Take the session's balance back into the wallet.
    pub fn settle(&mut self, world: &World) {
        self.coins = world.coins;
    }
}
