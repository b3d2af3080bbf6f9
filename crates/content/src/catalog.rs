use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};
use strikewing_common::{DroneDef, MapDef};
use strikewing_kernel::EconomyConfig;

const BUNDLED_DRONES: &str = include_str!("../data/drones.json");
const BUNDLED_MAPS: &str = include_str!("../data/maps.json");
const BUNDLED_ECONOMY: &str = include_str!("../data/economy.json");

/// Errors from loading content tables.
#[derive(Debug, thiserror::Error)]
pub enum ContentError {
    #[error("IO error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid {table} table: {source}")]
    Json {
        table: &'static str,
        #[source]
        source: serde_json::Error,
    },
    #[error("{0} table is empty")]
    Empty(&'static str),
}

/// Immutable reference data for a play session.
#[derive(Debug, Clone)]
pub struct Catalog {
    pub drones: Vec<DroneDef>,
    pub maps: Vec<MapDef>,
    pub economy: EconomyConfig,
}

fn parse<T: DeserializeOwned>(table: &'static str, json: &str) -> Result<T, ContentError> {
    serde_json::from_str(json).map_err(|source| ContentError::Json { table, source })
}

impl Catalog {
    /// The tables compiled into the binary.
    pub fn bundled() -> Result<Self, ContentError> {
        Self::from_json(BUNDLED_DRONES, BUNDLED_MAPS, BUNDLED_ECONOMY)
    }

    pub fn from_json(drones: &str, maps: &str, economy: &str) -> Result<Self, ContentError> {
        let drones: Vec<DroneDef> = parse("drones", drones)?;
        let maps: Vec<MapDef> = parse("maps", maps)?;
        let economy: EconomyConfig = parse("economy", economy)?;
        if drones.is_empty() {
            return Err(ContentError::Empty("drones"));
        }
        if maps.is_empty() {
            return Err(ContentError::Empty("maps"));
        }
        Ok(Self {
            drones,
            maps,
            economy,
        })
    }

    /// Load tables from `dir`. A table file that does not exist falls back to
    /// the bundled one; a file that exists but does not parse is an error.
    pub fn load(dir: impl AsRef<Path>) -> Result<Self, ContentError> {
        let dir = dir.as_ref();
        let read = |name: &str, bundled: &'static str| -> Result<String, ContentError> {
            let path = dir.join(name);
            match std::fs::read_to_string(&path) {
                Ok(s) => Ok(s),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                    tracing::debug!(path = %path.display(), "table not found, using bundled copy");
                    Ok(bundled.to_string())
                }
                Err(source) => Err(ContentError::Io { path, source }),
            }
        };
        let drones = read("drones.json", BUNDLED_DRONES)?;
        let maps = read("maps.json", BUNDLED_MAPS)?;
        let economy = read("economy.json", BUNDLED_ECONOMY)?;
        let catalog = Self::from_json(&drones, &maps, &economy)?;
        tracing::info!(
            dir = %dir.display(),
            drones = catalog.drones.len(),
            maps = catalog.maps.len(),
            "content loaded"
        );
        Ok(catalog)
    }

    pub fn drone(&self, id: &str) -> Option<&DroneDef> {
        self.drones.iter().find(|d| d.id == id)
    }

    pub fn map(&self, id: &str) -> Option<&MapDef> {
        self.maps.iter().find(|m| m.id == id)
    }

    /// The drone with `id`, or the first drone when the id is unknown.
    pub fn drone_or_first(&self, id: &str) -> &DroneDef {
        self.drone(id).unwrap_or(&self.drones[0])
    }

    /// The map with `id`, or the first map when the id is unknown.
    pub fn map_or_first(&self, id: &str) -> &MapDef {
        self.map(id).unwrap_or(&self.maps[0])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strikewing_common::{DroneType, Weapon};

    #[test]
    fn bundled_tables_parse() {
        let c = Catalog::bundled().unwrap();
        assert!(c.drones.len() >= 3);
        assert!(c.maps.len() >= 2);
        assert!(c.drones.iter().any(|d| d.kind == DroneType::Kamikaze));
        assert!(c.drones.iter().any(|d| d.weapon() == Weapon::Rocket));
        assert!(c.drones.iter().any(|d| d.cost == 0));
    }

    #[test]
    fn bundled_ids_are_unique() {
        let c = Catalog::bundled().unwrap();
        let mut ids: Vec<_> = c.drones.iter().map(|d| d.id.as_str()).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), c.drones.len());
    }

    #[test]
    fn unknown_id_falls_back_to_first() {
        let c = Catalog::bundled().unwrap();
        assert_eq!(c.drone_or_first("nope").id, c.drones[0].id);
        assert_eq!(c.map_or_first("nope").id, c.maps[0].id);
        assert_eq!(c.map_or_first("map2").id, "map2");
    }

    #[test]
    fn empty_table_is_rejected() {
        let err = Catalog::from_json("[]", BUNDLED_MAPS, BUNDLED_ECONOMY).unwrap_err();
        assert!(matches!(err, ContentError::Empty("drones")));
    }

    #[test]
    fn malformed_table_names_the_table() {
        let err = Catalog::from_json(BUNDLED_DRONES, "{", BUNDLED_ECONOMY).unwrap_err();
        assert!(err.to_string().contains("maps"));
    }

    #[test]
    fn load_overrides_only_present_files() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("maps.json"),
            r#"[{"id": "arena", "name": "Arena", "seed": 5, "theme": "docks"}]"#,
        )
        .unwrap();
        let c = Catalog::load(dir.path()).unwrap();
        assert_eq!(c.maps.len(), 1);
        assert_eq!(c.maps[0].cost, 0);
        assert_eq!(c.drones, Catalog::bundled().unwrap().drones);
    }

    #[test]
    fn load_reports_bad_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("economy.json"), "not json").unwrap();
        let err = Catalog::load(dir.path()).unwrap_err();
        assert!(matches!(err, ContentError::Json { table: "economy", .. }));
    }
}
