use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Airframe class. Decides how `fire` resolves before the weapon id is consulted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DroneType {
    Armed,
    Kamikaze,
    Dji,
}

/// Maximum body rates in degrees per second.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rates {
    pub roll: f64,
    pub pitch: f64,
    pub yaw: f64,
}

/// Immutable drone reference record, selected before a session starts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DroneDef {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: DroneType,
    pub weapon: String,
    pub thrust: f64,
    pub rates: Rates,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blast: Option<f64>,
    #[serde(default)]
    pub cost: u64,
}

impl DroneDef {
    pub fn weapon(&self) -> Weapon {
        Weapon::from(self.weapon.as_str())
    }
}

/// Immutable map reference record. `seed` drives both layout and enemy placement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapDef {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub cost: u64,
    pub seed: u32,
    pub theme: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EnemyKind {
    Soldier,
    Car,
    Tank,
}

impl EnemyKind {
    pub const ALL: [EnemyKind; 3] = [EnemyKind::Soldier, EnemyKind::Car, EnemyKind::Tank];

    pub fn as_str(self) -> &'static str {
        match self {
            EnemyKind::Soldier => "soldier",
            EnemyKind::Car => "car",
            EnemyKind::Tank => "tank",
        }
    }
}

impl fmt::Display for EnemyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Flight control law, fixed for a session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlightMode {
    /// Sticks command body rates.
    #[default]
    Acro,
    /// Sticks command a tilt angle; an inner loop computes the rate.
    Angle,
}

impl FlightMode {
    pub fn as_str(self) -> &'static str {
        match self {
            FlightMode::Acro => "acro",
            FlightMode::Angle => "angle",
        }
    }
}

impl fmt::Display for FlightMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown flight mode `{0}` (expected `acro` or `angle`)")]
pub struct ParseModeError(pub String);

impl FromStr for FlightMode {
    type Err = ParseModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "acro" => Ok(FlightMode::Acro),
            "angle" => Ok(FlightMode::Angle),
            _ => Err(ParseModeError(s.to_string())),
        }
    }
}

/// Weapon ids understood by fire control. Anything else is `Other` and gets
/// the default damage and cooldown, so new content never breaks the kernel.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Weapon {
    Rocket,
    HeavyCannon,
    HeavyLaser,
    Laser,
    Smg,
    Burst,
    Other(String),
}

impl From<&str> for Weapon {
    fn from(id: &str) -> Self {
        match id {
            "rocket" => Weapon::Rocket,
            "heavy_cannon" => Weapon::HeavyCannon,
            "heavy_laser" => Weapon::HeavyLaser,
            "laser" => Weapon::Laser,
            "smg" => Weapon::Smg,
            "burst" => Weapon::Burst,
            other => Weapon::Other(other.to_string()),
        }
    }
}
