use crate::economy::EconomyConfig;
use crate::rng::Lcg;
use glam::{DQuat, DVec3};
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;
use strikewing_common::math;
use strikewing_common::{DroneDef, DroneType, EnemyKind, FlightMode, MapDef, Weapon};
use strikewing_input::InputSample;

/// Where the drone starts every session.
pub const SPAWN_POINT: DVec3 = DVec3::new(0.0, 4.0, -10.0);
/// Lowest altitude the drone can reach; the ground does not bounce.
pub const GROUND_ALTITUDE: f64 = 0.7;
pub const GRAVITY: f64 = 9.81;
pub const LINEAR_DRAG: f64 = 0.02;
pub const ANGULAR_DRAG: f64 = 0.02;

const DEG: f64 = PI / 180.0;

const ACRO_RESPONSE: f64 = 6.0;
const ANGLE_RESPONSE: f64 = 7.0;
const ANGLE_KP: f64 = 6.5;
const ANGLE_MAX_RATE: f64 = 6.0;
const ANGLE_MAX_TILT: f64 = 55.0 * DEG;

const HITSCAN_RANGE: f64 = 140.0;
const DEFAULT_BLAST: f64 = 6.0;
const KAMIKAZE_DAMAGE: f64 = 140.0;
/// Effectively "never again" for a spent kamikaze.
const KAMIKAZE_LOCKOUT: f64 = 999.0;
const ROCKET_REACH: f64 = 6.0;
const ROCKET_RADIUS: f64 = 6.0;
const ROCKET_DAMAGE: f64 = 95.0;
const ROCKET_COOLDOWN: f64 = 0.7;

const TIER_COINS: u64 = 800;
const MAX_TIER: u64 = 3;

/// Enemy ids are never reused within a session.
pub type EnemyId = u64;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Enemy {
    pub id: EnemyId,
    pub kind: EnemyKind,
    pub pos: DVec3,
    pub hp: f64,
}

fn spawn_hp(kind: EnemyKind) -> f64 {
    match kind {
        EnemyKind::Soldier => 60.0,
        EnemyKind::Car => 140.0,
        EnemyKind::Tank => 280.0,
    }
}

/// Radius of the cylinder around the enemy that a hit-scan ray must enter.
fn hit_radius(kind: EnemyKind) -> f64 {
    match kind {
        EnemyKind::Soldier => 1.0,
        EnemyKind::Car => 1.8,
        EnemyKind::Tank => 2.4,
    }
}

fn respawn_radius(kind: EnemyKind) -> f64 {
    match kind {
        EnemyKind::Soldier => 28.0,
        EnemyKind::Car => 34.0,
        EnemyKind::Tank => 40.0,
    }
}

fn weapon_damage(weapon: &Weapon) -> f64 {
    match weapon {
        Weapon::HeavyCannon => 34.0,
        Weapon::HeavyLaser => 24.0,
        Weapon::Laser => 18.0,
        Weapon::Smg => 14.0,
        Weapon::Burst => 16.0,
        Weapon::Rocket | Weapon::Other(_) => 10.0,
    }
}

fn weapon_cooldown(weapon: &Weapon) -> f64 {
    match weapon {
        Weapon::Smg => 0.06,
        Weapon::Laser => 0.12,
        _ => 0.09,
    }
}

/// Gameplay events, appended as they happen and drained by the host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum WorldEvent {
    /// A timed wave arrived.
    WaveSpawned { tier: u64, count: usize },
    /// A hit-scan weapon fired. `hit` is the damaged enemy, if any.
    ShotFired { hit: Option<EnemyId> },
    /// Area damage was applied (rocket or kamikaze).
    Exploded {
        center: DVec3,
        radius: f64,
        damage: f64,
    },
    /// An enemy died and was replaced.
    EnemyKilled {
        id: EnemyId,
        kind: EnemyKind,
        reward: u64,
    },
}

/// Flight and combat state for one play session.
///
/// Pose, enemies and weapon state are public so the renderer and HUD can
/// read them directly. Only `coins` may be written from outside (by the shop).
/// Every random decision goes through one seeded [`Lcg`]; two worlds built
/// from the same records and fed the same steps stay bit-identical.
#[derive(Debug, Clone)]
pub struct World {
    pub pos: DVec3,
    pub vel: DVec3,
    pub rot: DQuat,
    pub ang_vel: DVec3,

    pub coins: u64,
    pub drone: DroneDef,
    pub map: MapDef,
    pub mode: FlightMode,

    pub fire_cooldown: f64,
    pub kamikaze_armed: bool,

    pub enemies: Vec<Enemy>,

    economy: EconomyConfig,
    rng: Lcg,
    next_enemy_id: EnemyId,
    spawn_timer: f64,
    next_spawn_in: f64,
    tick: u64,
    events: Vec<WorldEvent>,
}

impl World {
    /// Start a session with the default economy tuning.
    pub fn new(drone: DroneDef, map: MapDef, mode: FlightMode) -> Self {
        Self::with_economy(drone, map, mode, EconomyConfig::default())
    }

    pub fn with_economy(
        drone: DroneDef,
        map: MapDef,
        mode: FlightMode,
        economy: EconomyConfig,
    ) -> Self {
        let rng = Lcg::from_map_seed(map.seed);
        // The first wave always waits the minimum interval; later ones are drawn.
        let next_spawn_in = economy.spawn.interval_min;
        let mut world = Self {
            pos: SPAWN_POINT,
            vel: DVec3::ZERO,
            rot: math::identity(),
            ang_vel: DVec3::ZERO,
            coins: 0,
            drone,
            map,
            mode,
            fire_cooldown: 0.0,
            kamikaze_armed: true,
            enemies: Vec::new(),
            economy,
            rng,
            next_enemy_id: 1,
            spawn_timer: 0.0,
            next_spawn_in,
            tick: 0,
            events: Vec::new(),
        };
        world.add_enemies(EnemyKind::Soldier, 10, 26.0);
        world.add_enemies(EnemyKind::Car, 3, 32.0);
        world.add_enemies(EnemyKind::Tank, 2, 36.0);
        tracing::debug!(
            drone = %world.drone.id,
            map = %world.map.id,
            mode = %world.mode,
            enemies = world.enemies.len(),
            "world created"
        );
        world
    }

    /// Number of completed steps.
    pub fn tick(&self) -> u64 {
        self.tick
    }

    pub fn economy(&self) -> &EconomyConfig {
        &self.economy
    }

    /// Seconds until the next wave.
    pub fn time_to_next_wave(&self) -> f64 {
        (self.next_spawn_in - self.spawn_timer).max(0.0)
    }

    /// Difficulty bucket gating wave composition.
    pub fn tier(&self) -> u64 {
        (1 + self.coins / TIER_COINS).min(MAX_TIER)
    }

    /// Read-only access to the event log.
    pub fn events(&self) -> &[WorldEvent] {
        &self.events
    }

    /// Drain and return the event log.
    pub fn drain_events(&mut self) -> Vec<WorldEvent> {
        std::mem::take(&mut self.events)
    }

    /// Drone-local up axis in world space.
    pub fn up(&self) -> DVec3 {
        math::rotate_vec3(self.rot, math::UP)
    }

    /// Drone-local forward axis in world space; also the weapon boresight.
    pub fn forward(&self) -> DVec3 {
        math::rotate_vec3(self.rot, math::FORWARD)
    }

    /// Advance the simulation by `dt` seconds. The host caps `dt`; nothing
    /// here sub-steps.
    pub fn step(&mut self, dt: f64, input: &InputSample) {
        self.advance_waves(dt);

        let throttle = math::clamp((input.left.y + 1.0) * 0.5, 0.0, 1.0);
        let yaw_cmd = input.left.x;
        let pitch_cmd = -input.right.y;
        let roll_cmd = input.right.x;

        let up = self.up();
        self.vel += up * (self.drone.thrust * throttle * dt);
        self.vel += DVec3::new(0.0, -GRAVITY * dt, 0.0);

        let (desired, response) = match self.mode {
            FlightMode::Acro => (self.acro_rates(pitch_cmd, yaw_cmd, roll_cmd), ACRO_RESPONSE),
            FlightMode::Angle => (
                self.angle_rates(up, pitch_cmd, yaw_cmd, roll_cmd),
                ANGLE_RESPONSE,
            ),
        };
        // First-order lag toward the commanded rate (motor/ESC response).
        self.ang_vel += (desired - self.ang_vel) * (response * dt);

        self.integrate_rotation(dt);

        self.vel += self.vel * -LINEAR_DRAG;
        self.ang_vel += self.ang_vel * -ANGULAR_DRAG;
        self.pos += self.vel * dt;

        if self.pos.y < GROUND_ALTITUDE {
            self.pos.y = GROUND_ALTITUDE;
            self.vel.y = self.vel.y.max(0.0);
        }

        self.fire_cooldown = (self.fire_cooldown - dt).max(0.0);
        if input.fire {
            self.fire();
        }
        self.tick += 1;
    }

    fn acro_rates(&self, pitch_cmd: f64, yaw_cmd: f64, roll_cmd: f64) -> DVec3 {
        let rates = self.drone.rates;
        DVec3::new(
            pitch_cmd * rates.pitch * DEG,
            yaw_cmd * rates.yaw * DEG,
            -roll_cmd * rates.roll * DEG,
        )
    }

    fn angle_rates(&self, up: DVec3, pitch_cmd: f64, yaw_cmd: f64, roll_cmd: f64) -> DVec3 {
        let target_pitch = math::clamp(pitch_cmd * ANGLE_MAX_TILT, -ANGLE_MAX_TILT, ANGLE_MAX_TILT);
        let target_roll = math::clamp(-roll_cmd * ANGLE_MAX_TILT, -ANGLE_MAX_TILT, ANGLE_MAX_TILT);

        // Measured in the same sense as the body-rate axes: a positive pitch
        // rate raises `cur_pitch`, a positive roll rate raises `cur_roll`.
        let cur_roll = math::clamp(-up.x, -1.0, 1.0).asin();
        let cur_pitch = math::clamp(up.z, -1.0, 1.0).asin();

        let pitch_rate = math::clamp(
            (target_pitch - cur_pitch) * ANGLE_KP,
            -ANGLE_MAX_RATE,
            ANGLE_MAX_RATE,
        );
        let roll_rate = math::clamp(
            (target_roll - cur_roll) * ANGLE_KP,
            -ANGLE_MAX_RATE,
            ANGLE_MAX_RATE,
        );
        let yaw_rate = yaw_cmd * (self.drone.rates.yaw * DEG);
        DVec3::new(pitch_rate, yaw_rate, roll_rate)
    }

    /// `rot += 0.5 * (rot ⊗ ω) * dt`, then renormalize. First-order on purpose:
    /// the flight feel is tuned against this integrator.
    fn integrate_rotation(&mut self, dt: f64) {
        let w = DQuat::from_xyzw(self.ang_vel.x, self.ang_vel.y, self.ang_vel.z, 0.0);
        let dq = math::mul(self.rot, w);
        let r = self.rot;
        self.rot = math::norm(DQuat::from_xyzw(
            r.x + 0.5 * dq.x * dt,
            r.y + 0.5 * dq.y * dt,
            r.z + 0.5 * dq.z * dt,
            r.w + 0.5 * dq.w * dt,
        ));
    }

    fn advance_waves(&mut self, dt: f64) {
        self.spawn_timer += dt;
        if self.spawn_timer < self.next_spawn_in {
            return;
        }
        self.spawn_timer = 0.0;
        let spawn = self.economy.spawn;
        self.next_spawn_in = self.rng.range(spawn.interval_min, spawn.interval_max);

        let tier = self.tier();
        let before = self.enemies.len();
        self.add_enemies(EnemyKind::Soldier, 2 + tier as usize, 28.0 + tier as f64 * 2.0);
        if tier >= 2 {
            self.add_enemies(EnemyKind::Car, 1, respawn_radius(EnemyKind::Car));
        }
        if tier >= 3 {
            self.add_enemies(EnemyKind::Tank, 1, respawn_radius(EnemyKind::Tank));
        }
        let count = self.enemies.len() - before;
        tracing::debug!(tier, count, next_in = self.next_spawn_in, "wave spawned");
        self.events.push(WorldEvent::WaveSpawned { tier, count });
    }

    /// Scatter `n` enemies of `kind` uniformly in angle and distance within `radius`
    /// of the origin, on the ground plane.
    fn add_enemies(&mut self, kind: EnemyKind, n: usize, radius: f64) {
        for _ in 0..n {
            let a = self.rng.next_f64() * PI * 2.0;
            let d = self.rng.next_f64() * radius;
            let pos = DVec3::new(a.cos() * d, 0.0, a.sin() * d);
            self.push_enemy(kind, pos);
        }
    }

    fn push_enemy(&mut self, kind: EnemyKind, pos: DVec3) -> EnemyId {
        let id = self.next_enemy_id;
        self.next_enemy_id += 1;
        self.enemies.push(Enemy {
            id,
            kind,
            pos,
            hp: spawn_hp(kind),
        });
        id
    }

    /// Place one enemy at an exact position, with full health and a fresh id.
    /// Draws nothing from the RNG.
    pub fn spawn_enemy_at(&mut self, kind: EnemyKind, pos: DVec3) -> EnemyId {
        self.push_enemy(kind, pos)
    }

    pub fn enemy(&self, id: EnemyId) -> Option<&Enemy> {
        self.enemies.iter().find(|e| e.id == id)
    }

    /// Trigger the weapon. A no-op while cooling down or once a kamikaze is spent.
    pub fn fire(&mut self) {
        if self.fire_cooldown > 0.0 {
            return;
        }

        if self.drone.kind == DroneType::Kamikaze {
            if !self.kamikaze_armed {
                return;
            }
            let radius = self.drone.blast.unwrap_or(DEFAULT_BLAST);
            tracing::debug!(radius, "kamikaze detonated");
            self.explode(self.pos, radius, KAMIKAZE_DAMAGE);
            self.kamikaze_armed = false;
            self.fire_cooldown = KAMIKAZE_LOCKOUT;
            return;
        }

        let weapon = self.drone.weapon();
        let dir = self.forward();

        if weapon == Weapon::Rocket {
            let at = self.pos + dir * ROCKET_REACH;
            self.explode(at, ROCKET_RADIUS, ROCKET_DAMAGE);
            self.fire_cooldown = ROCKET_COOLDOWN;
            return;
        }

        let hit = self.hitscan(dir);
        if let Some(id) = hit {
            let damage = weapon_damage(&weapon);
            let dead = self
                .enemies
                .iter_mut()
                .find(|e| e.id == id)
                .map(|e| {
                    e.hp -= damage;
                    e.hp <= 0.0
                })
                .unwrap_or(false);
            if dead {
                self.kill(id);
            }
        }
        tracing::trace!(weapon = %self.drone.weapon, ?hit, "shot fired");
        self.events.push(WorldEvent::ShotFired { hit });
        self.fire_cooldown = weapon_cooldown(&weapon);
    }

    /// Closest enemy along the ray from the drone in `dir`, within range and
    /// inside its kind's hit cylinder. Ties keep the earlier enemy.
    fn hitscan(&self, dir: DVec3) -> Option<EnemyId> {
        let mut best: Option<(EnemyId, f64)> = None;
        for e in &self.enemies {
            let to = e.pos - self.pos;
            let t = to.dot(dir);
            if !(0.0..=HITSCAN_RANGE).contains(&t) {
                continue;
            }
            let miss = math::len(to - dir * t);
            if miss < hit_radius(e.kind) && best.is_none_or(|(_, best_t)| t < best_t) {
                best = Some((e.id, t));
            }
        }
        best.map(|(id, _)| id)
    }

    /// Apply `damage * (1 - d / radius)` to every enemy strictly inside
    /// `radius` of `center`. Works over a snapshot of ids, so replacements
    /// spawned by kills during the sweep are not hit.
    pub fn explode(&mut self, center: DVec3, radius: f64, damage: f64) {
        self.events.push(WorldEvent::Exploded {
            center,
            radius,
            damage,
        });
        let snapshot: Vec<EnemyId> = self.enemies.iter().map(|e| e.id).collect();
        for id in snapshot {
            let Some(e) = self.enemies.iter_mut().find(|e| e.id == id) else {
                continue;
            };
            let d = math::len(e.pos - center);
            if d < radius {
                e.hp -= damage * (1.0 - d / radius);
                if e.hp <= 0.0 {
                    self.kill(id);
                }
            }
        }
    }

    /// Remove an enemy, credit its reward and spawn exactly one replacement,
    /// so the population never shrinks. Unknown ids are ignored.
    pub fn kill(&mut self, id: EnemyId) -> Option<Enemy> {
        let index = self.enemies.iter().position(|e| e.id == id)?;
        let enemy = self.enemies.remove(index);
        let reward = self.economy.reward(enemy.kind);
        self.coins += reward;

        let kind = if self.rng.next_f64() < 0.7 {
            EnemyKind::Soldier
        } else if self.rng.next_f64() < 0.7 {
            EnemyKind::Car
        } else {
            EnemyKind::Tank
        };
        self.add_enemies(kind, 1, respawn_radius(kind));

        tracing::debug!(id, kind = %enemy.kind, reward, coins = self.coins, "enemy killed");
        self.events.push(WorldEvent::EnemyKilled {
            id,
            kind: enemy.kind,
            reward,
        });
        Some(enemy)
    }

    /// Deterministic FNV-1a hash over tick, coins, pose and every enemy in list
    /// order. Equal hashes mean bit-identical simulation state.
    pub fn state_hash(&self) -> u64 {
        let mut h: u64 = 0xcbf2_9ce4_8422_2325; // FNV offset basis
        let mix = |h: &mut u64, bytes: &[u8]| {
            for &b in bytes {
                *h ^= b as u64;
                *h = h.wrapping_mul(0x0100_0000_01b3);
            }
        };
        let mix_f64 = |h: &mut u64, v: f64| mix(h, &v.to_bits().to_le_bytes());

        mix(&mut h, &self.tick.to_le_bytes());
        mix(&mut h, &self.coins.to_le_bytes());
        for v in [self.pos, self.vel, self.ang_vel] {
            mix_f64(&mut h, v.x);
            mix_f64(&mut h, v.y);
            mix_f64(&mut h, v.z);
        }
        for c in [self.rot.x, self.rot.y, self.rot.z, self.rot.w] {
            mix_f64(&mut h, c);
        }
        mix_f64(&mut h, self.fire_cooldown);
        for e in &self.enemies {
            mix(&mut h, &e.id.to_le_bytes());
            mix(&mut h, e.kind.as_str().as_bytes());
            mix_f64(&mut h, e.pos.x);
            mix_f64(&mut h, e.pos.y);
            mix_f64(&mut h, e.pos.z);
            mix_f64(&mut h, e.hp);
        }
        h
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strikewing_common::Rates;
    use strikewing_input::StickState;

    fn drone(kind: DroneType, weapon: &str) -> DroneDef {
        DroneDef {
            id: "test_drone".into(),
            name: "Test Drone".into(),
            kind,
            weapon: weapon.into(),
            thrust: 9.5,
            rates: Rates {
                roll: 300.0,
                pitch: 300.0,
                yaw: 200.0,
            },
            blast: None,
            cost: 0,
        }
    }

    fn map(seed: u32) -> MapDef {
        MapDef {
            id: "test_map".into(),
            name: "Test Map".into(),
            cost: 0,
            seed,
            theme: "city".into(),
        }
    }

    fn laser_world() -> World {
        World::new(drone(DroneType::Dji, "laser"), map(42), FlightMode::Acro)
    }

    fn world_with(kind: DroneType, weapon: &str) -> World {
        let mut w = World::new(drone(kind, weapon), map(42), FlightMode::Acro);
        w.enemies.clear();
        w
    }

    fn stick(x: f64, y: f64) -> StickState {
        StickState {
            x,
            y,
            active: true,
        }
    }

    fn quat_len(q: DQuat) -> f64 {
        (q.x * q.x + q.y * q.y + q.z * q.z + q.w * q.w).sqrt()
    }

    #[test]
    fn initial_population() {
        let w = laser_world();
        assert_eq!(w.enemies.len(), 15);
        let count = |k| w.enemies.iter().filter(|e| e.kind == k).count();
        assert_eq!(count(EnemyKind::Soldier), 10);
        assert_eq!(count(EnemyKind::Car), 3);
        assert_eq!(count(EnemyKind::Tank), 2);
        assert_eq!(w.pos, SPAWN_POINT);
        assert_eq!(w.coins, 0);
        for (i, e) in w.enemies.iter().enumerate() {
            assert_eq!(e.id, i as u64 + 1);
            assert_eq!(e.pos.y, 0.0);
        }
    }

    #[test]
    fn initial_spawn_radii_by_kind() {
        let w = laser_world();
        for e in &w.enemies {
            let r = e.pos.x.hypot(e.pos.z);
            let max = match e.kind {
                EnemyKind::Soldier => 26.0,
                EnemyKind::Car => 32.0,
                EnemyKind::Tank => 36.0,
            };
            assert!(r <= max + 1e-9, "{:?} at {r}", e.kind);
        }
    }

    #[test]
    fn rotation_stays_unit_for_any_input() {
        for mode in [FlightMode::Acro, FlightMode::Angle] {
            let mut w = World::new(drone(DroneType::Armed, "smg"), map(5), mode);
            for i in 0..600 {
                let f = i as f64 * 0.37;
                let input = InputSample {
                    left: stick(f.sin(), f.cos()),
                    right: stick((f * 1.3).cos(), (f * 0.7).sin()),
                    fire: i % 3 == 0,
                    pause: false,
                };
                let dt = [0.0, 0.001, 0.016, 0.033, 0.25][i % 5];
                w.step(dt, &input);
                assert!((quat_len(w.rot) - 1.0).abs() < 1e-5);
            }
        }
    }

    #[test]
    fn kill_conserves_population() {
        let mut w = laser_world();
        for _ in 0..40 {
            let before = w.enemies.len();
            let id = w.enemies[0].id;
            assert!(w.kill(id).is_some());
            assert_eq!(w.enemies.len(), before);
            assert!(w.enemy(id).is_none());
        }
    }

    #[test]
    fn kill_unknown_id_is_noop() {
        let mut w = laser_world();
        let before = w.state_hash();
        assert!(w.kill(9_999).is_none());
        assert_eq!(w.state_hash(), before);
        assert_eq!(w.coins, 0);
    }

    #[test]
    fn enemy_ids_stay_unique() {
        let mut w = laser_world();
        for _ in 0..30 {
            let id = w.enemies[w.enemies.len() / 2].id;
            w.kill(id);
        }
        w.step(10.0, &InputSample::idle());
        let mut ids: Vec<_> = w.enemies.iter().map(|e| e.id).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), w.enemies.len());
    }

    #[test]
    fn kill_credits_reward() {
        let mut w = laser_world();
        let tank = w
            .enemies
            .iter()
            .find(|e| e.kind == EnemyKind::Tank)
            .map(|e| e.id)
            .unwrap();
        w.kill(tank);
        assert_eq!(w.coins, EconomyConfig::default().reward(EnemyKind::Tank));
        assert!(matches!(
            w.events().last(),
            Some(WorldEvent::EnemyKilled {
                kind: EnemyKind::Tank,
                ..
            })
        ));
    }

    #[test]
    fn identical_runs_are_bit_identical() {
        let mut a = laser_world();
        let mut b = laser_world();
        assert_eq!(a.state_hash(), b.state_hash());
        for i in 0..900 {
            let f = i as f64 * 0.05;
            let input = InputSample {
                left: stick(f.sin() * 0.4, 0.6),
                right: stick(f.cos() * 0.3, -0.2),
                fire: i % 2 == 0,
                pause: false,
            };
            a.step(0.033, &input);
            b.step(0.033, &input);
            if i % 100 == 0 {
                a.explode(DVec3::ZERO, 12.0, 80.0);
                b.explode(DVec3::ZERO, 12.0, 80.0);
            }
            assert_eq!(a.pos, b.pos);
            assert_eq!(a.rot, b.rot);
            assert_eq!(a.coins, b.coins);
            assert_eq!(a.enemies, b.enemies);
        }
        assert_eq!(a.state_hash(), b.state_hash());
        assert!(a.coins > 0);
    }

    #[test]
    fn different_seeds_diverge() {
        let a = World::new(drone(DroneType::Dji, "laser"), map(1), FlightMode::Acro);
        let b = World::new(drone(DroneType::Dji, "laser"), map(2), FlightMode::Acro);
        assert_ne!(a.enemies, b.enemies);
    }

    #[test]
    fn ground_clamp_stops_descent() {
        let mut w = laser_world();
        w.vel = DVec3::new(0.0, -500.0, 0.0);
        for _ in 0..20 {
            w.step(0.033, &InputSample::idle());
            assert!(w.pos.y >= GROUND_ALTITUDE);
            if w.pos.y == GROUND_ALTITUDE {
                assert!(w.vel.y >= 0.0);
            }
        }
        assert_eq!(w.pos.y, GROUND_ALTITUDE);
    }

    #[test]
    fn full_throttle_climbs() {
        let mut w = laser_world();
        w.drone.thrust = 20.0;
        let input = InputSample {
            left: stick(0.0, 1.0),
            ..InputSample::default()
        };
        for _ in 0..30 {
            w.step(0.033, &input);
        }
        assert!(w.pos.y > SPAWN_POINT.y);
    }

    #[test]
    fn acro_roll_command_is_negated() {
        let mut w = laser_world();
        let input = InputSample {
            right: stick(1.0, 0.0),
            left: stick(0.0, 0.0),
            ..InputSample::default()
        };
        w.step(0.016, &input);
        assert!(w.ang_vel.z < 0.0);
        assert_eq!(w.ang_vel.x, 0.0);
    }

    #[test]
    fn angle_mode_self_levels() {
        let mut w = World::new(drone(DroneType::Dji, "laser"), map(42), FlightMode::Angle);
        w.rot = DQuat::from_rotation_z(0.4);
        for _ in 0..300 {
            w.step(0.016, &InputSample::idle());
        }
        let up = w.up();
        assert!(up.y > 0.999, "up = {up:?}");
    }

    #[test]
    fn angle_mode_holds_commanded_tilt() {
        let mut w = World::new(drone(DroneType::Dji, "laser"), map(42), FlightMode::Angle);
        let input = InputSample {
            right: stick(0.0, -1.0),
            ..InputSample::default()
        };
        for _ in 0..400 {
            w.step(0.016, &input);
        }
        let pitch = w.up().z.asin();
        assert!(pitch > 50.0 * DEG, "pitch = {pitch}");
        assert!(pitch < ANGLE_MAX_TILT + 0.05);
    }

    #[test]
    fn laser_miss_scenario() {
        let mut w = laser_world();
        let hp_before: Vec<f64> = w.enemies.iter().map(|e| e.hp).collect();
        w.fire();
        let hp_after: Vec<f64> = w.enemies.iter().map(|e| e.hp).collect();
        assert_eq!(hp_before, hp_after);
        assert_eq!(w.fire_cooldown, 0.12);
        assert_eq!(w.events().last(), Some(&WorldEvent::ShotFired { hit: None }));
    }

    #[test]
    fn hitscan_prefers_closer_enemy() {
        let mut w = world_with(DroneType::Dji, "laser");
        let far = w.spawn_enemy_at(EnemyKind::Soldier, DVec3::new(0.0, 4.0, 10.0));
        let near = w.spawn_enemy_at(EnemyKind::Soldier, DVec3::new(0.3, 4.0, 0.0));
        w.fire();
        assert_eq!(w.enemy(near).unwrap().hp, 60.0 - 18.0);
        assert_eq!(w.enemy(far).unwrap().hp, 60.0);
    }

    #[test]
    fn hitscan_respects_hit_radius_and_range() {
        let mut w = world_with(DroneType::Armed, "heavy_cannon");
        // 1.5 off-axis: outside a soldier, inside a car.
        let soldier = w.spawn_enemy_at(EnemyKind::Soldier, DVec3::new(1.5, 4.0, 0.0));
        let car = w.spawn_enemy_at(EnemyKind::Car, DVec3::new(1.5, 4.0, 5.0));
        let behind = w.spawn_enemy_at(EnemyKind::Tank, DVec3::new(0.0, 4.0, -20.0));
        let beyond = w.spawn_enemy_at(EnemyKind::Tank, DVec3::new(0.0, 4.0, 140.0));
        w.fire();
        assert_eq!(w.enemy(soldier).unwrap().hp, 60.0);
        assert_eq!(w.enemy(car).unwrap().hp, 140.0 - 34.0);
        assert_eq!(w.enemy(behind).unwrap().hp, 280.0);
        assert_eq!(w.enemy(beyond).unwrap().hp, 280.0);
    }

    #[test]
    fn hitscan_range_ends_are_inclusive() {
        let mut w = world_with(DroneType::Armed, "heavy_cannon");
        let edge = w.spawn_enemy_at(EnemyKind::Soldier, w.pos + DVec3::Z * 140.0);
        w.fire();
        assert_eq!(w.enemy(edge).unwrap().hp, 60.0 - 34.0);

        let mut w = world_with(DroneType::Armed, "heavy_cannon");
        let point_blank = w.spawn_enemy_at(EnemyKind::Soldier, w.pos);
        w.fire();
        assert_eq!(w.enemy(point_blank).unwrap().hp, 60.0 - 34.0);
    }

    #[test]
    fn hitscan_kill_replaces_enemy() {
        let mut w = world_with(DroneType::Armed, "smg");
        let target = w.spawn_enemy_at(EnemyKind::Soldier, DVec3::new(0.0, 4.0, 0.0));
        w.enemies[0].hp = 10.0;
        w.fire();
        assert!(w.enemy(target).is_none());
        assert_eq!(w.enemies.len(), 1);
        assert_eq!(w.coins, EconomyConfig::default().reward(EnemyKind::Soldier));
        assert_eq!(w.fire_cooldown, 0.06);
    }

    #[test]
    fn unknown_weapon_uses_defaults() {
        let mut w = world_with(DroneType::Armed, "plasma_lance");
        let id = w.spawn_enemy_at(EnemyKind::Tank, DVec3::new(0.0, 4.0, 0.0));
        w.fire();
        assert_eq!(w.enemy(id).unwrap().hp, 270.0);
        assert_eq!(w.fire_cooldown, 0.09);
    }

    #[test]
    fn cooldown_blocks_and_decays() {
        let mut w = world_with(DroneType::Dji, "laser");
        let id = w.spawn_enemy_at(EnemyKind::Tank, DVec3::new(0.0, 4.0, 0.0));
        w.fire();
        w.fire();
        assert_eq!(w.enemy(id).unwrap().hp, 280.0 - 18.0);

        let firing = InputSample {
            fire: true,
            ..InputSample::default()
        };
        let mut prev = w.fire_cooldown;
        for _ in 0..50 {
            w.step(0.01, &firing);
            assert!(w.fire_cooldown >= 0.0);
            let hp = w.enemy(id).map(|e| e.hp);
            // Either it decayed, or a fresh shot reset it to the full cooldown.
            assert!(w.fire_cooldown <= prev || w.fire_cooldown == 0.12, "{hp:?}");
            prev = w.fire_cooldown;
        }
    }

    #[test]
    fn rocket_explodes_ahead() {
        let mut w = world_with(DroneType::Armed, "rocket");
        let ahead = w.spawn_enemy_at(EnemyKind::Tank, DVec3::new(0.0, 4.0, -4.0));
        let behind = w.spawn_enemy_at(EnemyKind::Tank, DVec3::new(0.0, 4.0, -16.0));
        w.fire();
        assert_eq!(w.enemy(ahead).unwrap().hp, 280.0 - 95.0);
        assert_eq!(w.enemy(behind).unwrap().hp, 280.0);
        assert_eq!(w.fire_cooldown, 0.7);
    }

    #[test]
    fn kamikaze_detonates_once() {
        let mut w = world_with(DroneType::Kamikaze, "warhead");
        w.drone.blast = Some(8.0);
        let id = w.spawn_enemy_at(EnemyKind::Tank, w.pos + DVec3::new(4.0, 0.0, 0.0));
        w.fire();
        w.fire_cooldown = 0.0;
        w.fire();
        let explosions = w
            .events()
            .iter()
            .filter(|e| matches!(e, WorldEvent::Exploded { .. }))
            .count();
        assert_eq!(explosions, 1);
        assert!(!w.kamikaze_armed);
        assert_eq!(w.enemy(id).unwrap().hp, 280.0 - 140.0 * 0.5);
    }

    #[test]
    fn kamikaze_sets_lockout() {
        let mut w = world_with(DroneType::Kamikaze, "warhead");
        w.fire();
        assert_eq!(w.fire_cooldown, KAMIKAZE_LOCKOUT);
        let firing = InputSample {
            fire: true,
            ..InputSample::default()
        };
        w.step(0.033, &firing);
        assert!(w.fire_cooldown < KAMIKAZE_LOCKOUT);
    }

    #[test]
    fn explode_linear_falloff() {
        let mut w = laser_world();
        w.enemies.clear();
        let id = w.spawn_enemy_at(EnemyKind::Tank, DVec3::new(3.0, 0.0, 4.0));
        w.explode(DVec3::ZERO, 10.0, 100.0);
        assert_eq!(w.enemy(id).unwrap().hp, 280.0 - 50.0);
    }

    #[test]
    fn explode_kills_and_skips_replacements() {
        let mut w = laser_world();
        w.enemies.clear();
        for _ in 0..5 {
            w.spawn_enemy_at(EnemyKind::Soldier, DVec3::new(0.5, 0.0, 0.0));
        }
        w.explode(DVec3::ZERO, 100.0, 1_000.0);
        assert_eq!(w.enemies.len(), 5);
        assert!(w.enemies.iter().all(|e| e.hp == spawn_hp(e.kind)));
        assert_eq!(w.coins, 5 * EconomyConfig::default().reward(EnemyKind::Soldier));
    }

    #[test]
    fn explode_edge_is_exclusive() {
        let mut w = laser_world();
        w.enemies.clear();
        let id = w.spawn_enemy_at(EnemyKind::Car, DVec3::new(10.0, 0.0, 0.0));
        w.explode(DVec3::ZERO, 10.0, 100.0);
        assert_eq!(w.enemy(id).unwrap().hp, 140.0);
    }

    #[test]
    fn first_wave_after_minimum_interval() {
        let mut w = laser_world();
        let min = w.economy().spawn.interval_min;
        w.step(min - 0.01, &InputSample::idle());
        assert_eq!(w.enemies.len(), 15);
        w.step(0.02, &InputSample::idle());
        // Tier 1: three soldiers.
        assert_eq!(w.enemies.len(), 18);
        assert!(w.events().contains(&WorldEvent::WaveSpawned { tier: 1, count: 3 }));
    }

    #[test]
    fn wave_composition_scales_with_tier() {
        let mut w = laser_world();
        w.coins = 5_000;
        assert_eq!(w.tier(), 3);
        let min = w.economy().spawn.interval_min;
        w.step(min, &InputSample::idle());
        let added: Vec<_> = w.enemies[15..].iter().map(|e| e.kind).collect();
        assert_eq!(added.len(), 7);
        assert_eq!(added.iter().filter(|k| **k == EnemyKind::Soldier).count(), 5);
        assert_eq!(added[5], EnemyKind::Car);
        assert_eq!(added[6], EnemyKind::Tank);
        let interval = w.time_to_next_wave();
        let spawn = w.economy().spawn;
        assert!(interval >= spawn.interval_min && interval < spawn.interval_max);
    }

    #[test]
    fn tier_buckets() {
        let mut w = laser_world();
        assert_eq!(w.tier(), 1);
        w.coins = 800;
        assert_eq!(w.tier(), 2);
        w.coins = 1_599;
        assert_eq!(w.tier(), 2);
        w.coins = 1_000_000;
        assert_eq!(w.tier(), 3);
    }

    #[test]
    fn drain_events_clears_log() {
        let mut w = laser_world();
        w.fire();
        assert_eq!(w.drain_events().len(), 1);
        assert!(w.events().is_empty());
    }

    #[test]
    fn step_increments_tick() {
        let mut w = laser_world();
        w.step(0.016, &InputSample::idle());
        w.step(0.016, &InputSample::idle());
        assert_eq!(w.tick(), 2);
    }
}
