/// Deterministic 32-bit linear congruential generator.
///
/// `state = (state * 1664525 + 1013904223) mod 2^32`, output `state / 2^32`.
/// Every spawn decision in the kernel draws from this, in a fixed order, so
/// the same map seed and the same call sequence always reproduce the same run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lcg {
    state: u32,
}

impl Lcg {
    pub const MULTIPLIER: u32 = 1_664_525;
    pub const INCREMENT: u32 = 1_013_904_223;
    /// Mixed into the map seed so that small seeds do not start near zero.
    pub const SEED_MIX: u32 = 0x00A5_A5A5;

    pub fn new(state: u32) -> Self {
        Self { state }
    }

    /// Seed from a map definition's seed.
    pub fn from_map_seed(seed: u32) -> Self {
        Self::new(seed ^ Self::SEED_MIX)
    }

    pub fn state(&self) -> u32 {
        self.state
    }

    pub fn next_u32(&mut self) -> u32 {
        self.state = self
            .state
            .wrapping_mul(Self::MULTIPLIER)
            .wrapping_add(Self::INCREMENT);
        self.state
    }

    /// Uniform in `[0, 1)`.
    pub fn next_f64(&mut self) -> f64 {
        f64::from(self.next_u32()) / 4_294_967_296.0
    }

    /// Uniform in `[lo, hi)`.
    pub fn range(&mut self, lo: f64, hi: f64) -> f64 {
        lo + (hi - lo) * self.next_f64()
    }
}
