/// Battle configuration constants and tunable parameters.
///
/// A battle carries its configuration inside the resume blob, so a fight that
/// is suspended and reloaded keeps the rules it started with.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct BattleConfig {
    /// Probability that the player lands a critical hit each round.
    pub critical_hit_chance: f64,
    /// Factor applied to the player's attack on a critical hit.
    pub critical_hit_multiplier: f64,
    /// Factor applied to negative (riposte) damage.
    pub riposte_factor: f64,
    /// Upper bound on re-rolls of a double-miss exchange before the miss stands.
    pub max_exchange_rerolls: u32,
    /// Upper bound on rejected draws in a bounded-normal sample.
    pub max_normal_draws: u32,
}

impl BattleConfig {
    // ===== runtime-tunable defaults =====
    /// One round in four opens with a critical hit.
    pub const DEFAULT_CRITICAL_HIT_CHANCE: f64 = 0.25;
    /// A plain critical hit narrates as a "power move".
    pub const DEFAULT_CRITICAL_HIT_MULTIPLIER: f64 = 3.0;
    /// A riposte deals half of the raw difference.
    pub const DEFAULT_RIPOSTE_FACTOR: f64 = 0.5;
    /// Only fighters with no attack at all exhaust this in practice.
    pub const DEFAULT_MAX_EXCHANGE_REROLLS: u32 = 1_000;
    pub const DEFAULT_MAX_NORMAL_DRAWS: u32 = crate::rng::DEFAULT_MAX_NORMAL_DRAWS;

    /// Configuration with every default above.
    pub fn new() -> Self {
        Self {
            critical_hit_chance: Self::DEFAULT_CRITICAL_HIT_CHANCE,
            critical_hit_multiplier: Self::DEFAULT_CRITICAL_HIT_MULTIPLIER,
            riposte_factor: Self::DEFAULT_RIPOSTE_FACTOR,
            max_exchange_rerolls: Self::DEFAULT_MAX_EXCHANGE_REROLLS,
            max_normal_draws: Self::DEFAULT_MAX_NORMAL_DRAWS,
        }
    }

    /// Overrides the critical-hit probability, clamped to `[0, 1]`.
    pub fn with_critical_hit_chance(mut self, chance: f64) -> Self {
        self.critical_hit_chance = chance.clamp(0.0, 1.0);
        self
    }
}

impl Default for BattleConfig {
    fn default() -> Self {
        Self::new()
    }
}
