/// Simulation tuning constants and tunable parameters.
///
/// All rates are expressed per simulated second so that a tick of any size
/// produces the same outcome as several smaller ticks.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SimConfig {
    /// Pixels per second moved at walk speed 1.
    pub base_speed: f32,
    /// Speed multiplier applied while running (walk speed is ignored).
    pub run_speed_fold: f32,
    /// Speed multiplier applied while jumping.
    pub jump_speed_fold: f32,
    /// Multiplier of walk speed used by fixed-line (flying) movement.
    pub fixed_line_speed_fold: f32,
    /// Seconds without a combat action before the fighting flag clears.
    pub max_non_fight_seconds: f32,
    /// Accumulated poison time that triggers one damage application.
    pub poison_interval_seconds: f32,
    /// Life lost per poison interval.
    pub poison_damage: i32,
    /// One in `stand_variant_odds` standing transitions picks the idle variant.
    pub stand_variant_odds: u32,
    /// Pixels per second squared removed from a knockback's velocity.
    pub knockback_friction: f32,
    /// Thew spent by a player each time an attack completes.
    pub player_attack_thew_cost: i32,
    /// Base seed mixed into every deterministic roll.
    pub game_seed: u64,
}

impl SimConfig {
    // ===== compile-time constants =====
    /// Edge length of a square map tile in pixels.
    pub const TILE_SIZE: f32 = 32.0;
    /// Tolerance used when deciding whether a waypoint has been reached.
    pub const DISTANCE_EPSILON: f32 = 0.001;
    /// Maximum number of entries kept in a character's ability table.
    pub const MAX_ABILITIES: usize = 16;

    // ===== runtime-tunable defaults =====
    pub const DEFAULT_BASE_SPEED: f32 = 100.0;
    pub const DEFAULT_RUN_SPEED_FOLD: f32 = 8.0;
    pub const DEFAULT_JUMP_SPEED_FOLD: f32 = 8.0;
    pub const DEFAULT_FIXED_LINE_SPEED_FOLD: f32 = 2.0;
    pub const DEFAULT_MAX_NON_FIGHT_SECONDS: f32 = 7.0;
    pub const DEFAULT_POISON_INTERVAL_SECONDS: f32 = 0.25;
    pub const DEFAULT_POISON_DAMAGE: i32 = 10;
    pub const DEFAULT_STAND_VARIANT_ODDS: u32 = 4;
    pub const DEFAULT_KNOCKBACK_FRICTION: f32 = 400.0;
    pub const DEFAULT_PLAYER_ATTACK_THEW_COST: i32 = 5;

    pub fn new() -> Self {
        Self {
            base_speed: Self::DEFAULT_BASE_SPEED,
            run_speed_fold: Self::DEFAULT_RUN_SPEED_FOLD,
            jump_speed_fold: Self::DEFAULT_JUMP_SPEED_FOLD,
            fixed_line_speed_fold: Self::DEFAULT_FIXED_LINE_SPEED_FOLD,
            max_non_fight_seconds: Self::DEFAULT_MAX_NON_FIGHT_SECONDS,
            poison_interval_seconds: Self::DEFAULT_POISON_INTERVAL_SECONDS,
            poison_damage: Self::DEFAULT_POISON_DAMAGE,
            stand_variant_odds: Self::DEFAULT_STAND_VARIANT_ODDS,
            knockback_friction: Self::DEFAULT_KNOCKBACK_FRICTION,
            player_attack_thew_cost: Self::DEFAULT_PLAYER_ATTACK_THEW_COST,
            game_seed: 0,
        }
    }

    pub fn with_seed(game_seed: u64) -> Self {
        Self {
            game_seed,
            ..Self::new()
        }
    }
}

impl Default for SimConfig {
    fn default() -> Self {
        Self::new()
    }
}
