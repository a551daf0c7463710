//! RNG oracle for deterministic random rolls.
//!
//! Characters never hold a generator. Every roll hashes the scene seed with a
//! per-character roll counter and a context tag, then asks the oracle for a
//! value. Replaying the same inputs replays the same rolls.

/// RNG oracle for deterministic random number generation.
///
/// Implementations must be deterministic and produce the same values
/// given the same seed.
pub trait RngOracle {
    /// Generate a random u32 value from a seed.
    fn next_u32(&self, seed: u64) -> u32;

    /// Uniform value in `0..bound`. A zero bound always yields 0.
    fn below(&self, seed: u64, bound: u32) -> u32 {
        if bound == 0 {
            return 0;
        }
        self.next_u32(seed) % bound
    }
}

/// PCG random number generator (PCG-XSH-RR, 64-bit state, 32-bit output).
#[derive(Clone, Copy, Debug, Default)]
pub struct PcgRng;

impl PcgRng {
    const MULTIPLIER: u64 = 6364136223846793005;
    const INCREMENT: u64 = 1442695040888963407;

    #[inline]
    fn pcg_step(state: u64) -> u64 {
        state
            .wrapping_mul(Self::MULTIPLIER)
            .wrapping_add(Self::INCREMENT)
    }

    #[inline]
    fn pcg_output(state: u64) -> u32 {
        let xorshifted = (((state >> 18) ^ state) >> 27) as u32;
        let rot = (state >> 59) as u32;
        xorshifted.rotate_right(rot)
    }
}

impl RngOracle for PcgRng {
    fn next_u32(&self, seed: u64) -> u32 {
        Self::pcg_output(Self::pcg_step(seed))
    }
}

/// Oracle that answers every roll with the same value. Test double.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FixedRng(pub u32);

impl RngOracle for FixedRng {
    fn next_u32(&self, _seed: u64) -> u32 {
        self.0
    }
}

/// What a roll is for. Mixed into the seed so that two rolls taken with the
/// same counter value stay independent.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u32)]
pub enum RollContext {
    StandVariant = 0,
    AttackVariant = 1,
    AbilityChoice = 2,
}

/// Compute deterministic seed from scene seed, roll counter, actor and context.
pub fn compute_seed(game_seed: u64, nonce: u64, actor_id: u32, context: u32) -> u64 {
    let mut hash = game_seed;
    hash ^= nonce.wrapping_mul(0x9e3779b97f4a7c15);
    hash ^= (actor_id as u64).wrapping_mul(0x517cc1b727220a95);
    hash ^= (context as u64).wrapping_mul(0x85ebca6b);

    // Final avalanche step
    hash ^= hash >> 33;
    hash = hash.wrapping_mul(0xff51afd7ed558ccd);
    hash ^= hash >> 33;

    hash
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seeds_differ_by_context_and_replay_exactly() {
        let a = compute_seed(7, 3, 1, RollContext::StandVariant as u32);
        let b = compute_seed(7, 3, 1, RollContext::AttackVariant as u32);
        assert_ne!(a, b);
        assert_eq!(a, compute_seed(7, 3, 1, RollContext::StandVariant as u32));
        assert_eq!(PcgRng.next_u32(a), PcgRng.next_u32(a));
    }

    #[test]
    fn below_stays_in_bounds() {
        for nonce in 0..64 {
            let seed = compute_seed(11, nonce, 2, 0);
            assert!(PcgRng.below(seed, 3) < 3);
        }
        assert_eq!(PcgRng.below(1, 0), 0);
        assert_eq!(FixedRng(5).below(0, 4), 1);
    }
}
