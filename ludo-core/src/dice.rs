//! Dice policy: the 0..=6 draw and the six-guarantee.
//!
//! Two chance modes back the draw. The event-keyed mode defines each outcome
//! by (episode seed, player, roll sequence number) rather than by evolving
//! RNG state, so replays with the same seed and command sequence reproduce
//! the same dice. The RNG mode is a seeded ChaCha8 stream.

use rand::Rng;
use rand_chacha::ChaCha8Rng;
use rand_core::SeedableRng;

use crate::board::PlayerId;

/// A roll forced to 6 after this many consecutive non-six rolls while the
/// player still has all four pieces in base.
pub const SIX_GUARANTEE_AFTER: u8 = 7;

/// Structural event key for deterministic dice generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EventKey {
    pub episode_seed: u64,
    pub player: u8,
    /// Lifetime roll count of this player within the episode.
    pub roll_seq: u32,
}

/// SplitMix64 step (fast, deterministic).
fn splitmix64_next(state: &mut u64) -> u64 {
    *state = state.wrapping_add(0x9E3779B97F4A7C15);
    let mut z = *state;
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58476D1CE4E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D049BB133111EB);
    z ^ (z >> 31)
}

fn mix_seed(key: EventKey) -> u64 {
    // Fixed, stable mixing. Avoid std Hash/RandomState.
    let mut x = key.episode_seed;
    x ^= (key.player as u64).wrapping_mul(0xD6E8FEB86659FD93);
    x ^= (key.roll_seq as u64).wrapping_mul(0xA5A35625E4F7C1AD);
    let mut s = x;
    splitmix64_next(&mut s)
}

/// Deterministically draw one dice value 0..=6 for the given event key.
pub fn draw(key: EventKey) -> u8 {
    let mut state = mix_seed(key);
    (splitmix64_next(&mut state) % 7) as u8
}

/// How dice outcomes are generated.
pub enum ChanceMode {
    /// Deterministic, event-keyed stream. Requires an episode seed.
    EventKeyed { episode_seed: u64 },
    /// Pseudorandom stream backed by a small PRNG.
    Rng { rng: Box<ChaCha8Rng> },
}

impl ChanceMode {
    pub fn new_event_keyed(episode_seed: u64) -> Self {
        ChanceMode::EventKeyed { episode_seed }
    }

    pub fn new_rng(seed: u64) -> Self {
        ChanceMode::Rng {
            rng: Box::new(ChaCha8Rng::seed_from_u64(seed)),
        }
    }

    fn draw(&mut self, key: EventKey) -> u8 {
        match self {
            ChanceMode::EventKeyed { .. } => draw(key),
            ChanceMode::Rng { rng } => rng.gen_range(0..=6),
        }
    }
}

/// The roll policy. Owns the chance stream and the per-player roll sequence
/// numbers; the consecutive-roll streak lives in the game state and is
/// passed in by the controller.
pub struct DicePolicy {
    mode: ChanceMode,
    roll_seq: [u32; 4],
}

impl DicePolicy {
    pub fn new(mode: ChanceMode) -> Self {
        Self {
            mode,
            roll_seq: [0; 4],
        }
    }

    /// Produce the outcome of a roll request for `player`.
    ///
    /// If the streak has reached [`SIX_GUARANTEE_AFTER`] and the player is
    /// fully stuck in base, the outcome is a forced 6. Otherwise the draw is
    /// uniform over the 7 values 0..=6 (0 is a legal miss). Any 6, natural
    /// or forced, resets the streak; every other value increments it.
    pub fn roll(&mut self, player: PlayerId, streak: &mut u8, stuck_in_base: bool) -> u8 {
        let key = EventKey {
            episode_seed: match &self.mode {
                ChanceMode::EventKeyed { episode_seed } => *episode_seed,
                // Unused in RNG mode.
                ChanceMode::Rng { .. } => 0,
            },
            player: player.index() as u8,
            roll_seq: self.roll_seq[player.index()],
        };
        self.roll_seq[player.index()] += 1;

        if *streak >= SIX_GUARANTEE_AFTER && stuck_in_base {
            *streak = 0;
            return 6;
        }

        let value = self.mode.draw(key);
        if value == 6 {
            *streak = 0;
        } else {
            *streak += 1;
        }
        value
    }
}
