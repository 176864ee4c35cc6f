//! Deterministic seed derivation.
//!
//! One user-visible seed fans out into independent RNG streams: one per
//! simulated game, and within a game one for the deck and one per seat.

use hmac::{Hmac, Mac};
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;
use sha2::Sha256;

use crate::constants::{STREAM_DECK, STREAM_GAME_PREFIX, STREAM_STRATEGY_PREFIX};

type HmacSha256 = Hmac<Sha256>;

/// Derive a sub-seed for `domain_tag` from `user_seed`.
#[must_use]
pub fn derive_stream_seed(user_seed: u64, domain_tag: &[u8]) -> u64 {
    // HMAC accepts keys of any length, so this never falls back in practice.
    let Ok(mut mac) = HmacSha256::new_from_slice(&user_seed.to_le_bytes()) else {
        return user_seed;
    };
    mac.update(domain_tag);
    let digest = mac.finalize().into_bytes();
    let mut seed_bytes = [0u8; 8];
    seed_bytes.copy_from_slice(&digest[..8]);
    u64::from_le_bytes(seed_bytes)
}

/// Seed for the `index`-th game of a batch.
#[must_use]
pub fn game_seed(batch_seed: u64, index: u64) -> u64 {
    derive_stream_seed(batch_seed, format!("{STREAM_GAME_PREFIX}{index}").as_bytes())
}

/// RNG that shuffles the deck and reshuffles the discard stack.
#[must_use]
pub fn deck_rng(game_seed: u64) -> ChaCha20Rng {
    ChaCha20Rng::seed_from_u64(derive_stream_seed(game_seed, STREAM_DECK))
}

/// RNG private to the strategy sitting in `seat`.
#[must_use]
pub fn strategy_rng(game_seed: u64, seat: usize) -> ChaCha20Rng {
    let tag = format!("{STREAM_STRATEGY_PREFIX}{seat}");
    ChaCha20Rng::seed_from_u64(derive_stream_seed(game_seed, tag.as_bytes()))
}
