//! Deterministic per-trial seed derivation.
//!
//! Trials never share an RNG. Each one gets a seed derived from the run seed
//! and its trial index, so a trial's outcome does not depend on how many
//! trials ran before it or in which order they were folded.
//!
//! Not cryptographic; only meant for reproducible simulation streams.

/// Seed for trial `index` of a run seeded with `run_seed`.
#[must_use]
pub fn trial_seed(run_seed: u64, index: u64) -> u64 {
    splitmix64(splitmix64(run_seed ^ 0x4B52_494E) ^ index) // "KRIN"
}

/// SplitMix64 finalizer (good bit diffusion for nearby inputs).
#[inline]
pub fn splitmix64(mut x: u64) -> u64 {
    x = x.wrapping_add(0x9E37_79B9_7F4A_7C15);
    let mut z = x;
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}
