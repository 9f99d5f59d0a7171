//! Randomness plumbing for the engine.
//!
//! Two regimes that must never mix: ambient sampling (ballot choices,
//! lobbying rolls) draws from seedable streams in [`RngBundle`], while the
//! promise-compliance roll in stance scoring is a pure hash of stable
//! identifiers so that repeated what-if simulation over cloned state stays
//! reproducible no matter how the bundle has been consumed.

use std::cell::{RefCell, RefMut};
use std::hash::Hasher;

use hmac::{Hmac, Mac};
use rand::SeedableRng;
use rand::rngs::SmallRng;
use sha2::Sha256;
use twox_hash::XxHash64;

/// Deterministic bundle of RNG streams segregated by simulation domain.
#[derive(Debug)]
pub struct RngBundle {
    ballot: RefCell<CountingRng<SmallRng>>,
    lobbying: RefCell<CountingRng<SmallRng>>,
}

impl RngBundle {
    /// Construct the bundle from a user-visible seed.
    #[must_use]
    pub fn from_user_seed(seed: u64) -> Self {
        let ballot = CountingRng::new(derive_stream_seed(seed, b"ballot"));
        let lobbying = CountingRng::new(derive_stream_seed(seed, b"lobbying"));
        Self {
            ballot: RefCell::new(ballot),
            lobbying: RefCell::new(lobbying),
        }
    }

    /// Construct a live (non-reproducible) bundle from OS entropy.
    #[must_use]
    pub fn from_entropy() -> Self {
        Self::from_user_seed(rand::random::<u64>())
    }

    /// Access the ballot RNG stream.
    #[must_use]
    pub fn ballot(&self) -> RefMut<'_, CountingRng<SmallRng>> {
        self.ballot.borrow_mut()
    }

    /// Access the lobbying RNG stream.
    #[must_use]
    pub fn lobbying(&self) -> RefMut<'_, CountingRng<SmallRng>> {
        self.lobbying.borrow_mut()
    }
}

/// Counting wrapper for RNG streams providing instrumentation.
#[derive(Debug, Clone)]
pub struct CountingRng<R> {
    rng: R,
    draws: u64,
}

impl CountingRng<SmallRng> {
    fn new(seed: u64) -> Self {
        Self {
            rng: SmallRng::seed_from_u64(seed),
            draws: 0,
        }
    }
}

impl<R: rand::RngCore> CountingRng<R> {
    /// Number of draw calls performed against this stream.
    #[must_use]
    pub const fn draws(&self) -> u64 {
        self.draws
    }
}

impl<R: rand::RngCore> rand::RngCore for CountingRng<R> {
    fn next_u32(&mut self) -> u32 {
        self.draws = self.draws.saturating_add(1);
        self.rng.next_u32()
    }

    fn next_u64(&mut self) -> u64 {
        self.draws = self.draws.saturating_add(1);
        self.rng.next_u64()
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        self.draws = self.draws.saturating_add(1);
        self.rng.fill_bytes(dest);
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
        self.draws = self.draws.saturating_add(1);
        self.rng.try_fill_bytes(dest)
    }
}

fn derive_stream_seed(user_seed: u64, domain_tag: &[u8]) -> u64 {
    let mut mac =
        Hmac::<Sha256>::new_from_slice(&user_seed.to_le_bytes()).expect("64-bit seed is valid key");
    mac.update(domain_tag);
    let digest = mac.finalize().into_bytes();
    let seed_bytes: [u8; 8] = digest[..8].try_into().expect("digest slice length");
    u64::from_le_bytes(seed_bytes)
}

/// Stable domain-separated hash over a tuple of numeric identifiers.
#[must_use]
pub fn stable_hash64(domain_tag: &[u8], parts: &[u64]) -> u64 {
    let mut hasher = XxHash64::with_seed(0);
    hasher.write(domain_tag);
    for part in parts {
        hasher.write(&part.to_le_bytes());
    }
    hasher.finish()
}

/// Map a stable hash to a fraction in `[0, 1)` with 53 bits of precision.
#[must_use]
pub fn stable_fraction(domain_tag: &[u8], parts: &[u64]) -> f64 {
    let hash = stable_hash64(domain_tag, parts);
    (hash >> 11) as f64 / (1u64 << 53) as f64
}
