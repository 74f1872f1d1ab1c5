use std::sync::Mutex;

use rand::{Rng, RngCore, SeedableRng, rngs::StdRng, seq::SliceRandom};

/// Random source shared by all requests served by one generator.
pub struct SharedRng {
    inner: Mutex<Box<dyn RngCore + Send>>,
}

impl SharedRng {
    pub fn new(rng: impl RngCore + Send + 'static) -> Self {
        Self {
            inner: Mutex::new(Box::new(rng)),
        }
    }

    pub fn from_entropy() -> Self {
        Self::new(StdRng::from_entropy())
    }

    pub fn seeded(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed))
    }

    /// Runs `f` with exclusive access to the generator. Never hold across an await.
    pub fn with<T>(&self, f: impl FnOnce(&mut dyn RngCore) -> T) -> T {
        let mut guard = self
            .inner
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        f(&mut **guard)
    }
}

/// Picks `amount` distinct entries uniformly without replacement, in random order.
/// Returns `None` when the pool is smaller than `amount`.
pub fn sample_distinct<'a, R>(rng: &mut R, pool: &[&'a str], amount: usize) -> Option<Vec<&'a str>>
where
    R: Rng + ?Sized,
{
    if pool.len() < amount {
        return None;
    }
    Some(pool.choose_multiple(rng, amount).copied().collect())
}
