//! Explicit caching of a fitted model against the dataset it was fitted to.

use std::hash::{Hash, Hasher};
use std::ops::AddAssign;

use rustc_hash::FxHasher;
use tracing::debug;

use crate::data;
use crate::domain::MatchRecord;
use crate::glm::FitOptions;
use crate::model::{self, FittedModel};
use crate::timed::Timed;
use crate::Error;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CacheStats {
    hits: usize,
    misses: usize,
}
impl CacheStats {
    pub fn hits(&self) -> usize {
        self.hits
    }

    pub fn misses(&self) -> usize {
        self.misses
    }
}

impl AddAssign<bool> for CacheStats {
    fn add_assign(&mut self, cache_hit: bool) {
        if cache_hit {
            self.hits += 1;
        } else {
            self.misses += 1;
        }
    }
}

/// Identifies a dataset by hashing its match records in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Fingerprint(u64);
impl Fingerprint {
    pub fn of(matches: &[MatchRecord]) -> Self {
        let mut hasher = FxHasher::default();
        matches.hash(&mut hasher);
        Self(hasher.finish())
    }
}

#[derive(Debug)]
struct CacheEntry {
    fingerprint: Fingerprint,
    matches: Vec<MatchRecord>,
    model: FittedModel,
}

/// Holds at most one fitted model. A lookup with a different dataset evicts the cached model
/// before refitting. The fingerprint only shortlists a hit; the records are compared in full.
#[derive(Debug, Default)]
pub struct ModelCache {
    options: FitOptions,
    entry: Option<CacheEntry>,
    stats: CacheStats,
}
impl ModelCache {
    pub fn new(options: FitOptions) -> Self {
        Self {
            options,
            entry: None,
            stats: CacheStats::default(),
        }
    }

    pub fn options(&self) -> &FitOptions {
        &self.options
    }

    pub fn stats(&self) -> &CacheStats {
        &self.stats
    }

    /// The cached model, if any, without regard to the dataset it was fitted to.
    pub fn peek(&self) -> Option<&FittedModel> {
        self.entry.as_ref().map(|entry| &entry.model)
    }

    pub fn fingerprint(&self) -> Option<Fingerprint> {
        self.entry.as_ref().map(|entry| entry.fingerprint)
    }

    /// Returns the model fitted to `matches`, fitting it if the cache holds no model for this
    /// dataset. If fitting fails, the cache is left empty.
    pub fn get_or_fit(&mut self, matches: &[MatchRecord]) -> Result<&FittedModel, Error> {
        let fingerprint = Fingerprint::of(matches);
        let entry = match self.entry.take() {
            Some(entry) if entry.fingerprint == fingerprint && entry.matches == matches => {
                self.stats += true;
                debug!("cache hit for {fingerprint:?}");
                entry
            }
            stale => {
                self.stats += false;
                if let Some(stale) = stale {
                    debug!("evicting model fitted to {:?}", stale.fingerprint);
                }
                let Timed { value: model, elapsed } = Timed::result(|| -> Result<_, Error> {
                    let table = data::reshape(matches)?;
                    Ok(model::fit_model(&table, &self.options)?)
                })?;
                debug!("cache miss for {fingerprint:?}, fitted in {elapsed:?}");
                CacheEntry {
                    fingerprint,
                    matches: matches.to_vec(),
                    model,
                }
            }
        };
        Ok(&self.entry.insert(entry).model)
    }

    pub fn invalidate(&mut self) {
        if let Some(entry) = self.entry.take() {
            debug!("invalidated model fitted to {:?}", entry.fingerprint);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::FitError;

    fn season() -> Vec<MatchRecord> {
        vec![
            MatchRecord::new("Arsenal", "Chelsea", 2, 1),
            MatchRecord::new("Chelsea", "Wolves", 1, 1),
            MatchRecord::new("Wolves", "Arsenal", 1, 3),
            MatchRecord::new("Chelsea", "Arsenal", 1, 1),
        ]
    }

    #[test]
    fn add_assign_bool() {
        let mut cs = CacheStats { hits: 1, misses: 0 };
        cs += false;
        assert_eq!(CacheStats { hits: 1, misses: 1 }, cs);
        cs += true;
        assert_eq!(CacheStats { hits: 2, misses: 1 }, cs);
    }

    #[test]
    fn fingerprint_is_order_sensitive() {
        let matches = season();
        let mut reversed = matches.clone();
        reversed.reverse();
        assert_eq!(Fingerprint::of(&matches), Fingerprint::of(&season()));
        assert_ne!(Fingerprint::of(&matches), Fingerprint::of(&reversed));
    }

    #[test]
    fn hit_after_miss() {
        let mut cache = ModelCache::default();
        let matches = season();
        let first = cache.get_or_fit(&matches).unwrap().clone();
        assert_eq!(CacheStats { hits: 0, misses: 1 }, *cache.stats());
        let second = cache.get_or_fit(&matches).unwrap();
        assert_eq!(&first, second);
        assert_eq!(CacheStats { hits: 1, misses: 1 }, *cache.stats());
        assert_eq!(Some(Fingerprint::of(&matches)), cache.fingerprint());
    }

    #[test]
    fn changed_data_refits() {
        let mut cache = ModelCache::default();
        let mut matches = season();
        cache.get_or_fit(&matches).unwrap();
        matches.push(MatchRecord::new("Wolves", "Chelsea", 2, 0));
        let model = cache.get_or_fit(&matches).unwrap();
        assert_eq!(10, model.observations());
        assert_eq!(CacheStats { hits: 0, misses: 2 }, *cache.stats());
        assert_eq!(Some(Fingerprint::of(&matches)), cache.fingerprint());
    }

    #[test]
    fn colliding_fingerprint_refits() {
        let mut cache = ModelCache::default();
        let matches = season();
        let model = cache.get_or_fit(&matches).unwrap().clone();

        let mut other = season();
        other[0] = MatchRecord::new("Arsenal", "Chelsea", 3, 1);
        cache.entry = Some(CacheEntry {
            fingerprint: Fingerprint::of(&other),
            matches,
            model: model.clone(),
        });
        let refitted = cache.get_or_fit(&other).unwrap();
        assert_ne!(&model, refitted);
        assert_eq!(CacheStats { hits: 0, misses: 2 }, *cache.stats());

        cache.get_or_fit(&other).unwrap();
        assert_eq!(CacheStats { hits: 1, misses: 2 }, *cache.stats());
    }

    #[test]
    fn invalidate_forces_refit() {
        let mut cache = ModelCache::default();
        let matches = season();
        cache.get_or_fit(&matches).unwrap();
        cache.invalidate();
        assert!(cache.peek().is_none());
        cache.get_or_fit(&matches).unwrap();
        assert_eq!(CacheStats { hits: 0, misses: 2 }, *cache.stats());
        assert!(cache.peek().is_some());
    }

    #[test]
    fn failed_fit_leaves_cache_empty() {
        let mut cache = ModelCache::default();
        cache.get_or_fit(&season()).unwrap();

        let err = cache.get_or_fit(&[]).unwrap_err();
        assert!(matches!(err, Error::Fit(FitError::InsufficientData)), "{err:?}");
        assert!(cache.peek().is_none());

        let err = cache
            .get_or_fit(&[MatchRecord::new("Arsenal", "Arsenal", 1, 0)])
            .unwrap_err();
        assert!(matches!(err, Error::Validation(_)), "{err:?}");
        assert!(cache.peek().is_none());
        assert_eq!(CacheStats { hits: 0, misses: 3 }, *cache.stats());
    }

    #[test]
    fn options_reach_the_fit() {
        let mut cache = ModelCache::new(FitOptions {
            max_iterations: 1,
            ..FitOptions::default()
        });
        assert_eq!(1, cache.options().max_iterations);
        let err = cache.get_or_fit(&season()).unwrap_err();
        assert!(matches!(err, Error::Fit(FitError::ModelFit(_))), "{err:?}");
    }
}
