//! Memoization of analysis results by track content
//!
//! The analysis itself keeps no state. Hosts that analyze the same track
//! repeatedly can put this cache in front of it; entries are keyed by a
//! SHA256 fingerprint of the three series, so renaming a track or changing
//! its passthrough scalars does not invalidate the entry.

use crate::analysis::TrackAnalyzer;
use crate::models::{AnalysisOutcome, Track};
use sha2::{Digest, Sha256};
use std::collections::{HashMap, HashSet};
use tracing::debug;

/// Content fingerprint of a track's series
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TrackFingerprint {
    pub hash: String,
    pub samples: usize,
}

impl TrackFingerprint {
    /// Hash the distance, elevation and time series
    pub fn generate(track: &Track) -> Self {
        let mut hasher = Sha256::new();

        for series in [&track.distance, &track.elevation, &track.time] {
            match series {
                Some(values) => {
                    hasher.update([1u8]);
                    hasher.update((values.len() as u64).to_le_bytes());
                    for value in values {
                        hasher.update(value.to_le_bytes());
                    }
                }
                // Distinguishes an absent series from an empty one
                None => hasher.update([0u8]),
            }
        }

        Self {
            hash: format!("{:x}", hasher.finalize()),
            samples: track.distance.as_ref().map_or(0, Vec::len),
        }
    }
}

/// Cache statistics
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CacheMetrics {
    pub total_lookups: u64,
    pub cache_hits: u64,
    pub cache_misses: u64,
}

impl CacheMetrics {
    /// Get hit rate as percentage
    pub fn hit_rate(&self) -> f64 {
        if self.total_lookups == 0 {
            return 0.0;
        }
        (self.cache_hits as f64 / self.total_lookups as f64) * 100.0
    }
}

/// In-memory cache of analysis outcomes
#[derive(Debug, Default)]
pub struct AnalysisCache {
    analyzer: TrackAnalyzer,
    entries: HashMap<TrackFingerprint, AnalysisOutcome>,
    metrics: CacheMetrics,
}

impl AnalysisCache {
    pub fn new(analyzer: TrackAnalyzer) -> Self {
        Self {
            analyzer,
            entries: HashMap::new(),
            metrics: CacheMetrics::default(),
        }
    }

    /// Return the cached outcome for this track, analyzing it on a miss
    pub fn get_or_analyze(&mut self, track: &Track) -> &AnalysisOutcome {
        let fingerprint = TrackFingerprint::generate(track);
        self.metrics.total_lookups += 1;

        if self.entries.contains_key(&fingerprint) {
            self.metrics.cache_hits += 1;
            debug!(hash = %fingerprint.hash, "Analysis cache hit");
        } else {
            self.metrics.cache_misses += 1;
            debug!(hash = %fingerprint.hash, samples = fingerprint.samples, "Analysis cache miss");
        }

        let analyzer = &self.analyzer;
        self.entries
            .entry(fingerprint)
            .or_insert_with(|| analyzer.analyze(track))
    }

    /// Outcomes for all tracks in order, analyzing the misses in parallel
    pub fn analyze_all(&mut self, tracks: &[Track]) -> Vec<AnalysisOutcome> {
        let fingerprints: Vec<TrackFingerprint> =
            tracks.iter().map(TrackFingerprint::generate).collect();

        let mut pending: Vec<Track> = Vec::new();
        let mut pending_keys: Vec<TrackFingerprint> = Vec::new();
        let mut queued: HashSet<&TrackFingerprint> = HashSet::new();
        for (track, fingerprint) in tracks.iter().zip(&fingerprints) {
            self.metrics.total_lookups += 1;
            if self.entries.contains_key(fingerprint) || !queued.insert(fingerprint) {
                self.metrics.cache_hits += 1;
            } else {
                self.metrics.cache_misses += 1;
                pending.push(track.clone());
                pending_keys.push(fingerprint.clone());
            }
        }

        debug!(
            tracks = tracks.len(),
            to_analyze = pending.len(),
            "Analyzing batch"
        );
        let outcomes = self.analyzer.analyze_batch(&pending);
        self.entries.extend(pending_keys.into_iter().zip(outcomes));

        fingerprints
            .iter()
            .filter_map(|fingerprint| self.entries.get(fingerprint).cloned())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn metrics(&self) -> &CacheMetrics {
        &self.metrics
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn track() -> Track {
        Track::new(
            vec![0.0, 100.0, 200.0],
            vec![10.0, 12.0, 11.0],
            vec![0.0, 30.0, 60.0],
        )
    }

    #[test]
    fn test_fingerprint_ignores_name_and_summary() {
        let plain = TrackFingerprint::generate(&track());
        let named =
            TrackFingerprint::generate(&track().with_name("Morning run").with_summary(Some(2.0), None));

        assert_eq!(plain, named);
        assert_eq!(plain.samples, 3);
    }

    #[test]
    fn test_fingerprint_changes_with_content() {
        let mut other = track();
        if let Some(elevation) = other.elevation.as_mut() {
            elevation[1] = 12.5;
        }

        assert_ne!(TrackFingerprint::generate(&track()), TrackFingerprint::generate(&other));
    }

    #[test]
    fn test_absent_and_empty_series_differ() {
        let empty = Track::new(Vec::new(), Vec::new(), Vec::new());
        let absent = Track::default();

        assert_ne!(TrackFingerprint::generate(&empty), TrackFingerprint::generate(&absent));
    }

    #[test]
    fn test_cache_hits_and_misses() {
        let mut cache = AnalysisCache::new(TrackAnalyzer::new());

        let first = cache.get_or_analyze(&track()).clone();
        let second = cache.get_or_analyze(&track().with_name("again")).clone();

        assert_eq!(first, second);
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.metrics().cache_hits, 1);
        assert_eq!(cache.metrics().cache_misses, 1);
        assert_eq!(cache.metrics().hit_rate(), 50.0);

        cache.clear();
        assert!(cache.is_empty());
    }

    #[test]
    fn test_analyze_all_dedupes_and_keeps_order() {
        let mut cache = AnalysisCache::new(TrackAnalyzer::new());
        let tracks = vec![track(), Track::default(), track().with_name("copy")];

        let outcomes = cache.analyze_all(&tracks);

        assert_eq!(outcomes.len(), 3);
        assert!(outcomes[0].is_available());
        assert!(!outcomes[1].is_available());
        assert_eq!(outcomes[0], outcomes[2]);
        assert_eq!(cache.len(), 2);
        assert_eq!(cache.metrics().cache_misses, 2);
        assert_eq!(cache.metrics().cache_hits, 1);
    }

    #[test]
    fn test_analyze_all_large_batch_of_duplicates() {
        let mut cache = AnalysisCache::new(TrackAnalyzer::new());
        let distinct: Vec<Track> = (0..50)
            .map(|i| {
                Track::new(
                    vec![0.0, 100.0 + i as f64],
                    vec![10.0, 11.0],
                    vec![0.0, 30.0],
                )
            })
            .collect();
        let tracks: Vec<Track> = distinct.iter().cycle().take(2000).cloned().collect();

        let outcomes = cache.analyze_all(&tracks);

        assert_eq!(outcomes.len(), 2000);
        assert_eq!(cache.len(), 50);
        assert_eq!(cache.metrics().cache_misses, 50);
        assert_eq!(cache.metrics().cache_hits, 1950);
        assert_eq!(outcomes[7], outcomes[57]);
        assert_ne!(outcomes[7], outcomes[8]);

        // Second pass is served entirely from the cache
        cache.analyze_all(&tracks[..100]);
        assert_eq!(cache.metrics().cache_misses, 50);
    }
}
