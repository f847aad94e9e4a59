//! Published feature records and the process-wide feature store.
//!
//! Operators summarise their windows into features and publish them to a
//! shared [`FeatureMap`] keyed by `(group key, operator id)`. Downstream
//! consumers read the latest feature for a key; ordering across
//! concurrent upserts on the same key is last-writer-wins.

use crate::flowstream::error::{EngineError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::RwLock;

/// Top-k summary of one group's sliding window
///
/// Carries the category keys rendered as strings, most frequent first,
/// and the positionally aligned relative frequencies in `[0, 1]`. The
/// frequencies sum to at most 1, and to exactly 1 once the producing
/// window has filled.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopKFeature {
    keys: Vec<String>,
    frequencies: Vec<f64>,
}

impl TopKFeature {
    /// Create a feature from aligned keys and frequencies
    ///
    /// Keys and frequencies must be positionally aligned and every
    /// frequency must lie in `[0, 1]`; anything else is a
    /// [`FeatureError`](EngineError::FeatureError).
    pub fn new(keys: Vec<String>, frequencies: Vec<f64>) -> Result<Self> {
        if keys.len() != frequencies.len() {
            return Err(EngineError::FeatureError {
                message: format!(
                    "{} keys but {} frequencies",
                    keys.len(),
                    frequencies.len()
                ),
            });
        }
        if let Some(frequency) = frequencies.iter().find(|f| !(0.0..=1.0).contains(*f)) {
            return Err(EngineError::FeatureError {
                message: format!("frequency {} outside [0, 1]", frequency),
            });
        }
        Ok(TopKFeature { keys, frequencies })
    }

    /// Category keys, most frequent first
    pub fn keys(&self) -> &[String] {
        &self.keys
    }

    /// Relative frequencies aligned with [`keys`](TopKFeature::keys)
    pub fn frequencies(&self) -> &[f64] {
        &self.frequencies
    }

    /// Frequency of one category key, if it is ranked
    pub fn frequency_of(&self, key: &str) -> Option<f64> {
        self.keys
            .iter()
            .position(|k| k == key)
            .map(|index| self.frequencies[index])
    }
}

/// Thread-safe store of the latest feature per `(group key, operator id)`
///
/// The map is process-wide: every operator in a node publishes into the
/// same store, disambiguated by its operator id. Upserts on the same key
/// are last-writer-wins.
#[derive(Debug, Default)]
pub struct FeatureMap {
    features: RwLock<HashMap<(String, String), TopKFeature>>,
}

impl FeatureMap {
    /// Create an empty feature map
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace the feature for `(group_key, operator_id)`
    pub fn upsert(&self, group_key: &str, operator_id: &str, feature: TopKFeature) {
        let mut features = self.features.write().unwrap();
        features.insert((group_key.to_string(), operator_id.to_string()), feature);
    }

    /// Latest feature for `(group_key, operator_id)`, if any
    pub fn get(&self, group_key: &str, operator_id: &str) -> Option<TopKFeature> {
        let features = self.features.read().unwrap();
        features
            .get(&(group_key.to_string(), operator_id.to_string()))
            .cloned()
    }

    /// Number of `(group key, operator id)` entries currently stored
    pub fn len(&self) -> usize {
        self.features.read().unwrap().len()
    }

    /// True iff no features have been published
    pub fn is_empty(&self) -> bool {
        self.features.read().unwrap().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upsert_is_last_writer_wins() {
        let map = FeatureMap::new();
        let first = TopKFeature::new(vec!["80".to_string()], vec![1.0]).unwrap();
        let second = TopKFeature::new(vec!["443".to_string()], vec![0.5]).unwrap();

        map.upsert("group", "topk0", first);
        map.upsert("group", "topk0", second.clone());

        assert_eq!(map.len(), 1);
        assert_eq!(map.get("group", "topk0"), Some(second));
    }

    #[test]
    fn test_operator_ids_partition_the_store() {
        let map = FeatureMap::new();
        map.upsert("group", "topk0", TopKFeature::new(vec![], vec![]).unwrap());
        map.upsert("group", "topk1", TopKFeature::new(vec![], vec![]).unwrap());

        assert_eq!(map.len(), 2);
        assert!(map.get("group", "topk0").is_some());
        assert!(map.get("group", "missing").is_none());
    }

    #[test]
    fn test_feature_serializes_with_aligned_fields() {
        let feature = TopKFeature::new(
            vec!["80".to_string(), "443".to_string()],
            vec![0.75, 0.25],
        )
        .unwrap();
        let json = serde_json::to_value(&feature).unwrap();
        assert_eq!(json["keys"][0], "80");
        assert_eq!(json["frequencies"][1], 0.25);
    }

    #[test]
    fn test_frequency_lookup_by_key() {
        let feature = TopKFeature::new(
            vec!["80".to_string(), "443".to_string()],
            vec![0.75, 0.25],
        )
        .unwrap();
        assert_eq!(feature.frequency_of("443"), Some(0.25));
        assert_eq!(feature.frequency_of("8080"), None);
    }

    #[test]
    fn test_construction_rejects_malformed_features() {
        // Misaligned keys and frequencies
        let result = TopKFeature::new(vec!["80".to_string()], vec![0.5, 0.5]);
        assert!(matches!(result, Err(EngineError::FeatureError { .. })));

        // Frequencies outside [0, 1]
        let result = TopKFeature::new(vec!["80".to_string()], vec![1.5]);
        assert!(matches!(result, Err(EngineError::FeatureError { .. })));
    }
}
