//! Per-group top-k frequency operator.
//!
//! A [`TopK`] operator partitions the stream by a configurable set of key
//! fields and maintains one [`SlidingWindow`] per group. On every consumed
//! record it updates the group's window, publishes the window's current
//! top-k summary to the shared [`FeatureMap`], and notifies the subscriber
//! bus with the leading frequency.

use crate::flowstream::bus::SubscriberBus;
use crate::flowstream::error::Result;
use crate::flowstream::features::{FeatureMap, TopKFeature};
use crate::flowstream::projection::{FieldProjector, KeyProjector};
use crate::flowstream::record::{FieldValue, FlowRecord};
use crate::flowstream::window::SlidingWindow;
use log::info;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

/// Configuration for a [`TopK`] operator
#[derive(Debug, Clone)]
pub struct TopKConfig {
    /// Total capacity `N` of each group's window
    pub window_capacity: usize,
    /// Sub-window size `b`; must divide `N`
    pub sub_window_size: usize,
    /// Number of top keys reported per group
    pub top_k: usize,
    /// Id of the node running this computation
    pub node_id: usize,
    /// Identifier under which features are published
    pub operator_id: String,
    /// Field whose values are ranked
    pub value_field: usize,
    /// Fields forming the group key, in declared order
    pub key_fields: Vec<usize>,
    /// Declared arity of consumed records
    pub arity: usize,
    /// Emit a diagnostic every this many consumed records
    pub metric_interval: u64,
}

/// Streaming top-k operator over a partitioned record stream
pub struct TopK {
    config: TopKConfig,
    value_projector: FieldProjector,
    key_projector: KeyProjector,
    windows: Mutex<HashMap<String, Arc<Mutex<SlidingWindow<FieldValue>>>>>,
    feature_map: Arc<FeatureMap>,
    bus: Arc<SubscriberBus>,
    feed_count: AtomicU64,
}

impl TopK {
    /// Create an operator publishing into the given feature map and bus
    ///
    /// Window parameters and every configured field index are validated
    /// here; a misconfigured operator is never constructed.
    pub fn new(
        config: TopKConfig,
        feature_map: Arc<FeatureMap>,
        bus: Arc<SubscriberBus>,
    ) -> Result<Self> {
        SlidingWindow::<FieldValue>::check_parameters(
            config.window_capacity,
            config.sub_window_size,
            config.top_k,
        )?;

        let value_projector = FieldProjector::new(config.value_field);
        value_projector.validate(config.arity)?;
        let key_projector = KeyProjector::new(&config.key_fields);
        key_projector.validate(config.arity)?;

        Ok(TopK {
            config,
            value_projector,
            key_projector,
            windows: Mutex::new(HashMap::new()),
            feature_map,
            bus,
            feed_count: AtomicU64::new(0),
        })
    }

    /// Consume one record
    ///
    /// Updates the record's group window, upserts the group's
    /// [`TopKFeature`], and publishes `(record id, leading frequency)` on
    /// the bus. Collaborator errors propagate; the window mutation has
    /// already committed when they do. Always returns `Ok(true)` today;
    /// `Ok(false)` is reserved for a future backpressure signal.
    pub fn consume(&self, record: &FlowRecord) -> Result<bool> {
        let feed = self.feed_count.fetch_add(1, Ordering::Relaxed) + 1;
        if feed % self.config.metric_interval == 0 {
            info!(
                "node {} operator {}: {} records consumed, {} groups tracked",
                self.config.node_id,
                self.config.operator_id,
                feed,
                self.group_count()
            );
        }

        let group = self.key_projector.group_key(record)?;
        let window = self.window_for(&group)?;

        let value = self.value_projector.project(record)?.clone();

        // The add/query pair stays under the window lock so the published
        // feature reflects the state after this add.
        let (keys, frequencies) = {
            let mut window = window.lock().unwrap();
            window.add(value);
            (window.top_keys(), window.frequencies())
        };

        if !keys.is_empty() {
            let rendered = keys
                .into_iter()
                .map(|key| key.to_display_string())
                .collect();
            let feature = TopKFeature::new(rendered, frequencies.clone())?;
            self.feature_map
                .upsert(&group, &self.config.operator_id, feature);
            self.bus.publish(record.id(), frequencies[0])?;
        }

        Ok(true)
    }

    /// Number of records consumed so far
    pub fn feed_count(&self) -> u64 {
        self.feed_count.load(Ordering::Relaxed)
    }

    /// Number of group windows currently tracked
    pub fn group_count(&self) -> usize {
        self.windows.lock().unwrap().len()
    }

    /// The identifier under which this operator publishes features
    pub fn operator_id(&self) -> &str {
        &self.config.operator_id
    }

    // Fetch the group's window, creating it lazily on first observation.
    fn window_for(&self, group: &str) -> Result<Arc<Mutex<SlidingWindow<FieldValue>>>> {
        let mut windows = self.windows.lock().unwrap();
        if let Some(window) = windows.get(group) {
            return Ok(Arc::clone(window));
        }
        let window = Arc::new(Mutex::new(SlidingWindow::new(
            self.config.window_capacity,
            self.config.sub_window_size,
            self.config.top_k,
        )?));
        windows.insert(group.to_string(), Arc::clone(&window));
        Ok(window)
    }
}
