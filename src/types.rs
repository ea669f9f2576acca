//! Core types shared by the persona domain, repository adapters, and events.

use std::collections::BTreeMap;

/// A raw record as reported by the persona store.
pub type Row = serde_json::Map<String, serde_json::Value>;

/// Open-ended structured map (boosts, filters, eval gates, metadata).
///
/// `serde_json::Map` keeps keys sorted, which gives every serialization of it a
/// stable key order.
pub type StructuredMap = serde_json::Map<String, serde_json::Value>;

/// Named behavior weights (decode / retrieve / generate and any extras).
pub type BehaviorWeights = BTreeMap<String, f64>;
