//! Core domain models for operational snapshots.
//!
//! This module defines the typed sub-models (weather, inventory, routes,
//! fleet, map overlay) and the immutable snapshot assembled from them.

pub mod domain;
pub mod ordered;

pub use domain::*;
pub use ordered::OrderedMap;
