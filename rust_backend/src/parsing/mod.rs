//! Decoding of raw collaborator payloads.
//!
//! # Modules
//!
//! - [`payload`]: Turn optional JSON text into a plain mapping, never failing
//! - [`lenient`]: Coerce loosely typed numbers and text
//! - [`shapes`]: Declarative shape tables used by the transformers
//!
//! # Example
//!
//! ```
//! use snowops::parsing::{normalize_payload, DecodeMode};
//!
//! let payload = normalize_payload(Some("not json"), DecodeMode::Nested);
//! assert!(payload.is_empty());
//! ```

pub mod lenient;
pub mod payload;
pub mod shapes;

#[cfg(test)]
mod payload_tests;

pub use payload::{
    decode_payload, inspect_payload, normalize_payload, normalize_value, DecodeMode, Payload,
    PayloadStatus,
};
pub use shapes::{lookup, Matcher, ShapeTable};
