//! Output of the pipeline.
//!
//! The emitter turns an [`OperationalSnapshot`](crate::core::OperationalSnapshot)
//! into the canonical JSON document consumed by the dashboard and the
//! persistence collaborator. Writing the document anywhere is left to the
//! caller.

pub mod emitter;

pub use emitter::{
    document_checksum, emit_document, read_document, to_document_value, OperationalDocument,
    DOCUMENT_KEYS,
};
