//! # oasdump-core
//!
//! Core domain model for oasdump:
//! - Captured HTTP exchanges and their persisted record format
//! - The `ExchangeStore` boundary the generation pipeline reads from
//! - Dump settings (output root, spec metadata, schema externalization)

pub mod error;
pub mod exchange;
pub mod settings;
pub mod store;

pub use error::{DumpError, Result};
pub use exchange::{CapturedRecord, Exchange, HttpMethod};
pub use settings::DumpSettings;
pub use store::{ExchangeStore, JsonlStore, MemoryStore};
