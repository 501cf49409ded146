//! Shared types, error model, and configuration for edadoc.
//!
//! This crate is the foundation depended on by all other edadoc crates.
//! It provides:
//! - [`EdaDocError`] — the unified error type
//! - Domain types ([`Event`], [`Service`], [`Process`], [`CandidateEvent`], [`DocsManifest`])
//! - Configuration ([`AppConfig`], [`ParseConfig`], config loading)

pub mod config;
pub mod error;
pub mod types;

// Re-export public API at crate root for ergonomic imports.
pub use config::{
    AppConfig, DefaultsConfig, DiscoveryConfig, ParseConfig, config_dir, config_file_path,
    init_config, load_config, load_config_from,
};
pub use error::{EdaDocError, Result};
pub use types::{
    CURRENT_SCHEMA_VERSION, CandidateEvent, DEFAULT_EVENT_ORDER, DocsManifest, DocumentMeta, Event,
    Process, ProcessRef, ProcessStep, Service, USER_INTERACTION_SUFFIX, short_name,
};
