//! Graph building, pipeline orchestration, and document output for edadoc.
//!
//! This crate ties together file discovery, XML extraction, and graph
//! building into the end-to-end `generate_docs` workflow.

pub mod assembler;
pub mod discovery;
pub mod graph;
pub mod pipeline;
pub mod render;
