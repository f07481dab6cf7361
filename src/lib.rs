//! Blockfall (workspace facade crate).
//!
//! This package exposes `blockfall::{core,input,save,term,types}` while the
//! implementation lives in dedicated crates under `crates/`, plus the
//! environment-driven [`config`] used by the terminal binary.

pub mod config;

pub use blockfall_core as core;
pub use blockfall_input as input;
pub use blockfall_save as save;
pub use blockfall_term as term;
pub use blockfall_types as types;

pub use config::AppConfig;
