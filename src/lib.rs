//! `restricted-fs` mediates filesystem access for a document-processing
//! engine that executes untrusted author input.
//!
//! An [`AccessContext`] pairs a configured [`AccessPolicy`] with a
//! validation [`Strategy`] (lexical or resolved) and caches every access
//! decision per path. A [`RestrictedPath`] is a path value bound to a
//! context; its operations check the relevant predicate and fail before any
//! filesystem mutation when access is denied.

mod context;
mod ops;
mod resolve;
mod roots;
mod validator;

pub mod config_io;

pub use restricted_fs_core::access::{Decision, Denial};
pub use restricted_fs_core::policy::{AccessPolicy, EngineConfig, Strictness};
pub use restricted_fs_core::{Error, Result};

pub use context::AccessContext;
pub use ops::RestrictedPath;
pub use roots::RootPaths;
pub use validator::Strategy;
