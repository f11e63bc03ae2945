//! Shared infrastructure utilities for LinkChecker.
//!
//! Crash-safe file persistence (temp file + rename) for the pieces that
//! write state other than through a logger formatter: the blacklist
//! formatter's persisted file and the cookie jar saved by
//! `--save-cookies`.

mod windows_acl;

pub mod atomic_write;

pub use atomic_write::{AtomicWriteOptions, PersistMode, atomic_write, atomic_write_with_options};
#[cfg(windows)]
pub(crate) use windows_acl::set_owner_only_file_acl;
