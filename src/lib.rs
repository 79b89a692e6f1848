//! Encrypted HTTP-cookie store backed by a single on-disk container.
//!
//! Each cookie value is sealed with an authenticated cipher before it is
//! held in memory or written out. The container carries a versioned header
//! plus a whole-payload checksum, and is replaced atomically (temp file,
//! fsync, rename) on every mutation.
//!
//! ## Modules
//! - `cli` — Command-line handlers
//! - `core` — Store manager, container codec, encryption boundary
//! - `models` — Data structures
//! - `util` — Filesystem helpers

pub mod cli;
pub mod constants;
pub mod core;
pub mod models;
pub mod util;

pub use crate::core::crypto::{ValueCipher, XChaChaValueCipher};
pub use crate::core::error::StoreError;
pub use crate::core::store::CookieStore;
pub use crate::models::cookie::Cookie;
