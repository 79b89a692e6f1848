//! Core store logic: manager, container codec, encryption boundary, locking.

pub mod codec;
pub mod crypto;
pub mod error;
pub mod file_lock;
pub mod paths;
pub mod store;
