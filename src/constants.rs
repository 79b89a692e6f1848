//! Centralized constants for the container format, permissions, and limits.

/// Default store root directory.
pub const DEFAULT_STORE_ROOT: &str = "/var/lib/cookievault";

/// Container file magic (8 bytes).
pub const CONTAINER_MAGIC: &[u8; 8] = b"CKVAULT1";

/// Current container format version.
pub const FORMAT_VERSION: u8 = 1;

/// Master key length in bytes (XChaCha20-Poly1305, 256-bit).
pub const KEY_LEN: usize = 32;

/// Nonce length in bytes (XChaCha20-Poly1305).
pub const NONCE_LEN: usize = 24;

/// Whole-payload checksum length in bytes (SHA-256).
pub const CHECKSUM_LEN: usize = 32;

/// Total container header length: magic + version + checksum.
pub const HEADER_LEN: usize = 8 + 1 + CHECKSUM_LEN;

/// Permission mode for the store root directory.
pub const STORE_DIR_MODE: u32 = 0o700;

/// Permission mode for the container file and the key file.
pub const STORE_FILE_MODE: u32 = 0o600;

/// Maximum cookie value size in bytes (1 MiB).
pub const MAX_VALUE_SIZE: usize = 1_048_576;

/// Container file name within the store root.
pub const STORE_FILE_NAME: &str = "cookies.vault";

/// Key file name within the store root.
pub const KEY_FILE_NAME: &str = "store.key";

/// Config file name within the store root.
pub const CONFIG_FILE_NAME: &str = "cookievault.toml";
