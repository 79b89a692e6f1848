//! Store path resolution and on-disk layout.

use crate::constants;
use std::env;
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct StorePaths {
    pub root: PathBuf,
    pub store_file: PathBuf,
    pub key_file: PathBuf,
    pub config_toml: PathBuf,
}

impl StorePaths {
    /// Resolve the store root from CLI arg, env var, or the default.
    pub fn resolve(root_arg: Option<PathBuf>) -> Self {
        if let Some(root) = root_arg {
            return Self::from_root(root);
        }
        if let Ok(root) = env::var("COOKIEVAULT_ROOT") {
            return Self::from_root(PathBuf::from(root));
        }
        Self::from_root(PathBuf::from(constants::DEFAULT_STORE_ROOT))
    }

    /// Create store paths from a root directory.
    pub fn from_root(root: PathBuf) -> Self {
        let store_file = root.join(constants::STORE_FILE_NAME);
        let key_file = root.join(constants::KEY_FILE_NAME);
        let config_toml = root.join(constants::CONFIG_FILE_NAME);
        Self {
            root,
            store_file,
            key_file,
            config_toml,
        }
    }
}

impl std::fmt::Display for StorePaths {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "cookievault@{}", self.root.display())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_root() {
        let paths = StorePaths::from_root(PathBuf::from("/test"));
        assert_eq!(paths.root, PathBuf::from("/test"));
        assert_eq!(paths.store_file, PathBuf::from("/test/cookies.vault"));
        assert_eq!(paths.key_file, PathBuf::from("/test/store.key"));
        assert_eq!(paths.config_toml, PathBuf::from("/test/cookievault.toml"));
    }

    #[test]
    fn test_resolve_prefers_explicit_arg() {
        let paths = StorePaths::resolve(Some(PathBuf::from("/explicit")));
        assert_eq!(paths.root, PathBuf::from("/explicit"));
    }
}
