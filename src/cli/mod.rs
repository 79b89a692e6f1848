//! CLI routing and command dispatch.

use crate::constants;
use crate::core::paths::StorePaths;
use crate::core::store::CookieStore;
use crate::models::config::{self, ConfigFile};
use anyhow::{ensure, Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use zeroize::Zeroizing;

pub mod cookie;
pub mod init;
pub mod verify;

/// Shared context passed to all command handlers.
pub struct CliContext {
    pub paths: StorePaths,
    pub config: ConfigFile,
}

impl CliContext {
    /// Effective container path, honoring the config override.
    pub fn store_path(&self) -> PathBuf {
        match &self.config.store.store_file {
            Some(name) => self.paths.root.join(name),
            None => self.paths.store_file.clone(),
        }
    }

    /// Read the master key from the root's key file.
    pub fn load_key(&self) -> Result<Zeroizing<Vec<u8>>> {
        let bytes = std::fs::read(&self.paths.key_file).with_context(|| {
            format!(
                "read key file {} (run `cookievault init` first)",
                self.paths.key_file.display()
            )
        })?;
        ensure!(
            bytes.len() == constants::KEY_LEN,
            "key file {} must hold exactly {} bytes, found {}",
            self.paths.key_file.display(),
            constants::KEY_LEN,
            bytes.len()
        );
        Ok(Zeroizing::new(bytes))
    }

    pub fn open_store(&self) -> Result<CookieStore> {
        let key = self.load_key()?;
        let path = self.store_path();
        CookieStore::open(&path, &key)
            .with_context(|| format!("open cookie store {}", path.display()))
    }
}

#[derive(Parser, Debug)]
#[command(
    name = "cookievault",
    version,
    about = "Encrypted cookie store for download sessions"
)]
pub struct Cli {
    /// Store root directory (default: $COOKIEVAULT_ROOT or /var/lib/cookievault)
    #[arg(long, global = true, value_name = "PATH")]
    pub root: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    pub fn run(self) -> Result<()> {
        let paths = StorePaths::resolve(self.root);
        let config = config::load(&paths.config_toml)?;
        let ctx = CliContext { paths, config };

        match self.command {
            Commands::Init(args) => init::run(&ctx, args),
            Commands::Set(args) => cookie::run_set(&ctx, args),
            Commands::Get(args) => cookie::run_get(&ctx, args),
            Commands::List(args) => cookie::run_list(&ctx, args),
            Commands::Delete(args) => cookie::run_delete(&ctx, args),
            Commands::Verify(args) => verify::run(&ctx, args),
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Initialize the store root and generate a master key
    Init(init::InitArgs),
    /// Store (or replace) a cookie
    Set(cookie::SetArgs),
    /// Decrypt and output a cookie value
    Get(cookie::GetArgs),
    /// List stored cookies
    List(cookie::ListArgs),
    /// Delete a cookie
    Delete(cookie::DeleteArgs),
    /// Check that every stored cookie decrypts under the current key
    Verify(verify::VerifyArgs),
}
