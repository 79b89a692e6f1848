use crate::cli::CliContext;
use crate::constants;
use crate::util::fs as store_fs;
use anyhow::{Context, Result};
use clap::Args;
use rand::rngs::OsRng;
use rand::RngCore;
use std::io::Write;
use zeroize::Zeroizing;

#[derive(Args, Debug)]
pub struct InitArgs {}

pub fn run(ctx: &CliContext, _args: InitArgs) -> Result<()> {
    let paths = &ctx.paths;
    store_fs::ensure_dir(&paths.root, constants::STORE_DIR_MODE)?;

    if paths.key_file.exists() {
        println!("Key file already present at {}", paths.key_file.display());
    } else {
        let mut key = Zeroizing::new([0u8; constants::KEY_LEN]);
        OsRng.fill_bytes(&mut *key);
        write_key_file(ctx, &key[..])?;
        println!("Generated key file {}", paths.key_file.display());
    }

    // Create the (empty) container so the first open is a valid store.
    let store = ctx.open_store()?;
    store.close()?;

    println!("cookie store initialized at {}", paths.root.display());
    Ok(())
}

fn write_key_file(ctx: &CliContext, key: &[u8]) -> Result<()> {
    let mut tmp = tempfile::Builder::new()
        .prefix(".key-")
        .tempfile_in(&ctx.paths.root)
        .context("create temp key file")?;
    tmp.write_all(key).context("write key file")?;
    tmp.flush().context("flush key file")?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let perm = std::fs::Permissions::from_mode(constants::STORE_FILE_MODE);
        tmp.as_file()
            .set_permissions(perm)
            .context("set permissions on key file")?;
    }

    tmp.persist(&ctx.paths.key_file)
        .map_err(|err| anyhow::anyhow!("persist key file: {}", err))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::paths::StorePaths;
    use crate::models::config::ConfigFile;
    use tempfile::TempDir;

    fn test_ctx() -> (TempDir, CliContext) {
        let dir = TempDir::new().unwrap();
        let ctx = CliContext {
            paths: StorePaths::from_root(dir.path().to_path_buf()),
            config: ConfigFile::default(),
        };
        (dir, ctx)
    }

    #[test]
    fn test_write_key_file_round_trip() {
        let (_dir, ctx) = test_ctx();
        let mut key = Zeroizing::new([0u8; constants::KEY_LEN]);
        OsRng.fill_bytes(&mut *key);
        write_key_file(&ctx, &key[..]).unwrap();

        let loaded = ctx.load_key().unwrap();
        assert_eq!(&loaded[..], &key[..]);
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mode = std::fs::metadata(&ctx.paths.key_file)
                .unwrap()
                .permissions()
                .mode();
            assert_eq!(mode & 0o777, 0o600);
        }
    }
}
