//! Store integrity verification.

use crate::cli::CliContext;
use anyhow::Result;
use clap::Args;

#[derive(Args, Debug)]
pub struct VerifyArgs {}

/// Decrypt every stored cookie under the current key and report.
pub fn run(ctx: &CliContext, _args: VerifyArgs) -> Result<()> {
    let store = ctx.open_store()?;
    let cookies = store.list()?;

    let mut passed = 0u32;
    let mut failed = 0u32;
    for cookie in &cookies {
        match store.get(&cookie.name) {
            Ok(_) => {
                println!("  [PASS] {}", cookie.name);
                passed += 1;
            }
            Err(e) => {
                println!("  [FAIL] {}: {}", cookie.name, e);
                failed += 1;
            }
        }
    }
    store.close()?;

    println!();
    if failed == 0 {
        println!("Verify: {} passed, 0 failed", passed);
    } else {
        println!("Verify: {} passed, {} failed", passed, failed);
        std::process::exit(1);
    }
    Ok(())
}
