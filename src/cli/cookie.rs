use crate::cli::CliContext;
use crate::constants;
use crate::models::cookie::Cookie;
use crate::util::fs as store_fs;
use anyhow::{bail, Context, Result};
use chrono::{DateTime, Duration, Local, Utc};
use clap::Args;
use comfy_table::{presets::UTF8_FULL, Attribute, Cell, Table};
use dialoguer::Password;
use serde::Serialize;
use std::io::{Read, Write};
use std::path::PathBuf;
use zeroize::Zeroizing;

fn parse_cookie_name(s: &str) -> Result<String, String> {
    if s.is_empty() {
        return Err("name cannot be empty".into());
    }
    if !s
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '.' || c == '_' || c == '-')
    {
        return Err("only [a-zA-Z0-9._-] allowed".into());
    }
    Ok(s.to_string())
}

#[derive(Args, Debug)]
pub struct SetArgs {
    /// Cookie name
    #[arg(value_parser = parse_cookie_name)]
    pub name: String,

    /// Cookie domain (scoping hint only)
    #[arg(long, default_value = "")]
    pub domain: String,

    /// Lifetime in seconds; sets both the expiry time and max-age
    #[arg(long, value_name = "SECS", default_value_t = 2_592_000)]
    pub expires_in: i64,

    /// Override max-age independently of --expires-in
    #[arg(long, value_name = "SECS")]
    pub max_age: Option<i64>,

    /// Mark the cookie HttpOnly
    #[arg(long)]
    pub http_only: bool,

    /// Read the value from stdin instead of interactive prompt
    #[arg(long)]
    pub from_stdin: bool,
}

#[derive(Args, Debug)]
pub struct GetArgs {
    /// Cookie name
    #[arg(value_parser = parse_cookie_name)]
    pub name: String,

    /// Output file (avoid stdout)
    #[arg(long, value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Allow stdout output (dangerous)
    #[arg(long)]
    pub confirm: bool,
}

#[derive(Args, Debug)]
pub struct ListArgs {
    /// Filter by domain
    #[arg(long)]
    pub domain: Option<String>,

    /// Output format: table|json
    #[arg(long, default_value = "table")]
    pub format: String,
}

#[derive(Args, Debug)]
pub struct DeleteArgs {
    /// Cookie name
    #[arg(value_parser = parse_cookie_name)]
    pub name: String,
}

#[derive(Serialize)]
struct ListItem {
    name: String,
    domain: String,
    expires: String,
    max_age: i64,
    http_only: bool,
    expired: bool,
}

pub fn run_set(ctx: &CliContext, args: SetArgs) -> Result<()> {
    let value = read_value(args.from_stdin, &args.name)?;
    let now = Utc::now();
    let cookie = Cookie {
        name: args.name.clone(),
        value: value.as_bytes().to_vec(),
        domain: args.domain,
        expires: now + Duration::seconds(args.expires_in),
        max_age: args.max_age.unwrap_or(args.expires_in),
        http_only: args.http_only,
    };

    let store = ctx.open_store()?;
    store.set(cookie)?;
    store.close()?;

    println!("Stored cookie '{}'", args.name);
    Ok(())
}

pub fn run_get(ctx: &CliContext, args: GetArgs) -> Result<()> {
    let store = ctx.open_store()?;
    let cookie = store.get(&args.name)?;
    store.close()?;

    if let Some(output) = args.output {
        std::fs::write(&output, &cookie.value)
            .with_context(|| format!("write {}", output.display()))?;
        store_fs::set_permissions(&output, constants::STORE_FILE_MODE)?;
        println!("Wrote {}", output.display());
        return Ok(());
    }

    if !args.confirm {
        bail!("refusing to print cookie value to stdout without --confirm");
    }
    let mut stdout = std::io::stdout();
    stdout.write_all(&cookie.value).context("write to stdout")?;
    stdout.flush().context("flush stdout")?;
    Ok(())
}

pub fn run_list(ctx: &CliContext, args: ListArgs) -> Result<()> {
    if args.format != "table" && args.format != "json" {
        bail!("invalid format: {} (use table|json)", args.format);
    }

    let store = ctx.open_store()?;
    let cookies = store.list()?;
    store.close()?;

    let now = Utc::now();
    let items: Vec<ListItem> = cookies
        .into_iter()
        .filter(|c| match &args.domain {
            Some(domain) => &c.domain == domain,
            None => true,
        })
        .map(|c| ListItem {
            expired: c.is_expired(now),
            expires: format_local(c.expires),
            name: c.name,
            domain: c.domain,
            max_age: c.max_age,
            http_only: c.http_only,
        })
        .collect();

    if args.format == "json" {
        let json = serde_json::to_string_pretty(&items).context("serialize list")?;
        println!("{}", json);
        return Ok(());
    }

    if items.is_empty() {
        println!("No cookies found");
        return Ok(());
    }

    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec![
        Cell::new("Name").add_attribute(Attribute::Bold),
        Cell::new("Domain").add_attribute(Attribute::Bold),
        Cell::new("Expires").add_attribute(Attribute::Bold),
        Cell::new("Max-Age").add_attribute(Attribute::Bold),
        Cell::new("HttpOnly").add_attribute(Attribute::Bold),
        Cell::new("Status").add_attribute(Attribute::Bold),
    ]);

    for item in items {
        let domain = if item.domain.is_empty() {
            "-".to_string()
        } else {
            item.domain
        };
        table.add_row(vec![
            item.name,
            domain,
            item.expires,
            item.max_age.to_string(),
            if item.http_only { "yes" } else { "no" }.to_string(),
            if item.expired { "expired" } else { "ok" }.to_string(),
        ]);
    }

    println!("{}", table);
    Ok(())
}

pub fn run_delete(ctx: &CliContext, args: DeleteArgs) -> Result<()> {
    let store = ctx.open_store()?;
    store.delete(&args.name)?;
    store.close()?;

    println!("Deleted cookie '{}'", args.name);
    Ok(())
}

fn read_value(from_stdin: bool, name: &str) -> Result<Zeroizing<String>> {
    let value = if from_stdin {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("read cookie value from stdin")?;
        Zeroizing::new(buf.trim_end_matches(['\r', '\n']).to_string())
    } else {
        Zeroizing::new(
            Password::new()
                .with_prompt(format!("Value for {}", name))
                .allow_empty_password(false)
                .interact()
                .context("read cookie value from prompt")?,
        )
    };
    if value.len() > constants::MAX_VALUE_SIZE {
        bail!(
            "cookie value exceeds maximum size ({} bytes, max {} bytes)",
            value.len(),
            constants::MAX_VALUE_SIZE
        );
    }
    Ok(value)
}

fn format_local(ts: DateTime<Utc>) -> String {
    let dt: DateTime<Local> = ts.into();
    dt.format("%Y-%m-%d %H:%M:%S").to_string()
}
