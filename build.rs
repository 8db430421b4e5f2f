//! Build script for tunegrab.
//!
//! Copies the `.env.example` configuration template into the user's local data
//! directory so the binary finds a ready-to-edit example next to the place it
//! reads its `.env` from.

use std::{env, fs, path::PathBuf};

/// Copies `.env.example` to `<data_local_dir>/tunegrab/.env.example`.
///
/// # Destination Location
///
/// - Linux: `~/.local/share/tunegrab/.env.example`
/// - macOS: `~/Library/Application Support/tunegrab/.env.example`
/// - Windows: `%LOCALAPPDATA%/tunegrab/.env.example`
///
/// Missing templates or an unwritable data directory only produce cargo
/// warnings, the build itself never fails because of them.
fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("cargo:rerun-if-changed=.env.example");

    let manifest_dir = PathBuf::from(env::var("CARGO_MANIFEST_DIR")?);
    let env_example_path = manifest_dir.join(".env.example");

    if !env_example_path.is_file() {
        println!(
            "cargo:warning=.env.example not found at {}",
            env_example_path.display()
        );
        return Ok(());
    }

    let mut out_dir = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    out_dir.push("tunegrab");

    let copied = fs::create_dir_all(&out_dir).and_then(|_| {
        let contents = fs::read_to_string(&env_example_path)?;
        fs::write(out_dir.join(".env.example"), contents)
    });

    if let Err(e) = copied {
        println!(
            "cargo:warning=could not copy .env.example to {}: {}",
            out_dir.display(),
            e
        );
    }

    Ok(())
}
