//! Build script for the labelscout CLI.
//!
//! Copies the `.env.example` template into the user's local data directory
//! (`<data_local_dir>/labelscout/.env.example`) so the configuration keys are
//! discoverable right after installation.

use std::{env, fs, path::PathBuf};

/// Copies the environment template next to where `config::load_env` looks for
/// the real `.env` file.
///
/// A missing template only produces a cargo warning; directory creation and
/// write failures abort the build.
fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("cargo:rerun-if-changed=.env.example");

    let manifest_dir = PathBuf::from(env::var("CARGO_MANIFEST_DIR")?);
    let template = manifest_dir.join(".env.example");

    let mut out_dir = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    out_dir.push("labelscout");
    fs::create_dir_all(&out_dir)?;

    if template.is_file() {
        let contents = fs::read_to_string(&template)?;
        fs::write(out_dir.join(".env.example"), contents)?;
    } else {
        println!(
            "cargo:warning=.env.example not found at {}",
            template.display()
        );
    }

    Ok(())
}
