//! `htlc init` — Write a default configuration file.

use clap::Args;
use std::path::PathBuf;

use crate::config::HtlcConfig;

#[derive(Args, Debug)]
pub struct InitArgs {
    /// Directory to initialize (defaults to current directory).
    #[arg(default_value = ".")]
    pub dir: PathBuf,
}

pub fn run(args: &InitArgs) -> anyhow::Result<()> {
    let config_path = args.dir.join("htlc.toml");

    if config_path.exists() {
        anyhow::bail!("configuration file already exists at {}", config_path.display());
    }

    HtlcConfig::default().save(&config_path)?;
    tracing::info!(path = %config_path.display(), "wrote default config");
    println!("Initialized HTLC configuration at {}", config_path.display());

    Ok(())
}
