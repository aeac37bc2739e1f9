// Copyright 2023 System76 <info@system76.com>
// SPDX-License-Identifier: GPL-3.0-only

use clap::Parser;
use cosmic_logout_dialog::cli::{Args, Options};
use tracing_subscriber::EnvFilter;

const VERSION: &str = env!("CARGO_PKG_VERSION");

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();
    let _ = tracing_log::LogTracer::init();

    tracing::info!("Starting `cosmic-logout-dialog` with version {VERSION}");

    cosmic_logout_dialog::localize::localize();

    let options = Options::from(Args::parse());

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    let response = runtime.block_on(cosmic_logout_dialog::run(options))?;

    println!("{response}");
    Ok(())
}
