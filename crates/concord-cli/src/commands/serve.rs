//! Serve command - start the validation web server.

use std::path::PathBuf;
use std::sync::Arc;

use colored::Colorize;
use concord::{CaptureExtractor, CompareStrategy, ReconConfig};

use crate::server::{app, state::AppState};

pub fn run(
    capture: PathBuf,
    port: u16,
    uploads: PathBuf,
    strategy: CompareStrategy,
    verbose: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    if !capture.exists() {
        return Err(format!("Capture file not found: {}", capture.display()).into());
    }

    std::fs::create_dir_all(&uploads)?;

    let extractor = Arc::new(CaptureExtractor::from_file(&capture)?);
    let config = ReconConfig::default().with_strategy(strategy);
    let state = AppState::new(uploads.clone(), extractor, config);

    println!(
        "{} http://localhost:{}",
        "Starting validation server at".cyan().bold(),
        port
    );
    println!();
    println!("  Capture: {}", capture.display());
    println!("  Uploads: {}", uploads.display());
    if verbose {
        println!("  Strategy: {}", strategy);
    }
    println!();
    println!("Press {} to stop the server", "Ctrl+C".yellow().bold());
    println!();

    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(async {
        tokio::spawn(async {
            tokio::signal::ctrl_c().await.ok();
            println!();
            println!("{}", "Shutting down...".yellow());
            std::process::exit(0);
        });

        if let Err(e) = app::run_server(state, port).await {
            eprintln!("Server error: {}", e);
        }
    });

    Ok(())
}
