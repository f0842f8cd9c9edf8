//! Interactive workout planner in the terminal.
//!
//! Reads the API key from `GOOGLE_API_KEY` (environment or `.env`).
//!
//! # Examples
//!
//! ```sh
//! alphagain-tui
//!
//! # Different model, exports into ./plans
//! alphagain-tui --model gemini-2.5-flash --out-dir plans
//! ```

use std::path::PathBuf;
use std::process;

use alphagain::logging;
use alphagain::prelude::*;
use alphagain_tui::{TuiConfig, UiTracingLayer, run_tui};
use clap::Parser;

/// Interactive workout planner powered by Gemini.
///
/// Reads the API key from the GOOGLE_API_KEY environment variable.
#[derive(Parser)]
#[command(name = "alphagain-tui", version)]
struct Cli {
    /// Model to use (overrides ALPHAGAIN_MODEL)
    #[arg(long)]
    model: Option<String>,

    /// Sampling temperature, 0.0 – 2.0 (overrides ALPHAGAIN_TEMPERATURE)
    #[arg(long)]
    temperature: Option<f32>,

    /// Directory for exported documents
    #[arg(long, default_value = ".")]
    out_dir: PathBuf,
}

fn main() {
    let cli = Cli::parse();

    let mut config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {e}");
            process::exit(1);
        }
    };
    if let Some(model) = cli.model {
        config.model = model;
    }
    if let Some(temperature) = cli.temperature {
        if !(0.0..=2.0).contains(&temperature) {
            eprintln!("Error: --temperature {temperature} is out of range (0.0 – 2.0)");
            process::exit(1);
        }
        config.temperature = temperature;
    }

    // Set up tracing → log file + TUI log buffer.
    let (tracing_layer, log_buffer) = UiTracingLayer::new();
    if let Err(e) = logging::init(&config.log_file, tracing_layer) {
        eprintln!("Warning: {e}; {}", e.fallback());
    }

    let runtime = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("Error: failed to start async runtime: {e}");
            process::exit(1);
        }
    };

    let client = match GeminiClient::from_config(&config) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error: failed to create API client: {e}");
            process::exit(1);
        }
    };

    let mut session = Session::new(WorkoutPipeline::new(client));
    let tui_config = TuiConfig {
        model: config.model.clone(),
        export_dir: cli.out_dir,
        log_buffer: Some(log_buffer),
    };

    let outcome = run_tui(&mut session, &runtime, &tui_config);
    let history = session.end();

    if let Err(e) = outcome {
        eprintln!("TUI error: {e}");
        process::exit(1);
    }
    println!(
        "Generated {} of {} requested plan(s) this session.",
        history.success_count(),
        history.len()
    );
}
