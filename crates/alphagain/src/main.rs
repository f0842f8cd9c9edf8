//! Generate one personalized workout plan and print it.
//!
//! Reads the API key from `GOOGLE_API_KEY` (environment or `.env`).
//!
//! # Examples
//!
//! ```sh
//! # Defaults: Beginner, Weight Loss, Male, 25, 30 minutes, Bodyweight
//! alphagain
//!
//! # Pick every parameter
//! alphagain --level intermediate --goal "muscle gain" --gender female \
//!   --age 34 --duration 45 --equipment dumbbells
//!
//! # Save the plan as a PDF in ./plans
//! alphagain --goal endurance --export pdf --out-dir plans
//!
//! # Machine-readable output
//! alphagain --json
//! ```

use std::path::PathBuf;
use std::process;

use alphagain::export::{self, DocumentFormat};
use alphagain::logging;
use alphagain::prelude::*;
use clap::Parser;
use tracing_subscriber::layer::Identity;

/// Generate a personalized workout plan with Gemini.
///
/// Reads the API key from the GOOGLE_API_KEY environment variable.
#[derive(Parser)]
#[command(name = "alphagain", version)]
struct Cli {
    // ── Workout parameters ─────────────────────────────────────
    /// Fitness level: beginner, intermediate, advanced
    #[arg(long, default_value = "Beginner")]
    level: FitnessLevel,

    /// Goal: weight loss, muscle gain, endurance, general fitness
    #[arg(long, default_value = "Weight Loss")]
    goal: Goal,

    /// Gender: male, female, other
    #[arg(long, default_value = "Male")]
    gender: Gender,

    /// Age in years (12 – 90)
    #[arg(long, default_value_t = 25)]
    age: u32,

    /// Minutes available per day (10 – 120)
    #[arg(long, default_value_t = 30)]
    duration: u32,

    /// Equipment: bodyweight, dumbbells, resistance bands, full gym
    #[arg(long, default_value = "Bodyweight")]
    equipment: Equipment,

    // ── Model ──────────────────────────────────────────────────
    /// Model to use (overrides ALPHAGAIN_MODEL)
    #[arg(long)]
    model: Option<String>,

    /// Sampling temperature, 0.0 – 2.0 (overrides ALPHAGAIN_TEMPERATURE)
    #[arg(long)]
    temperature: Option<f32>,

    // ── Output ─────────────────────────────────────────────────
    /// Also save the plan as a document: pdf or markdown
    #[arg(long)]
    export: Option<DocumentFormat>,

    /// Directory for exported documents
    #[arg(long, default_value = ".")]
    out_dir: PathBuf,

    /// Print the history entry as JSON instead of plain text
    #[arg(long)]
    json: bool,
}

async fn run(cli: Cli) -> Result<(), String> {
    let mut config = AppConfig::from_env().map_err(|e| e.to_string())?;
    if let Some(model) = cli.model {
        config.model = model;
    }
    if let Some(temperature) = cli.temperature {
        if !(0.0..=2.0).contains(&temperature) {
            return Err(format!(
                "--temperature {temperature} is out of range (0.0 – 2.0)"
            ));
        }
        config.temperature = temperature;
    }

    if let Err(e) = logging::init(&config.log_file, Identity::new()) {
        eprintln!("Warning: {e}; {}", e.fallback());
    }

    let request = WorkoutRequest::new(
        cli.level,
        cli.goal,
        cli.gender,
        cli.age,
        cli.duration,
        cli.equipment,
    )
    .map_err(|e| e.to_string())?;

    let client = GeminiClient::from_config(&config).map_err(|e| e.to_string())?;
    let mut session = Session::new(WorkoutPipeline::new(client));
    let entry = session.generate(request).await.clone();
    session.end();

    if cli.json {
        let json = serde_json::to_string_pretty(&entry).map_err(|e| e.to_string())?;
        println!("{json}");
    } else if let Some(plan) = entry.result.plan() {
        println!("{plan}");
    }

    let GenerationResult::Success { .. } = entry.result else {
        return Err(entry.result.display_text().to_string());
    };

    if let Some(format) = cli.export {
        let doc = export::export(&entry.result, &entry.request, format).map_err(|e| e.to_string())?;
        let path = export::write_document(&doc, &cli.out_dir).map_err(|e| e.to_string())?;
        eprintln!("Saved {}", path.display());
    }

    Ok(())
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}
