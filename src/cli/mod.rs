// ============================================================
// Layer 1 — CLI / Presentation Layer
// ============================================================
// The entry point for all user interaction.
// Uses the `clap` crate to parse command line arguments.
// All business logic is delegated to Layer 2 (application).
//
// Three commands are supported:
//   1. `train`  — trains the model on a labelled CSV corpus
//   2. `detect` — loads a checkpoint and scores texts
//   3. `encode` — prints the grid a text is turned into

pub mod commands;

use anyhow::Result;
use clap::Parser;
use commands::{Commands, DetectArgs, EncodeArgs, TrainArgs};

use crate::domain::grid::{Grid, GridConfig};
use crate::domain::vocabulary::id_to_char;

#[derive(Parser, Debug)]
#[command(
    name = "text-grid-cnn",
    version,
    about = "Detect AI-generated prose by classifying text laid out as a character grid."
)]
pub struct Cli {
    /// The subcommand to run
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Match on the subcommand and dispatch to the correct use case.
    pub fn run(self) -> Result<()> {
        match self.command {
            Commands::Train(args)  => run_train(args),
            Commands::Detect(args) => run_detect(args),
            Commands::Encode(args) => run_encode(args),
        }
    }
}

fn run_train(args: TrainArgs) -> Result<()> {
    use crate::application::train_use_case::{TrainConfig, TrainUseCase};

    tracing::info!("Starting training on corpus: {}", args.csv);

    let use_case = TrainUseCase::new(TrainConfig::try_from(args)?);
    use_case.execute()?;

    println!("Training complete. Checkpoint saved.");
    Ok(())
}

fn run_detect(args: DetectArgs) -> Result<()> {
    use crate::application::detect_use_case::{score_files, DetectUseCase};
    use crate::domain::traits::AuthorshipClassifier;

    anyhow::ensure!(
        !args.files.is_empty() || args.text.is_some(),
        "Nothing to score: pass --file <PATH> and/or --text <TEXT>"
    );

    let use_case = DetectUseCase::new(&args.checkpoint_dir)?;

    if let Some(text) = &args.text {
        let percent = use_case.ai_percent(text)?;
        println!("Predicted AI probability of text: {:.2}%", percent);
    }

    for score in score_files(&use_case, &args.files) {
        println!("Predicted AI probability of '{}': {:.2}%", score.name, score.ai_percent);
    }
    Ok(())
}

fn run_encode(args: EncodeArgs) -> Result<()> {
    let grid = GridConfig::new(args.width, args.max_rows)?.encode(&args.text);
    let (rows, width) = grid.shape();

    println!("Grid shape: ({rows}, {width})");
    for line in render_rows(&grid) {
        println!("{line}");
    }
    Ok(())
}

/// One line per grid row: the IDs, then the row drawn back as text.
/// PAD cells (and characters that mapped to PAD) are drawn as '·'.
fn render_rows(grid: &Grid) -> Vec<String> {
    grid.iter_rows()
        .enumerate()
        .map(|(i, row)| {
            let ids: Vec<String> = row.iter().map(|id| format!("{id:>2}")).collect();
            let text: String = row.iter().map(|&id| id_to_char(id).unwrap_or('·')).collect();
            format!("{i:>3} | {} | {text}", ids.join(" "))
        })
        .collect()
}
