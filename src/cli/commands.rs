// ============================================================
// Layer 1 — CLI Commands and Arguments
// ============================================================
// Defines the subcommands `train`, `detect` and `encode`
// and all their configurable flags.
//
// clap's derive macros automatically generate:
//   - help text (--help)
//   - error messages for missing args
//   - type conversion (string → usize, f64, etc.)

use clap::{Args, Subcommand};
use std::path::PathBuf;

use crate::application::train_use_case::TrainConfig;
use crate::domain::grid::{DEFAULT_MAX_ROWS, DEFAULT_WIDTH};

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Train the grid CNN on a labelled CSV corpus
    Train(TrainArgs),

    /// Score texts with a trained checkpoint
    Detect(DetectArgs),

    /// Show how a text is laid out as a grid
    Encode(EncodeArgs),
}

/// All arguments for the `train` command.
#[derive(Args, Debug)]
pub struct TrainArgs {
    /// CSV with a text column followed by a 0/1 "generated" column
    #[arg(long, default_value = "data/textual_cnn/training/AI_Human.csv")]
    pub csv: String,

    /// Directory to save model checkpoints, config and metrics
    #[arg(long, default_value = "checkpoints")]
    pub checkpoint_dir: String,

    /// Use at most this many rows of the CSV (0 = all)
    #[arg(long, default_value_t = 10_000)]
    pub limit: usize,

    /// Characters per grid row
    #[arg(long, default_value_t = DEFAULT_WIDTH)]
    pub width: usize,

    /// Maximum grid rows; longer texts are truncated
    #[arg(long, default_value_t = DEFAULT_MAX_ROWS)]
    pub max_rows: usize,

    /// Number of samples processed together in one forward pass
    #[arg(long, default_value_t = 2)]
    pub batch_size: usize,

    /// Number of full passes through the training data
    #[arg(long, default_value_t = 10)]
    pub epochs: usize,

    /// Adam learning rate
    #[arg(long, default_value_t = 1e-3)]
    pub lr: f64,

    /// Size of each character embedding (input channels of the first conv)
    #[arg(long, default_value_t = 32)]
    pub emb_dim: usize,

    /// Output channels of the three conv blocks
    #[arg(long, value_delimiter = ',', default_values_t = [64, 128, 256])]
    pub conv_channels: Vec<usize>,

    /// Width of the hidden layer in the classification head
    #[arg(long, default_value_t = 128)]
    pub hidden: usize,

    /// Dropout probability in the classification head
    #[arg(long, default_value_t = 0.5)]
    pub dropout: f64,

    /// Fraction of samples held out for validation
    #[arg(long, default_value_t = 0.2)]
    pub val_fraction: f64,

    /// Seed for the split and the training shuffle
    #[arg(long, default_value_t = 37)]
    pub seed: u64,
}

/// Convert CLI TrainArgs into the application-layer TrainConfig.
/// The application layer never sees clap types.
impl TryFrom<TrainArgs> for TrainConfig {
    type Error = anyhow::Error;

    fn try_from(a: TrainArgs) -> Result<Self, Self::Error> {
        let conv_channels = match a.conv_channels.as_slice() {
            &[c1, c2, c3] => [c1, c2, c3],
            other => anyhow::bail!(
                "--conv-channels takes exactly 3 values, got {}",
                other.len()
            ),
        };

        Ok(TrainConfig {
            csv_path:       a.csv,
            checkpoint_dir: a.checkpoint_dir,
            sample_limit:   (a.limit > 0).then_some(a.limit),
            width:          a.width,
            max_rows:       a.max_rows,
            batch_size:     a.batch_size,
            epochs:         a.epochs,
            lr:             a.lr,
            emb_dim:        a.emb_dim,
            conv_channels,
            hidden:         a.hidden,
            dropout:        a.dropout,
            val_fraction:   a.val_fraction,
            seed:           a.seed,
        })
    }
}

/// All arguments for the `detect` command
#[derive(Args, Debug)]
pub struct DetectArgs {
    /// Text files to score (repeatable)
    #[arg(long = "file")]
    pub files: Vec<PathBuf>,

    /// Score this text directly
    #[arg(long)]
    pub text: Option<String>,

    /// Directory where checkpoints were saved during training
    #[arg(long, default_value = "checkpoints")]
    pub checkpoint_dir: String,
}

/// All arguments for the `encode` command
#[derive(Args, Debug)]
pub struct EncodeArgs {
    /// The text to encode
    #[arg(long)]
    pub text: String,

    /// Characters per grid row
    #[arg(long, default_value_t = DEFAULT_WIDTH)]
    pub width: usize,

    /// Maximum grid rows
    #[arg(long, default_value_t = DEFAULT_MAX_ROWS)]
    pub max_rows: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::Cli;
    use clap::Parser;

    #[test]
    fn test_train_defaults_match_config_defaults() {
        let cli = Cli::parse_from(["text-grid-cnn", "train"]);
        let Commands::Train(args) = cli.command else { panic!("expected train") };

        let cfg = TrainConfig::try_from(args).unwrap();
        let defaults = TrainConfig::default();
        assert_eq!(cfg.width, defaults.width);
        assert_eq!(cfg.max_rows, defaults.max_rows);
        assert_eq!(cfg.conv_channels, defaults.conv_channels);
        assert_eq!(cfg.sample_limit, Some(10_000));
        assert_eq!(cfg.seed, 37);
    }

    #[test]
    fn test_train_flags() {
        let cli = Cli::parse_from([
            "text-grid-cnn", "train",
            "--width", "64", "--max-rows", "16",
            "--conv-channels", "8,16,32", "--limit", "0",
        ]);
        let Commands::Train(args) = cli.command else { panic!("expected train") };

        let cfg = TrainConfig::try_from(args).unwrap();
        assert_eq!(cfg.width, 64);
        assert_eq!(cfg.max_rows, 16);
        assert_eq!(cfg.conv_channels, [8, 16, 32]);
        assert_eq!(cfg.sample_limit, None);
    }

    #[test]
    fn test_wrong_channel_count_is_rejected() {
        let cli = Cli::parse_from(["text-grid-cnn", "train", "--conv-channels", "8,16"]);
        let Commands::Train(args) = cli.command else { panic!("expected train") };
        assert!(TrainConfig::try_from(args).is_err());
    }

    #[test]
    fn test_detect_accepts_repeated_files() {
        let cli = Cli::parse_from([
            "text-grid-cnn", "detect", "--file", "a.txt", "--file", "b.txt",
        ]);
        let Commands::Detect(args) = cli.command else { panic!("expected detect") };
        assert_eq!(args.files, vec![PathBuf::from("a.txt"), PathBuf::from("b.txt")]);
        assert!(args.text.is_none());
    }
}
