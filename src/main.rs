use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use ply::notation;
use ply::position::{self, PositionRecord};
use ply::{GameConfig, GameController, ShakmatyOracle};
use std::path::PathBuf;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "ply")]
#[command(about = "Validate positions, replay movetext and convert move notation")]
struct Cli {
    /// Configuration file (defaults to the platform config directory)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check a position record and show its fields
    ///
    /// Example: ply validate "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq e3 0 1"
    Validate {
        /// Six-field position record
        fen: String,
    },

    /// Play movetext and print the resulting position and transcript
    ///
    /// Examples:
    ///   ply replay "1. e4 e5 2. Nf3 Nc6"
    ///   ply replay "1... e5 2. Nf3" --fen "<record with black to move>"
    Replay {
        /// Movetext, with or without move numbers
        movetext: String,
        /// Starting position (defaults to the standard one)
        #[arg(short, long)]
        fen: Option<String>,
    },

    /// Convert a move token between algebraic and coordinate notation
    ///
    /// Examples:
    ///   ply convert Nf3
    ///   ply convert g1f3
    Convert {
        /// Algebraic (Nf3) or coordinate (g1f3) token
        token: String,
        /// Position the move is played from (defaults to the standard one)
        #[arg(short, long)]
        fen: Option<String>,
    },

    /// Show the effective configuration
    Config,
}

fn load_config(path: Option<&PathBuf>) -> Result<GameConfig> {
    match path {
        Some(path) => GameConfig::load(path),
        None => GameConfig::load_or_default(),
    }
}

fn starting_position(fen: Option<&str>) -> Result<PositionRecord> {
    match fen {
        Some(text) => position::parse(text).context("Invalid starting position"),
        None => Ok(PositionRecord::starting()),
    }
}

fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let config = load_config(cli.config.as_ref()).context("Failed to load configuration")?;

    match cli.command {
        Commands::Validate { fen } => {
            let report = position::validate(&fen);
            if let Some(e) = &report.error {
                error!("Rejected fields: {:?}", report.fields);
                anyhow::bail!("Invalid position: {}", e);
            }
            let record = report.into_result()?;
            let info = position::derive_info(&record);
            println!("{}", record.to_ascii());
            println!("Side to move: {}", info.side_to_move);
            println!("Castling: {}", record.castling_rights().to_fen());
            println!(
                "En passant: {}",
                info.en_passant
                    .map_or_else(|| "-".to_string(), |sq| sq.to_string())
            );
            println!(
                "Halfmove clock: {}, fullmove number: {}",
                info.halfmove_clock, info.fullmove_number
            );
        }
        Commands::Replay { movetext, fen } => {
            let mut game = GameController::with_config(config.with_history(true));
            let count = game
                .load_transcript(&movetext, fen.as_deref())
                .into_result()
                .context("Failed to replay movetext")?;
            info!("Replayed {} moves", count);

            let transcript = game.transcript().into_result()?;
            println!("{}", transcript);
            println!("{}", game.fen());
            let status = game.status().into_result()?;
            if status.checkmate {
                println!("Checkmate");
            } else if status.stalemate {
                println!("Stalemate");
            } else if status.draw {
                println!("Draw");
            } else if status.check {
                println!("Check");
            }
        }
        Commands::Convert { token, fen } => {
            let position = starting_position(fen.as_deref())?;
            let oracle = ShakmatyOracle::new();
            let normalized = notation::normalize(&token);
            let converted = if notation::is_coordinate(&normalized) {
                notation::uci_to_algebraic(&oracle, &position, &normalized)
            } else {
                notation::algebraic_to_uci(&oracle, &position, &token, config.strict_mode)
            }
            .with_context(|| format!("Cannot convert '{}'", token))?;
            println!("{}", converted);
        }
        Commands::Config => {
            let content =
                toml::to_string_pretty(&config).context("Failed to serialize configuration")?;
            println!("{}", content);
            if cli.config.is_none() {
                if let Ok(path) = GameConfig::default_config_file() {
                    info!("Default config file: {}", path.display());
                }
            }
        }
    }

    Ok(())
}
