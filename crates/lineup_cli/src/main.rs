//! Lineup CLI
//!
//! Inspect the formation catalog, classify and encode coordinates, render a
//! stored lineup and replay board event scripts against it.

mod logging;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;

use lineup_core::{
    catalog, classify, codec::decode_with, encode_within, render, AssignmentManager, BoardEvent,
    EditorConfig, FormationCatalog, LineupRecord, Modality, PlacementBoard,
};

#[derive(Parser)]
#[command(name = "lineup")]
#[command(about = "Tactical lineup placement tools", long_about = None)]
struct Cli {
    /// Editor configuration (YAML)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Debug logging for the lineup crates
    #[arg(short, long, global = true, default_value = "false")]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List formations and slot layouts
    Formations {
        /// Modality tag (e.g. "society-6"); all modalities when omitted
        #[arg(long)]
        modality: Option<String>,
    },

    /// Sector label of a raw coordinate
    Classify {
        #[arg(long, allow_hyphen_values = true)]
        top: f64,
        #[arg(long, allow_hyphen_values = true)]
        left: f64,
    },

    /// Custom position code of a dropped coordinate (clamped to the board margin)
    Encode {
        #[arg(long, allow_hyphen_values = true)]
        top: f64,
        #[arg(long, allow_hyphen_values = true)]
        left: f64,
    },

    /// Resolve a slot name or custom code against a formation
    Decode {
        code: String,
        #[arg(long)]
        formation: String,
    },

    /// Empty lineup record for the configured starting formation
    New {
        /// Modality tag; the configured default when omitted
        #[arg(long)]
        modality: Option<String>,
    },

    /// Board markers of a stored lineup
    Render {
        /// Lineup record JSON file
        #[arg(long)]
        lineup: PathBuf,

        /// Edit-mode rendering (free slots and ghosts)
        #[arg(long, default_value = "false")]
        editable: bool,
    },

    /// Apply a board event script to a stored lineup
    Replay {
        /// Lineup record JSON file
        #[arg(long)]
        lineup: PathBuf,

        /// JSON array of board events
        #[arg(long)]
        events: PathBuf,

        /// Write the resulting record here instead of stdout
        #[arg(long)]
        out: Option<PathBuf>,
    },

    /// Field and bench rows of a stored lineup
    Rows {
        #[arg(long)]
        lineup: PathBuf,
    },

    /// JSON schema of the lineup record
    Schema,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let config = match &cli.config {
        Some(path) => EditorConfig::load(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => EditorConfig::default(),
    };
    let external = config.load_catalog().context("failed to load formation catalog")?;
    let catalog = external.as_ref().unwrap_or_else(|| catalog());

    let output = run(cli.command, &config, catalog)?;
    println!("{}", output);
    Ok(())
}

fn run(command: Commands, config: &EditorConfig, catalog: &FormationCatalog) -> Result<String> {
    match command {
        Commands::Formations { modality } => {
            let modalities = match modality {
                Some(tag) => vec![tag.parse::<Modality>()?],
                None => catalog.modalities().collect(),
            };
            list_formations(catalog, &modalities)
        }

        Commands::Classify { top, left } => Ok(classify(top, left).to_string()),

        Commands::Encode { top, left } => {
            Ok(encode_within(config.board.margin(), top, left).to_string())
        }

        Commands::Decode { code, formation } => {
            let decoded = decode_with(catalog, &code, &formation);
            Ok(serde_json::to_string_pretty(&decoded)?)
        }

        Commands::New { modality } => {
            let modality = match modality {
                Some(tag) => tag.parse::<Modality>()?,
                None => config.default_modality,
            };
            let config = EditorConfig { default_modality: modality, ..config.clone() };
            let formation = config.starting_formation(catalog)?;
            let manager = AssignmentManager::with_formation(catalog, modality, formation.as_str())?;
            Ok(manager.to_record().to_json_pretty()?)
        }

        Commands::Render { lineup, editable } => {
            let record = read_record(catalog, &lineup)?;
            let manager = AssignmentManager::from_record(catalog, &record)?;
            let markers = render(&manager, editable);
            Ok(serde_json::to_string_pretty(&markers)?)
        }

        Commands::Replay { lineup, events, out } => {
            let record = read_record(catalog, &lineup)?;
            let script = std::fs::read_to_string(&events)
                .with_context(|| format!("failed to read events {}", events.display()))?;
            let events: Vec<BoardEvent> =
                serde_json::from_str(&script).context("events must be a JSON array of board events")?;
            let (transitions, result) = replay(catalog, config, &record, &events)?;

            let json = result.to_json_pretty()?;
            match out {
                Some(path) => {
                    std::fs::write(&path, &json)
                        .with_context(|| format!("failed to write {}", path.display()))?;
                    info!(path = %path.display(), "replayed lineup written");
                    Ok(transitions.join("\n"))
                }
                None => Ok(format!("{}\n{}", transitions.join("\n"), json)),
            }
        }

        Commands::Rows { lineup } => {
            let record = read_record(catalog, &lineup)?;
            let manager = AssignmentManager::from_record(catalog, &record)?;
            Ok(serde_json::to_string_pretty(&manager.to_rows())?)
        }

        Commands::Schema => Ok(serde_json::to_string_pretty(&LineupRecord::json_schema())?),
    }
}

fn read_record(catalog: &FormationCatalog, path: &Path) -> Result<LineupRecord> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read lineup {}", path.display()))?;
    let record = LineupRecord::from_json(&json)
        .with_context(|| format!("invalid lineup record {}", path.display()))?;
    for issue in record.validate(catalog) {
        tracing::warn!(%issue, "lineup record");
    }
    Ok(record)
}

fn list_formations(catalog: &FormationCatalog, modalities: &[Modality]) -> Result<String> {
    let mut lines = Vec::new();
    for modality in modalities {
        lines.push(format!("{} - {}", modality.id(), modality.display_name()));
        for formation in catalog.formations_for(*modality)? {
            let slots = catalog
                .layout(formation.as_str())
                .iter()
                .map(|p| {
                    let label = catalog.label_for(p.slot.as_str());
                    format!("{}({} {}/{})", p.slot, label, p.top, p.left)
                })
                .collect::<Vec<_>>();
            lines.push(format!("  {:<8} {}", formation.as_str(), slots.join(" ")));
        }
    }
    Ok(lines.join("\n"))
}

/// Drive an editable board over `events`; one JSON line per transition.
fn replay(
    catalog: &FormationCatalog,
    config: &EditorConfig,
    record: &LineupRecord,
    events: &[BoardEvent],
) -> Result<(Vec<String>, LineupRecord)> {
    let mut manager = AssignmentManager::from_record(catalog, record)?;
    let mut board = PlacementBoard::new(config.board, true);

    let mut transitions = Vec::with_capacity(events.len());
    for event in events {
        let transition = board.apply(&mut manager, event);
        transitions.push(serde_json::to_string(&transition)?);
    }
    // A script may stop mid-drag.
    board.teardown();

    info!(events = events.len(), "board script replayed");
    Ok((transitions, manager.to_record()))
}
