//! Sheetkeep - command-line character sheet.

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use sheetkeep_domain::{CharacterId, CharacterUpdate};
use sheetkeep_engine::cli::{
    parse_attack_field, parse_bool, parse_index, parse_set, suggestion_note,
};
use sheetkeep_engine::config::{load_dotenv_from_repo_root, EngineConfig};
use sheetkeep_engine::infrastructure::FileStorage;
use sheetkeep_engine::{EditOutcome, PrintableSheet, Roster, EXPORT_FILE_NAME};

#[derive(Parser)]
#[command(name = "sheetkeep")]
#[command(about = "D&D 5e character sheets kept in a local store")]
#[command(version)]
struct Cli {
    /// Storage file (overrides SHEETKEEP_STORAGE_PATH)
    #[arg(long, global = true)]
    storage: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List characters; the active one is marked
    List,
    /// Create a character and make it active
    New {
        /// Name (defaults to "New Character")
        #[arg(default_value = "")]
        name: String,
    },
    /// Make a character active
    Select { id: String },
    /// Copy the active character
    Duplicate,
    /// Delete the active character
    Delete,
    /// Delete every character and start over
    Reset,
    /// Print the active character's sheet
    Show {
        /// Print the derived and constraint models as JSON instead
        #[arg(long)]
        json: bool,
    },
    /// Edit a field, e.g. `set abilities dex 16` or `set class Rogue`
    Set {
        /// Field path followed by the value
        #[arg(num_args = 2.., required = true, allow_hyphen_values = true)]
        args: Vec<String>,
    },
    /// Add, remove or edit attacks
    Attack {
        #[command(subcommand)]
        action: AttackAction,
    },
    /// Update sheet settings
    Settings {
        /// Let class-granted saving throws be unchecked
        #[arg(long, value_parser = parse_bool)]
        allow_class_override: Option<bool>,
    },
    /// Write every character to a JSON file
    Export {
        #[arg(default_value = EXPORT_FILE_NAME)]
        path: PathBuf,
    },
    /// Replace every character with those in a JSON file
    Import { path: PathBuf },
}

#[derive(Subcommand)]
enum AttackAction {
    /// Append a new attack row
    Add,
    /// Remove the attack at a position (0-based)
    Remove { index: String },
    /// Set one field of an attack
    Set {
        index: String,
        field: String,
        #[arg(allow_hyphen_values = true)]
        value: String,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    load_dotenv_from_repo_root();
    let config = EngineConfig::from_env().with_storage_path(cli.storage.clone());

    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| config.log_filter.as_str().into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    tracing::debug!(path = %config.storage_path.display(), "Opening storage");
    let mut roster = Roster::load(FileStorage::open(&config.storage_path));

    match cli.command {
        Command::List => {
            for character in roster.characters() {
                let marker = if &character.id == roster.active_id() { "*" } else { " " };
                let class = character
                    .class
                    .map(|c| c.to_string())
                    .unwrap_or_else(|| "No class".to_string());
                println!(
                    "{} {}  {} ({}, level {})",
                    marker, character.id, character.name, class, character.level
                );
            }
        }
        Command::New { name } => {
            let created = roster.create(&name);
            report_persisted(created.persisted);
            println!("Created {}", created.value);
        }
        Command::Select { id } => {
            roster.select(&CharacterId::from(id.as_str()))?;
            println!("Selected {}", roster.active().name);
        }
        Command::Duplicate => {
            let copy = roster.duplicate_active();
            report_persisted(copy.persisted);
            println!("Created {} ({})", roster.active().name, copy.value);
        }
        Command::Delete => {
            let removed = roster.delete_active();
            report_persisted(removed.persisted);
            println!("Deleted {}; active is now {}", removed.value, roster.active().name);
        }
        Command::Reset => {
            let fresh = roster.reset_all();
            report_persisted(fresh.persisted);
            println!("All characters removed; created {}", fresh.value);
        }
        Command::Show { json } => {
            let view = roster.view();
            if json {
                println!("{}", serde_json::to_string_pretty(&view)?);
                return Ok(());
            }
            print!("{}", PrintableSheet::build(roster.active(), &view.derived));
            println!();
            if let Some(badge) = view.constraints.save_badge() {
                println!("{}", badge);
            }
            if let Some(tally) = view.constraints.skill_tally {
                println!("Class skills: {} / {}", tally.used, tally.limit);
            }
            if let Some(tally) = view.constraints.expertise_tally {
                println!("Expertise: {} / {}", tally.used, tally.limit);
            }
        }
        Command::Set { mut args } => {
            let value = args.pop().unwrap_or_default();
            let update = parse_set(&args, &value)?;
            if let Some(note) = suggestion_note(&update) {
                eprintln!("note: {}", note);
            }
            apply(&mut roster, update)?;
        }
        Command::Attack { action } => {
            let update = match action {
                AttackAction::Add => CharacterUpdate::AddAttack,
                AttackAction::Remove { index } => CharacterUpdate::RemoveAttack(parse_index(&index)?),
                AttackAction::Set {
                    index,
                    field,
                    value,
                } => parse_attack_field(&index, &field, &value)?,
            };
            apply(&mut roster, update)?;
        }
        Command::Settings {
            allow_class_override,
        } => {
            if let Some(allow) = allow_class_override {
                report_persisted(roster.set_allow_class_override(allow));
            }
            println!(
                "allowClassOverride: {}",
                roster.settings().allow_class_override
            );
        }
        Command::Export { path } => {
            let json = roster.export_json()?;
            std::fs::write(&path, json)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            println!(
                "Exported {} characters to {}",
                roster.characters().len(),
                path.display()
            );
        }
        Command::Import { path } => {
            let text = std::fs::read_to_string(&path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            let imported = roster.import_json(&text)?;
            report_persisted(imported.persisted);
            println!("Imported {} characters", imported.value);
        }
    }

    Ok(())
}

fn apply(
    roster: &mut Roster<FileStorage>,
    update: CharacterUpdate,
) -> anyhow::Result<()> {
    let EditOutcome { warning, persisted } = roster.apply(update)?;
    if let Some(warning) = warning {
        eprintln!("warning: {}", warning);
    }
    report_persisted(persisted);
    Ok(())
}

fn report_persisted(persisted: bool) {
    if !persisted {
        eprintln!("warning: changes could not be saved and will be lost on exit");
    }
}
