//! Sheetkeep engine library.
//!
//! The composing layer around the pure rules core in `sheetkeep-domain`.
//!
//! ## Structure
//!
//! - `roster` - Application state: the character collection, active record and settings
//! - `infrastructure/` - Storage port and its adapters
//! - `exchange` - JSON import and export
//! - `sheet` - Printable sheet document
//! - `cli` - Command-line word parsing for the `sheetkeep` binary
//! - `config` - Environment configuration

pub mod cli;
pub mod config;
pub mod exchange;
pub mod infrastructure;
pub mod roster;
pub mod sheet;

pub use config::EngineConfig;
pub use exchange::{ImportError, EXPORT_FILE_NAME};
pub use roster::{EditOutcome, Persisted, Roster, RosterError, SheetView};
pub use sheet::PrintableSheet;
