//! Engine configuration loaded from the environment.

use std::path::{Path, PathBuf};

use directories::ProjectDirs;

/// Default `tracing` filter when neither `RUST_LOG` nor `SHEETKEEP_LOG` is set.
pub const DEFAULT_LOG_FILTER: &str = "sheetkeep_engine=info";

/// Used when the platform has no config directory.
const FALLBACK_STORAGE_FILE: &str = "sheetkeep_storage.json";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    /// Path of the file-backed key-value store.
    pub storage_path: PathBuf,
    /// Log filter used when `RUST_LOG` is absent.
    pub log_filter: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            storage_path: default_storage_path(),
            log_filter: DEFAULT_LOG_FILTER.to_string(),
        }
    }
}

impl EngineConfig {
    /// Read `SHEETKEEP_STORAGE_PATH` and `SHEETKEEP_LOG` from the process
    /// environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup. Blank values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let var = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        Self {
            storage_path: var("SHEETKEEP_STORAGE_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(default_storage_path),
            log_filter: var("SHEETKEEP_LOG").unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string()),
        }
    }

    /// Overrides the storage path (the `--storage` flag).
    pub fn with_storage_path(mut self, path: Option<PathBuf>) -> Self {
        if let Some(path) = path {
            self.storage_path = path;
        }
        self
    }
}

/// Platform config directory joined with `storage.json`, or a file in the
/// working directory when there is none.
pub fn default_storage_path() -> PathBuf {
    if let Some(dirs) = ProjectDirs::from("io", "sheetkeep", "sheetkeep") {
        dirs.config_dir().join("storage.json")
    } else {
        PathBuf::from(FALLBACK_STORAGE_FILE)
    }
}

/// Load `.env.local` then `.env` from the repository root.
///
/// Variables already set in the environment win over both files.
pub fn load_dotenv_from_repo_root() {
    let repo_root = Path::new(env!("CARGO_MANIFEST_DIR")).join("..").join("..");

    // Prefer local overrides.
    for filename in [".env.local", ".env"] {
        let path = repo_root.join(filename);
        if path.exists() {
            let _ = dotenvy::from_path(path);
        }
    }
}
