pub mod accounts;
pub mod error;
pub mod template;

pub use accounts::{read_accounts, select_accounts};
pub use error::*;
pub use template::{TEMPLATE_FILE_NAME, write_template};

use ncp_sweep_cloud::FilterSet;
use std::path::{Path, PathBuf};

/// Environment variable that points straight at a filter file.
pub const FILTER_PATH_ENV: &str = "NCP_SWEEP_FILTER_PATH";

const FILTER_CANDIDATES: [&str; 3] = [
    "ncp-sweep.filter.json",
    "ncp-sweep.filter.yaml",
    "ncp-sweep.filter.yml",
];

/// Locate a filter file when none was given on the command line.
///
/// Search order:
/// 1. `NCP_SWEEP_FILTER_PATH` (used only if the file exists)
/// 2. current directory: ncp-sweep.filter.json, .yaml, .yml
/// 3. `~/.config/ncp-sweep/filter.json`
pub fn find_filter_file() -> Result<Option<PathBuf>> {
    if let Ok(filter_path) = std::env::var(FILTER_PATH_ENV) {
        let path = PathBuf::from(filter_path);
        if path.exists() {
            return Ok(Some(path));
        }
    }

    let current_dir = std::env::current_dir()?;
    for filename in &FILTER_CANDIDATES {
        let path = current_dir.join(filename);
        if path.exists() {
            return Ok(Some(path));
        }
    }

    if let Some(config_dir) = dirs::config_dir() {
        let global = config_dir.join("ncp-sweep").join("filter.json");
        if global.exists() {
            return Ok(Some(global));
        }
    }

    Ok(None)
}

/// Parse a filter file. YAML for `.yaml`/`.yml`, JSON otherwise.
///
/// Unknown kind keys and unknown fields inside a block are rejected.
pub fn load_filter(path: &Path) -> Result<FilterSet> {
    if !path.exists() {
        return Err(ConfigError::FilterFileNotFound(path.to_path_buf()));
    }
    let content = std::fs::read_to_string(path)?;
    let invalid = |message: String| ConfigError::InvalidFilter {
        path: path.to_path_buf(),
        message,
    };

    let is_yaml = matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("yaml") | Some("yml")
    );
    if is_yaml {
        serde_yaml::from_str(&content).map_err(|e| invalid(e.to_string()))
    } else {
        serde_json::from_str(&content).map_err(|e| invalid(e.to_string()))
    }
}

/// The filter set for a run: the explicit path if given, else whatever
/// [`find_filter_file`] turns up. No file at all means no filtering.
pub fn resolve_filter(explicit: Option<&Path>) -> Result<Option<FilterSet>> {
    let path = match explicit {
        Some(path) => Some(path.to_path_buf()),
        None => find_filter_file()?,
    };
    match path {
        Some(path) => {
            tracing::debug!(path = %path.display(), "Loading filter file");
            load_filter(&path).map(Some)
        }
        None => Ok(None),
    }
}
