//! Terminal front end for Pilot.
//!
//! The `pilot` binary is a thin clap layer over this library: loading
//! levels, formatting diagnostics and runs, and logging setup live here.

pub mod logging;
pub mod report;

use anyhow::{Context, Result};
use pilot_types::WorldConfig;
use std::fs;
use std::path::Path;

/// Load a level from a JSON file, or the reference level when no path is
/// given. Missing fields take their defaults.
pub fn load_config(path: Option<&Path>) -> Result<WorldConfig> {
    let Some(path) = path else {
        return Ok(WorldConfig::default());
    };
    let raw = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    WorldConfig::from_json(&raw).with_context(|| format!("load level {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pilot_types::Position;
    use std::path::PathBuf;

    fn scratch_file(name: &str, contents: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!("pilot-cli-{}-{name}", std::process::id()));
        fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn test_no_path_is_reference_level() {
        assert_eq!(load_config(None).unwrap(), WorldConfig::default());
    }

    #[test]
    fn test_load_partial_level() {
        let path = scratch_file("partial.json", r#"{ "target": { "x": 3, "y": 3 } }"#);
        let config = load_config(Some(&path)).unwrap();
        fs::remove_file(&path).ok();
        assert_eq!(config.target, Position::new(3, 3));
        assert_eq!(config.grid_size, 6);
    }

    #[test]
    fn test_missing_file_names_path() {
        let err = load_config(Some(Path::new("/definitely/not/here.json"))).unwrap_err();
        assert!(format!("{err:#}").contains("/definitely/not/here.json"));
    }

    #[test]
    fn test_bad_json_is_reported() {
        let path = scratch_file("bad.json", "{ grid_size: ");
        let err = load_config(Some(&path)).unwrap_err();
        fs::remove_file(&path).ok();
        assert!(format!("{err:#}").contains("invalid configuration JSON"));
    }
}
