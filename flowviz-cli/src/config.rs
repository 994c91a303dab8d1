//! Startup configuration: the external programs the renderer drives.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

pub const CONFIG_FILE_NAME: &str = "flowviz.toml";

/// A direct mapping to a `flowviz.toml`.
///
/// Both entries are required. Without a layout engine and a viewer there is
/// nothing useful to do with a finished graph, so a missing or malformed
/// file is fatal before any input is read.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// GraphViz compatible layout engine executable.
    pub dot: String,
    /// Command used to open the rendered drawing.
    pub browser: String,
}

impl Config {
    /// Read the configuration from `path`, or from `flowviz.toml` in the
    /// working directory when no path is given.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = path.unwrap_or_else(|| Path::new(CONFIG_FILE_NAME));
        let raw = fs::read_to_string(path)
            .with_context(|| format!("could not read configuration file {}", path.display()))?;
        let config = toml::from_str(&raw)
            .with_context(|| format!("unusable configuration in {}", path.display()))?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn both_programs_parse() {
        let config: Config = toml::from_str(
            "dot = \"/usr/bin/dot\"\n\
             browser = \"firefox\"\n",
        )
        .expect("config parses");
        assert_eq!(config.dot, "/usr/bin/dot");
        assert_eq!(config.browser, "firefox");
    }

    #[test]
    fn a_missing_entry_is_rejected() {
        let result = toml::from_str::<Config>("dot = \"/usr/bin/dot\"\n");
        assert!(result.is_err());
    }

    #[test]
    fn unknown_entries_are_rejected() {
        let result = toml::from_str::<Config>(
            "dot = \"dot\"\nbrowser = \"firefox\"\nviewer = \"eog\"\n",
        );
        assert!(result.is_err());
    }

    #[test]
    fn a_missing_file_is_fatal() {
        let result = Config::load(Some(Path::new("/nonexistent/flowviz.toml")));
        assert!(result.is_err());
    }
}
