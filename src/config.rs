// Copyright 2025 The cardbox authors
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use std::fs::read_to_string;
use std::path::Path;

use serde::Deserialize;

use crate::error::Fallible;

pub const DEFAULT_PORT: u16 = 8000;

/// Optional per-collection settings, read from `cardbox.toml` in the
/// collection directory.
#[derive(Deserialize, Debug, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_open_browser")]
    pub open_browser: bool,
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

fn default_open_browser() -> bool {
    true
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            open_browser: true,
        }
    }
}

impl Config {
    /// Load the config file from `directory`, falling back to defaults when
    /// it does not exist. A file that exists but does not parse is an error.
    pub fn load(directory: &Path) -> Fallible<Self> {
        let path = directory.join("cardbox.toml");
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = read_to_string(&path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use std::fs::write;

    use tempfile::tempdir;

    use super::*;

    #[test]
    fn test_missing_file_means_defaults() -> Fallible<()> {
        let dir = tempdir()?;
        let config = Config::load(dir.path())?;
        assert_eq!(config, Config::default());
        Ok(())
    }

    #[test]
    fn test_partial_file() -> Fallible<()> {
        let dir = tempdir()?;
        write(dir.path().join("cardbox.toml"), "port = 9999\n")?;
        let config = Config::load(dir.path())?;
        assert_eq!(config.port, 9999);
        assert!(config.open_browser);
        Ok(())
    }

    #[test]
    fn test_malformed_file_is_an_error() -> Fallible<()> {
        let dir = tempdir()?;
        write(dir.path().join("cardbox.toml"), "port = \"many\"\n")?;
        assert!(Config::load(dir.path()).is_err());
        Ok(())
    }

    #[test]
    fn test_unknown_keys_rejected() -> Fallible<()> {
        let dir = tempdir()?;
        write(dir.path().join("cardbox.toml"), "prot = 9999\n")?;
        assert!(Config::load(dir.path()).is_err());
        Ok(())
    }
}
