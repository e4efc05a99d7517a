use std::fs;
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::{PurposeError, Result};
use crate::symbol::{ModeTag, Purpose};

const CONFIG_FILE: &str = "purposes.toml";

/// Purpose used when no rule matches and the config does not name one.
pub const DEFAULT_PURPOSE: &str = "general";

/// Default config template with rich comments
const DEFAULT_CONFIG_TEMPLATE: &str = r#"# window-purpose configuration file
# Location: ~/.window-purpose/purposes.toml

# Purpose of buffers no rule below matches
default_purpose = "general"

# Major mode -> purpose. A mode matches its own entry and the entries of
# every mode it derives from. The first matching entry wins.
[modes]
# prog-mode = "edit"
# term-mode = "terminal"

# Exact buffer name -> purpose
[names]
# "*Messages*" = "logs"

# Buffer name regexp -> purpose. Patterns are searched anywhere in the name,
# anchor them with ^ and $ for whole-name matches. The first match wins.
[regexps]
# '^\*scratch\*$' = "scratch"
"#;

/// Serialized lookup tables for purpose classification.
///
/// Map order is the file order and decides ties between mode entries or
/// between regexps that match the same buffer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PurposeConfig {
    #[serde(default = "default_purpose")]
    pub default_purpose: Purpose,

    #[serde(default)]
    pub modes: IndexMap<ModeTag, Purpose>,

    #[serde(default)]
    pub names: IndexMap<String, Purpose>,

    #[serde(default)]
    pub regexps: IndexMap<String, Purpose>,
}

fn default_purpose() -> Purpose {
    Purpose::new(DEFAULT_PURPOSE)
}

impl Default for PurposeConfig {
    fn default() -> Self {
        Self {
            default_purpose: default_purpose(),
            modes: IndexMap::new(),
            names: IndexMap::new(),
            regexps: IndexMap::new(),
        }
    }
}

impl PurposeConfig {
    /// Load config from base directory
    pub fn load(base_dir: &Path) -> Result<Self> {
        let path = base_dir.join(CONFIG_FILE);
        if !path.exists() {
            return Ok(Self::default());
        }
        Self::load_file(&path)
    }

    /// Load config from an explicit file
    pub fn load_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| PurposeError::ConfigParse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// Save config to base directory
    pub fn save(&self, base_dir: &Path) -> Result<()> {
        let path = base_dir.join(CONFIG_FILE);
        fs::create_dir_all(base_dir)?;

        let content = toml::to_string_pretty(self)?;

        fs::write(&path, content)?;
        Ok(())
    }

    /// Get config file path
    pub fn path(base_dir: &Path) -> PathBuf {
        base_dir.join(CONFIG_FILE)
    }

    /// Initialize config with default template (rich comments)
    pub fn init(base_dir: &Path) -> Result<PathBuf> {
        let path = base_dir.join(CONFIG_FILE);
        fs::create_dir_all(base_dir)?;

        if !path.exists() {
            fs::write(&path, DEFAULT_CONFIG_TEMPLATE)?;
        }

        Ok(path)
    }

    /// Get a config value by dot-notation key
    pub fn get(&self, key: &str) -> Option<String> {
        if key == "default_purpose" {
            return Some(self.default_purpose.to_string());
        }
        let (table, entry) = key.split_once('.')?;
        let purpose = match table {
            "modes" => self.modes.get(&ModeTag::new(entry)),
            "names" => self.names.get(entry),
            "regexps" => self.regexps.get(entry),
            _ => None,
        }?;
        Some(purpose.to_string())
    }

    /// Set a config value by dot-notation key
    ///
    /// New entries are appended, so they lose ties against existing ones.
    /// Updating an existing entry keeps its position.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let value = value.trim();
        if value.is_empty() {
            return Err(PurposeError::EmptyPurpose {
                key: key.to_string(),
            });
        }
        let purpose = Purpose::new(value);
        if key == "default_purpose" {
            self.default_purpose = purpose;
            return Ok(());
        }
        match key.split_once('.') {
            Some(("modes", mode)) if !mode.is_empty() => {
                self.modes.insert(ModeTag::new(mode), purpose);
            }
            Some(("names", name)) if !name.is_empty() => {
                self.names.insert(name.to_string(), purpose);
            }
            Some(("regexps", pattern)) if !pattern.is_empty() => {
                self.regexps.insert(pattern.to_string(), purpose);
            }
            _ => {
                return Err(PurposeError::ConfigKeyNotFound {
                    key: key.to_string(),
                })
            }
        }
        Ok(())
    }

    /// Remove a table entry by dot-notation key, returning its old purpose
    pub fn unset(&mut self, key: &str) -> Result<Purpose> {
        let removed = match key.split_once('.') {
            Some(("modes", mode)) => self.modes.shift_remove(&ModeTag::new(mode)),
            Some(("names", name)) => self.names.shift_remove(name),
            Some(("regexps", pattern)) => self.regexps.shift_remove(pattern),
            _ => None,
        };
        removed.ok_or_else(|| PurposeError::ConfigKeyNotFound {
            key: key.to_string(),
        })
    }

    /// List all config keys with their current values
    pub fn list(&self) -> Vec<(String, String)> {
        let mut entries = vec![(
            "default_purpose".to_string(),
            self.default_purpose.to_string(),
        )];
        entries.extend(
            self.modes
                .iter()
                .map(|(mode, purpose)| (format!("modes.{mode}"), purpose.to_string())),
        );
        entries.extend(
            self.names
                .iter()
                .map(|(name, purpose)| (format!("names.{name}"), purpose.to_string())),
        );
        entries.extend(
            self.regexps
                .iter()
                .map(|(pattern, purpose)| (format!("regexps.{pattern}"), purpose.to_string())),
        );
        entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_load_missing_file_gives_default() {
        let dir = TempDir::new().unwrap();
        let config = PurposeConfig::load(dir.path()).unwrap();
        assert_eq!(config, PurposeConfig::default());
        assert_eq!(config.default_purpose, Purpose::new(DEFAULT_PURPOSE));
    }

    #[test]
    fn test_template_parses() {
        let dir = TempDir::new().unwrap();
        let path = PurposeConfig::init(dir.path()).unwrap();
        assert!(path.exists());
        let config = PurposeConfig::load(dir.path()).unwrap();
        assert_eq!(config, PurposeConfig::default());
    }

    #[test]
    fn test_init_keeps_existing_file() {
        let dir = TempDir::new().unwrap();
        let mut config = PurposeConfig::default();
        config.set("default_purpose", "edit").unwrap();
        config.save(dir.path()).unwrap();

        PurposeConfig::init(dir.path()).unwrap();
        let loaded = PurposeConfig::load(dir.path()).unwrap();
        assert_eq!(loaded.default_purpose, Purpose::new("edit"));
    }

    #[test]
    fn test_file_order_is_preserved() {
        let content = r#"
default_purpose = "edit"

[modes]
python-mode = "coding"
prog-mode = "edit"
text-mode = "writing"

[regexps]
'^\*scratch\*$' = "scratch"
'\.log$' = "logs"
"#;
        let config: PurposeConfig = toml::from_str(content).unwrap();
        let modes: Vec<_> = config.modes.keys().map(|m| m.name()).collect();
        assert_eq!(modes, vec!["python-mode", "prog-mode", "text-mode"]);
        let regexps: Vec<_> = config.regexps.keys().cloned().collect();
        assert_eq!(regexps, vec![r"^\*scratch\*$", r"\.log$"]);
    }

    #[test]
    fn test_save_load_keeps_order() {
        let dir = TempDir::new().unwrap();
        let mut config = PurposeConfig::default();
        config.set("modes.z-mode", "last").unwrap();
        config.set("modes.a-mode", "first").unwrap();
        config.save(dir.path()).unwrap();

        let loaded = PurposeConfig::load(dir.path()).unwrap();
        let modes: Vec<_> = loaded.modes.keys().map(|m| m.name()).collect();
        assert_eq!(modes, vec!["z-mode", "a-mode"]);
    }

    #[test]
    fn test_config_get_set() {
        let mut config = PurposeConfig::default();
        config.set("names.foo.py", "coding").unwrap();
        config.set("regexps.^\\*", "special").unwrap();

        assert_eq!(config.get("names.foo.py").as_deref(), Some("coding"));
        assert_eq!(config.get("regexps.^\\*").as_deref(), Some("special"));
        assert_eq!(config.get("default_purpose").as_deref(), Some(DEFAULT_PURPOSE));
        assert!(config.get("names.missing").is_none());
        assert!(config.get("bogus").is_none());
    }

    #[test]
    fn test_set_unknown_key() {
        let mut config = PurposeConfig::default();
        let err = config.set("colors.red", "x").unwrap_err();
        assert!(matches!(err, PurposeError::ConfigKeyNotFound { .. }));
        assert!(config.set("modes.", "x").is_err());
    }

    #[test]
    fn test_set_rejects_empty_purpose() {
        let mut config = PurposeConfig::default();
        for value in ["", "   "] {
            let err = config.set("names.x", value).unwrap_err();
            assert!(matches!(err, PurposeError::EmptyPurpose { ref key } if key == "names.x"));
            assert_eq!(err.exit_code(), 3);
        }
        assert!(config.set("default_purpose", "").is_err());
        assert!(config.get("names.x").is_none());
        assert_eq!(config.default_purpose, Purpose::new(DEFAULT_PURPOSE));
    }

    #[test]
    fn test_unset() {
        let mut config = PurposeConfig::default();
        config.set("modes.a-mode", "a").unwrap();
        config.set("modes.b-mode", "b").unwrap();
        config.set("modes.c-mode", "c").unwrap();

        assert_eq!(config.unset("modes.b-mode").unwrap(), Purpose::new("b"));
        let modes: Vec<_> = config.modes.keys().map(|m| m.name()).collect();
        assert_eq!(modes, vec!["a-mode", "c-mode"]);
        assert!(config.unset("modes.b-mode").is_err());
    }

    #[test]
    fn test_list() {
        let mut config = PurposeConfig::default();
        config.set("modes.python-mode", "coding").unwrap();
        let list = config.list();
        assert_eq!(list[0], ("default_purpose".to_string(), DEFAULT_PURPOSE.to_string()));
        assert!(list.contains(&("modes.python-mode".to_string(), "coding".to_string())));
    }

    #[test]
    fn test_parse_error_names_path() {
        let dir = TempDir::new().unwrap();
        fs::write(PurposeConfig::path(dir.path()), "modes = 3").unwrap();
        let err = PurposeConfig::load(dir.path()).unwrap_err();
        assert!(matches!(err, PurposeError::ConfigParse { .. }));
    }
}
