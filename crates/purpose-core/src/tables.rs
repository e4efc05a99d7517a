//! Compiled lookup tables
//!
//! Built once from a [`PurposeConfig`] and read by the classifier on every
//! lookup. Regexps are compiled up front so a bad pattern fails the reload
//! instead of a classification.

use indexmap::{IndexMap, IndexSet};
use regex::Regex;

use crate::config::PurposeConfig;
use crate::error::{PurposeError, Result};
use crate::registry;
use crate::symbol::{ModeTag, Purpose};

#[derive(Debug, Clone)]
pub struct PurposeTables {
    default_purpose: Purpose,
    modes: IndexMap<ModeTag, Purpose>,
    names: IndexMap<String, Purpose>,
    regexps: Vec<(Regex, Purpose)>,
    known: IndexSet<Purpose>,
}

impl PurposeTables {
    pub fn compile(config: &PurposeConfig) -> Result<Self> {
        let regexps = config
            .regexps
            .iter()
            .map(|(pattern, purpose)| {
                Regex::new(pattern)
                    .map(|re| (re, *purpose))
                    .map_err(|source| PurposeError::InvalidPattern {
                        pattern: pattern.clone(),
                        source,
                    })
            })
            .collect::<Result<Vec<_>>>()?;

        let known = registry::collect(
            config.default_purpose,
            config
                .modes
                .values()
                .chain(config.names.values())
                .chain(config.regexps.values())
                .copied(),
        );

        Ok(Self {
            default_purpose: config.default_purpose,
            modes: config.modes.clone(),
            names: config.names.clone(),
            regexps,
            known,
        })
    }

    pub fn default_purpose(&self) -> Purpose {
        self.default_purpose
    }

    /// Mode entries in tie-break order.
    pub fn modes(&self) -> impl Iterator<Item = (ModeTag, Purpose)> + '_ {
        self.modes.iter().map(|(mode, purpose)| (*mode, *purpose))
    }

    pub fn name_purpose(&self, name: &str) -> Option<Purpose> {
        self.names.get(name).copied()
    }

    /// Regexp entries in tie-break order.
    pub fn regexps(&self) -> impl Iterator<Item = (&Regex, Purpose)> + '_ {
        self.regexps.iter().map(|(re, purpose)| (re, *purpose))
    }

    /// Default purpose plus every purpose named by a table, first-seen order.
    pub fn known_purposes(&self) -> &IndexSet<Purpose> {
        &self.known
    }
}

impl Default for PurposeTables {
    fn default() -> Self {
        let default_purpose = PurposeConfig::default().default_purpose;
        Self {
            default_purpose,
            modes: IndexMap::new(),
            names: IndexMap::new(),
            regexps: Vec::new(),
            known: registry::collect(default_purpose, std::iter::empty()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compile_keeps_regexp_order() {
        let mut config = PurposeConfig::default();
        config.set("regexps.b$", "second").unwrap();
        config.set("regexps.^a", "first").unwrap();

        let tables = PurposeTables::compile(&config).unwrap();
        let patterns: Vec<_> = tables.regexps().map(|(re, _)| re.as_str().to_string()).collect();
        assert_eq!(patterns, vec!["b$", "^a"]);
    }

    #[test]
    fn test_invalid_regexp_is_reported() {
        let mut config = PurposeConfig::default();
        config.set("regexps.([unclosed", "broken").unwrap();

        let err = PurposeTables::compile(&config).unwrap_err();
        match err {
            PurposeError::InvalidPattern { pattern, .. } => assert_eq!(pattern, "([unclosed"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_default_tables() {
        let tables = PurposeTables::default();
        assert_eq!(tables.default_purpose(), Purpose::new("general"));
        assert_eq!(tables.known_purposes().len(), 1);
        assert_eq!(tables.modes().count(), 0);
    }
}
