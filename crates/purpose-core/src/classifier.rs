//! Purpose Classifier
//!
//! Resolves a buffer to its purpose. Rules are tried in a fixed order and
//! the first one that matches decides:
//!
//! 1. dummy buffer name
//! 2. major mode (including modes it derives from)
//! 3. exact buffer name
//! 4. buffer name regexp
//! 5. default purpose

use std::collections::HashSet;
use std::fmt;

use indexmap::IndexSet;
use tracing::{debug, info};

use crate::config::PurposeConfig;
use crate::dummy;
use crate::error::{PurposeError, Result};
use crate::host::{BufferId, Buffers};
use crate::registry;
use crate::symbol::{ModeTag, Purpose};
use crate::tables::PurposeTables;

/// Which rule produced a classification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchedRule {
    Dummy,
    /// The mode table key that matched, which may be an ancestor of the
    /// buffer's own mode.
    Mode(ModeTag),
    Name,
    /// Source text of the regexp that matched.
    Regexp(String),
    Default,
}

impl fmt::Display for MatchedRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Dummy => f.write_str("dummy buffer"),
            Self::Mode(mode) => write!(f, "mode {mode}"),
            Self::Name => f.write_str("exact name"),
            Self::Regexp(pattern) => write!(f, "regexp {pattern}"),
            Self::Default => f.write_str("default"),
        }
    }
}

/// Purpose of a buffer together with the rule that decided it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    pub purpose: Purpose,
    pub rule: MatchedRule,
}

/// Purpose classifier over a set of compiled tables.
#[derive(Debug, Clone, Default)]
pub struct PurposeClassifier {
    tables: PurposeTables,
}

impl PurposeClassifier {
    pub fn new(tables: PurposeTables) -> Self {
        Self { tables }
    }

    pub fn from_config(config: &PurposeConfig) -> Result<Self> {
        Ok(Self::new(PurposeTables::compile(config)?))
    }

    /// Replace the tables with ones compiled from `config`.
    ///
    /// On error the current tables stay in place.
    pub fn reload(&mut self, config: &PurposeConfig) -> Result<()> {
        let tables = PurposeTables::compile(config)?;
        info!(
            purposes = tables.known_purposes().len(),
            "reloaded purpose tables"
        );
        self.tables = tables;
        Ok(())
    }

    pub fn tables(&self) -> &PurposeTables {
        &self.tables
    }

    pub fn default_purpose(&self) -> Purpose {
        self.tables.default_purpose()
    }

    /// Purpose of a live buffer.
    pub fn classify<H: Buffers + ?Sized>(&self, host: &H, buffer: BufferId) -> Result<Purpose> {
        self.explain(host, buffer).map(|c| c.purpose)
    }

    /// Purpose of a live buffer and the rule that decided it.
    pub fn explain<H: Buffers + ?Sized>(&self, host: &H, buffer: BufferId) -> Result<Classification> {
        let name = host
            .buffer_name(buffer)
            .ok_or(PurposeError::DeadBuffer { id: buffer })?;
        let mode = host
            .buffer_mode(buffer)
            .ok_or(PurposeError::DeadBuffer { id: buffer })?;

        let classification = self.classify_parts(host, name, mode);
        debug!(
            buffer = name,
            %mode,
            purpose = %classification.purpose,
            rule = %classification.rule,
            "classified buffer"
        );
        Ok(classification)
    }

    /// Classify by name and mode alone. `host` only answers mode ancestry.
    pub fn classify_parts<H: Buffers + ?Sized>(
        &self,
        host: &H,
        name: &str,
        mode: ModeTag,
    ) -> Classification {
        if let Some(purpose) = dummy::decode(name) {
            return Classification {
                purpose,
                rule: MatchedRule::Dummy,
            };
        }

        if let Some((key, purpose)) = self
            .tables
            .modes()
            .find(|(key, _)| derives_from(host, mode, *key))
        {
            return Classification {
                purpose,
                rule: MatchedRule::Mode(key),
            };
        }

        if let Some(purpose) = self.tables.name_purpose(name) {
            return Classification {
                purpose,
                rule: MatchedRule::Name,
            };
        }

        if let Some((re, purpose)) = self.tables.regexps().find(|(re, _)| re.is_match(name)) {
            return Classification {
                purpose,
                rule: MatchedRule::Regexp(re.as_str().to_string()),
            };
        }

        Classification {
            purpose: self.tables.default_purpose(),
            rule: MatchedRule::Default,
        }
    }

    /// All purposes known to the current tables, default first.
    pub fn all_purposes(&self) -> &IndexSet<Purpose> {
        self.tables.known_purposes()
    }

    /// All known purposes sorted by name.
    pub fn sorted_purposes(&self) -> Vec<Purpose> {
        registry::sorted(self.tables.known_purposes())
    }
}

/// Whether `mode` is `ancestor` or derives from it through any number of
/// parents. A cycle in the host's parent table ends the walk.
pub fn derives_from<H: Buffers + ?Sized>(host: &H, mode: ModeTag, ancestor: ModeTag) -> bool {
    let mut seen = HashSet::new();
    let mut current = Some(mode);
    while let Some(m) = current {
        if m == ancestor {
            return true;
        }
        if !seen.insert(m) {
            return false;
        }
        current = host.parent_mode(m);
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::Session;

    fn classifier(config: &str) -> PurposeClassifier {
        let config: PurposeConfig = toml::from_str(config).unwrap();
        PurposeClassifier::from_config(&config).unwrap()
    }

    fn session() -> Session {
        let mut session = Session::new("*scratch*", ModeTag::new("fundamental-mode"));
        session.set_parent_mode(ModeTag::new("python-mode"), ModeTag::new("prog-mode"));
        session.set_parent_mode(ModeTag::new("rust-mode"), ModeTag::new("prog-mode"));
        session.set_parent_mode(ModeTag::new("prog-mode"), ModeTag::new("fundamental-mode"));
        session
    }

    fn add(session: &mut Session, name: &str, mode: &str) -> BufferId {
        session.create_buffer(name, ModeTag::new(mode)).unwrap()
    }

    #[test]
    fn test_scratch_and_python_scenario() {
        let classifier = classifier(
            r#"
default_purpose = "edit"
[modes]
python-mode = "coding"
[regexps]
'^\*scratch\*$' = "scratch"
"#,
        );
        let mut session = session();
        let scratch = session.find_buffer("*scratch*").unwrap();
        let py = add(&mut session, "foo.py", "python-mode");

        assert_eq!(classifier.classify(&session, scratch).unwrap(), Purpose::new("scratch"));
        assert_eq!(classifier.classify(&session, py).unwrap(), Purpose::new("coding"));
    }

    #[test]
    fn test_dummy_beats_every_table() {
        let classifier = classifier(
            r#"
[modes]
fundamental-mode = "mode-wins"
[names]
"*pu-dummy-logs*" = "name-wins"
[regexps]
"dummy" = "regexp-wins"
"#,
        );
        let mut session = session();
        let dummy = add(&mut session, "*pu-dummy-logs*", "fundamental-mode");

        let result = classifier.explain(&session, dummy).unwrap();
        assert_eq!(result.purpose, Purpose::new("logs"));
        assert_eq!(result.rule, MatchedRule::Dummy);
    }

    #[test]
    fn test_mode_beats_name_and_regexp() {
        let classifier = classifier(
            r#"
[modes]
rust-mode = "coding"
[names]
"main.rs" = "entry"
[regexps]
'\.rs$' = "rust-files"
"#,
        );
        let mut session = session();
        let main = add(&mut session, "main.rs", "rust-mode");
        let text = add(&mut session, "main.rs<2>", "text-mode");

        assert_eq!(classifier.classify(&session, main).unwrap(), Purpose::new("coding"));
        // no mode match, name differs, regexp is anchored to the end
        assert_eq!(classifier.classify(&session, text).unwrap(), Purpose::new("general"));
    }

    #[test]
    fn test_name_beats_regexp() {
        let classifier = classifier(
            r#"
[names]
"*Messages*" = "logs"
[regexps]
'^\*' = "special"
"#,
        );
        let mut session = session();
        let messages = add(&mut session, "*Messages*", "text-mode");
        let help = add(&mut session, "*Help*", "text-mode");

        assert_eq!(classifier.classify(&session, messages).unwrap(), Purpose::new("logs"));
        assert_eq!(classifier.classify(&session, help).unwrap(), Purpose::new("special"));
    }

    #[test]
    fn test_derived_mode_matches_ancestor_key() {
        let classifier = classifier(
            r#"
[modes]
prog-mode = "edit"
"#,
        );
        let mut session = session();
        let py = add(&mut session, "a.py", "python-mode");

        let result = classifier.explain(&session, py).unwrap();
        assert_eq!(result.purpose, Purpose::new("edit"));
        assert_eq!(result.rule, MatchedRule::Mode(ModeTag::new("prog-mode")));
    }

    #[test]
    fn test_first_mode_key_in_table_order_wins() {
        let mut session = session();
        let py = add(&mut session, "a.py", "python-mode");

        let ancestor_first = classifier(
            r#"
[modes]
prog-mode = "edit"
python-mode = "coding"
"#,
        );
        assert_eq!(ancestor_first.classify(&session, py).unwrap(), Purpose::new("edit"));

        let exact_first = classifier(
            r#"
[modes]
python-mode = "coding"
prog-mode = "edit"
"#,
        );
        assert_eq!(exact_first.classify(&session, py).unwrap(), Purpose::new("coding"));
    }

    #[test]
    fn test_first_regexp_in_table_order_wins() {
        let classifier = classifier(
            r#"
[regexps]
"log" = "logs"
"^build" = "build"
"#,
        );
        let mut session = session();
        let buffer = add(&mut session, "build.log", "text-mode");

        let result = classifier.explain(&session, buffer).unwrap();
        assert_eq!(result.purpose, Purpose::new("logs"));
        assert_eq!(result.rule, MatchedRule::Regexp("log".to_string()));
    }

    #[test]
    fn test_regexp_is_searched_not_anchored() {
        let classifier = classifier(
            r#"
[regexps]
"term" = "terminal"
"#,
        );
        let mut session = session();
        let buffer = add(&mut session, "*ansi-term*<1>", "term-mode");
        assert_eq!(classifier.classify(&session, buffer).unwrap(), Purpose::new("terminal"));
    }

    #[test]
    fn test_unmatched_buffer_gets_default() {
        let classifier = classifier(
            r#"
default_purpose = "edit"
[modes]
python-mode = "coding"
"#,
        );
        let mut session = session();
        let buffer = add(&mut session, "notes.txt", "text-mode");

        let result = classifier.explain(&session, buffer).unwrap();
        assert_eq!(result.purpose, Purpose::new("edit"));
        assert_eq!(result.rule, MatchedRule::Default);
    }

    #[test]
    fn test_dead_buffer_is_an_error() {
        let classifier = PurposeClassifier::default();
        let session = session();
        let err = classifier.classify(&session, BufferId(999)).unwrap_err();
        assert!(matches!(err, PurposeError::DeadBuffer { id } if id == BufferId(999)));
    }

    #[test]
    fn test_mode_cycle_terminates() {
        let mut session = session();
        session.set_parent_mode(ModeTag::new("a-mode"), ModeTag::new("b-mode"));
        session.set_parent_mode(ModeTag::new("b-mode"), ModeTag::new("a-mode"));

        assert!(derives_from(&session, ModeTag::new("a-mode"), ModeTag::new("b-mode")));
        assert!(!derives_from(&session, ModeTag::new("a-mode"), ModeTag::new("c-mode")));
    }

    #[test]
    fn test_reload_swaps_tables() {
        let mut classifier = PurposeClassifier::default();
        let mut session = session();
        let py = add(&mut session, "a.py", "python-mode");
        assert_eq!(classifier.classify(&session, py).unwrap(), Purpose::new("general"));

        let mut config = PurposeConfig::default();
        config.set("modes.python-mode", "coding").unwrap();
        classifier.reload(&config).unwrap();
        assert_eq!(classifier.classify(&session, py).unwrap(), Purpose::new("coding"));
        assert!(classifier.all_purposes().contains(&Purpose::new("coding")));
    }

    #[test]
    fn test_failed_reload_keeps_old_tables() {
        let mut config = PurposeConfig::default();
        config.set("modes.python-mode", "coding").unwrap();
        let mut classifier = PurposeClassifier::from_config(&config).unwrap();

        let mut broken = config.clone();
        broken.set("regexps.(", "broken").unwrap();
        assert!(classifier.reload(&broken).is_err());

        let mut session = session();
        let py = add(&mut session, "a.py", "python-mode");
        assert_eq!(classifier.classify(&session, py).unwrap(), Purpose::new("coding"));
        assert!(!classifier.all_purposes().contains(&Purpose::new("broken")));
    }

    #[test]
    fn test_all_purposes_contains_default_and_table_values() {
        let classifier = classifier(
            r#"
default_purpose = "edit"
[modes]
python-mode = "coding"
rust-mode = "coding"
[names]
"*Messages*" = "logs"
[regexps]
"term" = "terminal"
"edit" = "edit"
"#,
        );
        let names: Vec<_> = classifier.all_purposes().iter().map(|p| p.name()).collect();
        assert_eq!(names, vec!["edit", "coding", "logs", "terminal"]);

        let sorted: Vec<_> = classifier.sorted_purposes().iter().map(|p| p.name()).collect();
        assert_eq!(sorted, vec!["coding", "edit", "logs", "terminal"]);
    }
}
