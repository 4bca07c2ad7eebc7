//! Per-instance parser options
//!
//! Defaults are maximally restrictive: every macro family is disabled and
//! no grammar relaxation is active. Callers opt in explicitly, either with
//! the builder-style setters or by loading a TOML fragment.

use crate::config::constants::compile_time::expression::DEFAULT_MAX_DEPTH;
use crate::error::ConfigError;
use serde::{Deserialize, Serialize};

/// Built-in macro gating: disabled, blanket-enabled, or an allow-list of
/// macro base names (numbered references are matched against the base).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum BuiltinMacros {
    Enabled(bool),
    List(Vec<String>),
}

impl BuiltinMacros {
    /// Check if any built-in macro may appear at all
    pub fn any_enabled(&self) -> bool {
        match self {
            BuiltinMacros::Enabled(enabled) => *enabled,
            BuiltinMacros::List(names) => !names.is_empty(),
        }
    }

    /// Check if a specific macro base name is allowed
    pub fn allows(&self, name: &str) -> bool {
        match self {
            BuiltinMacros::Enabled(enabled) => *enabled,
            BuiltinMacros::List(names) => names.iter().any(|n| n == name),
        }
    }
}

impl Default for BuiltinMacros {
    fn default() -> Self {
        BuiltinMacros::Enabled(false)
    }
}

/// Options shared by the whole parser family.
///
/// A parser instance holds one immutable copy; distinct instances are safe
/// to use concurrently from multiple threads.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ParserOptions {
    /// Accept user macros `{$NAME}` / `{$NAME:context}`
    pub user_macros: bool,

    /// Accept low-level-discovery macros `{#NAME}` and their function form
    pub lld_macros: bool,

    /// Accept built-in macros `{NAME.PATH}`, optionally allow-listed
    pub builtin_macros: BuiltinMacros,

    /// Accept function-id macros `{12345}` standing in for function calls
    pub collapsed_expression: bool,

    /// Calculated-item grammar: wildcard hosts and keys become legal
    pub calculated: bool,

    /// Accept an empty host segment in metric queries (`//key`)
    pub empty_host: bool,

    /// Accept `{HOST.HOST}` as a metric query host
    pub host_macro: bool,

    /// Accept numbered host macros (`{HOST.HOST1}`..`{HOST.HOST9}`)
    pub host_macro_numbered: bool,

    /// Maximum nesting depth for groups and math function arguments
    pub max_depth: usize,
}

impl Default for ParserOptions {
    fn default() -> Self {
        Self {
            user_macros: false,
            lld_macros: false,
            builtin_macros: BuiltinMacros::default(),
            collapsed_expression: false,
            calculated: false,
            empty_host: false,
            host_macro: false,
            host_macro_numbered: false,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl ParserOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_user_macros(mut self, enabled: bool) -> Self {
        self.user_macros = enabled;
        self
    }

    pub fn with_lld_macros(mut self, enabled: bool) -> Self {
        self.lld_macros = enabled;
        self
    }

    pub fn with_builtin_macros(mut self, builtin: BuiltinMacros) -> Self {
        self.builtin_macros = builtin;
        self
    }

    pub fn with_collapsed_expression(mut self, enabled: bool) -> Self {
        self.collapsed_expression = enabled;
        self
    }

    pub fn with_calculated(mut self, enabled: bool) -> Self {
        self.calculated = enabled;
        self
    }

    pub fn with_empty_host(mut self, enabled: bool) -> Self {
        self.empty_host = enabled;
        self
    }

    pub fn with_host_macro(mut self, enabled: bool) -> Self {
        self.host_macro = enabled;
        self
    }

    pub fn with_host_macro_numbered(mut self, enabled: bool) -> Self {
        self.host_macro_numbered = enabled;
        self
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Load options from a TOML fragment, e.g. a `[parser]` table lifted
    /// out of a larger configuration file. Unknown keys are rejected.
    pub fn from_toml_str(input: &str) -> Result<Self, ConfigError> {
        let options: ParserOptions = toml::from_str(input)?;
        options.validate()?;
        Ok(options)
    }

    /// Validate option consistency
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_depth == 0 {
            return Err(ConfigError::InvalidMaxDepth);
        }
        if self.host_macro_numbered && !self.host_macro {
            return Err(ConfigError::NumberedHostMacroWithoutHostMacro);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use std::io::Write;

    #[test]
    fn test_defaults_are_restrictive() {
        let options = ParserOptions::default();

        assert!(!options.user_macros);
        assert!(!options.lld_macros);
        assert!(!options.builtin_macros.any_enabled());
        assert!(!options.collapsed_expression);
        assert!(!options.calculated);
        assert!(!options.empty_host);
        assert!(!options.host_macro);
        assert_eq!(options.max_depth, DEFAULT_MAX_DEPTH);
    }

    #[test]
    fn test_builtin_allow_list() {
        let builtin = BuiltinMacros::List(vec!["TRIGGER.VALUE".to_string()]);

        assert!(builtin.any_enabled());
        assert!(builtin.allows("TRIGGER.VALUE"));
        assert!(!builtin.allows("HOST.HOST"));
    }

    #[test]
    fn test_builder_chaining() {
        let options = ParserOptions::new()
            .with_user_macros(true)
            .with_calculated(true)
            .with_max_depth(8);

        assert!(options.user_macros);
        assert!(options.calculated);
        assert_eq!(options.max_depth, 8);
        assert!(!options.lld_macros);
    }

    #[test]
    fn test_from_toml_str() {
        let options = ParserOptions::from_toml_str(
            r#"
            user_macros = true
            builtin_macros = ["TRIGGER.VALUE", "HOST.NAME"]
            max_depth = 16
            "#,
        )
        .unwrap();

        assert!(options.user_macros);
        assert!(options.builtin_macros.allows("HOST.NAME"));
        assert_eq!(options.max_depth, 16);
        assert!(!options.calculated);
    }

    #[test]
    fn test_from_toml_bool_builtins() {
        let options = ParserOptions::from_toml_str("builtin_macros = true").unwrap();
        assert_matches!(options.builtin_macros, BuiltinMacros::Enabled(true));
    }

    #[test]
    fn test_zero_max_depth_rejected() {
        let result = ParserOptions::from_toml_str("max_depth = 0");
        assert_matches!(result, Err(ConfigError::InvalidMaxDepth));
    }

    #[test]
    fn test_numbered_host_macro_requires_host_macro() {
        let result = ParserOptions::new()
            .with_host_macro_numbered(true)
            .validate();
        assert_matches!(result, Err(ConfigError::NumberedHostMacroWithoutHostMacro));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "lld_macros = true\ncalculated = true").unwrap();

        let content = std::fs::read_to_string(file.path()).unwrap();
        let options = ParserOptions::from_toml_str(&content).unwrap();

        assert!(options.lld_macros);
        assert!(options.calculated);
    }
}
