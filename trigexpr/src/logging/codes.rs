//! Diagnostic codes for the parser family
//!
//! Single source of truth for all event codes. Codes are stable strings so
//! log consumers can filter without depending on message wording.

/// Universal code wrapper for error, warning, and success codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Code(&'static str);

impl Code {
    pub const fn new(code: &'static str) -> Self {
        Self(code)
    }

    pub fn as_str(&self) -> &'static str {
        self.0
    }
}

impl std::fmt::Display for Code {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Expression engine codes
pub mod expression {
    use super::Code;

    pub const EXPRESSION_TOO_LONG: Code = Code::new("E100");
    pub const DEPTH_LIMIT_REACHED: Code = Code::new("E101");
    pub const PARSE_STOPPED: Code = Code::new("E102");
    pub const PARSE_FAILED: Code = Code::new("E103");
}

/// Metric query codes
pub mod query {
    use super::Code;

    pub const WILDCARD_NOT_ENABLED: Code = Code::new("E110");
    pub const EMPTY_HOST_NOT_ENABLED: Code = Code::new("E111");
    pub const HOST_MACRO_NOT_ENABLED: Code = Code::new("E112");
    pub const TOO_MANY_KEY_PARAMETERS: Code = Code::new("E113");
}

/// Function call codes
pub mod function {
    use super::Code;

    pub const TOO_MANY_PARAMETERS: Code = Code::new("E120");
}

/// Macro primitive codes
pub mod macros {
    use super::Code;

    pub const MACRO_FAMILY_DISABLED: Code = Code::new("E130");
    pub const MACRO_NAME_TOO_LONG: Code = Code::new("E131");
    pub const BUILTIN_NOT_ALLOWED: Code = Code::new("E132");
}

/// Success codes
pub mod success {
    use super::Code;

    pub const EXPRESSION_PARSED: Code = Code::new("I100");
}

/// Get a human-readable description for a code
pub fn get_description(code: &str) -> &'static str {
    match code {
        "E100" => "Expression exceeds the compile-time length limit",
        "E101" => "Nesting depth limit reached in a sub-expression",
        "E102" => "Parsing stopped before the end of the input",
        "E103" => "No expression recognized at the requested offset",
        "E110" => "Wildcard host or key without the calculated option",
        "E111" => "Empty host segment without the empty_host option",
        "E112" => "Host macro without the host_macro option",
        "E113" => "Item key parameter count limit exceeded",
        "E120" => "Function parameter count limit exceeded",
        "E130" => "Macro family not enabled in the parser options",
        "E131" => "Macro name length limit exceeded",
        "E132" => "Built-in macro not present in the allow-list",
        "I100" => "Expression parsed successfully",
        _ => "Unknown code",
    }
}
