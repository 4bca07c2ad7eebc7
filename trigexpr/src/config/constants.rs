pub mod compile_time {
    pub mod expression {
        /// Default maximum recursion depth for nested groups and math
        /// function arguments.
        /// SECURITY: Prevents stack exhaustion from deeply nested input
        pub const DEFAULT_MAX_DEPTH: usize = 64;

        /// Maximum expression length accepted by the engine (bytes)
        /// SECURITY: Prevents DoS via enormous expressions
        pub const MAX_EXPRESSION_LENGTH: usize = 65_536;
    }

    pub mod function {
        /// Maximum parameters accepted by a single function call
        /// SECURITY: Prevents parser complexity attacks
        pub const MAX_FUNCTION_PARAMETERS: usize = 255;
    }

    pub mod macros {
        /// Maximum macro name length (characters between the braces)
        /// SECURITY: Prevents memory attacks via huge macro names
        pub const MAX_MACRO_NAME_LENGTH: usize = 255;
    }

    pub mod query {
        /// Maximum parameters accepted by a single item key
        /// SECURITY: Prevents parser complexity attacks
        pub const MAX_KEY_PARAMETERS: usize = 255;
    }
}
