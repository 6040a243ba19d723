//! Reference copy of the compile-time limits
//!
//! The authoritative values are generated by build.rs from the workspace
//! `config/<profile>.toml`; this module documents the development defaults
//! and is the fallback documentation when reading the code offline.

pub mod compile_time {
    pub mod lexical {
        /// Maximum source text size accepted by the lexer (1MB)
        /// Prevents resource exhaustion from oversized inputs
        pub const MAX_SOURCE_SIZE: usize = 1_048_576;

        /// Maximum string literal size (64KB)
        /// Bounds per-literal allocation
        pub const MAX_STRING_SIZE: usize = 65_536;

        /// Maximum identifier length (255 characters)
        /// Bounds symbol storage and error message size
        pub const MAX_IDENTIFIER_LENGTH: usize = 255;

        /// Maximum number of tokens produced for a single input
        /// Guards against token explosion
        pub const MAX_TOKEN_COUNT: usize = 100_000;

        /// Maximum digits (plus sign/point/exponent) in a numeric literal
        pub const MAX_NUMBER_LENGTH: usize = 64;
    }

    pub mod syntax {
        /// Maximum parser recursion depth
        /// Recursive descent depth is otherwise bounded only by input length
        pub const MAX_PARSE_DEPTH: usize = 100;

        /// Token lookahead limit for parsing decisions
        pub const MAX_LOOKAHEAD_TOKENS: usize = 10;

        /// Maximum elements in one array or map literal
        pub const MAX_COLLECTION_ELEMENTS: usize = 10_000;
    }

    pub mod runtime {
        /// Maximum variable bindings in one scope
        pub const MAX_SCOPE_BINDINGS: usize = 10_000;

        /// Maximum elements in one runtime array value
        pub const MAX_ARRAY_ELEMENTS: usize = 100_000;

        /// Maximum length of a rendered string conversion
        pub const MAX_STRING_RENDER_LENGTH: usize = 1_048_576;
    }
}
