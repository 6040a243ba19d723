// build.rs - TOML-driven compile-time limit generation
use std::env;
use std::fs;
use std::path::Path;

#[derive(serde::Deserialize)]
struct CompileTimeConfig {
    lexical: LexicalLimits,
    syntax: SyntaxLimits,
    runtime: RuntimeLimits,
}

#[derive(serde::Deserialize)]
struct LexicalLimits {
    max_source_size: usize,
    max_string_size: usize,
    max_identifier_length: usize,
    max_token_count: usize,
    max_number_length: usize,
}

#[derive(serde::Deserialize)]
struct SyntaxLimits {
    max_parse_depth: usize,
    max_lookahead_tokens: usize,
    max_collection_elements: usize,
}

#[derive(serde::Deserialize)]
struct RuntimeLimits {
    max_scope_bindings: usize,
    max_array_elements: usize,
    max_string_render_length: usize,
}

fn main() {
    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-env-changed=PEL_BUILD_PROFILE");
    println!("cargo:rerun-if-env-changed=PEL_CONFIG_DIR");

    let profile = env::var("PEL_BUILD_PROFILE").unwrap_or_else(|_| "development".to_string());
    let config_dir = env::var("PEL_CONFIG_DIR").unwrap_or_else(|_| "config".to_string());

    // Find workspace root (parent of pel_lang directory)
    let manifest_dir = env::var("CARGO_MANIFEST_DIR").unwrap();
    let workspace_root = Path::new(&manifest_dir)
        .parent()
        .expect("Could not find workspace root (parent directory)");

    let config_path = workspace_root
        .join(&config_dir)
        .join(format!("{}.toml", profile));

    println!("cargo:rerun-if-changed={}", config_path.display());

    if !config_path.exists() {
        panic!(
            "Configuration file not found: {}\nWorkspace root: {}\nLooking for: {}/{}/{}.toml",
            config_path.display(),
            workspace_root.display(),
            workspace_root.display(),
            config_dir,
            profile
        );
    }

    let config_content = fs::read_to_string(&config_path)
        .unwrap_or_else(|e| panic!("Failed to read {}: {}", config_path.display(), e));

    let config: CompileTimeConfig = toml::from_str(&config_content)
        .unwrap_or_else(|e| panic!("Invalid TOML in {}: {}", config_path.display(), e));

    validate_constraints(&config, &profile);
    generate_constants(&config, &profile);
}

fn validate_constraints(config: &CompileTimeConfig, profile: &str) {
    const ABSOLUTE_MAX_SOURCE_SIZE: usize = 100_000_000;
    const ABSOLUTE_MAX_PARSE_DEPTH: usize = 10_000;

    if config.lexical.max_source_size > ABSOLUTE_MAX_SOURCE_SIZE {
        panic!("SECURITY: max_source_size exceeds absolute maximum");
    }

    if config.syntax.max_parse_depth > ABSOLUTE_MAX_PARSE_DEPTH {
        panic!("SECURITY: max_parse_depth exceeds absolute maximum");
    }

    if config.lexical.max_string_size > config.lexical.max_source_size {
        panic!("CONFIG: max_string_size cannot exceed max_source_size");
    }

    if profile == "production" {
        if config.lexical.max_source_size > 10_000_000 {
            panic!("PRODUCTION: max_source_size too high for production");
        }
        if config.syntax.max_parse_depth > 256 {
            panic!("PRODUCTION: max_parse_depth too high for production");
        }
    }
}

fn generate_constants(config: &CompileTimeConfig, profile: &str) {
    let out_dir = env::var("OUT_DIR").unwrap();
    let output_path = Path::new(&out_dir).join("constants.rs");

    let constants_code = format!(
        r#"
// Generated compile-time constants from TOML configuration
// Profile: {}
// DO NOT EDIT - Generated by build.rs

pub mod compile_time {{
    pub mod lexical {{
        pub const MAX_SOURCE_SIZE: usize = {};
        pub const MAX_STRING_SIZE: usize = {};
        pub const MAX_IDENTIFIER_LENGTH: usize = {};
        pub const MAX_TOKEN_COUNT: usize = {};
        pub const MAX_NUMBER_LENGTH: usize = {};
    }}

    pub mod syntax {{
        pub const MAX_PARSE_DEPTH: usize = {};
        pub const MAX_LOOKAHEAD_TOKENS: usize = {};
        pub const MAX_COLLECTION_ELEMENTS: usize = {};
    }}

    pub mod runtime {{
        pub const MAX_SCOPE_BINDINGS: usize = {};
        pub const MAX_ARRAY_ELEMENTS: usize = {};
        pub const MAX_STRING_RENDER_LENGTH: usize = {};
    }}
}}
"#,
        profile,
        // Lexical
        config.lexical.max_source_size,
        config.lexical.max_string_size,
        config.lexical.max_identifier_length,
        config.lexical.max_token_count,
        config.lexical.max_number_length,
        // Syntax
        config.syntax.max_parse_depth,
        config.syntax.max_lookahead_tokens,
        config.syntax.max_collection_elements,
        // Runtime
        config.runtime.max_scope_bindings,
        config.runtime.max_array_elements,
        config.runtime.max_string_render_length,
    );

    fs::write(output_path, constants_code).unwrap();
}
