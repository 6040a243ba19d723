use pel_cli::{build_scope, parse_options, read_source, render_failure, value_record};
use pel_lang::{default_registry, pipeline};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let args: Vec<String> = std::env::args().collect();
    if args.len() < 2 {
        print_usage(&args[0]);
        std::process::exit(1);
    }

    if args[1] == "--help" || args[1] == "-h" {
        print_help(&args[0]);
        return Ok(());
    }

    let options = parse_options(&args[2..]);
    let source = read_source(&args[1])?;
    let registry = default_registry()?;
    let scope = build_scope(&options)?;

    log::info!(
        "Running expression: {} bytes, {} bindings, {} plugins",
        source.len(),
        scope.len(),
        registry.plugin_count()
    );

    if options.emit_ast {
        match pipeline::parse_str(&source, &registry) {
            Ok(expr) => println!("{}", serde_json::to_string_pretty(&expr)?),
            Err(error) => {
                eprint!("{}", render_failure(&source, &error));
                std::process::exit(1);
            }
        }
        return Ok(());
    }

    match pipeline::run_str(&source, &registry, &scope) {
        Ok(result) => {
            if let Some(timings) = result.stage_timings {
                log::debug!(
                    "Stage timings: lexical {:?}, syntax {:?}, evaluation {:?}",
                    timings.lexical,
                    timings.syntax,
                    timings.evaluation
                );
            }
            log::info!(
                "Evaluated {} tokens in {:.2}ms",
                result.token_count,
                result.processing_duration.as_secs_f64() * 1000.0
            );

            if options.json_output {
                println!("{}", serde_json::to_string(&value_record(&result))?);
            } else {
                println!("{}", result.value);
            }
        }
        Err(error) => {
            eprint!("{}", render_failure(&source, &error));
            std::process::exit(1);
        }
    }

    Ok(())
}

fn print_usage(program_name: &str) {
    eprintln!("Usage: {} <expression|file> [options]", program_name);
    eprintln!("       {} --help", program_name);
}

fn print_help(program_name: &str) {
    println!("PEL v{}", env!("CARGO_PKG_VERSION"));
    println!("Policy expression language runner");
    println!();
    println!("USAGE:");
    println!(
        "    {} <expression>                   # Evaluate an expression",
        program_name
    );
    println!(
        "    {} <file> [options]               # Evaluate a source file",
        program_name
    );
    println!();
    println!("ARGUMENTS:");
    println!("    <expression>   Expression text, e.g. \"sum of prices > 100\"");
    println!("    <file>         Path to a file holding the expression");
    println!();
    println!("OPTIONS:");
    println!("    --help, -h          Show this help message");
    println!("    --bind name=value   Bind a name for evaluation; value is JSON,");
    println!("                        non-JSON values bind as plain strings (repeatable)");
    println!("    --bindings <file>   Load bindings from a JSON object file");
    println!("    --emit-ast          Print the parsed AST as JSON instead of evaluating");
    println!("    --json              Print the result as a JSON record");
    println!();
    println!("EXAMPLES:");
    println!("    {} '1 + 2 * 3'", program_name);
    println!(
        "    {} 'sum of prices > 100' --bind 'prices=[40, 50, 60]'",
        program_name
    );
    println!(
        "    {} 'count(servers) >= 3' --bindings vars.json --json",
        program_name
    );
    println!("    {} 'avg(latencies)' --emit-ast", program_name);
    println!();
    println!("Diagnostics go to stderr; set RUST_LOG=info or RUST_LOG=debug for detail.");
}
