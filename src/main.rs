use schemarb::config::{ArrayFilter, ParserOptions};
use schemarb::export::{Format, export};
use schemarb::parser::SchemaParser;
use std::env;
use std::fs;
use std::process;
use tracing_subscriber::EnvFilter;

fn usage(program: &str) -> ! {
    eprintln!("Usage: {} <schema.rb> [options]", program);
    eprintln!();
    eprintln!("Options:");
    eprintln!("  -o, --output <file>    Output file (default: stdout)");
    eprintln!("  -f, --format <format>  Output format: json, text (default: json)");
    eprintln!("  --array-filter <mode>  Array literal filter: present, legacy (default: present)");
    eprintln!("  --legacy-arrays        Same as --array-filter legacy");
    eprintln!("  --max-depth <n>        Deepest accepted literal nesting (default: {})", ParserOptions::DEFAULT_MAX_DEPTH);
    eprintln!();
    eprintln!("Set RUST_LOG to control diagnostics (default: warn).");
    process::exit(1);
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .without_time()
        .init();

    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        usage(&args[0]);
    }

    let input_path = &args[1];
    let mut output_path: Option<String> = None;
    let mut format = Format::Json;
    let mut options = ParserOptions::default();

    let mut i = 2;
    while i < args.len() {
        match args[i].as_str() {
            "-o" | "--output" => {
                i += 1;
                if i < args.len() {
                    output_path = Some(args[i].clone());
                }
            }
            "-f" | "--format" => {
                i += 1;
                if i < args.len() {
                    format = Format::from_str(&args[i]).unwrap_or_else(|| {
                        eprintln!("Invalid format: {}", args[i]);
                        process::exit(1);
                    });
                }
            }
            "--array-filter" => {
                i += 1;
                if i < args.len() {
                    options.array_filter = ArrayFilter::from_str(&args[i]).unwrap_or_else(|| {
                        eprintln!("Invalid array filter: {}", args[i]);
                        process::exit(1);
                    });
                }
            }
            "--legacy-arrays" => {
                options.array_filter = ArrayFilter::LegacyTruthy;
            }
            "--max-depth" => {
                i += 1;
                if i < args.len() {
                    options.max_depth = args[i].parse().unwrap_or_else(|_| {
                        eprintln!("Invalid depth: {}", args[i]);
                        process::exit(1);
                    });
                }
            }
            "-h" | "--help" => usage(&args[0]),
            _ => {
                eprintln!("Unknown option: {}", args[i]);
                process::exit(1);
            }
        }
        i += 1;
    }

    let input = match fs::read_to_string(input_path) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Failed to read {}: {}", input_path, e);
            process::exit(1);
        }
    };

    // diagnostics are reported through tracing as they are found
    let parsed = SchemaParser::new().with_options(options).parse(&input);
    tracing::info!(
        tables = parsed.schema.len(),
        diagnostics = parsed.diagnostics.len(),
        "parsed {}",
        input_path
    );

    let output = match export(&parsed.schema, format) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Export error: {}", e);
            process::exit(1);
        }
    };

    match output_path {
        Some(path) => {
            if let Err(e) = fs::write(&path, &output) {
                eprintln!("Failed to write {}: {}", path, e);
                process::exit(1);
            }
        }
        None => print!("{}", output),
    }
}
