//! connectome-scene CLI entry point.
//!
//! Restores a saved state over a catalogue, compiles it against a list of
//! connections and prints the render records as JSON.

use std::fs;
use std::io::{self, Read, Write};
use std::process;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use connectome_scene::compile_scene_json;

/// Compile a connectome network state into render records.
#[derive(Parser, Debug)]
#[command(
    name = "connectome-scene",
    version = env!("CONNECTOME_SCENE_VERSION"),
    about = "Compile a connectome network state into render records"
)]
struct Cli {
    /// Connections JSON file (reads from stdin if not provided)
    connections: Option<String>,

    /// Cell and dataset catalogue JSON
    #[arg(short = 'c', long = "catalogue")]
    catalogue: String,

    /// Saved state snapshot JSON (empty state if not provided)
    #[arg(short = 's', long = "state")]
    state: Option<String>,

    /// Write output to this file instead of stdout
    #[arg(short = 'o', long = "output")]
    output: Option<String>,

    /// Pretty-print the JSON output
    #[arg(long = "pretty")]
    pretty: bool,

    /// Log more (repeat for trace output)
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count)]
    verbose: u8,
}

fn read_file(path: &str) -> String {
    match fs::read_to_string(path) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("error: cannot read '{}': {}", path, e);
            process::exit(1);
        }
    }
}

fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let catalogue = read_file(&cli.catalogue);
    let state = match cli.state {
        Some(ref path) => read_file(path),
        None => "{}".to_string(),
    };

    // Read connections from file or stdin
    let connections = if let Some(ref path) = cli.connections {
        read_file(path)
    } else {
        let mut buf = String::new();
        if let Err(e) = io::stdin().read_to_string(&mut buf) {
            eprintln!("error: cannot read stdin: {}", e);
            process::exit(1);
        }
        buf
    };

    let rendered = match compile_scene_json(&catalogue, &state, &connections, cli.pretty) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("error: {}", e);
            process::exit(1);
        }
    };

    if let Some(ref path) = cli.output {
        if let Err(e) = fs::write(path, rendered) {
            eprintln!("error: cannot write '{}': {}", path, e);
            process::exit(1);
        }
    } else {
        println!("{}", rendered);
        if let Err(e) = io::stdout().flush() {
            eprintln!("error: cannot flush stdout: {}", e);
            process::exit(1);
        }
    }
}
