use std::io::{self, Read, Write};
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use xmlmap::{convert_with_options, to_json, to_json_pretty, ConvertOptions};

#[derive(Debug, Parser)]
#[command(name = "xmlmap", version, about = "Convert XML to a JSON tree")]
struct Args {
    /// Input XML file (defaults to stdin)
    #[arg(value_name = "INPUT")]
    input: Option<PathBuf>,
    /// Output file (defaults to stdout)
    #[arg(short, long, value_name = "OUTPUT")]
    output: Option<PathBuf>,
    /// Omit the '@' marker on attribute keys (may collide with element names)
    #[arg(long)]
    unsafe_attributes: bool,
    /// Indent the JSON output
    #[arg(short, long)]
    pretty: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .without_time()
        .init();

    let args = Args::parse();

    let input_data = read_input(&args.input)?;
    let options = ConvertOptions {
        unsafe_attributes: args.unsafe_attributes,
        ..ConvertOptions::default()
    };
    let value = convert_with_options(input_data.as_str(), options)?;

    let mut rendered = if args.pretty {
        to_json_pretty(&value)
    } else {
        to_json(&value)
    };
    rendered.push('\n');

    write_output(&args.output, rendered.as_bytes())?;
    Ok(())
}

fn read_input(path: &Option<PathBuf>) -> Result<String> {
    match path {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("failed to read input file {}", path.display())),
        None => {
            let mut buffer = String::new();
            io::stdin()
                .read_to_string(&mut buffer)
                .context("failed to read stdin")?;
            if buffer.trim().is_empty() {
                bail!("no input provided on stdin");
            }
            Ok(buffer)
        }
    }
}

fn write_output(path: &Option<PathBuf>, data: &[u8]) -> Result<()> {
    match path {
        Some(path) => std::fs::write(path, data)
            .with_context(|| format!("failed to write output file {}", path.display())),
        None => {
            let mut stdout = io::stdout();
            stdout.write_all(data).context("failed to write stdout")?;
            Ok(())
        }
    }
}
