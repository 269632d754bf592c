//! ctfdump: print the header and type records of a raw CTF container.
//!
//! Input: a file holding one CTF container (header + sections), compressed or not.
//! Output: ctfdump(1)-style text on stdout, or JSON with `--json`.

use std::path::PathBuf;

use clap::Parser;

use ctf::dump::{format_header, format_type};
use ctf::CtfReader;

/// Dump the type section of a CTF container.
#[derive(Debug, Parser)]
#[command(name = "ctfdump", version, about, long_about = None)]
struct Cli {
    /// Path to the CTF container.
    #[arg(value_name = "FILE")]
    path: PathBuf,

    /// Print the header fields before the types.
    #[arg(long)]
    header: bool,

    /// Print only the type with this 1-based index.
    #[arg(short = 't', long = "type", value_name = "INDEX")]
    type_index: Option<usize>,

    /// Emit output as JSON instead of text.
    #[arg(long)]
    json: bool,

    /// Enable verbose (debug-level) logging output.
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let level = if cli.verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Warn
    };
    env_logger::Builder::new()
        .filter_module("ctf", level)
        .parse_default_env()
        .target(env_logger::Target::Stderr)
        .format_timestamp(None)
        .init();

    let reader = CtfReader::open(&cli.path)
        .map_err(|e| format!("open {}: {}", cli.path.display(), e))?;

    let types = match cli.type_index {
        Some(index) => vec![(index, reader.get_type(index)?)],
        None => reader
            .iter_types()
            .enumerate()
            .map(|(i, ty)| ty.map(|ty| (i + 1, ty)))
            .collect::<Result<Vec<_>, _>>()?,
    };

    if cli.json {
        let records: Vec<_> = types
            .iter()
            .map(|(index, ty)| serde_json::json!({ "index": index, "type": ty }))
            .collect();
        let doc = if cli.header {
            serde_json::json!({ "header": reader.header, "types": records })
        } else {
            serde_json::json!({ "types": records })
        };
        println!("{}", serde_json::to_string_pretty(&doc)?);
        return Ok(());
    }

    if cli.header {
        println!("- CTF Header -----------------------------------------------------------------\n");
        println!("{}\n", format_header(&reader.header));
    }
    println!("- Types ----------------------------------------------------------------------\n");
    for (index, ty) in &types {
        println!("{}", format_type(*index, ty));
    }
    eprintln!(
        "{} types{}",
        types.len(),
        if reader.is_child() { " (child container)" } else { "" }
    );
    Ok(())
}
