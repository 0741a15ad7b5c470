//! Field metadata query tool.
//!
//! Loads JSON-lines metadata dumps (one object per field) and runs the
//! collection queries over them:
//! - Indices of distinct values, optionally squeezed
//! - Selection with MARS-style values (`--sel param=t/u --sel levelist=300/to/500`)
//! - Ordering (`--order-by levelist:desc`)
//! - Listings (`ls`, `describe`, `datetime`, `metadata`)
//!
//! Results are printed as JSON on stdout; logs go to stderr.

mod commands;
mod config;

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use commands::Command;
use config::QueryConfig;
use fieldlist::MetadataKind;

#[derive(Parser, Debug)]
#[command(name = "fieldq")]
#[command(about = "Query field metadata: indices, selection, ordering and listings")]
struct Args {
    /// JSON-lines input files ("-" for stdin)
    #[arg(short, long = "input", required = true)]
    inputs: Vec<PathBuf>,

    /// Metadata kind built for each record (raw or grib)
    #[arg(long, default_value = "grib")]
    kind: MetadataKind,

    /// YAML metadata profile (default: FIELDKIT_PROFILE or the built-in GRIB profile)
    #[arg(long)]
    profile: Option<PathBuf>,

    /// Selection constraint KEY=VALUE, repeatable
    #[arg(long)]
    sel: Vec<String>,

    /// Ordering key KEY[:asc|desc] or KEY=V1/V2 for an explicit order, repeatable
    #[arg(long)]
    order_by: Vec<String>,

    /// Log level
    #[arg(long, env = "FIELDQ_LOG", default_value = "warn")]
    log_level: String,

    /// Emit logs as JSON
    #[arg(long)]
    log_json: bool,

    #[command(subcommand)]
    command: Command,
}

fn init_tracing(log_level: &str, json: bool) -> Result<()> {
    let level = match log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::WARN,
    };

    let builder = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(true)
        .with_writer(std::io::stderr);

    if json {
        tracing::subscriber::set_global_default(builder.json().finish())?;
    } else {
        tracing::subscriber::set_global_default(builder.finish())?;
    }
    Ok(())
}

fn main() -> Result<()> {
    // Load environment from .env file if present
    dotenvy::dotenv().ok();

    let args = Args::parse();
    init_tracing(&args.log_level, args.log_json)?;

    let config = QueryConfig::from_args(
        args.kind,
        args.profile.as_deref(),
        args.inputs,
        &args.sel,
        &args.order_by,
    )?;
    let fields = config.load()?;

    info!(command = ?args.command, fields = fields.len(), "Running query");
    let output = commands::run(&args.command, &fields)?;
    println!("{}", serde_json::to_string_pretty(&output)?);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_args() {
        let args = Args::try_parse_from([
            "fieldq",
            "-i",
            "a.jsonl",
            "--input",
            "b.jsonl",
            "--kind",
            "raw",
            "--sel",
            "param=t",
            "--order-by",
            "levelist:desc",
            "indices",
            "--keys",
            "param,levelist",
            "--squeeze",
        ])
        .unwrap();

        assert_eq!(args.inputs.len(), 2);
        assert_eq!(args.kind, MetadataKind::Raw);
        assert_eq!(args.sel, vec!["param=t"]);
        assert_eq!(
            args.command,
            Command::Indices {
                keys: vec!["param".into(), "levelist".into()],
                squeeze: true,
            }
        );
    }

    #[test]
    fn test_input_required() {
        assert!(Args::try_parse_from(["fieldq", "count"]).is_err());
    }

    #[test]
    fn test_unknown_kind_rejected() {
        assert!(Args::try_parse_from(["fieldq", "-i", "a", "--kind", "netcdf", "count"]).is_err());
    }
}
