//! bessctl entry point.
//!
//! Loads a port script, creates the ports against an in-process engine and
//! prints one line (or a JSON document) per port.

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use bess_client::{BessStatus, LocalEngine, PortStats};
use bessctl::{collect_stats, create_ports, engine_status, PortReport, PortScript};

/// Create BESS ports from a script and print their statistics
#[derive(Parser, Debug)]
#[command(name = "bessctl")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Port script (YAML)
    script: PathBuf,

    /// Log filter (trace, debug, info, warn, error); RUST_LOG takes precedence
    #[arg(short = 'l', long, default_value = "info")]
    log_level: String,

    /// Print statistics as JSON
    #[arg(long)]
    json: bool,
}

fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();
}

fn print_reports(reports: &[PortReport<PortStats>]) {
    for report in reports {
        println!(
            "{}/{}  inc: {} packets {} bytes {} dropped  out: {} packets {} bytes {} dropped",
            report.port,
            report.driver,
            report.stats.inc.packets,
            report.stats.inc.bytes,
            report.stats.inc.dropped,
            report.stats.out.packets,
            report.stats.out.bytes,
            report.stats.out.dropped,
        );
    }
}

/// Engine failures exit with their errno, everything else with 1.
fn exit_code(status: Option<BessStatus>) -> ExitCode {
    status
        .and_then(|status| u8::try_from(status.errno()).ok())
        .map(ExitCode::from)
        .unwrap_or(ExitCode::FAILURE)
}

async fn run(args: &Args) -> anyhow::Result<()> {
    let script = PortScript::load(&args.script)?;
    script.validate()?;

    let bess = Arc::new(LocalEngine::new());
    let ports = create_ports(Arc::clone(&bess), &script)
        .await
        .context("port creation failed")?;
    let reports = collect_stats(&ports)
        .await
        .context("port stats query failed")?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&reports)?);
    } else {
        print_reports(&reports);
    }
    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(&args.log_level);

    info!("--- Starting bessctl ---");

    match run(&args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            let status = engine_status(&e);
            match status {
                Some(status) => error!(%status, "bessctl error: {:#}", e),
                None => error!("bessctl error: {:#}", e),
            }
            exit_code(status)
        }
    }
}
