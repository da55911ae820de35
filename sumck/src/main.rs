// sumck/src/main.rs

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use sumfs::{AuditReport, audit_summary};

#[derive(Parser)]
#[command(name = "sumck", version, about = "Filesystem summary consistency checker", long_about = None)]
struct Cli {
    /// Metadata summary file to audit
    summary: PathBuf,

    /// Suppress finding output; report through the exit status only
    #[arg(short, long)]
    quiet: bool,

    /// Print the finding count to stderr
    #[arg(long)]
    stats: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let report = match run(&cli) {
        Ok(report) => report,
        Err(err) => {
            eprintln!("sumck: error: {err:#}");
            return ExitCode::from(1);
        }
    };

    if !cli.quiet {
        print!("{report}");
    }
    if cli.stats {
        eprintln!("sumck: {} finding(s)", report.len());
    }

    if report.ok() {
        ExitCode::SUCCESS
    } else {
        ExitCode::from(2)
    }
}

fn run(cli: &Cli) -> anyhow::Result<AuditReport> {
    let input = std::fs::read_to_string(&cli.summary)
        .with_context(|| format!("failed to read {}", cli.summary.display()))?;
    let report = audit_summary(&input)
        .with_context(|| format!("unusable summary {}", cli.summary.display()))?;
    Ok(report)
}
