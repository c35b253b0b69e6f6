//! CSP Refactor - command-line entry point

use clap::Parser;
use csp_cli::{Cli, Command, audit, run};

fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    match Cli::parse().command {
        Command::Run(args) => {
            let outcome = run(&args)?;

            if args.json {
                println!("{}", serde_json::to_string_pretty(&outcome.result)?);
            } else {
                for line in outcome.result.change_log() {
                    println!("{line}");
                }
                println!();
                println!("Output: {}", outcome.output_path.display());
                if let Some(path) = &outcome.audit_path {
                    println!("Audit:  {}", path.display());
                }
            }
        }
        Command::Audit(args) => {
            let records = audit(&args)?;

            if args.json {
                println!("{}", serde_json::to_string_pretty(&records)?);
            } else if args.id.is_some() {
                for record in &records {
                    println!("{} ({} bytes)", record.original_filename, record.file_size);
                    println!("Uploaded: {}", record.upload_timestamp.to_rfc3339());
                    println!("Status:   {}", record.status);
                    println!();
                    for line in record.change_log_entries() {
                        println!("{line}");
                    }
                }
            } else if records.is_empty() {
                println!("No refactor runs recorded in {}", args.audit_dir.display());
            } else {
                for record in &records {
                    println!(
                        "{}  {}  {:<8}  {}",
                        record.id,
                        record.upload_timestamp.format("%Y-%m-%d %H:%M:%S"),
                        if record.is_success() { "SUCCESS" } else { "FAILED" },
                        record.original_filename
                    );
                }
            }
        }
    }

    Ok(())
}
