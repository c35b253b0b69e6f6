//! CSP Refactor command-line front end
//!
//! Validates the input file, runs the engine, packages the artifacts and
//! appends an audit record of the run. Past runs can be listed from the
//! audit directory.

pub mod audit;
pub mod upload;

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::path::PathBuf;

use anyhow::{anyhow, bail};
use clap::{Parser, Subcommand};
use csp_refactor::{ArtifactBundle, RefactorConfig, RefactorResult, Refactorer, basename};

use crate::audit::{AuditLog, AuditRecord};
use crate::upload::Upload;

/// Audit directory used when none is given
pub const DEFAULT_AUDIT_DIR: &str = "audit";

/// Move inline styles, scripts and event handlers out of HTML files
#[derive(Debug, Parser)]
#[command(name = "csp-refactor", version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Refactor one HTML file
    Run(Args),
    /// List past runs, newest first, or show one
    Audit(AuditArgs),
}

/// Options for a refactor run
#[derive(Debug, Clone, Parser)]
pub struct Args {
    /// HTML file to refactor (.html or .htm)
    pub input: PathBuf,

    /// Directory that receives `{name}_refactored.zip`
    #[arg(short, long, default_value = ".")]
    pub out_dir: PathBuf,

    /// Write a `{name}_refactored/` directory instead of a zip archive
    #[arg(long)]
    pub unpacked: bool,

    /// Serialize the HTML without line breaks or indentation
    #[arg(long)]
    pub compact: bool,

    /// Spaces per nesting level in pretty output
    #[arg(long, default_value_t = 2)]
    pub indent: usize,

    /// Print the full result as JSON instead of the change log
    #[arg(long)]
    pub json: bool,

    /// Audit directory [default: `{out_dir}/audit`]
    #[arg(long)]
    pub audit_dir: Option<PathBuf>,

    /// Skip writing an audit record
    #[arg(long)]
    pub no_audit: bool,
}

impl Args {
    pub fn config(&self) -> RefactorConfig {
        RefactorConfig {
            pretty_print: !self.compact,
            indent: " ".repeat(self.indent),
        }
    }

    pub fn audit_log(&self) -> Option<AuditLog> {
        if self.no_audit {
            return None;
        }
        let dir = self
            .audit_dir
            .clone()
            .unwrap_or_else(|| self.out_dir.join(DEFAULT_AUDIT_DIR));
        Some(AuditLog::new(dir))
    }
}

/// Options for browsing the audit history
#[derive(Debug, Clone, Parser)]
pub struct AuditArgs {
    /// Audit directory to read
    #[arg(long, default_value = DEFAULT_AUDIT_DIR)]
    pub audit_dir: PathBuf,

    /// Show a single run
    #[arg(long)]
    pub id: Option<String>,

    /// Print records as JSON
    #[arg(long)]
    pub json: bool,
}

/// What a successful run produced
#[derive(Debug)]
pub struct RunOutcome {
    pub result: RefactorResult,
    /// The archive, or the directory when unpacked
    pub output_path: PathBuf,
    pub audit_path: Option<PathBuf>,
}

/// Run one refactor end to end
pub fn run(args: &Args) -> anyhow::Result<RunOutcome> {
    let upload = Upload::read(&args.input)?;
    let base = basename(&upload.filename);
    let audit_log = args.audit_log();

    tracing::info!("Refactoring {} ({} bytes)", upload.filename, upload.size);

    let refactorer = Refactorer::with_config(args.config());
    let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
        refactorer.refactor(&upload.content, &upload.filename)
    }));

    let result = match outcome {
        Ok(result) => result,
        Err(payload) => {
            let reason = panic_message(payload.as_ref());
            tracing::error!("Refactoring {} failed: {}", upload.filename, reason);
            if let Some(log) = &audit_log {
                log.append(AuditRecord::failed(&upload, &reason))?;
            }
            bail!("An error occurred during refactoring: {reason}");
        }
    };

    let bundle = ArtifactBundle::from_result(&base, &result);
    let output_path = if args.unpacked {
        bundle.write_to_dir(&args.out_dir)?
    } else {
        bundle.write_zip(&args.out_dir)?
    };
    tracing::info!("Wrote artifacts to {}", output_path.display());

    let audit_path = match &audit_log {
        Some(log) => Some(log.append(AuditRecord::success(&upload, &result))?.1),
        None => None,
    };

    Ok(RunOutcome {
        result,
        output_path,
        audit_path,
    })
}

/// Records selected by the audit options: the whole history, or the one asked for
pub fn audit(args: &AuditArgs) -> anyhow::Result<Vec<AuditRecord>> {
    let log = AuditLog::new(&args.audit_dir);
    match &args.id {
        Some(id) => {
            let record = log
                .get(id)?
                .ok_or_else(|| anyhow!("No refactor run with id {id} in {}", log.dir().display()))?;
            Ok(vec![record])
        }
        None => log.list(),
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        (*msg).to_string()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "unknown error".to_string()
    }
}
