//! syncwright: keeps generated multi-language artifacts in sync with their
//! canonical sources.
//!
//! # Usage
//!
//! ```text
//! syncwright [--root <dir>] [--config <file>] <command>
//!
//! syncwright export-exchanges [--dry-run]
//! syncwright vss [--version X] [--dry-run]
//! syncwright errors [--dry-run]
//! syncwright translate <units..> --target <lang>.. [--jobs N] [--dry-run]
//! syncwright cleanup-old-tags [--paper] [--delete] [--limit N] [--json]
//! syncwright changelog [--output FILE]
//! syncwright diff
//! ```

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};

use commands::{
    changelog::ChangelogArgs, diff::DiffArgs, errors::ErrorsArgs, export::ExportArgs,
    tags::CleanupTagsArgs, translate::TranslateArgs, vss::VssArgs, GlobalArgs,
};

// ---------------------------------------------------------------------------
// CLI entry point
// ---------------------------------------------------------------------------

#[derive(Parser, Debug)]
#[command(
    name = "syncwright",
    version,
    about = "Regenerate derived artifacts from their canonical sources",
    long_about = None,
)]
struct Cli {
    #[command(flatten)]
    global: GlobalArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Rebuild the catalog and rewrite registries, docs and the id manifest.
    ExportExchanges(ExportArgs),

    /// Propagate the authoritative version string to every version literal.
    Vss(VssArgs),

    /// Render the canonical error hierarchy into every target file.
    Errors(ErrorsArgs),

    /// Translate source units into the configured target languages.
    Translate(TranslateArgs),

    /// Prune release tags outside the retention window.
    CleanupOldTags(CleanupTagsArgs),

    /// Generate a changelog grouped by release tag.
    Changelog(ChangelogArgs),

    /// Show unified diffs of what export, vss and errors would write.
    Diff(DiffArgs),
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing();
    match cli.command {
        Commands::ExportExchanges(args) => args.run(&cli.global),
        Commands::Vss(args) => args.run(&cli.global),
        Commands::Errors(args) => args.run(&cli.global),
        Commands::Translate(args) => args.run(&cli.global),
        Commands::CleanupOldTags(args) => args.run(&cli.global),
        Commands::Changelog(args) => args.run(&cli.global),
        Commands::Diff(args) => args.run(&cli.global),
    }
}

/// Logs go to stderr so command output stays pipeable. `log` records from
/// the library crates are forwarded by the subscriber's log bridge.
fn init_tracing() {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
