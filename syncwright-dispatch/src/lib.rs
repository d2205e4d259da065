//! # syncwright-dispatch
//!
//! Parallel translation of source units into the configured target
//! languages, followed by a sequential write phase.
//!
//! [`translate_blocking`] is the entry point for synchronous callers: it
//! builds a multi-thread runtime, runs the [`Dispatcher`] and writes the
//! successful outputs.

pub mod dispatcher;
pub mod error;
pub mod output;
pub mod translator;

use std::path::PathBuf;

use syncwright_core::config::{ProjectConfig, TranslateTarget};
use syncwright_sync::WriteOutcome;

pub use dispatcher::{default_jobs, Dispatcher, RunSummary, Translation};
pub use error::DispatchError;
pub use output::{check_destinations, is_up_to_date, output_path, write_outputs};
pub use translator::{CommandTranslator, TargetRequest, Translator};

use crate::error::io_err;

/// Options of one `translate` invocation.
#[derive(Debug, Clone, Default)]
pub struct TranslateOptions {
    /// Source units, relative to the project root.
    pub units: Vec<PathBuf>,
    /// Languages to produce; empty means every configured target.
    pub languages: Vec<String>,
    /// Pool size override.
    pub jobs: Option<usize>,
    /// Translate units even when their outputs are up to date.
    pub force: bool,
    pub dry_run: bool,
}

#[derive(Debug)]
pub struct TranslateReport {
    pub summary: RunSummary,
    pub writes: Vec<WriteOutcome>,
}

/// Configured targets filtered by language, with output directories resolved.
pub fn select_targets(
    config: &ProjectConfig,
    languages: &[String],
) -> Result<Vec<TranslateTarget>, DispatchError> {
    let section = config
        .translate
        .as_ref()
        .ok_or(DispatchError::MissingSection("translate"))?;

    for language in languages {
        if !section.targets.iter().any(|t| &t.language == language) {
            return Err(DispatchError::UnknownTarget(language.clone()));
        }
    }

    let selected: Vec<TranslateTarget> = section
        .targets
        .iter()
        .filter(|t| languages.is_empty() || languages.contains(&t.language))
        .map(|t| TranslateTarget {
            output_dir: config.resolve(&t.output_dir),
            ..t.clone()
        })
        .collect();
    if selected.is_empty() {
        return Err(DispatchError::NoTargets);
    }
    Ok(selected)
}

/// Translate and write, driving a dedicated tokio runtime.
///
/// Units whose outputs are all at least as new as the unit are skipped unless
/// `force` is set. Destination collisions fail the run before any work starts.
pub fn translate_blocking(
    config: &ProjectConfig,
    options: &TranslateOptions,
) -> Result<TranslateReport, DispatchError> {
    let section = config
        .translate
        .as_ref()
        .ok_or(DispatchError::MissingSection("translate"))?;
    let targets = select_targets(config, &options.languages)?;
    let requests: Vec<TargetRequest> = targets.iter().map(TargetRequest::from).collect();
    let units: Vec<PathBuf> = options.units.iter().map(|u| config.resolve(u)).collect();
    check_destinations(&units, &targets)?;

    let (units, skipped): (Vec<PathBuf>, Vec<PathBuf>) = units
        .into_iter()
        .partition(|unit| options.force || !is_up_to_date(unit, &targets));
    for unit in &skipped {
        tracing::info!(unit = %unit.display(), "outputs up to date, skipping");
    }
    let jobs = options.jobs.or(section.jobs).unwrap_or_else(default_jobs);

    let translator = CommandTranslator::new(section.command.clone(), section.args.clone(), section.kind);
    let dispatcher = Dispatcher::new(translator, jobs);
    tracing::info!(
        units = units.len(),
        skipped = skipped.len(),
        targets = requests.len(),
        jobs = dispatcher.jobs(),
        "starting translation run"
    );

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(|e| io_err("tokio-runtime", e))?;
    let mut summary = runtime.block_on(dispatcher.run(units, &requests));
    summary.skipped = skipped;

    let writes = write_outputs(&summary.succeeded, &targets, options.dry_run)?;
    Ok(TranslateReport { summary, writes })
}
