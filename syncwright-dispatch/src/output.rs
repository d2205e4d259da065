//! Output locations and writing translated units to disk.
//!
//! Writing runs after every worker has finished, one file at a time, through
//! the patch engine's atomic writer.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use syncwright_core::config::TranslateTarget;
use syncwright_sync::{atomic_write, WriteOutcome};

use crate::dispatcher::Translation;
use crate::error::DispatchError;

/// `<output_dir>/<unit stem>.<extension>`.
pub fn output_path(unit: &Path, target: &TranslateTarget) -> Result<PathBuf, DispatchError> {
    let stem = unit
        .file_stem()
        .ok_or_else(|| DispatchError::NoStem(unit.to_path_buf()))?;
    let mut name = stem.to_os_string();
    name.push(".");
    name.push(target.extension.trim_start_matches('.'));
    Ok(target.output_dir.join(name))
}

/// Fail when two units would be written to the same destination.
pub fn check_destinations<P: AsRef<Path>>(
    units: &[P],
    targets: &[TranslateTarget],
) -> Result<(), DispatchError> {
    let mut owners: HashMap<PathBuf, &Path> = HashMap::new();
    for unit in units {
        let unit = unit.as_ref();
        for target in targets {
            let path = output_path(unit, target)?;
            if let Some(first) = owners.get(&path) {
                return Err(DispatchError::OutputCollision {
                    path,
                    first: first.to_path_buf(),
                    second: unit.to_path_buf(),
                });
            }
            owners.insert(path, unit);
        }
    }
    Ok(())
}

fn modified(path: &Path) -> Option<SystemTime> {
    std::fs::metadata(path).and_then(|m| m.modified()).ok()
}

/// True when every output of `unit` exists and is no older than the unit.
///
/// A unit whose own timestamp cannot be read is never up to date.
pub fn is_up_to_date(unit: &Path, targets: &[TranslateTarget]) -> bool {
    let Some(source) = modified(unit) else {
        return false;
    };
    targets.iter().all(|target| {
        output_path(unit, target)
            .ok()
            .and_then(|path| modified(&path))
            .is_some_and(|output| output >= source)
    })
}

/// Write every output of every translation. `targets` must be the list the
/// translations were requested with, with `output_dir` already resolved.
///
/// Nothing is written when two translations share a destination.
pub fn write_outputs(
    translations: &[Translation],
    targets: &[TranslateTarget],
    dry_run: bool,
) -> Result<Vec<WriteOutcome>, DispatchError> {
    let units: Vec<&Path> = translations.iter().map(|t| t.unit.as_path()).collect();
    check_destinations(&units, targets)?;

    let mut writes = Vec::new();
    for translation in translations {
        for (target, content) in targets.iter().zip(&translation.outputs) {
            let path = output_path(&translation.unit, target)?;
            tracing::info!(
                source = %translation.unit.display(),
                destination = %path.display(),
                language = %target.language,
                "writing translation"
            );
            writes.push(atomic_write(&path, content, dry_run)?);
        }
    }
    Ok(writes)
}
