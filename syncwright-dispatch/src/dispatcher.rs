//! Bounded worker pool over a [`Translator`].
//!
//! Every translator call runs on tokio's blocking pool and holds one permit
//! of a shared [`Semaphore`] for its duration. Unit tasks themselves hold no
//! permit, so a unit fanning out per-target calls never starves its own
//! children.

use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::Semaphore;
use tokio::task::JoinSet;

use crate::error::{io_err, join_err, DispatchError};
use crate::translator::{TargetRequest, Translator};

/// Pool size used when none is configured.
pub fn default_jobs() -> usize {
    std::thread::available_parallelism()
        .map(NonZeroUsize::get)
        .unwrap_or(1)
}

/// Outputs of one source unit, ordered like the requested targets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Translation {
    pub unit: PathBuf,
    pub outputs: Vec<String>,
}

/// End-of-run summary. Every list follows the order units were given in.
#[derive(Debug)]
pub struct RunSummary {
    pub succeeded: Vec<Translation>,
    pub failed: Vec<(PathBuf, DispatchError)>,
    /// Units whose outputs were already up to date and never reached a worker.
    pub skipped: Vec<PathBuf>,
    pub elapsed: Duration,
}

impl RunSummary {
    pub fn is_ok(&self) -> bool {
        self.failed.is_empty()
    }
}

pub struct Dispatcher<T: Translator> {
    translator: Arc<T>,
    permits: Arc<Semaphore>,
    jobs: usize,
}

impl<T: Translator> Clone for Dispatcher<T> {
    fn clone(&self) -> Self {
        Self {
            translator: Arc::clone(&self.translator),
            permits: Arc::clone(&self.permits),
            jobs: self.jobs,
        }
    }
}

impl<T: Translator> Dispatcher<T> {
    /// A pool of `jobs` concurrent translator calls (at least one).
    pub fn new(translator: T, jobs: usize) -> Self {
        let jobs = jobs.max(1);
        Self {
            translator: Arc::new(translator),
            permits: Arc::new(Semaphore::new(jobs)),
            jobs,
        }
    }

    pub fn jobs(&self) -> usize {
        self.jobs
    }

    /// Translate one unit into every target, returning results in `targets` order.
    pub async fn submit(
        &self,
        unit: &Path,
        targets: &[TargetRequest],
    ) -> Result<Vec<String>, DispatchError> {
        if targets.is_empty() {
            return Err(DispatchError::NoTargets);
        }
        let outputs = if self.translator.supports_batch() {
            self.submit_batch(unit, targets).await?
        } else {
            self.submit_each(unit, targets).await?
        };
        if outputs.len() != targets.len() {
            return Err(DispatchError::OutputCount {
                expected: targets.len(),
                actual: outputs.len(),
            });
        }
        Ok(outputs)
    }

    async fn submit_batch(
        &self,
        unit: &Path,
        targets: &[TargetRequest],
    ) -> Result<Vec<String>, DispatchError> {
        let permit = Arc::clone(&self.permits)
            .acquire_owned()
            .await
            .map_err(|_| DispatchError::PoolClosed)?;
        let translator = Arc::clone(&self.translator);
        let path = unit.to_path_buf();
        let targets = targets.to_vec();

        tokio::task::spawn_blocking(move || {
            let _permit = permit;
            let content = std::fs::read_to_string(&path).map_err(|e| io_err(&path, e))?;
            translator.translate_batch(&content, &targets)
        })
        .await
        .map_err(|e| join_err("translate", e))?
    }

    async fn submit_each(
        &self,
        unit: &Path,
        targets: &[TargetRequest],
    ) -> Result<Vec<String>, DispatchError> {
        let mut set = JoinSet::new();
        for (index, target) in targets.iter().cloned().enumerate() {
            let permits = Arc::clone(&self.permits);
            let translator = Arc::clone(&self.translator);
            let path = unit.to_path_buf();
            set.spawn(async move {
                let permit = permits
                    .acquire_owned()
                    .await
                    .map_err(|_| DispatchError::PoolClosed)?;
                let output = tokio::task::spawn_blocking(move || {
                    let _permit = permit;
                    translator.translate_single(&path, &target)
                })
                .await
                .map_err(|e| join_err("translate", e))??;
                Ok::<_, DispatchError>((index, output))
            });
        }

        let mut slots: Vec<Option<String>> = vec![None; targets.len()];
        while let Some(joined) = set.join_next().await {
            let (index, output) = joined.map_err(|e| join_err("translate", e))??;
            if let Some(slot) = slots.get_mut(index) {
                *slot = Some(output);
            }
        }
        Ok(slots.into_iter().flatten().collect())
    }

    /// Translate every unit as an independent task.
    ///
    /// A failing unit is recorded in the summary; its siblings are unaffected.
    pub async fn run(&self, units: Vec<PathBuf>, targets: &[TargetRequest]) -> RunSummary {
        let started = Instant::now();
        let targets: Arc<[TargetRequest]> = targets.into();

        let handles: Vec<_> = units
            .into_iter()
            .map(|unit| {
                let dispatcher = self.clone();
                let targets = Arc::clone(&targets);
                let task_unit = unit.clone();
                let handle =
                    tokio::spawn(async move { dispatcher.submit(&task_unit, &targets).await });
                (unit, handle)
            })
            .collect();

        let mut succeeded = Vec::new();
        let mut failed = Vec::new();
        for (unit, handle) in handles {
            let result = match handle.await {
                Ok(result) => result,
                Err(err) => Err(join_err("unit", err)),
            };
            match result {
                Ok(outputs) => {
                    tracing::info!(unit = %unit.display(), targets = outputs.len(), "translated");
                    succeeded.push(Translation { unit, outputs });
                }
                Err(err) => {
                    tracing::warn!(unit = %unit.display(), error = %err, "translation failed");
                    failed.push((unit, err));
                }
            }
        }

        let elapsed = started.elapsed();
        tracing::info!(
            succeeded = succeeded.len(),
            failed = failed.len(),
            elapsed_ms = elapsed.as_millis() as u64,
            "translation run finished"
        );
        RunSummary {
            succeeded,
            failed,
            skipped: Vec::new(),
            elapsed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    /// Echoes `<language>:<file name>`; fails for units named `bad.*`.
    struct Echo {
        batch: bool,
        calls: Mutex<usize>,
    }

    impl Echo {
        fn new(batch: bool) -> Self {
            Self {
                batch,
                calls: Mutex::new(0),
            }
        }
    }

    impl Translator for Echo {
        fn supports_batch(&self) -> bool {
            self.batch
        }

        fn translate_batch(
            &self,
            content: &str,
            targets: &[TargetRequest],
        ) -> Result<Vec<String>, DispatchError> {
            *self.calls.lock().unwrap() += 1;
            Ok(targets
                .iter()
                .map(|t| format!("{}:{}", t.language, content.trim()))
                .collect())
        }

        fn translate_single(&self, path: &Path, target: &TargetRequest) -> Result<String, DispatchError> {
            *self.calls.lock().unwrap() += 1;
            let name = path.file_name().unwrap().to_string_lossy().to_string();
            if name.starts_with("bad") {
                return Err(DispatchError::OutputCount { expected: 1, actual: 0 });
            }
            Ok(format!("{}:{name}", target.language))
        }
    }

    fn targets(langs: &[&str]) -> Vec<TargetRequest> {
        langs.iter().map(|l| TargetRequest::new(*l)).collect()
    }

    #[tokio::test]
    async fn batch_translator_is_called_once_per_unit() {
        let dir = tempfile::TempDir::new().unwrap();
        let unit = dir.path().join("alpha.ts");
        std::fs::write(&unit, "body\n").unwrap();

        let dispatcher = Dispatcher::new(Echo::new(true), 2);
        let out = dispatcher.submit(&unit, &targets(&["go", "java", "cs"])).await.unwrap();
        assert_eq!(out, vec!["go:body", "java:body", "cs:body"]);
        assert_eq!(*dispatcher.translator.calls.lock().unwrap(), 1);
    }

    #[tokio::test]
    async fn single_translator_is_called_per_target() {
        let dispatcher = Dispatcher::new(Echo::new(false), 4);
        let out = dispatcher
            .submit(Path::new("alpha.ts"), &targets(&["go", "java"]))
            .await
            .unwrap();
        assert_eq!(out, vec!["go:alpha.ts", "java:alpha.ts"]);
        assert_eq!(*dispatcher.translator.calls.lock().unwrap(), 2);
    }

    #[tokio::test]
    async fn empty_targets_are_rejected() {
        let dispatcher = Dispatcher::new(Echo::new(false), 1);
        let err = dispatcher.submit(Path::new("a.ts"), &[]).await.unwrap_err();
        assert!(matches!(err, DispatchError::NoTargets));
    }

    #[tokio::test]
    async fn run_isolates_failing_unit() {
        let dispatcher = Dispatcher::new(Echo::new(false), 2);
        let units = vec![
            PathBuf::from("alpha.ts"),
            PathBuf::from("bad.ts"),
            PathBuf::from("gamma.ts"),
        ];
        let summary = dispatcher.run(units, &targets(&["go"])).await;

        assert!(!summary.is_ok());
        let ok: Vec<_> = summary.succeeded.iter().map(|t| t.unit.clone()).collect();
        assert_eq!(ok, vec![PathBuf::from("alpha.ts"), PathBuf::from("gamma.ts")]);
        assert_eq!(summary.failed.len(), 1);
        assert_eq!(summary.failed[0].0, PathBuf::from("bad.ts"));
    }

    #[test]
    fn pool_has_at_least_one_slot() {
        assert_eq!(Dispatcher::new(Echo::new(true), 0).jobs(), 1);
        assert!(default_jobs() >= 1);
    }
}
