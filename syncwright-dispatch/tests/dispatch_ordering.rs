//! Result ordering and failure isolation across the worker pool.

use std::path::{Path, PathBuf};
use std::sync::mpsc::{channel, Receiver, Sender};
use std::sync::Mutex;
use std::time::Duration;

use syncwright_dispatch::{DispatchError, Dispatcher, TargetRequest, Translator};

/// Single-target translator where `go` only completes after `java` has.
struct JavaFirst {
    java_done: Mutex<Sender<()>>,
    go_waits: Mutex<Receiver<()>>,
    completed: Mutex<Vec<String>>,
}

impl JavaFirst {
    fn new() -> Self {
        let (tx, rx) = channel();
        Self {
            java_done: Mutex::new(tx),
            go_waits: Mutex::new(rx),
            completed: Mutex::new(Vec::new()),
        }
    }
}

impl Translator for JavaFirst {
    fn supports_batch(&self) -> bool {
        false
    }

    fn translate_batch(&self, _: &str, _: &[TargetRequest]) -> Result<Vec<String>, DispatchError> {
        unreachable!("single-target translator")
    }

    fn translate_single(&self, _path: &Path, target: &TargetRequest) -> Result<String, DispatchError> {
        match target.language.as_str() {
            "go" => {
                self.go_waits
                    .lock()
                    .unwrap()
                    .recv_timeout(Duration::from_secs(10))
                    .expect("java never finished");
            }
            "java" => {
                self.java_done.lock().unwrap().send(()).unwrap();
            }
            _ => {}
        }
        self.completed.lock().unwrap().push(target.language.clone());
        Ok(format!("{}Result", target.language))
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn results_follow_target_order_not_completion_order() {
    let dispatcher = Dispatcher::new(JavaFirst::new(), 2);
    let targets = vec![TargetRequest::new("go"), TargetRequest::new("java")];

    let out = dispatcher.submit(Path::new("unit.ts"), &targets).await.unwrap();

    assert_eq!(out, vec!["goResult", "javaResult"]);
}

/// Fails every call for units whose file name contains `broken`.
struct Picky;

impl Translator for Picky {
    fn supports_batch(&self) -> bool {
        true
    }

    fn translate_batch(
        &self,
        content: &str,
        targets: &[TargetRequest],
    ) -> Result<Vec<String>, DispatchError> {
        if content.contains("broken") {
            return Err(DispatchError::TranslatorFailed {
                program: "picky".into(),
                status: "exit status: 1".into(),
                stderr: "cannot parse".into(),
            });
        }
        Ok(targets.iter().map(|t| format!("// {}\n{content}", t.language)).collect())
    }

    fn translate_single(&self, _: &Path, _: &TargetRequest) -> Result<String, DispatchError> {
        unreachable!("batch translator")
    }
}

#[tokio::test]
async fn failing_unit_does_not_affect_siblings() {
    let dir = tempfile::TempDir::new().unwrap();
    let mut units = Vec::new();
    for (name, body) in [("a.ts", "ok a"), ("b.ts", "broken"), ("c.ts", "ok c")] {
        let path = dir.path().join(name);
        std::fs::write(&path, body).unwrap();
        units.push(path);
    }
    units.push(PathBuf::from("/nonexistent/d.ts"));

    let summary = Dispatcher::new(Picky, 3)
        .run(units, &[TargetRequest::new("go")])
        .await;

    assert_eq!(summary.succeeded.len(), 2);
    assert_eq!(summary.succeeded[1].outputs, vec!["// go\nok c"]);
    let failed: Vec<_> = summary
        .failed
        .iter()
        .map(|(unit, err)| (unit.file_name().unwrap().to_owned(), err))
        .collect();
    assert_eq!(failed.len(), 2);
    assert_eq!(failed[0].0, "b.ts");
    assert!(failed[0].1.to_string().contains("cannot parse"));
    assert!(matches!(failed[1].1, DispatchError::Io { .. }));
}
