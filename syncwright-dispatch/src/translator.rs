//! Translator capability and the shipped command-line implementation.

use std::io::Write;
use std::path::Path;
use std::process::{Command, Output, Stdio};

use serde::Serialize;

use syncwright_core::config::{TranslateTarget, TranslatorKind};
use syncwright_core::TranslationMode;

use crate::error::{io_err, DispatchError};

/// One requested output of a translation call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TargetRequest {
    pub language: String,
    pub mode: TranslationMode,
}

impl TargetRequest {
    pub fn new(language: impl Into<String>) -> Self {
        Self {
            language: language.into(),
            mode: TranslationMode::default(),
        }
    }
}

impl From<&TranslateTarget> for TargetRequest {
    fn from(target: &TranslateTarget) -> Self {
        Self {
            language: target.language.clone(),
            mode: target.mode,
        }
    }
}

/// External translation capability, treated as a pure function.
///
/// Implementations are called from blocking worker threads.
pub trait Translator: Send + Sync + 'static {
    /// Whether [`Translator::translate_batch`] is available.
    fn supports_batch(&self) -> bool;

    /// Translate `content` into every target in one call. Results follow `targets` order.
    fn translate_batch(
        &self,
        content: &str,
        targets: &[TargetRequest],
    ) -> Result<Vec<String>, DispatchError>;

    /// Translate the unit at `path` into a single target.
    fn translate_single(&self, path: &Path, target: &TargetRequest) -> Result<String, DispatchError>;
}

#[derive(Serialize)]
struct BatchRequest<'a> {
    content: &'a str,
    targets: &'a [TargetRequest],
}

/// Runs a configured executable.
///
/// Batch mode pipes `{"content", "targets"}` on stdin and expects a JSON
/// array of strings on stdout. Single mode runs
/// `<program> <args..> --target <language> <path>` and takes stdout verbatim.
#[derive(Debug, Clone)]
pub struct CommandTranslator {
    program: String,
    args: Vec<String>,
    kind: TranslatorKind,
}

impl CommandTranslator {
    pub fn new(program: impl Into<String>, args: Vec<String>, kind: TranslatorKind) -> Self {
        Self {
            program: program.into(),
            args,
            kind,
        }
    }

    fn command(&self) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args);
        cmd
    }

    fn check(&self, output: Output) -> Result<String, DispatchError> {
        if !output.status.success() {
            return Err(DispatchError::TranslatorFailed {
                program: self.program.clone(),
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        Ok(String::from_utf8(output.stdout)?)
    }
}

impl Translator for CommandTranslator {
    fn supports_batch(&self) -> bool {
        self.kind == TranslatorKind::Batch
    }

    fn translate_batch(
        &self,
        content: &str,
        targets: &[TargetRequest],
    ) -> Result<Vec<String>, DispatchError> {
        let payload = serde_json::to_vec(&BatchRequest { content, targets })?;

        let mut child = self
            .command()
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| io_err(&self.program, e))?;

        // stdin is fed from a helper thread while stdout drains.
        let writer = child.stdin.take().map(|mut stdin| {
            std::thread::spawn(move || {
                let _ = stdin.write_all(&payload);
            })
        });
        let output = child
            .wait_with_output()
            .map_err(|e| io_err(&self.program, e))?;
        if let Some(handle) = writer {
            let _ = handle.join();
        }

        let stdout = self.check(output)?;
        let results: Vec<String> = serde_json::from_str(&stdout)?;
        if results.len() != targets.len() {
            return Err(DispatchError::OutputCount {
                expected: targets.len(),
                actual: results.len(),
            });
        }
        Ok(results)
    }

    fn translate_single(&self, path: &Path, target: &TargetRequest) -> Result<String, DispatchError> {
        let output = self
            .command()
            .arg("--target")
            .arg(&target.language)
            .arg(path)
            .stdin(Stdio::null())
            .output()
            .map_err(|e| io_err(&self.program, e))?;
        self.check(output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn batch_request_wire_shape() {
        let targets = vec![TargetRequest::new("go"), TargetRequest {
            language: "java".into(),
            mode: TranslationMode::Async,
        }];
        let json = serde_json::to_value(BatchRequest {
            content: "x",
            targets: &targets,
        })
        .unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "content": "x",
                "targets": [
                    {"language": "go", "mode": "sync"},
                    {"language": "java", "mode": "async"},
                ]
            })
        );
    }

    #[test]
    fn kind_selects_batch_support() {
        let batch = CommandTranslator::new("t", vec![], TranslatorKind::Batch);
        let single = CommandTranslator::new("t", vec![], TranslatorKind::Single);
        assert!(batch.supports_batch());
        assert!(!single.supports_batch());
    }

    #[test]
    fn missing_program_is_io_error() {
        let t = CommandTranslator::new("/nonexistent/syncwright-translator", vec![], TranslatorKind::Single);
        let err = t
            .translate_single(Path::new("unit.ts"), &TargetRequest::new("go"))
            .unwrap_err();
        assert!(matches!(err, DispatchError::Io { .. }));
    }
}
