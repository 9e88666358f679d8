//! Render engine backed by the Mermaid command-line renderer.
//!
//! Each render writes the source into a scratch directory, runs the
//! configured executable as `<command> <args..> -i input.mmd -o output.svg
//! -I <id>` and reads the produced SVG back.

use std::process::Stdio;

use log::{debug, trace};
use tempfile::tempdir;
use tokio::{fs, process::Command};

use mermaid_studio::{
    config::RenderConfig,
    render::{RenderEngine, RenderError},
};

/// [`RenderEngine`] that spawns an external renderer per request.
#[derive(Debug, Clone)]
pub struct ProcessEngine {
    command: String,
    args: Vec<String>,
}

impl ProcessEngine {
    pub fn new(config: &RenderConfig) -> Self {
        Self {
            command: config.command().to_string(),
            args: config.args().to_vec(),
        }
    }
}

impl RenderEngine for ProcessEngine {
    async fn render(&self, id: &str, source: &str) -> Result<String, RenderError> {
        let scratch = tempdir().map_err(|err| scratch_error(&err))?;
        let input = scratch.path().join("input.mmd");
        let output = scratch.path().join("output.svg");
        fs::write(&input, source)
            .await
            .map_err(|err| scratch_error(&err))?;

        debug!(command = self.command, id; "Running renderer");
        let result = Command::new(&self.command)
            .args(&self.args)
            .arg("-i")
            .arg(&input)
            .arg("-o")
            .arg(&output)
            .arg("-I")
            .arg(id)
            .stdin(Stdio::null())
            .output()
            .await
            .map_err(|err| {
                RenderError::engine(format!("failed to run `{}`: {err}", self.command))
            })?;

        if !result.status.success() {
            let stderr = String::from_utf8_lossy(&result.stderr);
            trace!(status:% = result.status, stderr:% = stderr; "Renderer failed");
            return Err(RenderError::engine(stderr.trim()));
        }

        fs::read_to_string(&output)
            .await
            .map_err(|err| RenderError::engine(format!("renderer produced no output: {err}")))
    }
}

fn scratch_error(err: &std::io::Error) -> RenderError {
    RenderError::engine(format!("failed to prepare render input: {err}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(toml: &str) -> RenderConfig {
        ::toml::from_str(toml).unwrap()
    }

    fn block_on<F: std::future::Future>(future: F) -> F::Output {
        tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap()
            .block_on(future)
    }

    #[test]
    fn test_missing_executable_is_an_engine_error() {
        let engine = ProcessEngine::new(&config(
            "command = \"mermaid-studio-test-no-such-renderer\"",
        ));

        let err = block_on(engine.render("diagram-1", "pie")).unwrap_err();
        let message = err.to_string();
        assert!(message.starts_with("failed to run `mermaid-studio-test-no-such-renderer`"));
    }

    #[cfg(unix)]
    #[test]
    fn test_failing_renderer_reports_stderr() {
        let engine = ProcessEngine::new(&config(
            "command = \"sh\"\nargs = [\"-c\", \"echo 'Parse error on line 2' >&2; exit 1\", \"mmdc\"]",
        ));

        let err = block_on(engine.render("diagram-1", "graph TD\n  A[")).unwrap_err();
        assert_eq!(err, RenderError::Engine(Some("Parse error on line 2".to_string())));
    }

    #[cfg(unix)]
    #[test]
    fn test_silent_failure_uses_fallback_message() {
        let engine = ProcessEngine::new(&config(
            "command = \"sh\"\nargs = [\"-c\", \"exit 3\", \"mmdc\"]",
        ));

        let err = block_on(engine.render("diagram-1", "pie")).unwrap_err();
        assert_eq!(err, RenderError::Engine(None));
    }

    #[cfg(unix)]
    #[test]
    fn test_output_file_is_returned() {
        // `sh -c script name -i in -o out -I id` binds $4 to the output path.
        let engine = ProcessEngine::new(&config(
            "command = \"sh\"\nargs = [\"-c\", \"printf '<svg id=\\\"%s\\\"/>' \\\"$6\\\" > \\\"$4\\\"\", \"mmdc\"]",
        ));

        let markup = block_on(engine.render("diagram-7", "pie")).unwrap();
        assert_eq!(markup, r#"<svg id="diagram-7"/>"#);
    }
}
