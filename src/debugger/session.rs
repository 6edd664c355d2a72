use super::script::Script;
use crate::config::Config;
use crate::error::Result;
use std::io::{self, Write};
use std::path::Path;
use std::process::{Command, Stdio};
use tracing::debug;

/// Everything one debugger invocation produced, fully buffered.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PassOutput {
    pub stdout: String,
    pub stderr: String,
    pub exit_code: Option<i32>,
}

impl PassOutput {
    pub fn success(&self) -> bool {
        self.exit_code == Some(0)
    }

    /// The most useful text to show when the pass failed.
    pub fn error_text(&self) -> String {
        let stderr = self.stderr.trim();
        if !stderr.is_empty() {
            return stderr.to_string();
        }
        match self.exit_code {
            Some(code) => format!("debugger exited with status {}", code),
            None => "debugger was terminated by a signal".to_string(),
        }
    }
}

/// Runs one command script against an executable and returns its output.
pub trait ScriptRunner {
    fn run_script(&self, executable: &Path, script: &Script) -> io::Result<PassOutput>;
}

/// Invokes gdb in batch mode, one fresh process per script.
#[derive(Debug, Clone)]
pub struct GdbSession {
    program: String,
    args: Vec<String>,
}

impl GdbSession {
    pub fn new(config: &Config) -> Result<Self> {
        let (program, args) = config.gdb_command()?;
        Ok(Self { program, args })
    }
}

impl ScriptRunner for GdbSession {
    fn run_script(&self, executable: &Path, script: &Script) -> io::Result<PassOutput> {
        // The temp file is removed when `file` drops, whichever way we leave.
        let mut file = tempfile::Builder::new()
            .prefix("stack-debugger-")
            .suffix(".gdb")
            .tempfile()?;
        file.write_all(script.to_string().as_bytes())?;
        file.flush()?;

        debug!(
            script = %file.path().display(),
            executable = %executable.display(),
            commands = script.lines().len(),
            "running {}",
            self.program
        );

        let output = Command::new(&self.program)
            .args(&self.args)
            .args(["-batch", "-nx", "-x"])
            .arg(file.path())
            .arg(executable)
            .stdin(Stdio::null())
            .output()?;

        Ok(PassOutput {
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            exit_code: output.status.code(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_text_prefers_stderr() {
        let output = PassOutput {
            stdout: "noise".to_string(),
            stderr: "No symbol table is loaded.\n".to_string(),
            exit_code: Some(1),
        };
        assert!(!output.success());
        assert_eq!(output.error_text(), "No symbol table is loaded.");
    }

    #[test]
    fn error_text_falls_back_to_status() {
        let output = PassOutput {
            exit_code: Some(2),
            ..PassOutput::default()
        };
        assert_eq!(output.error_text(), "debugger exited with status 2");
    }

    #[test]
    fn missing_debugger_is_an_io_error() {
        let config = Config {
            gdb: "stack-debugger-no-such-gdb-binary".to_string(),
            ..Config::default()
        };
        let session = GdbSession::new(&config).unwrap();
        let script = crate::debugger::ScriptBuilder::new(&config, 0).initial_pass();
        let result = session.run_script(Path::new("/nonexistent"), &script);
        assert!(result.is_err());
    }
}
