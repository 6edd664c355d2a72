use super::script::{
    frame_section, split_sections, Script, ScriptBuilder, BACKTRACE_SECTION, MEMORY_SECTION,
    REGISTERS_SECTION,
};
use super::session::{PassOutput, ScriptRunner};
use crate::config::Config;
use crate::error::{Error, Result};
use crate::parser::{parse_backtrace, parse_frame_info, parse_registers};
use std::collections::HashMap;
use std::fmt;
use std::path::Path;
use tracing::{debug, warn};

/// The three replays that make up one step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pass {
    Initial,
    FrameDetail,
    Memory,
}

impl Pass {
    pub fn name(&self) -> &'static str {
        match self {
            Pass::Initial => "initial",
            Pass::FrameDetail => "frame-detail",
            Pass::Memory => "memory",
        }
    }
}

impl fmt::Display for Pass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A later pass that failed after the initial pass succeeded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PassFailure {
    pub pass: Pass,
    pub message: String,
}

impl fmt::Display for PassFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} pass failed: {}", self.pass, self.message)
    }
}

/// Raw text collected for one step.
///
/// `frame_details` and `memory` are `None` when their pass failed or was not
/// needed; `failures` says which.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StepCapture {
    pub steps: usize,
    pub backtrace: String,
    pub registers: String,
    pub frame_details: Option<Vec<String>>,
    pub memory: Option<String>,
    pub failures: Vec<PassFailure>,
}

/// Sequences the passes of a step, feeding each pass's results into the
/// next pass's script.
pub struct Controller<'a, R: ScriptRunner> {
    config: &'a Config,
    runner: &'a R,
}

impl<'a, R: ScriptRunner> Controller<'a, R> {
    pub fn new(config: &'a Config, runner: &'a R) -> Self {
        Self { config, runner }
    }

    pub fn capture(&self, executable: &Path, steps: usize) -> Result<StepCapture> {
        let builder = ScriptBuilder::new(self.config, steps);

        // Pass 1 failing takes the whole step down.
        let output = self
            .runner
            .run_script(executable, &builder.initial_pass())
            .map_err(|e| Error::ToolInvocation {
                pass: Pass::Initial.name(),
                message: e.to_string(),
            })?;
        if !output.success() {
            return Err(Error::ToolInvocation {
                pass: Pass::Initial.name(),
                message: output.error_text(),
            });
        }

        let sections = split_sections(&output.stdout);
        let mut capture = StepCapture {
            steps,
            backtrace: section_or_all(&sections, BACKTRACE_SECTION, &output.stdout),
            registers: section_or_all(&sections, REGISTERS_SECTION, &output.stdout),
            ..StepCapture::default()
        };

        let frames = parse_backtrace(&capture.backtrace);
        let stack_pointer = parse_registers(&capture.registers).stack_pointer();
        debug!(steps, frames = frames.len(), ?stack_pointer, "initial pass done");

        // Pass 2
        let mut outermost_base = None;
        if !frames.is_empty() {
            let levels: Vec<usize> = frames.iter().map(|f| f.level).collect();
            let script = builder.frame_detail_pass(&levels);
            match self.run_later(executable, Pass::FrameDetail, &script) {
                Ok(output) => {
                    let sections = split_sections(&output.stdout);
                    let details: Vec<String> = if let [level] = levels[..] {
                        vec![section_or_all(&sections, &frame_section(level), &output.stdout)]
                    } else {
                        // Without markers there is no telling the blocks apart.
                        levels
                            .iter()
                            .map(|level| {
                                sections
                                    .get(&frame_section(*level))
                                    .cloned()
                                    .unwrap_or_default()
                            })
                            .collect()
                    };
                    outermost_base = details
                        .iter()
                        .filter_map(|text| parse_frame_info(text).frame_address)
                        .max();
                    capture.frame_details = Some(details);
                }
                Err(failure) => capture.failures.push(failure),
            }
        }

        // Pass 3
        let words = builder.dump_word_count(outermost_base, stack_pointer);
        match self.run_later(executable, Pass::Memory, &builder.memory_pass(words)) {
            Ok(output) => {
                let sections = split_sections(&output.stdout);
                capture.memory = Some(section_or_all(&sections, MEMORY_SECTION, &output.stdout));
            }
            Err(failure) => capture.failures.push(failure),
        }

        Ok(capture)
    }

    fn run_later(
        &self,
        executable: &Path,
        pass: Pass,
        script: &Script,
    ) -> std::result::Result<PassOutput, PassFailure> {
        let result = match self.runner.run_script(executable, script) {
            Ok(output) if output.success() => Ok(output),
            Ok(output) => Err(output.error_text()),
            Err(e) => Err(e.to_string()),
        };
        result.map_err(|message| {
            warn!(%pass, %message, "pass failed, continuing without it");
            PassFailure { pass, message }
        })
    }
}

fn section_or_all(sections: &HashMap<String, String>, name: &str, all: &str) -> String {
    sections
        .get(name)
        .cloned()
        .unwrap_or_else(|| all.to_string())
}
