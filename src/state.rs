//! The per-step snapshot handed to the presentation layer.

use crate::debugger::StepCapture;
use crate::parser::{parse_backtrace, parse_frame_info, parse_registers, parse_stack_memory};
use crate::parser::{Frame, RegisterSet};
use crate::stack::{reconstruct, Segment, StackWord};
use serde::Serialize;
use tracing::debug;

/// Immutable snapshot of the program at one step. The next step produces a
/// new one rather than changing this.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StepState {
    pub step: usize,
    pub frame_count: usize,
    pub frames: Vec<Frame>,
    pub registers: RegisterSet,
    pub stack_memory: Vec<StackWord>,
    pub stack_segments: Vec<Segment>,
    /// Passes that failed and what is missing because of it
    pub warnings: Vec<String>,
}

impl StepState {
    /// Parse everything the controller collected and rebuild the stack.
    pub fn from_capture(capture: &StepCapture) -> Self {
        let mut frames = parse_backtrace(&capture.backtrace);
        let registers = parse_registers(&capture.registers);

        if let Some(details) = &capture.frame_details {
            for (frame, text) in frames.iter_mut().zip(details) {
                let detail = parse_frame_info(text);
                // Backtrace lines can lose the location when they wrap.
                if frame.file.is_none() && detail.file.is_some() {
                    frame.file = detail.file.clone();
                    frame.line = detail.line;
                }
                frame.detail = Some(detail);
            }
        }

        let dump = capture
            .memory
            .as_deref()
            .map(parse_stack_memory)
            .unwrap_or_default();
        let layout = reconstruct(&frames, &dump, registers.stack_pointer());

        let warnings = capture.failures.iter().map(|f| f.to_string()).collect();

        debug!(
            step = capture.steps,
            frames = frames.len(),
            registers = registers.len(),
            words = layout.words.len(),
            "step state built"
        );

        StepState {
            step: capture.steps,
            frame_count: frames.len(),
            frames,
            registers,
            stack_memory: layout.words,
            stack_segments: layout.segments,
            warnings,
        }
    }
}
