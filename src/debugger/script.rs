use crate::config::Config;
use std::collections::HashMap;
use std::fmt;

/// Printed by `echo` between the blocks of one pass so each parser only sees
/// its own output.
pub const SECTION_MARKER: &str = "@@stack-debugger ";

pub const BACKTRACE_SECTION: &str = "backtrace";
pub const REGISTERS_SECTION: &str = "registers";
pub const MEMORY_SECTION: &str = "memory";

pub fn frame_section(index: usize) -> String {
    format!("frame {}", index)
}

/// A debugger command script, one command per line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Script {
    lines: Vec<String>,
}

impl Script {
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    fn push(&mut self, line: impl Into<String>) {
        self.lines.push(line.into());
    }

    fn section(&mut self, name: &str) {
        self.push(format!("echo {}{}\\n", SECTION_MARKER, name));
    }
}

impl fmt::Display for Script {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for line in &self.lines {
            writeln!(f, "{}", line)?;
        }
        Ok(())
    }
}

/// Builds the scripts for the three passes of one step. Every pass replays
/// the program from scratch up to `steps` instructions past the entry point.
#[derive(Debug, Clone, Copy)]
pub struct ScriptBuilder<'a> {
    config: &'a Config,
    steps: usize,
}

impl<'a> ScriptBuilder<'a> {
    pub fn new(config: &'a Config, steps: usize) -> Self {
        Self { config, steps }
    }

    fn preamble(&self) -> Script {
        let mut script = Script { lines: Vec::new() };
        script.push("set pagination off");
        script.push("set confirm off");
        script.push(format!(
            "set disassembly-flavor {}",
            self.config.disassembly_flavor
        ));
        script.push(format!("break {}", self.config.entry));
        script.push("run");
        for _ in 0..self.steps {
            script.push("stepi");
        }
        script
    }

    /// Pass 1: backtrace and register dump.
    pub fn initial_pass(&self) -> Script {
        let mut script = self.preamble();
        script.section(BACKTRACE_SECTION);
        script.push("backtrace");
        script.section(REGISTERS_SECTION);
        script.push("info registers");
        script
    }

    /// Pass 2: `info frame N` for each gdb frame level pass 1 found.
    pub fn frame_detail_pass(&self, levels: &[usize]) -> Script {
        let mut script = self.preamble();
        for level in levels {
            script.section(&frame_section(*level));
            script.push(format!("info frame {}", level));
        }
        script
    }

    /// Pass 3: one giant-word hex dump upward from the stack pointer.
    pub fn memory_pass(&self, words: usize) -> Script {
        let mut script = self.preamble();
        script.section(MEMORY_SECTION);
        script.push(format!("x/{}xg $sp", words));
        script
    }

    /// Words needed to cover `[sp, outermost_base)`, clamped to the cap.
    /// Falls back to the configured default when either end is unknown or
    /// the distance isn't positive.
    pub fn dump_word_count(&self, outermost_base: Option<u64>, stack_pointer: Option<u64>) -> usize {
        let bytes = match (outermost_base, stack_pointer) {
            (Some(base), Some(sp)) if base > sp => base - sp,
            _ => self.config.default_dump_bytes,
        };
        let words = usize::try_from(bytes.div_ceil(8)).unwrap_or(usize::MAX);
        words.clamp(1, self.config.max_dump_words.max(1))
    }
}

/// Split one pass's output on the section markers. Anything printed before
/// the first marker (breakpoint banners, stepping chatter) lands under "".
pub fn split_sections(output: &str) -> HashMap<String, String> {
    let mut sections: HashMap<String, String> = HashMap::new();
    let mut current = String::new();

    for line in output.lines() {
        if let Some(name) = line.trim().strip_prefix(SECTION_MARKER) {
            current = name.trim().to_string();
            sections.entry(current.clone()).or_default();
            continue;
        }
        let body = sections.entry(current.clone()).or_default();
        body.push_str(line);
        body.push('\n');
    }

    sections
}
