use crate::error::{Error, Result};

/// Words per memory dump, never more.
pub const MAX_DUMP_WORDS: usize = 256;

/// Bytes to dump when the outermost frame address can't be worked out.
pub const DEFAULT_DUMP_BYTES: u64 = 256;

/// Knobs for how the debugger is driven.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Debugger command line, split shell-style (e.g. `gdb` or `gdb -q -nx`)
    pub gdb: String,
    /// Symbol the breakpoint is placed on before stepping
    pub entry: String,
    pub disassembly_flavor: String,
    pub max_dump_words: usize,
    pub default_dump_bytes: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            gdb: "gdb".to_string(),
            entry: "main".to_string(),
            disassembly_flavor: "intel".to_string(),
            max_dump_words: MAX_DUMP_WORDS,
            default_dump_bytes: DEFAULT_DUMP_BYTES,
        }
    }
}

impl Config {
    /// Program and leading arguments of the debugger command.
    pub fn gdb_command(&self) -> Result<(String, Vec<String>)> {
        let mut parts = shlex::split(&self.gdb)
            .ok_or_else(|| Error::InvalidCommand(self.gdb.clone()))?
            .into_iter();
        let program = parts
            .next()
            .ok_or_else(|| Error::InvalidCommand(self.gdb.clone()))?;
        Ok((program, parts.collect()))
    }
}
