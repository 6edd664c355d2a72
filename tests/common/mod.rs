// Canned gdb used by the integration tests. It answers each pass by looking
// at which commands the script contains.

#![allow(dead_code)]

use stack_debugger::debugger::{PassOutput, Script, ScriptRunner, SECTION_MARKER};
use std::cell::RefCell;
use std::io;
use std::path::Path;

pub const HI_BACKTRACE: &str = "\
#0  hi (a=5) at test.c:9
#1  0x0000555555555186 in main () at test.c:17
";

pub const HI_REGISTERS: &str = "\
rax            0x555555555169      93824992235881
rbx            0x0                 0
rbp            0x7fffffffe000      0x7fffffffe000
rsp            0x7fffffffdff0      0x7fffffffdff0
rip            0x555555555139      0x555555555139 <hi+16>
eflags         0x246               [ IF ZF PF ]
";

pub const HI_FRAME: &str = "\
Stack level 0, frame at 0x7fffffffe010:
 rip = 0x555555555139 in hi (test.c:9); saved rip = 0x555555555186
 called by frame at 0x7fffffffe030
 source language c.
 Arglist at 0x7fffffffe000, args: a=5
 Locals at 0x7fffffffe000, Previous frame's sp is 0x7fffffffe010
 Saved registers:
  rbp at 0x7fffffffe000, rip at 0x7fffffffe008
";

pub const MAIN_FRAME: &str = "\
Stack level 1, frame at 0x7fffffffe030:
 rip = 0x555555555186 in main (test.c:17); saved rip = 0x7ffff7829d90
 caller of frame at 0x7fffffffe010
 source language c.
 Arglist at 0x7fffffffe020, args:
 Locals at 0x7fffffffe020, Previous frame's sp is 0x7fffffffe030
 Saved registers:
  rbp at 0x7fffffffe020, rip at 0x7fffffffe028
";

pub const HI_MEMORY: &str = "\
0x7fffffffdff0:\t0x0000000000000000\t0x0000000500000000
0x7fffffffe000:\t0x00007fffffffe020\t0x0000555555555186
0x7fffffffe010:\t0x0000000000000000\t0x00007ffff7ffd000
0x7fffffffe020:\t0x0000000000000001\t0x00007ffff7829d90
";

pub const HANDLER_BACKTRACE: &str = "\
#0  handler (sig=11) at test.c:4
#1  <signal handler called>
#2  0x0000555555555186 in main () at test.c:17
";

pub const SIGNAL_FRAME: &str = "\
Stack level 1, frame at 0x7fffffffe020:
 rip = 0x7ffff7842520 in __restore_rt; saved rip = 0x555555555186
 caller of frame at 0x7fffffffe010
 Saved registers:
  rip at 0x7fffffffe018
";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    Initial,
    Frames,
    Memory,
}

pub enum Reply {
    Ok,
    Exit(i32, &'static str),
    SpawnError,
}

pub struct FakeGdb {
    pub backtrace: String,
    pub registers: String,
    pub frames: Vec<String>,
    pub memory: String,
    pub initial: Reply,
    pub frames_reply: Reply,
    pub memory_reply: Reply,
    /// When false the frame-detail pass prints its blocks without section markers.
    pub frame_markers: bool,
    pub scripts: RefCell<Vec<Script>>,
}

impl FakeGdb {
    /// Stopped inside `hi` called from `main`, as in a small C program.
    pub fn in_hi() -> Self {
        Self {
            backtrace: HI_BACKTRACE.to_string(),
            registers: HI_REGISTERS.to_string(),
            frames: vec![HI_FRAME.to_string(), MAIN_FRAME.to_string()],
            memory: HI_MEMORY.to_string(),
            initial: Reply::Ok,
            frames_reply: Reply::Ok,
            memory_reply: Reply::Ok,
            frame_markers: true,
            scripts: RefCell::new(Vec::new()),
        }
    }

    pub fn kinds(&self) -> Vec<Kind> {
        self.scripts.borrow().iter().map(kind_of).collect()
    }

    pub fn last_script_of(&self, kind: Kind) -> Option<Script> {
        self.scripts
            .borrow()
            .iter()
            .rev()
            .find(|s| kind_of(s) == kind)
            .cloned()
    }
}

fn kind_of(script: &Script) -> Kind {
    if script.lines().iter().any(|l| l == "backtrace") {
        Kind::Initial
    } else if script.lines().iter().any(|l| l.starts_with("info frame")) {
        Kind::Frames
    } else {
        Kind::Memory
    }
}

fn marker(name: &str) -> String {
    format!("{}{}\n", SECTION_MARKER, name)
}

impl ScriptRunner for FakeGdb {
    fn run_script(&self, _executable: &Path, script: &Script) -> io::Result<PassOutput> {
        self.scripts.borrow_mut().push(script.clone());

        let kind = kind_of(script);
        let reply = match kind {
            Kind::Initial => &self.initial,
            Kind::Frames => &self.frames_reply,
            Kind::Memory => &self.memory_reply,
        };
        match reply {
            Reply::SpawnError => {
                return Err(io::Error::new(io::ErrorKind::NotFound, "gdb: not found"))
            }
            Reply::Exit(code, stderr) => {
                return Ok(PassOutput {
                    stdout: String::new(),
                    stderr: stderr.to_string(),
                    exit_code: Some(*code),
                })
            }
            Reply::Ok => {}
        }

        let mut stdout = String::from("Breakpoint 1 at 0x1151: file test.c, line 17.\n\nBreakpoint 1, main () at test.c:17\n17\t    hi(5);\n");
        match kind {
            Kind::Initial => {
                stdout.push_str(&marker("backtrace"));
                stdout.push_str(&self.backtrace);
                stdout.push_str(&marker("registers"));
                stdout.push_str(&self.registers);
            }
            Kind::Frames => {
                for (i, line) in script.lines().iter().enumerate() {
                    if let Some(n) = line.strip_prefix("info frame ") {
                        let n: usize = n.parse().unwrap_or(i);
                        if self.frame_markers {
                            stdout.push_str(&marker(&format!("frame {}", n)));
                        }
                        if let Some(text) = self.frames.get(n) {
                            stdout.push_str(text);
                        }
                    }
                }
            }
            Kind::Memory => {
                stdout.push_str(&marker("memory"));
                stdout.push_str(&self.memory);
            }
        }

        Ok(PassOutput {
            stdout,
            stderr: String::new(),
            exit_code: Some(0),
        })
    }
}
