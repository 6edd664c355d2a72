mod context;
mod controller;
mod script;
mod session;
mod stepping;

pub use context::DebugContext;
pub use controller::{Controller, Pass, PassFailure, StepCapture};
pub use script::{split_sections, Script, ScriptBuilder, SECTION_MARKER};
pub use session::{GdbSession, PassOutput, ScriptRunner};
pub use stepping::StepMove;
