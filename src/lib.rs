//! Drive gdb against a debug build and rebuild the call stack, registers and
//! raw stack memory at any instruction step.

pub mod config;
pub mod debugger;
pub mod error;
pub mod parser;
pub mod registry;
pub mod server;
pub mod stack;
pub mod state;

pub use config::Config;
pub use error::{Error, Result};
pub use state::StepState;
