mod protocol;
mod server;

use crate::config::Config;
use crate::debugger::{DebugContext, GdbSession};
use crate::error::Result;
use crate::registry::SessionStore;
use std::io;
use tracing::info;

pub use protocol::{read_message, write_message, Message, MessageContent, MAX_MESSAGE_BYTES};
pub use server::Server;

/// Serve requests on stdin/stdout with a real gdb behind them.
pub fn run_stdio(config: Config) -> Result<()> {
    info!(gdb = %config.gdb, "request server starting on stdio");

    let runner = GdbSession::new(&config)?;
    let context = DebugContext::new(config, runner);
    let store = SessionStore::new();

    let stdin = io::stdin();
    let stdout = io::stdout();
    Server::new(&context, &store).run(&mut stdin.lock(), &mut stdout.lock())?;

    info!(open_sessions = store.len(), "request server exiting");
    Ok(())
}
