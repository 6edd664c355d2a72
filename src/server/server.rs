use super::protocol::{read_message, write_message, Message, MessageContent};
use crate::debugger::{DebugContext, ScriptRunner, StepMove};
use crate::error::{Error, Result};
use crate::registry::SessionStore;
use serde_json::{json, Value};
use std::io::{BufRead, Write};
use tracing::{debug, warn};

/// Answers requests one at a time over a framed byte stream.
pub struct Server<'a, R: ScriptRunner> {
    seq: u64,
    context: &'a DebugContext<R>,
    store: &'a SessionStore,
}

impl<'a, R: ScriptRunner> Server<'a, R> {
    pub fn new(context: &'a DebugContext<R>, store: &'a SessionStore) -> Self {
        Self {
            seq: 0,
            context,
            store,
        }
    }

    fn next_seq(&mut self) -> u64 {
        self.seq += 1;
        self.seq
    }

    /// Serve until the peer disconnects or closes the stream.
    pub fn run(&mut self, input: &mut impl BufRead, output: &mut impl Write) -> Result<()> {
        loop {
            let msg = match read_message(input) {
                Ok(Some(msg)) => msg,
                Ok(None) => break,
                Err(Error::Json(e)) => {
                    warn!("dropping unreadable message: {}", e);
                    continue;
                }
                Err(e) => return Err(e),
            };

            let MessageContent::Request { command, arguments } = msg.content else {
                debug!(seq = msg.seq, "ignoring non-request message");
                continue;
            };

            let done = command == "disconnect";
            let response = self.respond(msg.seq, command, arguments);
            write_message(output, &response)?;
            if done {
                break;
            }
        }
        Ok(())
    }

    /// Turn one request into its response. Errors become `success: false`
    /// with a message; nothing here fails the loop.
    pub fn respond(&mut self, request_seq: u64, command: String, arguments: Option<Value>) -> Message {
        debug!(request_seq, %command, "request");
        let (success, message, body) = match self.dispatch(&command, arguments.as_ref()) {
            Ok(body) => (true, None, body),
            Err(e) => {
                warn!(%command, "request failed: {}", e);
                (false, Some(e.to_string()), None)
            }
        };
        Message {
            seq: self.next_seq(),
            msg_type: "response".to_string(),
            content: MessageContent::Response {
                request_seq,
                success,
                command,
                message,
                body,
            },
        }
    }

    fn dispatch(&self, command: &str, args: Option<&Value>) -> Result<Option<Value>> {
        match command {
            "launch" => {
                let program = string_arg(args, "program")?;
                let source = args
                    .and_then(|v| v.get("source"))
                    .and_then(|v| v.as_str())
                    .map(str::to_string);
                let id = self.store.create(program, source);
                Ok(Some(json!({ "sessionId": id })))
            }
            "step" | "next" | "stepIn" => self.step(args, StepMove::Forward),
            "stepBack" => self.step(args, StepMove::Back),
            "reset" | "restart" => self.step(args, StepMove::Reset),
            "state" | "stackTrace" => self.step(args, StepMove::Stay),
            "close" => {
                let id = string_arg(args, "sessionId")?;
                self.store.remove(&id)?;
                Ok(None)
            }
            "disconnect" => Ok(None),
            other => Err(Error::BadRequest(format!("unknown command: {}", other))),
        }
    }

    fn step(&self, args: Option<&Value>, movement: StepMove) -> Result<Option<Value>> {
        let id = string_arg(args, "sessionId")?;
        let state = self.context.step_session(self.store, &id, movement)?;
        Ok(Some(serde_json::to_value(state)?))
    }
}

fn string_arg(args: Option<&Value>, name: &str) -> Result<String> {
    args.and_then(|v| v.get(name))
        .and_then(|v| v.as_str())
        .map(str::to_string)
        .ok_or_else(|| Error::BadRequest(format!("missing argument: {}", name)))
}
