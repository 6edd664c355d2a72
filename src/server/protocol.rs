use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::io::{BufRead, Read, Write};

/// Largest body `read_message` will allocate for.
pub const MAX_MESSAGE_BYTES: usize = 16 * 1024 * 1024;

#[derive(Debug, Serialize, Deserialize)]
pub struct Message {
    pub seq: u64,
    #[serde(rename = "type")]
    pub msg_type: String,
    #[serde(flatten)]
    pub content: MessageContent,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MessageContent {
    Response {
        request_seq: u64,
        success: bool,
        command: String,
        message: Option<String>,
        body: Option<Value>,
    },
    Request {
        command: String,
        arguments: Option<Value>,
    },
}

/// Read one `Content-Length` framed message. `Ok(None)` means the peer hung up.
///
/// A body over [`MAX_MESSAGE_BYTES`] is refused unread, which leaves the
/// stream out of sync.
pub fn read_message(input: &mut impl BufRead) -> Result<Option<Message>> {
    let mut content_length = 0usize;

    loop {
        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        let line = line.trim_end_matches(['\r', '\n']);
        if line.is_empty() {
            if content_length > 0 {
                break;
            }
            continue;
        }
        if let Some(len) = line.strip_prefix("Content-Length:") {
            content_length = len.trim().parse().unwrap_or(0);
        }
    }

    if content_length > MAX_MESSAGE_BYTES {
        return Err(Error::BadRequest(format!(
            "message too large: {} bytes",
            content_length
        )));
    }

    let mut buffer = vec![0u8; content_length];
    input.read_exact(&mut buffer)?;
    Ok(Some(serde_json::from_slice(&buffer)?))
}

/// Write one message with its `Content-Length` header and flush.
pub fn write_message(output: &mut impl Write, msg: &Message) -> Result<()> {
    let json = serde_json::to_string(msg)?;
    write!(output, "Content-Length: {}\r\n\r\n{}", json.len(), json)?;
    output.flush()?;
    Ok(())
}
