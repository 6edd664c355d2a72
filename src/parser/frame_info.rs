use super::types::{parse_hex, FrameDetail};
use regex::Regex;
use std::collections::BTreeMap;
use std::sync::OnceLock;
use tracing::trace;

fn frame_at() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    // "Stack level 0, frame at 0x..." or "Stack frame at 0x..."; the word
    // between "at" and the address is optional.
    RE.get_or_init(|| {
        Regex::new(r"frame at\s+(?:[A-Za-z_]+\s+)?(0x[0-9a-fA-F]+)")
            .expect("frame address pattern is valid")
    })
}

fn rip_line() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"rip = (0x[0-9a-fA-F]+)(?: in ([^\s;(]+))?(?: \(([^:()]+):(\d+)\))?")
            .expect("rip pattern is valid")
    })
}

fn saved_register() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"([A-Za-z_][A-Za-z0-9_]*) at (0x[0-9a-fA-F]+)")
            .expect("saved register pattern is valid")
    })
}

/// Parse one `info frame N` block.
///
/// Every section is optional. The raw text is always kept so the caller can
/// show it when the structured fields come up empty.
pub fn parse_frame_info(text: &str) -> FrameDetail {
    let mut detail = FrameDetail {
        raw: text.to_string(),
        ..FrameDetail::default()
    };

    detail.frame_address = frame_at()
        .captures(text)
        .and_then(|caps| parse_hex(&caps[1]));

    if let Some(caps) = rip_line().captures(text) {
        detail.rip = parse_hex(&caps[1]);
        detail.function = caps.get(2).map(|m| m.as_str().to_string());
        detail.file = caps.get(3).map(|m| m.as_str().to_string());
        detail.line = caps.get(4).and_then(|m| m.as_str().parse().ok());
    }

    detail.saved_registers = parse_saved_registers(text);

    if detail.frame_address.is_none() {
        trace!("no frame address in info frame block");
    }

    detail
}

/// Collect `REG at ADDR` pairs from the indented lines after "Saved registers:".
fn parse_saved_registers(text: &str) -> BTreeMap<u64, String> {
    let mut saved = BTreeMap::new();

    let mut lines = text.lines().skip_while(|l| !l.trim_start().starts_with("Saved registers:"));
    if lines.next().is_none() {
        return saved;
    }

    for line in lines {
        if !line.starts_with([' ', '\t']) {
            break;
        }
        for caps in saved_register().captures_iter(line) {
            if let Some(addr) = parse_hex(&caps[2]) {
                saved.insert(addr, caps[1].to_string());
            }
        }
    }

    saved
}
