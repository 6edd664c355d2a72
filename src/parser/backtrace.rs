use super::types::{Argument, Frame};
use regex::Regex;
use std::sync::OnceLock;
use tracing::trace;

fn frame_line() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r"^\s*#(\d+)\s+(?:0x[0-9a-fA-F]+\s+in\s+)?(\S+)\s*\((.*)\)(?:\s+at\s+(\S+):(\d+))?(?:\s+from\s+\S+)?\s*$",
        )
        .expect("backtrace pattern is valid")
    })
}

fn pseudo_frame_line() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    // "#1  <signal handler called>"
    RE.get_or_init(|| {
        Regex::new(r"^\s*#(\d+)\s+(<[^>]+>)\s*$").expect("pseudo frame pattern is valid")
    })
}

/// Parse `backtrace` output into frames, innermost first.
///
/// Lines that don't look like `#N ...` are dropped. Frames are indexed by
/// position so the indices stay contiguous; gdb's own number is kept in
/// `level` for addressing the frame in later commands.
pub fn parse_backtrace(text: &str) -> Vec<Frame> {
    text.lines()
        .filter_map(|line| {
            let parsed = parse_frame_line(line);
            if parsed.is_none() && !line.trim().is_empty() {
                trace!(line, "dropping non-backtrace line");
            }
            parsed
        })
        .enumerate()
        .map(|(index, mut frame)| {
            frame.index = index;
            frame
        })
        .collect()
}

fn parse_frame_line(line: &str) -> Option<Frame> {
    if let Some(caps) = pseudo_frame_line().captures(line) {
        return Some(Frame {
            level: caps[1].parse().ok()?,
            function: caps[2].to_string(),
            ..Frame::default()
        });
    }

    let caps = frame_line().captures(line)?;

    let file = caps.get(4).map(|m| m.as_str().to_string());
    let line_no = caps.get(5).and_then(|m| m.as_str().parse().ok());

    Some(Frame {
        index: 0,
        level: caps[1].parse().ok()?,
        function: caps[2].to_string(),
        args: split_arguments(&caps[3]),
        file,
        line: line_no,
        detail: None,
    })
}

/// Split `a=2, b=40` into pairs. Commas inside a value (struct literals,
/// nested calls) are not understood and will split that value.
pub fn split_arguments(text: &str) -> Vec<Argument> {
    text.split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(|part| match part.split_once('=') {
            Some((name, value)) => Argument {
                name: name.trim().to_string(),
                value: value.trim().to_string(),
            },
            None => Argument {
                name: part.to_string(),
                value: String::new(),
            },
        })
        .collect()
}
