use super::types::{format_word, parse_hex};
use tracing::trace;

/// Parse the output of one `x/Nxg` command.
///
/// Each line is `ADDR[ <sym>]: WORD WORD ...`. The line address is thrown
/// away and the words come back in the debugger's low-to-high order,
/// normalized to 16 hex digits so later arithmetic never depends on how wide
/// gdb chose to print them.
pub fn parse_stack_memory(text: &str) -> Vec<String> {
    let mut words = Vec::new();

    for line in text.lines() {
        let Some((head, rest)) = line.split_once(':') else {
            continue;
        };
        if !head.trim_start().starts_with("0x") {
            trace!(line, "dropping non-memory line");
            continue;
        }
        words.extend(
            rest.split_whitespace()
                .filter(|tok| tok.starts_with("0x") || tok.starts_with("0X"))
                .filter_map(parse_hex)
                .map(format_word),
        );
    }

    words
}
