use super::types::RegisterSet;
use regex::Regex;
use std::sync::OnceLock;

fn bare_name() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("register name pattern is valid"))
}

fn hex_literal() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^0x[0-9a-fA-F]+$").expect("hex pattern is valid"))
}

/// Parse `info registers` output. Only `NAME 0xVALUE ...` lines count; the
/// natural-format column and anything after it is ignored.
pub fn parse_registers(text: &str) -> RegisterSet {
    let mut regs = RegisterSet::new();

    for line in text.lines() {
        let mut tokens = line.split_whitespace();
        let (Some(name), Some(value)) = (tokens.next(), tokens.next()) else {
            continue;
        };
        if bare_name().is_match(name) && hex_literal().is_match(value) {
            regs.insert(name, value);
        }
    }

    regs
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_name_and_hex_value() {
        let regs = parse_registers("rax   0x0   0\nrbp   0x7ffffffee000");

        assert_eq!(regs.len(), 2);
        assert_eq!(regs.get("rax"), Some("0x0"));
        assert_eq!(regs.get("rbp"), Some("0x7ffffffee000"));
    }

    #[test]
    fn skips_headers_and_non_hex_lines() {
        let text = "\
The program has no registers now.
rip            0x555555555139      0x555555555139 <hi+16>
eflags         [ ZF PF ]
#0  main () at test.c:17
fs_base        0x7ffff7d8a740      140737351558976

";
        let regs = parse_registers(text);

        assert_eq!(regs.len(), 2);
        assert_eq!(regs.get("rip"), Some("0x555555555139"));
        assert_eq!(regs.get("fs_base"), Some("0x7ffff7d8a740"));
        assert_eq!(regs.get("eflags"), None);
    }

    #[test]
    fn keeps_debugger_order() {
        let regs = parse_registers("rsp 0x10\nrax 0x1\nrbx 0x2\n");
        let names: Vec<_> = regs.iter().map(|(n, _)| n).collect();
        assert_eq!(names, vec!["rsp", "rax", "rbx"]);
        assert_eq!(regs.stack_pointer(), Some(0x10));
    }

    #[test]
    fn empty_input() {
        assert!(parse_registers("").is_empty());
    }
}
