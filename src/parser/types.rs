use indexmap::IndexMap;
use serde::{Serialize, Serializer};
use std::collections::BTreeMap;

/// One `name=value` pair from a backtrace line. Both sides are kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Argument {
    pub name: String,
    pub value: String,
}

/// One activation record from the backtrace, optionally enriched with the
/// output of `info frame`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct Frame {
    pub index: usize,
    /// gdb's own `#N`, which is what `info frame N` expects
    pub level: usize,
    pub function: String,
    pub args: Vec<Argument>,
    pub file: Option<String>,
    pub line: Option<u32>,
    #[serde(rename = "details")]
    pub detail: Option<FrameDetail>,
}

impl Frame {
    /// Canonical frame address as reported by `info frame`, if we have it.
    pub fn base_address(&self) -> Option<u64> {
        self.detail.as_ref().and_then(|d| d.frame_address)
    }

    pub fn saved_registers(&self) -> Option<&BTreeMap<u64, String>> {
        self.detail.as_ref().map(|d| &d.saved_registers)
    }
}

/// Everything we could pull out of one `info frame` block.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FrameDetail {
    #[serde(serialize_with = "opt_hex")]
    pub frame_address: Option<u64>,
    #[serde(serialize_with = "opt_hex")]
    pub rip: Option<u64>,
    pub function: Option<String>,
    pub file: Option<String>,
    pub line: Option<u32>,
    /// address -> register spilled there
    #[serde(rename = "savedRegisterMappings", serialize_with = "hex_keys")]
    pub saved_registers: BTreeMap<u64, String>,
    pub raw: String,
}

/// Register name -> hex value, in the order the debugger printed them.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(transparent)]
pub struct RegisterSet(IndexMap<String, String>);

impl RegisterSet {
    pub fn new() -> Self {
        Self(IndexMap::new())
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.0.insert(name.into(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Numeric value of the stack pointer, whichever name the target uses.
    pub fn stack_pointer(&self) -> Option<u64> {
        ["rsp", "sp", "esp"]
            .iter()
            .find_map(|name| self.get(name))
            .and_then(parse_hex)
    }
}

/// Parse a `0x`-prefixed (or bare) hexadecimal literal.
pub fn parse_hex(text: &str) -> Option<u64> {
    let digits = text
        .strip_prefix("0x")
        .or_else(|| text.strip_prefix("0X"))
        .unwrap_or(text);
    if digits.is_empty() {
        return None;
    }
    u64::from_str_radix(digits, 16).ok()
}

/// Render an address the way gdb does (no padding).
pub fn format_address(addr: u64) -> String {
    format!("{:#x}", addr)
}

/// Render a stack word as exactly 16 zero-padded hex digits.
pub fn format_word(value: u64) -> String {
    format!("0x{:016x}", value)
}

pub(crate) fn opt_hex<S: Serializer>(value: &Option<u64>, s: S) -> Result<S::Ok, S::Error> {
    match value {
        Some(v) => s.serialize_str(&format_address(*v)),
        None => s.serialize_none(),
    }
}

fn hex_keys<S: Serializer>(map: &BTreeMap<u64, String>, s: S) -> Result<S::Ok, S::Error> {
    s.collect_map(map.iter().map(|(addr, reg)| (format_address(*addr), reg)))
}
