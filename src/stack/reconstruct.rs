use crate::parser::{opt_hex, Frame};
use serde::Serialize;
use std::collections::HashMap;
use tracing::debug;

const WORD: u64 = 8;

/// One color per frame per render. Nothing is kept between steps.
const PALETTE: &[&str] = &[
    "#4e79a7", "#f28e2b", "#e15759", "#76b7b2", "#59a14f", "#edc948", "#b07aa1", "#ff9da7",
];

/// One 8-byte stack cell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StackWord {
    #[serde(serialize_with = "opt_hex")]
    pub address: Option<u64>,
    /// Value as 16 zero-padded hex digits
    pub value: String,
    /// Register spilled at this address, if any frame says so
    pub register: Option<String>,
    /// Index of the owning frame
    pub frame: Option<usize>,
}

/// A run of consecutive words with the same owner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Segment {
    pub frame: Option<usize>,
    pub start: usize,
    pub len: usize,
    pub color: Option<&'static str>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StackLayout {
    pub words: Vec<StackWord>,
    pub segments: Vec<Segment>,
}

/// Attribute dumped stack words to frames.
///
/// `dump` is in the debugger's order, lowest address first, starting at
/// `stack_pointer`. The result is ordered the other way: highest address
/// first, each word 8 below the previous one. When the stack pointer is not
/// known the top word is assumed to sit just below the outermost frame base.
///
/// Boundary rule: a word at `base - 8` belongs to that frame; a word at
/// exactly `base` belongs to the frame that called it.
pub fn reconstruct(frames: &[Frame], dump: &[String], stack_pointer: Option<u64>) -> StackLayout {
    let mut addressed: Vec<(usize, u64)> = frames
        .iter()
        .filter_map(|f| f.base_address().map(|base| (f.index, base)))
        .collect();
    // Outermost (highest) first. On equal bases (inlined frames share their
    // caller's CFA) the outer frame comes first so the innermost keeps the words.
    addressed.sort_by(|a, b| b.1.cmp(&a.1).then(b.0.cmp(&a.0)));

    let top = match (stack_pointer, dump.len()) {
        (_, 0) => None,
        (Some(sp), n) => sp.checked_add(WORD * (n as u64 - 1)),
        (None, _) => addressed.first().and_then(|(_, base)| base.checked_sub(WORD)),
    };

    let saved = saved_register_labels(frames);

    let mut cursor = 0usize;
    let words: Vec<StackWord> = dump
        .iter()
        .rev()
        .enumerate()
        .map(|(i, value)| {
            let address = top.and_then(|t| t.checked_sub(WORD * i as u64));
            let frame = address.and_then(|addr| {
                let &(_, outermost) = addressed.first()?;
                if addr >= outermost {
                    return None;
                }
                while let Some(&(_, next_base)) = addressed.get(cursor + 1) {
                    if addr <= next_base.saturating_sub(WORD) {
                        cursor += 1;
                    } else {
                        break;
                    }
                }
                Some(addressed[cursor].0)
            });
            StackWord {
                address,
                value: value.clone(),
                register: address.and_then(|a| saved.get(&a).cloned()),
                frame,
            }
        })
        .collect();

    let segments = group_segments(&words);
    debug!(
        words = words.len(),
        frames = addressed.len(),
        segments = segments.len(),
        "stack reconstructed"
    );

    StackLayout { words, segments }
}

/// address -> register name across every frame; the innermost frame wins on
/// a clash.
fn saved_register_labels(frames: &[Frame]) -> HashMap<u64, String> {
    let mut labels = HashMap::new();
    for frame in frames {
        if let Some(saved) = frame.saved_registers() {
            for (addr, reg) in saved {
                labels.entry(*addr).or_insert_with(|| reg.clone());
            }
        }
    }
    labels
}

fn group_segments(words: &[StackWord]) -> Vec<Segment> {
    let mut segments: Vec<Segment> = Vec::new();
    for (i, word) in words.iter().enumerate() {
        match segments.last_mut() {
            Some(seg) if seg.frame == word.frame => seg.len += 1,
            _ => segments.push(Segment {
                frame: word.frame,
                start: i,
                len: 1,
                color: word.frame.map(|f| PALETTE[f % PALETTE.len()]),
            }),
        }
    }
    segments
}
