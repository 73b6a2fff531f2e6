//! Unicode normalisation with position mapping.
//!
//! `normalize` folds width, case, kana script, voicing marks, accents and
//! number separators in a single left-to-right pass, and records for every
//! scalar of the output the half-open range of input scalars it came from.
//! That mapping is what lets fuzzy matches over the folded text be lifted
//! back onto the virtual text and from there onto the document.
//!
//! The fold order is fixed (see `tables::fold_single`); the block boundary
//! marker passes through opaquely so normalisation composes with the
//! virtual text layer.
//!
//! Mapping shapes:
//!
//! - one-to-one folds map `[i, i+1)`;
//! - expansions (`ä` → `ae`) repeat `[i, i+1)` for each output scalar;
//! - combinations (`か` + dakuten → `が`) map `[i, i+2)`;
//! - digit runs map every output scalar to the whole run.

mod numbers;
mod tables;

pub use tables::has_substitution_expansion;

use crate::vtl::{Span, BLOCK_BOUNDARY_MARKER};

// ===== NormalizedText =====

/// Folded text, its back-mapping, and the original it was built from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedText {
    text: String,
    /// One entry per scalar of `text`: the source scalar range it covers.
    map: Vec<Span>,
    original: String,
    /// Byte offset of each scalar of `text`, plus a trailing sentinel.
    char_starts: Vec<usize>,
}

impl NormalizedText {
    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn original(&self) -> &str {
        &self.original
    }

    pub fn char_len(&self) -> usize {
        self.map.len()
    }

    pub fn map(&self) -> &[Span] {
        &self.map
    }

    /// Source range of normalised scalar `index`.
    pub fn source_of(&self, index: usize) -> Option<Span> {
        self.map.get(index).copied()
    }

    /// Byte offset of scalar `index`; `char_len()` maps to `text.len()`.
    pub fn char_to_byte(&self, index: usize) -> usize {
        self.char_starts[index]
    }

    /// Scalar index containing byte offset `byte`.
    pub fn byte_to_char(&self, byte: usize) -> usize {
        match self.char_starts.binary_search(&byte) {
            Ok(index) => index,
            Err(insert) => insert - 1,
        }
    }

    pub fn slice(&self, span: Span) -> &str {
        &self.text[self.char_to_byte(span.start)..self.char_to_byte(span.end)]
    }

    /// Invert a normalised span to a span over the original text.
    ///
    /// Returns `None` for empty spans and spans past the end.
    pub fn to_original(&self, span: Span) -> Option<Span> {
        if span.is_empty() || span.end > self.map.len() {
            return None;
        }
        Some(Span::new(self.map[span.start].start, self.map[span.end - 1].end))
    }

    fn push(&mut self, c: char, source: Span) {
        self.char_starts.push(self.text.len());
        self.text.push(c);
        self.map.push(source);
    }
}

// ===== The pass =====

/// Normalise `original`, producing the folded text and position mapping.
///
/// Pure and deterministic: equal inputs produce equal outputs, and
/// re-normalising the output is the identity.
pub fn normalize(original: &str) -> NormalizedText {
    let chars: Vec<char> = original.chars().collect();
    let mut out = NormalizedText {
        text: String::with_capacity(original.len()),
        map: Vec::with_capacity(chars.len()),
        original: original.to_string(),
        char_starts: Vec::with_capacity(chars.len() + 1),
    };

    let mut i = 0;
    while i < chars.len() {
        let c = chars[i];

        // Boundary markers carry through opaquely.
        if c == BLOCK_BOUNDARY_MARKER {
            out.push(c, Span::new(i, i + 1));
            i += 1;
            continue;
        }

        // Maximal digit/separator runs are rewritten as a unit.
        if numbers::is_digit_start(c) {
            let run = numbers::consume_digit_run(&chars[i..]);
            let source = Span::new(i, i + run.consumed);
            for emitted in run.emitted.chars() {
                out.push(emitted, source);
            }
            i += run.consumed;
            continue;
        }

        // Base + voicing mark combine, then the composed glyph folds.
        if let Some(&mark) = chars.get(i + 1) {
            let composed = if tables::is_dakuten(mark) {
                tables::compose_voiced(c, false)
            } else if tables::is_handakuten(mark) {
                tables::compose_voiced(c, true)
            } else {
                None
            };
            if let Some(glyph) = composed {
                let source = Span::new(i, i + 2);
                emit_folded(&mut out, &glyph, source);
                i += 2;
                continue;
            }
        }

        // Ordered single-scalar folds, else copy through.
        match tables::fold_single(c) {
            Some(folded) => {
                let source = Span::new(i, i + 1);
                for emitted in folded.chars() {
                    out.push(emitted, source);
                }
            }
            None => out.push(c, Span::new(i, i + 1)),
        }
        i += 1;
    }

    out.char_starts.push(out.text.len());
    out
}

/// Emit a composed glyph, folding a single-scalar glyph one more step so
/// composed katakana still lands in hiragana.
fn emit_folded(out: &mut NormalizedText, glyph: &str, source: Span) {
    let mut glyph_chars = glyph.chars();
    let first = glyph_chars.next().expect("composed glyph is non-empty");
    if glyph_chars.next().is_none() {
        match tables::fold_single(first) {
            Some(folded) => {
                for emitted in folded.chars() {
                    out.push(emitted, source);
                }
            }
            None => out.push(first, source),
        }
    } else {
        for emitted in glyph.chars() {
            out.push(emitted, source);
        }
    }
}

// ===== Tests =====

#[cfg(test)]
#[path = "normalize_tests.rs"]
mod tests;
