//! Tag-soup HTML parser producing a `Document` arena.
//!
//! Feeds the CLI driver and the test suites; the browser host supplies the
//! real tree in production. The parser is deliberately forgiving: unclosed
//! elements close at their parent's boundary, stray close tags are ignored,
//! and unknown attributes are carried through untouched. Only structurally
//! hopeless input (a tag or comment that never terminates) is an error.
//!
//! Computed style is synthesised here since there is no style engine:
//! per-tag display defaults, then inline `style="display:...;visibility:..."`
//! declarations, then the `hidden` attribute.

use crate::model::{
    ComputedStyle, Display, Document, ElementData, NodeId, ParseError, Visibility,
};

// Elements that never take children.
const VOID_TAGS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source", "track",
    "wbr",
];

// Elements whose content is raw text up to the matching close tag.
const RAW_TEXT_TAGS: &[&str] = &["script", "style"];

// Tags that default to inline display; everything else defaults to block.
const INLINE_DEFAULT_TAGS: &[&str] = &[
    "span", "a", "strong", "em", "b", "i", "u", "s", "code", "kbd", "samp", "var", "abbr", "cite",
    "q", "mark", "small", "sub", "sup", "time", "label", "br", "img", "wbr",
];

/// Parse an HTML fragment or full page into a `Document`.
///
/// The returned document is rooted at a synthetic `html` element; source
/// content (including any literal `<html>` element) nests beneath it.
pub fn parse_html(input: &str) -> Result<Document, ParseError> {
    Parser::new(input).run()
}

struct Parser<'a> {
    input: &'a str,
    bytes: &'a [u8],
    pos: usize,
    doc: Document,
    /// Open-element stack; the bottom entry is the synthetic root.
    open: Vec<OpenElement>,
}

struct OpenElement {
    id: NodeId,
    tag: String,
}

impl<'a> Parser<'a> {
    fn new(input: &'a str) -> Self {
        let doc = Document::new("html");
        let root = doc.root();
        Self {
            input,
            bytes: input.as_bytes(),
            pos: 0,
            doc,
            open: vec![OpenElement {
                id: root,
                tag: "html".to_string(),
            }],
        }
    }

    fn run(mut self) -> Result<Document, ParseError> {
        while self.pos < self.bytes.len() {
            if self.bytes[self.pos] == b'<' {
                self.consume_markup()?;
            } else {
                self.consume_text();
            }
        }
        Ok(self.doc)
    }

    fn current_parent(&self) -> NodeId {
        self.open.last().expect("root never popped").id
    }

    // ----- Text -----

    fn consume_text(&mut self) {
        let start = self.pos;
        while self.pos < self.bytes.len() && self.bytes[self.pos] != b'<' {
            self.pos += 1;
        }
        let raw = &self.input[start..self.pos];
        if !raw.is_empty() {
            let decoded = decode_entities(raw);
            let parent = self.current_parent();
            self.doc.append_text(parent, decoded);
        }
    }

    // ----- Markup -----

    fn consume_markup(&mut self) -> Result<(), ParseError> {
        let start = self.pos;
        debug_assert_eq!(self.bytes[self.pos], b'<');

        if self.input[self.pos..].starts_with("<!--") {
            return self.consume_comment(start);
        }
        if self.input[self.pos..].starts_with("<!") {
            // DOCTYPE and other declarations: skip to '>'.
            match self.find_byte(b'>') {
                Some(end) => {
                    self.pos = end + 1;
                    Ok(())
                }
                None => Err(ParseError::UnterminatedTag { position: start }),
            }
        } else if self.input[self.pos..].starts_with("</") {
            self.consume_close_tag(start)
        } else if self
            .bytes
            .get(self.pos + 1)
            .is_some_and(|b| b.is_ascii_alphabetic())
        {
            self.consume_open_tag(start)
        } else {
            // A lone '<' that opens no tag is literal text.
            self.pos += 1;
            let parent = self.current_parent();
            self.doc.append_text(parent, "<");
            Ok(())
        }
    }

    fn consume_comment(&mut self, start: usize) -> Result<(), ParseError> {
        match self.input[self.pos..].find("-->") {
            Some(offset) => {
                self.pos += offset + 3;
                Ok(())
            }
            None => Err(ParseError::UnterminatedComment { position: start }),
        }
    }

    fn consume_close_tag(&mut self, start: usize) -> Result<(), ParseError> {
        let end = self
            .find_byte(b'>')
            .ok_or(ParseError::UnterminatedTag { position: start })?;
        let name = self.input[self.pos + 2..end]
            .trim()
            .trim_end_matches('/')
            .to_ascii_lowercase();
        self.pos = end + 1;

        // Pop to the matching open element; ignore a close tag that matches
        // nothing (stray), closing nothing. The root is never popped.
        if let Some(depth) = self
            .open
            .iter()
            .rposition(|open| open.tag == name && open.id != self.doc.root())
        {
            self.open.truncate(depth);
        }
        Ok(())
    }

    fn consume_open_tag(&mut self, start: usize) -> Result<(), ParseError> {
        let end = self
            .find_byte(b'>')
            .ok_or(ParseError::UnterminatedTag { position: start })?;
        let inner = &self.input[self.pos + 1..end];
        self.pos = end + 1;

        let self_closing = inner.ends_with('/');
        let inner = inner.strip_suffix('/').unwrap_or(inner);

        let (tag, attrs) = split_tag(inner);
        let tag = tag.to_ascii_lowercase();
        if tag.is_empty() {
            return Ok(());
        }
        let data = build_element(&tag, &attrs);
        let parent = self.current_parent();
        let id = self.doc.append_element(parent, data);

        let is_void = VOID_TAGS.contains(&tag.as_str());
        if is_void || self_closing {
            return Ok(());
        }

        if RAW_TEXT_TAGS.contains(&tag.as_str()) {
            self.consume_raw_text(id, &tag);
            return Ok(());
        }

        self.open.push(OpenElement { id, tag });
        Ok(())
    }

    /// Raw text content (script/style): everything up to the matching close
    /// tag becomes a single text child; at EOF the rest of the input does.
    fn consume_raw_text(&mut self, parent: NodeId, tag: &str) {
        let close = format!("</{tag}");
        let rest = &self.input[self.pos..];
        let (content_len, consumed) = match rest.to_ascii_lowercase().find(&close) {
            Some(offset) => {
                let after = rest[offset..].find('>').map(|i| offset + i + 1);
                (offset, after.unwrap_or(rest.len()))
            }
            None => (rest.len(), rest.len()),
        };
        let content = &rest[..content_len];
        if !content.is_empty() {
            self.doc.append_text(parent, content);
        }
        self.pos += consumed;
    }

    fn find_byte(&self, needle: u8) -> Option<usize> {
        self.bytes[self.pos..]
            .iter()
            .position(|&b| b == needle)
            .map(|offset| self.pos + offset)
    }
}

// ----- Tag internals -----

/// Split `div id="x" class='y'` into the tag name and attribute pairs.
fn split_tag(inner: &str) -> (String, Vec<(String, String)>) {
    let inner = inner.trim();
    let name_end = inner
        .find(|c: char| c.is_whitespace())
        .unwrap_or(inner.len());
    let name = inner[..name_end].to_string();
    let mut attrs = Vec::new();

    let mut rest = inner[name_end..].trim_start();
    while !rest.is_empty() {
        let key_end = rest
            .find(|c: char| c.is_whitespace() || c == '=')
            .unwrap_or(rest.len());
        let key = rest[..key_end].to_ascii_lowercase();
        rest = rest[key_end..].trim_start();

        let value = if let Some(after_eq) = rest.strip_prefix('=') {
            let after_eq = after_eq.trim_start();
            let (value, remaining) = take_attr_value(after_eq);
            rest = remaining;
            value
        } else {
            String::new()
        };
        rest = rest.trim_start();

        if !key.is_empty() {
            attrs.push((key, decode_entities(&value)));
        }
    }
    (name, attrs)
}

fn take_attr_value(input: &str) -> (String, &str) {
    let mut chars = input.chars();
    match chars.next() {
        Some(quote @ ('"' | '\'')) => {
            let body = chars.as_str();
            match body.find(quote) {
                Some(end) => (body[..end].to_string(), &body[end + 1..]),
                None => (body.to_string(), ""),
            }
        }
        _ => {
            let end = input
                .find(|c: char| c.is_whitespace())
                .unwrap_or(input.len());
            (input[..end].to_string(), &input[end..])
        }
    }
}

fn build_element(tag: &str, attrs: &[(String, String)]) -> ElementData {
    let mut id = None;
    let mut classes = Vec::new();
    let mut other = Vec::new();
    let mut style = ComputedStyle {
        display: default_display(tag),
        visibility: Visibility::Visible,
    };

    for (key, value) in attrs {
        match key.as_str() {
            "id" if !value.is_empty() => id = Some(value.clone()),
            "class" => {
                classes.extend(value.split_whitespace().map(str::to_string));
            }
            "style" => {
                apply_inline_style(value, &mut style);
                other.push((key.clone(), value.clone()));
            }
            "hidden" => {
                style.display = Display::None;
                other.push((key.clone(), value.clone()));
            }
            _ => other.push((key.clone(), value.clone())),
        }
    }

    ElementData {
        tag: tag.to_string(),
        id,
        classes,
        attributes: other,
        style,
    }
}

fn default_display(tag: &str) -> Display {
    match tag {
        "li" => Display::ListItem,
        "table" => Display::Table,
        "tr" => Display::TableRow,
        "td" | "th" => Display::TableCell,
        _ if INLINE_DEFAULT_TAGS.contains(&tag) => Display::Inline,
        _ => Display::Block,
    }
}

fn apply_inline_style(css: &str, style: &mut ComputedStyle) {
    for declaration in css.split(';') {
        let Some((property, value)) = declaration.split_once(':') else {
            continue;
        };
        match property.trim().to_ascii_lowercase().as_str() {
            "display" => style.display = Display::parse(value),
            "visibility" => {
                style.visibility = if value.trim().eq_ignore_ascii_case("hidden") {
                    Visibility::Hidden
                } else {
                    Visibility::Visible
                };
            }
            _ => {}
        }
    }
}

/// Decode the named entities browsers emit plus numeric references.
fn decode_entities(raw: &str) -> String {
    if !raw.contains('&') {
        return raw.to_string();
    }
    let mut out = String::with_capacity(raw.len());
    let mut rest = raw;
    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        rest = &rest[amp..];
        let Some(semi) = rest[..rest.len().min(32)].find(';') else {
            out.push('&');
            rest = &rest[1..];
            continue;
        };
        let entity = &rest[1..semi];
        let decoded = match entity {
            "amp" => Some('&'),
            "lt" => Some('<'),
            "gt" => Some('>'),
            "quot" => Some('"'),
            "apos" => Some('\''),
            "nbsp" => Some('\u{00A0}'),
            _ => entity
                .strip_prefix('#')
                .and_then(|num| {
                    if let Some(hex) = num.strip_prefix('x').or_else(|| num.strip_prefix('X')) {
                        u32::from_str_radix(hex, 16).ok()
                    } else {
                        num.parse::<u32>().ok()
                    }
                })
                .and_then(char::from_u32),
        };
        match decoded {
            Some(c) => {
                out.push(c);
                rest = &rest[semi + 1..];
            }
            None => {
                out.push('&');
                rest = &rest[1..];
            }
        }
    }
    out.push_str(rest);
    out
}

// ===== Tests =====

#[cfg(test)]
#[path = "parser_tests.rs"]
mod tests;
