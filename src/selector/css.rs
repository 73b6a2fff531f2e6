//! CSS selector subset: compound selectors joined by descendant and child
//! combinators.
//!
//! Supported compounds are any mix of `tag`, `#id`, `.class` and `*`.
//! Anything else (attribute selectors, pseudo-classes, selector lists) is
//! rejected with a parse error rather than silently matching nothing.

use crate::model::{Document, ElementData, NodeId, QueryError};

// ===== Parsed form =====

#[derive(Debug, Clone, PartialEq, Eq)]
struct Compound {
    tag: Option<String>,
    id: Option<String>,
    classes: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Combinator {
    Descendant,
    Child,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct CssSelector {
    /// Compounds right-to-left: the first entry is the subject.
    compounds: Vec<Compound>,
    /// Combinator between compound `i` and compound `i + 1`.
    combinators: Vec<Combinator>,
}

// ===== Parsing =====

fn parse_error(selector: &str, reason: impl Into<String>) -> QueryError {
    QueryError::CssSelector {
        selector: selector.to_string(),
        reason: reason.into(),
    }
}

fn parse(selector: &str) -> Result<CssSelector, QueryError> {
    let trimmed = selector.trim();
    if trimmed.is_empty() {
        return Err(parse_error(selector, "empty selector"));
    }

    let mut compounds: Vec<Compound> = Vec::new();
    let mut combinators: Vec<Combinator> = Vec::new();
    let mut pending: Option<Combinator> = None;

    for token in tokenize(trimmed) {
        match token.as_str() {
            ">" => {
                if compounds.is_empty() || pending.is_some() {
                    return Err(parse_error(selector, "misplaced '>' combinator"));
                }
                pending = Some(Combinator::Child);
            }
            _ => {
                if !compounds.is_empty() {
                    combinators.push(pending.take().unwrap_or(Combinator::Descendant));
                }
                compounds.push(parse_compound(&token, selector)?);
            }
        }
    }
    if pending.is_some() {
        return Err(parse_error(selector, "dangling '>' combinator"));
    }
    if compounds.is_empty() {
        return Err(parse_error(selector, "empty selector"));
    }

    compounds.reverse();
    combinators.reverse();
    Ok(CssSelector {
        compounds,
        combinators,
    })
}

fn tokenize(selector: &str) -> Vec<String> {
    // '>' may be glued to its neighbours; split it out first.
    selector
        .replace('>', " > ")
        .split_whitespace()
        .map(str::to_string)
        .collect()
}

fn parse_compound(token: &str, selector: &str) -> Result<Compound, QueryError> {
    let mut compound = Compound {
        tag: None,
        id: None,
        classes: Vec::new(),
    };
    let mut rest = token;

    // Leading tag or universal.
    if !rest.starts_with(['#', '.']) {
        let end = rest.find(['#', '.']).unwrap_or(rest.len());
        let name = &rest[..end];
        if name != "*" {
            if name.is_empty() || !name.chars().all(valid_name_char) {
                return Err(parse_error(selector, format!("invalid tag name '{name}'")));
            }
            compound.tag = Some(name.to_ascii_lowercase());
        }
        rest = &rest[end..];
    }

    while !rest.is_empty() {
        let (kind, tail) = rest.split_at(1);
        let end = tail.find(['#', '.']).unwrap_or(tail.len());
        let name = &tail[..end];
        if name.is_empty() || !name.chars().all(valid_name_char) {
            return Err(parse_error(
                selector,
                format!("invalid simple selector near '{rest}'"),
            ));
        }
        match kind {
            "#" => {
                if compound.id.is_some() {
                    return Err(parse_error(selector, "multiple id selectors"));
                }
                compound.id = Some(name.to_string());
            }
            "." => compound.classes.push(name.to_string()),
            _ => unreachable!("split_at on matched prefix"),
        }
        rest = &tail[end..];
    }
    Ok(compound)
}

fn valid_name_char(c: char) -> bool {
    c.is_alphanumeric() || c == '-' || c == '_'
}

// ===== Evaluation =====

fn compound_matches(compound: &Compound, data: &ElementData) -> bool {
    if let Some(tag) = &compound.tag {
        if &data.tag != tag {
            return false;
        }
    }
    if let Some(id) = &compound.id {
        if data.id.as_ref() != Some(id) {
            return false;
        }
    }
    compound
        .classes
        .iter()
        .all(|class| data.classes.iter().any(|c| c == class))
}

/// All elements matching `selector`, in document order.
pub fn select(doc: &Document, selector: &str) -> Result<Vec<NodeId>, QueryError> {
    let parsed = parse(selector)?;
    let mut out = Vec::new();

    'candidates: for id in doc.document_order() {
        let Some(data) = doc.node(id).as_element() else {
            continue;
        };
        if !compound_matches(&parsed.compounds[0], data) {
            continue;
        }

        // Walk ancestors against the remaining compounds.
        let mut current = doc.parent(id);
        for (compound, combinator) in parsed.compounds[1..]
            .iter()
            .zip(parsed.combinators.iter())
        {
            match combinator {
                Combinator::Child => {
                    let Some(parent) = current else {
                        continue 'candidates;
                    };
                    let Some(parent_data) = doc.node(parent).as_element() else {
                        continue 'candidates;
                    };
                    if !compound_matches(compound, parent_data) {
                        continue 'candidates;
                    }
                    current = doc.parent(parent);
                }
                Combinator::Descendant => {
                    let mut walker = current;
                    loop {
                        let Some(ancestor) = walker else {
                            continue 'candidates;
                        };
                        if doc
                            .node(ancestor)
                            .as_element()
                            .is_some_and(|d| compound_matches(compound, d))
                        {
                            current = doc.parent(ancestor);
                            break;
                        }
                        walker = doc.parent(ancestor);
                    }
                }
            }
        }
        out.push(id);
    }
    Ok(out)
}

// ===== Tests =====
