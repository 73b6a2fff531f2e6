//! XPath subset: absolute location paths over the document arena.
//!
//! Supported steps are `/tag` (child axis), `//tag` (descendant axis),
//! the wildcard `*`, and per-step predicates `[@attr]`, `[@attr='value']`
//! and `[n]` (1-based position within the step's per-context result).
//! Axes, functions and relative paths beyond this are parse errors.

use crate::model::{Document, ElementData, NodeId, QueryError};

// ===== Parsed form =====

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Axis {
    Child,
    Descendant,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Predicate {
    HasAttribute(String),
    AttributeEquals(String, String),
    Position(usize),
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Step {
    axis: Axis,
    /// `None` is the wildcard `*`.
    tag: Option<String>,
    predicates: Vec<Predicate>,
}

// ===== Parsing =====

fn parse_error(expression: &str, reason: impl Into<String>) -> QueryError {
    QueryError::XPath {
        expression: expression.to_string(),
        reason: reason.into(),
    }
}

fn parse(expression: &str) -> Result<Vec<Step>, QueryError> {
    let trimmed = expression.trim();
    if trimmed.is_empty() {
        return Err(parse_error(expression, "empty expression"));
    }
    if !trimmed.starts_with('/') {
        return Err(parse_error(expression, "only absolute paths are supported"));
    }

    let mut steps = Vec::new();
    let mut rest = trimmed;
    while !rest.is_empty() {
        let axis = if let Some(tail) = rest.strip_prefix("//") {
            rest = tail;
            Axis::Descendant
        } else if let Some(tail) = rest.strip_prefix('/') {
            rest = tail;
            Axis::Child
        } else {
            return Err(parse_error(expression, format!("expected '/' near '{rest}'")));
        };

        let end = rest.find(['/', '[']).unwrap_or(rest.len());
        let name = &rest[..end];
        if name.is_empty() {
            return Err(parse_error(expression, "missing node test"));
        }
        let tag = if name == "*" {
            None
        } else {
            if !name.chars().all(|c| c.is_alphanumeric() || c == '-' || c == '_') {
                return Err(parse_error(expression, format!("invalid node test '{name}'")));
            }
            Some(name.to_ascii_lowercase())
        };
        rest = &rest[end..];

        let mut predicates = Vec::new();
        while rest.starts_with('[') {
            let Some(close) = rest.find(']') else {
                return Err(parse_error(expression, "unterminated predicate"));
            };
            predicates.push(parse_predicate(&rest[1..close], expression)?);
            rest = &rest[close + 1..];
        }

        steps.push(Step {
            axis,
            tag,
            predicates,
        });
    }
    Ok(steps)
}

fn parse_predicate(body: &str, expression: &str) -> Result<Predicate, QueryError> {
    let body = body.trim();
    if let Some(attr_body) = body.strip_prefix('@') {
        return match attr_body.split_once('=') {
            None => Ok(Predicate::HasAttribute(attr_body.trim().to_ascii_lowercase())),
            Some((name, value)) => {
                let value = value.trim();
                let unquoted = value
                    .strip_prefix('\'')
                    .and_then(|v| v.strip_suffix('\''))
                    .or_else(|| value.strip_prefix('"').and_then(|v| v.strip_suffix('"')))
                    .ok_or_else(|| parse_error(expression, "predicate value must be quoted"))?;
                Ok(Predicate::AttributeEquals(
                    name.trim().to_ascii_lowercase(),
                    unquoted.to_string(),
                ))
            }
        };
    }
    body.parse::<usize>()
        .ok()
        .filter(|&n| n >= 1)
        .map(Predicate::Position)
        .ok_or_else(|| parse_error(expression, format!("unsupported predicate '[{body}]'")))
}

// ===== Evaluation =====

fn node_test(tag: &Option<String>, data: &ElementData) -> bool {
    tag.as_ref().is_none_or(|t| &data.tag == t)
}

fn attribute_value(data: &ElementData, name: &str) -> Option<String> {
    match name {
        "class" if !data.classes.is_empty() => Some(data.classes.join(" ")),
        "class" => None,
        _ => data.attribute(name).map(str::to_string),
    }
}

fn predicate_filter(doc: &Document, candidates: Vec<NodeId>, predicate: &Predicate) -> Vec<NodeId> {
    match predicate {
        Predicate::Position(n) => candidates
            .into_iter()
            .enumerate()
            .filter(|(index, _)| index + 1 == *n)
            .map(|(_, id)| id)
            .collect(),
        Predicate::HasAttribute(name) => candidates
            .into_iter()
            .filter(|&id| {
                doc.node(id)
                    .as_element()
                    .is_some_and(|d| attribute_value(d, name).is_some())
            })
            .collect(),
        Predicate::AttributeEquals(name, value) => candidates
            .into_iter()
            .filter(|&id| {
                doc.node(id)
                    .as_element()
                    .is_some_and(|d| attribute_value(d, name).as_deref() == Some(value.as_str()))
            })
            .collect(),
    }
}

/// Evaluate an expression, returning matching elements in document order.
pub fn select(doc: &Document, expression: &str) -> Result<Vec<NodeId>, QueryError> {
    let steps = parse(expression)?;
    let mut context: Vec<NodeId> = vec![doc.root()];

    for step in &steps {
        let mut next: Vec<NodeId> = Vec::new();
        for &node in &context {
            // Candidates for this context node, before predicates.
            let mut candidates: Vec<NodeId> = Vec::new();
            match step.axis {
                Axis::Child => {
                    for &child in doc.children(node) {
                        if doc
                            .node(child)
                            .as_element()
                            .is_some_and(|d| node_test(&step.tag, d))
                        {
                            candidates.push(child);
                        }
                    }
                }
                Axis::Descendant => {
                    let mut stack: Vec<NodeId> = doc.children(node).iter().rev().copied().collect();
                    while let Some(current) = stack.pop() {
                        if doc
                            .node(current)
                            .as_element()
                            .is_some_and(|d| node_test(&step.tag, d))
                        {
                            candidates.push(current);
                        }
                        for &child in doc.children(current).iter().rev() {
                            stack.push(child);
                        }
                    }
                }
            }
            for predicate in &step.predicates {
                candidates = predicate_filter(doc, candidates, predicate);
            }
            next.extend(candidates);
        }
        // Document order with duplicates removed.
        next.sort();
        next.dedup();
        context = next;
    }
    Ok(context)
}

// ===== Tests =====
