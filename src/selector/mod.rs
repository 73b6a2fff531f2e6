//! Element search: selector evaluation for element mode.
//!
//! Dispatches to the CSS or XPath evaluator; both return elements in
//! document order with duplicates removed, and both reject unparseable
//! input with a `QueryError` the command surface turns into an error
//! envelope.

mod css;
mod xpath;

use crate::model::{Document, ElementMode, NodeId, QueryError};

/// Find the elements matching `query` under the given selector language.
pub fn find_elements(
    doc: &Document,
    query: &str,
    mode: ElementMode,
) -> Result<Vec<NodeId>, QueryError> {
    match mode {
        ElementMode::Css => css::select(doc, query),
        ElementMode::Xpath => xpath::select(doc, query),
    }
}

/// Short description of an element for result listings:
/// `<tag#id.class1.class2>`.
pub fn describe_element(doc: &Document, id: NodeId) -> String {
    let Some(data) = doc.node(id).as_element() else {
        return String::from("<#text>");
    };
    let mut out = String::from("<");
    out.push_str(&data.tag);
    if let Some(element_id) = &data.id {
        out.push('#');
        out.push_str(element_id);
    }
    for class in &data.classes {
        out.push('.');
        out.push_str(class);
    }
    out.push('>');
    out
}

// ===== Tests =====

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_html;

    #[test]
    fn dispatches_by_mode() {
        let doc = parse_html(r#"<div id="x"><span>a</span></div>"#).expect("parses");
        let css = find_elements(&doc, "#x span", ElementMode::Css).expect("valid");
        let xpath = find_elements(&doc, "//div[@id='x']/span", ElementMode::Xpath).expect("valid");
        assert_eq!(css, xpath);
        assert_eq!(css.len(), 1);
    }

    #[test]
    fn css_error_carries_css_kind() {
        let doc = parse_html("<div>x</div>").expect("parses");
        let err = find_elements(&doc, "div[x]", ElementMode::Css).expect_err("rejects");
        assert!(matches!(err, QueryError::CssSelector { .. }));
        let err = find_elements(&doc, "not-absolute", ElementMode::Xpath).expect_err("rejects");
        assert!(matches!(err, QueryError::XPath { .. }));
    }

    #[test]
    fn describe_element_formats_identity() {
        let doc =
            parse_html(r#"<div id="main" class="wide tall">x</div><p>y</p>"#).expect("parses");
        let div = doc
            .document_order()
            .find(|&id| doc.node(id).as_element().is_some_and(|e| e.tag == "div"))
            .expect("div exists");
        let p = doc
            .document_order()
            .find(|&id| doc.node(id).as_element().is_some_and(|e| e.tag == "p"))
            .expect("p exists");

        assert_eq!(describe_element(&doc, div), "<div#main.wide.tall>");
        assert_eq!(describe_element(&doc, p), "<p>");
    }
}
