//! Snapshot tests pinning the exact response wire shapes.

use insta::assert_json_snapshot;
use pagelens::config::SearchConfig;
use pagelens::model::{QuerySpec, Response};
use pagelens::overlay::grid::GridLayout;
use pagelens::parser::parse_html;
use pagelens::state::SearchEngine;

fn searched(html: &str, query: &str) -> (SearchEngine, Response) {
    let doc = parse_html(html).expect("test html parses");
    let layout = GridLayout::new(&doc, 80);
    let mut engine = SearchEngine::new(SearchConfig::default());
    let response = engine.search(QuerySpec::literal(query), &doc, &layout);
    (engine, response)
}

#[test]
fn search_response_shape() {
    let (_, response) = searched("<div>abc</div>", "abc");
    assert_json_snapshot!(response, @r###"
    {
      "ok": true,
      "count": 1,
      "current_index": 0,
      "total_matches": 1
    }
    "###);
}

#[test]
fn error_envelope_shape() {
    assert_json_snapshot!(Response::unknown_action("explode"), @r###"
    {
      "ok": false,
      "error": "Unknown action: explode"
    }
    "###);
}

#[test]
fn overlay_spec_shape() {
    let (engine, _) = searched("<div>abc</div>", "abc");
    assert_json_snapshot!(engine.overlays(), @r###"
    [
      {
        "left": 0.0,
        "top": 0.0,
        "width": 24.0,
        "height": 16.0,
        "current": true
      }
    ]
    "###);
}

#[test]
fn results_list_item_shape() {
    let doc = parse_html("<div>say abc now</div>").expect("test html parses");
    let layout = GridLayout::new(&doc, 80);
    let mut engine = SearchEngine::new(SearchConfig::default());
    engine.search(QuerySpec::literal("abc"), &doc, &layout);

    let listing = engine.results_list(&doc, Some(10));
    assert_json_snapshot!(listing, @r###"
    {
      "ok": true,
      "items": [
        {
          "index": 0,
          "matched_text": "abc",
          "context_before": "say ",
          "context_after": " now",
          "full_text": "say abc now"
        }
      ],
      "total_matches": 1
    }
    "###);
}
