//! Tests for the search-state machine.

use super::*;
use crate::config::SearchConfig;
use crate::model::ElementMode;
use crate::parser::parse_html;
use crate::test_harness::GridLayout;

fn engine() -> SearchEngine {
    SearchEngine::new(SearchConfig::default())
}

fn doc_and_layout(html: &str) -> (Document, GridLayout) {
    let doc = parse_html(html).expect("parses");
    let layout = GridLayout::new(&doc, 80);
    (doc, layout)
}

fn spec(query: &str) -> QuerySpec {
    QuerySpec::literal(query)
}

fn fuzzy_spec(query: &str) -> QuerySpec {
    QuerySpec {
        use_fuzzy: true,
        ..QuerySpec::literal(query)
    }
}

// ===== search =====

#[test]
fn search_with_matches_sets_cursor_to_first() {
    let (doc, layout) = doc_and_layout("<div>test test test</div>");
    let mut engine = engine();

    let response = engine.search(spec("test"), &doc, &layout);
    assert_eq!(
        response,
        Response::Search {
            ok: true,
            count: 3,
            current_index: 0,
            total_matches: 3
        }
    );
    assert_eq!(engine.cursor(), Some(0));
}

#[test]
fn search_without_matches_has_no_cursor() {
    let (doc, layout) = doc_and_layout("<div>nothing</div>");
    let mut engine = engine();

    let response = engine.search(spec("absent"), &doc, &layout);
    assert_eq!(
        response,
        Response::Search {
            ok: true,
            count: 0,
            current_index: -1,
            total_matches: 0
        }
    );
    assert_eq!(engine.cursor(), None);
}

#[test]
fn search_replaces_previous_results() {
    let (doc, layout) = doc_and_layout("<div>aaa bbb</div>");
    let mut engine = engine();

    engine.search(spec("aaa"), &doc, &layout);
    assert_eq!(engine.total(), 1);
    engine.search(spec("b"), &doc, &layout);
    assert_eq!(engine.total(), 3);
    assert_eq!(engine.cursor(), Some(0));
}

#[test]
fn invalid_regex_leaves_state_untouched() {
    let (doc, layout) = doc_and_layout("<div>stable state</div>");
    let mut engine = engine();
    engine.search(spec("stable"), &doc, &layout);
    let cursor_before = engine.cursor();

    let response = engine.search(
        QuerySpec {
            use_regex: true,
            ..QuerySpec::literal("(unclosed")
        },
        &doc,
        &layout,
    );
    assert!(!response.is_ok());
    assert_eq!(engine.total(), 1, "previous matches kept");
    assert_eq!(engine.cursor(), cursor_before, "cursor unchanged");
    assert!(!engine.overlays().is_empty(), "overlays unchanged");
}

#[test]
fn match_records_carry_document_ranges() {
    let (doc, layout) = doc_and_layout("<span>mkdir</span><span>-p</span>");
    let mut engine = engine();
    engine.search(spec("mkdir-p"), &doc, &layout);

    assert_eq!(engine.matches().len(), 1);
    let record = &engine.matches()[0];
    assert_ne!(record.range.start_node, record.range.end_node);
    assert_eq!(record.range.start_offset, 0);
    assert_eq!(record.range.end_offset, 2);
}

// ===== navigation =====

#[test]
fn navigation_wraps_in_both_directions() {
    let (doc, layout) = doc_and_layout("<div>test test test</div>");
    let mut engine = engine();
    engine.search(spec("test"), &doc, &layout);

    engine.navigate_next(&layout);
    engine.navigate_next(&layout);
    let response = engine.navigate_next(&layout);
    assert_eq!(
        response,
        Response::Navigate {
            ok: true,
            current_index: 0,
            total_matches: 3
        }
    );

    let response = engine.navigate_prev(&layout);
    assert_eq!(
        response,
        Response::Navigate {
            ok: true,
            current_index: 2,
            total_matches: 3
        }
    );
}

#[test]
fn navigation_in_idle_reports_empty() {
    let (_, layout) = doc_and_layout("<div>x</div>");
    let mut engine = engine();
    let response = engine.navigate_next(&layout);
    assert_eq!(
        response,
        Response::Navigate {
            ok: true,
            current_index: -1,
            total_matches: 0
        }
    );
}

#[test]
fn jump_to_valid_index_moves_cursor() {
    let (doc, layout) = doc_and_layout("<div>test test test</div>");
    let mut engine = engine();
    engine.search(spec("test"), &doc, &layout);

    let response = engine.jump_to(2, &layout);
    assert_eq!(
        response,
        Response::Navigate {
            ok: true,
            current_index: 2,
            total_matches: 3
        }
    );
}

#[test]
fn jump_out_of_range_is_a_no_op() {
    let (doc, layout) = doc_and_layout("<div>test test test</div>");
    let mut engine = engine();
    engine.search(spec("test"), &doc, &layout);
    engine.jump_to(1, &layout);

    let response = engine.jump_to(99, &layout);
    assert_eq!(
        response,
        Response::Navigate {
            ok: true,
            current_index: 1,
            total_matches: 3
        }
    );
}

// ===== overlays =====

#[test]
fn overlays_follow_the_cursor() {
    let (doc, layout) = doc_and_layout("<div>test test</div>");
    let mut engine = engine();
    engine.search(spec("test"), &doc, &layout);

    let current: Vec<bool> = engine.overlays().iter().map(|o| o.current).collect();
    assert_eq!(current, vec![true, false]);

    engine.navigate_next(&layout);
    let current: Vec<bool> = engine.overlays().iter().map(|o| o.current).collect();
    assert_eq!(current, vec![false, true]);
}

#[test]
fn refresh_overlays_regenerates_without_recomputing_matches() {
    let (doc, layout) = doc_and_layout("<div>hello</div>");
    let mut engine = engine();
    engine.search(spec("hello"), &doc, &layout);
    assert_eq!(engine.overlays().len(), 1);

    // Scroll: the viewport moves away, overlays disappear, matches stay.
    let scrolled = GridLayout::new(&doc, 80)
        .with_viewport(crate::model::Rect::new(0.0, 5_000.0, 640.0, 480.0));
    engine.refresh_overlays(&scrolled);
    assert!(engine.overlays().is_empty());
    assert_eq!(engine.total(), 1);
}

// ===== clear and state =====

#[test]
fn clear_drops_everything() {
    let (doc, layout) = doc_and_layout("<div>test</div>");
    let mut engine = engine();
    engine.search(spec("test"), &doc, &layout);

    let response = engine.clear();
    assert_eq!(response, Response::Ack { ok: true });
    assert_eq!(engine.total(), 0);
    assert_eq!(engine.cursor(), None);
    assert!(engine.overlays().is_empty());

    match engine.get_state() {
        Response::State {
            current_index,
            total_matches,
            state,
            ..
        } => {
            assert_eq!(current_index, -1);
            assert_eq!(total_matches, 0);
            assert_eq!(state.phase, PhaseName::Idle);
        }
        other => panic!("Expected State, got {:?}", other),
    }
}

#[test]
fn get_state_reports_active_spec() {
    let (doc, layout) = doc_and_layout("<div>test</div>");
    let mut engine = engine();
    engine.search(fuzzy_spec("test"), &doc, &layout);

    match engine.get_state() {
        Response::State { state, .. } => {
            assert_eq!(state.phase, PhaseName::Active);
            let spec = state.query_spec.expect("spec present");
            assert_eq!(spec.query, "test");
            assert!(spec.use_fuzzy);
        }
        other => panic!("Expected State, got {:?}", other),
    }
}

// ===== element search =====

#[test]
fn element_search_css_populates_elements() {
    let (doc, layout) =
        doc_and_layout(r#"<div class="item">a</div><div class="item">b</div><p>c</p>"#);
    let mut engine = engine();

    let response = engine.search(
        QuerySpec {
            use_element_search: true,
            ..QuerySpec::literal("div.item")
        },
        &doc,
        &layout,
    );
    assert_eq!(
        response,
        Response::Search {
            ok: true,
            count: 2,
            current_index: 0,
            total_matches: 2
        }
    );
    assert_eq!(engine.elements().len(), 2);
    assert!(engine.matches().is_empty());
}

#[test]
fn element_search_xpath_and_navigation() {
    let (doc, layout) = doc_and_layout("<ul><li>1</li><li>2</li><li>3</li></ul>");
    let mut engine = engine();
    engine.search(
        QuerySpec {
            use_element_search: true,
            element_mode: ElementMode::Xpath,
            ..QuerySpec::literal("//li")
        },
        &doc,
        &layout,
    );
    assert_eq!(engine.total(), 3);

    engine.navigate_next(&layout);
    assert_eq!(engine.cursor(), Some(1));
}

#[test]
fn invalid_selector_is_an_error_envelope() {
    let (doc, layout) = doc_and_layout("<div>x</div>");
    let mut engine = engine();
    let response = engine.search(
        QuerySpec {
            use_element_search: true,
            ..QuerySpec::literal("div[attr]")
        },
        &doc,
        &layout,
    );
    match response {
        Response::Error { ok, error } => {
            assert!(!ok);
            assert!(error.contains("Invalid CSS selector"));
        }
        other => panic!("Expected Error, got {:?}", other),
    }
}

// ===== results list =====

#[test]
fn results_list_collects_context() {
    let (doc, layout) = doc_and_layout("<div>alpha MATCH omega</div>");
    let mut engine = engine();
    engine.search(spec("MATCH"), &doc, &layout);

    match engine.results_list(&doc, Some(10)) {
        Response::ResultsList {
            items,
            total_matches,
            ..
        } => {
            assert_eq!(total_matches, 1);
            assert_eq!(items[0].matched_text, "MATCH");
            assert_eq!(items[0].context_before, "alpha ");
            assert_eq!(items[0].context_after, " omega");
        }
        other => panic!("Expected ResultsList, got {:?}", other),
    }
}

#[test]
fn results_list_for_elements_uses_tag_format() {
    let (doc, layout) = doc_and_layout(r#"<div id="x" class="a">content here</div>"#);
    let mut engine = engine();
    engine.search(
        QuerySpec {
            use_element_search: true,
            ..QuerySpec::literal("#x")
        },
        &doc,
        &layout,
    );

    match engine.results_list(&doc, Some(12)) {
        Response::ResultsList { items, .. } => {
            assert_eq!(items[0].matched_text, "<div#x.a>");
            assert!(items[0].full_text.starts_with("<div#x.a> content here"));
            assert!(items[0].full_text.ends_with('…'));
        }
        other => panic!("Expected ResultsList, got {:?}", other),
    }
}

// ===== observing =====

#[test]
fn re_search_outside_observing_is_rejected() {
    let (doc, layout) = doc_and_layout("<div>test</div>");
    let mut engine = engine();
    engine.search(spec("test"), &doc, &layout);
    assert!(!engine.re_search(&doc, &layout).is_ok());
}

#[test]
fn re_search_keeps_valid_cursor() {
    let (doc, layout) = doc_and_layout("<div>test test test</div>");
    let mut engine = engine();
    engine.start_observing(spec("test"), &doc, &layout);
    engine.jump_to(1, &layout);

    // Document grows a fourth match.
    let (grown, grown_layout) = doc_and_layout("<div>test test test test</div>");
    let response = engine.re_search(&grown, &grown_layout);
    assert!(response.is_ok());
    assert_eq!(engine.total(), 4);
    assert_eq!(engine.cursor(), Some(1), "cursor preserved");
}

#[test]
fn re_search_clamps_cursor_when_results_shrink() {
    let (doc, layout) = doc_and_layout("<div>test test test</div>");
    let mut engine = engine();
    engine.start_observing(spec("test"), &doc, &layout);
    engine.jump_to(2, &layout);

    let (shrunk, shrunk_layout) = doc_and_layout("<div>test test</div>");
    engine.re_search(&shrunk, &shrunk_layout);
    assert_eq!(engine.total(), 2);
    assert_eq!(engine.cursor(), Some(1), "clamped to last");
}

#[test]
fn re_search_to_zero_results_clears_cursor() {
    let (doc, layout) = doc_and_layout("<div>test</div>");
    let mut engine = engine();
    engine.start_observing(spec("test"), &doc, &layout);

    let (empty, empty_layout) = doc_and_layout("<div>changed</div>");
    let response = engine.re_search(&empty, &empty_layout);
    assert!(response.is_ok());
    assert_eq!(engine.total(), 0);
    assert_eq!(engine.cursor(), None);
}

#[test]
fn stop_observing_keeps_results() {
    let (doc, layout) = doc_and_layout("<div>test</div>");
    let mut engine = engine();
    engine.start_observing(spec("test"), &doc, &layout);
    engine.stop_observing();

    assert_eq!(engine.total(), 1);
    assert!(!engine.re_search(&doc, &layout).is_ok());
    match engine.get_state() {
        Response::State { state, .. } => assert_eq!(state.phase, PhaseName::Active),
        other => panic!("Expected State, got {:?}", other),
    }
}

// ===== command dispatch =====

#[test]
fn handle_dispatches_all_commands() {
    let (doc, layout) = doc_and_layout("<div>test test</div>");
    let mut engine = engine();

    let response = engine.handle(
        Command::Search {
            spec: spec("test"),
        },
        &doc,
        &layout,
    );
    assert!(response.is_ok());

    assert!(engine.handle(Command::NavigateNext, &doc, &layout).is_ok());
    assert!(engine.handle(Command::NavigatePrev, &doc, &layout).is_ok());
    assert!(engine
        .handle(Command::JumpToMatch { index: 1 }, &doc, &layout)
        .is_ok());
    assert!(engine.handle(Command::GetState, &doc, &layout).is_ok());
    assert!(engine
        .handle(
            Command::GetResultsList {
                context_length: None
            },
            &doc,
            &layout
        )
        .is_ok());
    assert!(engine.handle(Command::Clear, &doc, &layout).is_ok());
    assert_eq!(engine.total(), 0);
}
