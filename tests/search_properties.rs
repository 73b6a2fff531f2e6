//! Property-based tests of the public engine API.
//!
//! Tests validate:
//! 1. Clear always resets to zero matches and cursor -1
//! 2. Navigation stays within bounds and wraps
//! 3. Search is deterministic for equal inputs

use pagelens::config::SearchConfig;
use pagelens::model::{QuerySpec, Response};
use pagelens::overlay::grid::GridLayout;
use pagelens::parser::parse_html;
use pagelens::state::SearchEngine;
use proptest::prelude::*;

fn arb_words() -> impl Strategy<Value = String> {
    proptest::collection::vec("[a-z]{1,6}", 1..12).prop_map(|words| words.join(" "))
}

fn arb_html() -> impl Strategy<Value = String> {
    proptest::collection::vec(arb_words(), 1..5)
        .prop_map(|blocks| blocks.into_iter().map(|b| format!("<p>{b}</p>")).collect())
}

fn current_and_total(response: &Response) -> (i64, usize) {
    match response {
        Response::Search {
            current_index,
            total_matches,
            ..
        }
        | Response::Navigate {
            current_index,
            total_matches,
            ..
        }
        | Response::State {
            current_index,
            total_matches,
            ..
        } => (*current_index, *total_matches),
        other => panic!("response without indices: {other:?}"),
    }
}

proptest! {
    #[test]
    fn clear_always_resets(html in arb_html(), query in "[a-z]{1,4}") {
        let doc = parse_html(&html).expect("generated html parses");
        let layout = GridLayout::new(&doc, 40);
        let mut engine = SearchEngine::new(SearchConfig::default());

        engine.search(QuerySpec::literal(&query), &doc, &layout);
        engine.clear();

        let (current, total) = current_and_total(&engine.get_state());
        prop_assert_eq!(total, 0);
        prop_assert_eq!(current, -1);
    }

    #[test]
    fn navigation_stays_in_bounds(
        html in arb_html(),
        query in "[a-z]{1,3}",
        steps in proptest::collection::vec(any::<bool>(), 0..12),
    ) {
        let doc = parse_html(&html).expect("generated html parses");
        let layout = GridLayout::new(&doc, 40);
        let mut engine = SearchEngine::new(SearchConfig::default());

        let response = engine.search(QuerySpec::literal(&query), &doc, &layout);
        let (_, total) = current_and_total(&response);

        for forward in steps {
            let response = if forward {
                engine.navigate_next(&layout)
            } else {
                engine.navigate_prev(&layout)
            };
            let (current, reported_total) = current_and_total(&response);
            prop_assert_eq!(reported_total, total);
            if total == 0 {
                prop_assert_eq!(current, -1);
            } else {
                prop_assert!((0..total as i64).contains(&current));
            }
        }
    }

    #[test]
    fn full_next_cycle_returns_to_start(html in arb_html(), query in "[a-z]{1,2}") {
        let doc = parse_html(&html).expect("generated html parses");
        let layout = GridLayout::new(&doc, 40);
        let mut engine = SearchEngine::new(SearchConfig::default());

        let response = engine.search(QuerySpec::literal(&query), &doc, &layout);
        let (start, total) = current_and_total(&response);
        if total > 0 {
            let mut last = start;
            for _ in 0..total {
                let (current, _) = current_and_total(&engine.navigate_next(&layout));
                last = current;
            }
            prop_assert_eq!(last, start);
        }
    }

    #[test]
    fn search_is_deterministic(html in arb_html(), query in "[a-z]{1,4}") {
        let doc = parse_html(&html).expect("generated html parses");
        let layout = GridLayout::new(&doc, 40);

        let mut first = SearchEngine::new(SearchConfig::default());
        let mut second = SearchEngine::new(SearchConfig::default());
        let a = first.search(QuerySpec::literal(&query), &doc, &layout);
        let b = second.search(QuerySpec::literal(&query), &doc, &layout);
        prop_assert_eq!(a, b);
        prop_assert_eq!(first.matches(), second.matches());
        prop_assert_eq!(first.overlays(), second.overlays());
    }
}
