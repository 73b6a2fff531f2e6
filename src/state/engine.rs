//! The search-state machine.
//!
//! `SearchEngine` exclusively owns the result set, the overlay specs and
//! the cursor; everything outside sees immutable snapshots through the
//! command responses. Operations are synchronous and serialised by the
//! caller (the document's event loop); nothing here blocks or suspends.
//!
//! Phase transitions:
//!
//! - `search` from any phase enters `Active` (results replaced);
//! - `start_observing` runs a search and enters `Observing`;
//! - `re_search` is accepted only while `Observing`;
//! - `clear` drops everything and returns to `Idle`.
//!
//! A failed query (bad regex or selector) produces an error envelope and
//! leaves the phase, results, cursor and overlays untouched.

use crate::config::SearchConfig;
use crate::matcher::{self, MatchOptions};
use crate::model::{
    Command, DocRange, Document, NodeId, PhaseName, QuerySpec, Response, StateSnapshot,
};
use crate::overlay::{overlays_for_element, overlays_for_range, Layout, OverlaySpec};
use crate::selector;
use crate::state::{navigation, observer, results};
use crate::vtl::{self, range::to_document_range, Span};
use std::collections::HashSet;
use tracing::{debug, warn};

// ===== MatchRecord =====

/// One stored match: its span over the virtual text, the reconstructed
/// document range, and (for multi-keyword results) the keyword spans.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchRecord {
    pub span: Span,
    pub range: DocRange,
    pub keyword_spans: Option<Vec<Span>>,
}

// ===== EnginePhase =====

/// Lifecycle phase. Sum type: exactly one phase at a time, and a cursor
/// only exists while results do.
#[derive(Debug, Clone, PartialEq)]
pub enum EnginePhase {
    /// No active search.
    Idle,
    /// Search executed; results and cursor live.
    Active {
        spec: QuerySpec,
        cursor: Option<usize>,
    },
    /// As `Active`, and mutation-driven re-search is accepted.
    Observing {
        spec: QuerySpec,
        cursor: Option<usize>,
    },
}

impl EnginePhase {
    fn name(&self) -> PhaseName {
        match self {
            EnginePhase::Idle => PhaseName::Idle,
            EnginePhase::Active { .. } => PhaseName::Active,
            EnginePhase::Observing { .. } => PhaseName::Observing,
        }
    }

    fn spec(&self) -> Option<&QuerySpec> {
        match self {
            EnginePhase::Idle => None,
            EnginePhase::Active { spec, .. } | EnginePhase::Observing { spec, .. } => Some(spec),
        }
    }

    fn cursor(&self) -> Option<usize> {
        match self {
            EnginePhase::Idle => None,
            EnginePhase::Active { cursor, .. } | EnginePhase::Observing { cursor, .. } => *cursor,
        }
    }

    fn set_cursor(&mut self, new_cursor: Option<usize>) {
        match self {
            EnginePhase::Idle => {}
            EnginePhase::Active { cursor, .. } | EnginePhase::Observing { cursor, .. } => {
                *cursor = new_cursor;
            }
        }
    }
}

// ===== SearchEngine =====

/// Owner of all search state. See module docs for the lifecycle.
pub struct SearchEngine {
    config: SearchConfig,
    phase: EnginePhase,
    matches: Vec<MatchRecord>,
    elements: Vec<NodeId>,
    overlays: Vec<OverlaySpec>,
}

impl SearchEngine {
    pub fn new(config: SearchConfig) -> Self {
        Self {
            config,
            phase: EnginePhase::Idle,
            matches: Vec::new(),
            elements: Vec::new(),
            overlays: Vec::new(),
        }
    }

    // ----- Snapshots -----

    pub fn phase(&self) -> &EnginePhase {
        &self.phase
    }

    pub fn matches(&self) -> &[MatchRecord] {
        &self.matches
    }

    pub fn elements(&self) -> &[NodeId] {
        &self.elements
    }

    pub fn overlays(&self) -> &[OverlaySpec] {
        &self.overlays
    }

    pub fn cursor(&self) -> Option<usize> {
        self.phase.cursor()
    }

    /// Result count in the active mode (matches or elements).
    pub fn total(&self) -> usize {
        if self.element_mode() {
            self.elements.len()
        } else {
            self.matches.len()
        }
    }

    fn element_mode(&self) -> bool {
        self.phase
            .spec()
            .is_some_and(|spec| spec.use_element_search)
    }

    fn current_index(&self) -> i64 {
        self.cursor().map_or(-1, |c| c as i64)
    }

    fn navigate_response(&self) -> Response {
        Response::Navigate {
            ok: true,
            current_index: self.current_index(),
            total_matches: self.total(),
        }
    }

    // ----- Command dispatch -----

    /// Exhaustive command handling; every command produces exactly one
    /// response and unknown actions never reach this point.
    pub fn handle(&mut self, command: Command, doc: &Document, layout: &dyn Layout) -> Response {
        match command {
            Command::Search { spec } => self.search(spec, doc, layout),
            Command::Clear => self.clear(),
            Command::NavigateNext => self.navigate_next(layout),
            Command::NavigatePrev => self.navigate_prev(layout),
            Command::JumpToMatch { index } => self.jump_to(index, layout),
            Command::GetState => self.get_state(),
            Command::GetResultsList { context_length } => self.results_list(doc, context_length),
        }
    }

    // ----- Operations -----

    /// Execute a search, replacing any previous results.
    pub fn search(&mut self, spec: QuerySpec, doc: &Document, layout: &dyn Layout) -> Response {
        match self.compute(&spec, doc) {
            Ok(outcome) => {
                self.install(spec, outcome, layout);
                Response::Search {
                    ok: true,
                    count: self.total(),
                    current_index: self.current_index(),
                    total_matches: self.total(),
                }
            }
            Err(error) => Response::error(error),
        }
    }

    /// Drop all results and return to `Idle`.
    pub fn clear(&mut self) -> Response {
        self.phase = EnginePhase::Idle;
        self.matches.clear();
        self.elements.clear();
        self.overlays.clear();
        Response::ack()
    }

    pub fn navigate_next(&mut self, layout: &dyn Layout) -> Response {
        let next = navigation::next_index(self.cursor(), self.total());
        self.phase.set_cursor(next);
        self.refresh_overlays(layout);
        self.navigate_response()
    }

    pub fn navigate_prev(&mut self, layout: &dyn Layout) -> Response {
        let prev = navigation::prev_index(self.cursor(), self.total());
        self.phase.set_cursor(prev);
        self.refresh_overlays(layout);
        self.navigate_response()
    }

    /// Jump to a specific result; out-of-range indices are a no-op.
    pub fn jump_to(&mut self, index: usize, layout: &dyn Layout) -> Response {
        let jumped = navigation::jump_index(self.cursor(), self.total(), index);
        self.phase.set_cursor(jumped);
        self.refresh_overlays(layout);
        self.navigate_response()
    }

    pub fn get_state(&self) -> Response {
        Response::State {
            ok: true,
            state: StateSnapshot {
                phase: self.phase.name(),
                query_spec: self.phase.spec().cloned(),
            },
            current_index: self.current_index(),
            total_matches: self.total(),
        }
    }

    /// Collect the results list with the requested context window.
    ///
    /// Explicit lengths clamp into the documented bounds; an absent
    /// length uses the configured default.
    pub fn results_list(&self, doc: &Document, context_length: Option<usize>) -> Response {
        let length = match context_length {
            Some(requested) => results::clamp_context_length(Some(requested)),
            None => self.config.context_length,
        };
        let source = results::ContextSource::new(doc);
        let items = if self.element_mode() {
            self.elements
                .iter()
                .enumerate()
                .map(|(index, &element)| source.element_result(index, element, length))
                .collect()
        } else {
            self.matches
                .iter()
                .enumerate()
                .map(|(index, record)| source.text_result(index, &record.range, length))
                .collect()
        };
        Response::ResultsList {
            ok: true,
            items,
            total_matches: self.total(),
        }
    }

    /// Run a search and keep accepting observer-driven re-searches.
    pub fn start_observing(
        &mut self,
        spec: QuerySpec,
        doc: &Document,
        layout: &dyn Layout,
    ) -> Response {
        let response = self.search(spec.clone(), doc, layout);
        if response.is_ok() {
            let cursor = self.cursor();
            self.phase = EnginePhase::Observing { spec, cursor };
        }
        response
    }

    /// Leave observing mode, keeping the current results.
    pub fn stop_observing(&mut self) {
        if let EnginePhase::Observing { spec, cursor } = &self.phase {
            self.phase = EnginePhase::Active {
                spec: spec.clone(),
                cursor: *cursor,
            };
        }
    }

    /// Recompute matches after a document mutation, preserving the
    /// cursor where possible. Accepted only while observing.
    pub fn re_search(&mut self, doc: &Document, layout: &dyn Layout) -> Response {
        let EnginePhase::Observing { spec, cursor } = &self.phase else {
            return Response::error("re_search requires an observed query");
        };
        let spec = spec.clone();
        let previous_cursor = *cursor;

        match self.compute(&spec, doc) {
            Ok(outcome) => {
                self.matches = outcome.matches;
                self.elements = outcome.elements;
                let new_total = self.total();
                let preserved = observer::preserved_cursor(
                    previous_cursor,
                    new_total,
                    &layout.viewport(),
                    |index| self.vertical_center(index, layout),
                );
                self.phase = EnginePhase::Observing {
                    spec,
                    cursor: preserved,
                };
                self.refresh_overlays(layout);
                debug!(total = new_total, cursor = ?preserved, "re-search complete");
                Response::Search {
                    ok: true,
                    count: new_total,
                    current_index: self.current_index(),
                    total_matches: new_total,
                }
            }
            Err(error) => Response::error(error),
        }
    }

    /// Rebuild overlay specs from stored results. Called on navigation
    /// and by the host on scroll or resize; ranges are not recomputed.
    pub fn refresh_overlays(&mut self, layout: &dyn Layout) {
        let cursor = self.cursor();
        self.overlays.clear();
        if self.element_mode() {
            for (index, &element) in self.elements.iter().enumerate() {
                self.overlays
                    .extend(overlays_for_element(layout, element, cursor == Some(index)));
            }
        } else {
            for (index, record) in self.matches.iter().enumerate() {
                self.overlays.extend(overlays_for_range(
                    layout,
                    &record.range,
                    cursor == Some(index),
                ));
            }
        }
    }

    // ----- Internals -----

    fn vertical_center(&self, index: usize, layout: &dyn Layout) -> Option<f64> {
        if self.element_mode() {
            let rect = layout.element_rect(*self.elements.get(index)?)?;
            Some(rect.top + rect.height / 2.0)
        } else {
            let rects = layout.range_line_rects(&self.matches.get(index)?.range);
            let first = rects.first()?;
            Some(first.top + first.height / 2.0)
        }
    }

    /// Compute results without touching engine state, so a failed query
    /// leaves everything as it was.
    fn compute(&self, spec: &QuerySpec, doc: &Document) -> Result<SearchOutcome, String> {
        if spec.use_element_search {
            let elements = selector::find_elements(doc, &spec.query, spec.element_mode)
                .map_err(|err| err.to_string())?;
            return Ok(SearchOutcome {
                matches: Vec::new(),
                elements,
            });
        }

        let ignore: HashSet<String> = [self.config.overlay_container_id.clone()].into();
        let virtual_text = vtl::build(doc, &ignore, self.config.limits);
        let options = MatchOptions {
            use_regex: spec.use_regex,
            case_sensitive: spec.case_sensitive,
            use_fuzzy: spec.use_fuzzy,
        };
        let found = matcher::find_matches(&spec.query, &virtual_text, options, &self.config.fuzzy)
            .map_err(|err| err.to_string())?;

        let mut matches: Vec<MatchRecord> = found
            .into_iter()
            .filter_map(|m| {
                to_document_range(&virtual_text, m.span).map(|range| MatchRecord {
                    span: m.span,
                    range,
                    keyword_spans: m.keyword_spans,
                })
            })
            .collect();
        if matches.len() > self.config.max_matches {
            warn!(
                cap = self.config.max_matches,
                found = matches.len(),
                "match list truncated"
            );
            matches.truncate(self.config.max_matches);
        }
        Ok(SearchOutcome {
            matches,
            elements: Vec::new(),
        })
    }

    fn install(&mut self, spec: QuerySpec, outcome: SearchOutcome, layout: &dyn Layout) {
        self.matches = outcome.matches;
        self.elements = outcome.elements;
        let cursor = if self.matches.is_empty() && self.elements.is_empty() {
            None
        } else {
            Some(0)
        };
        self.phase = EnginePhase::Active { spec, cursor };
        self.refresh_overlays(layout);
    }
}

struct SearchOutcome {
    matches: Vec<MatchRecord>,
    elements: Vec<NodeId>,
}

// ===== Tests =====

#[cfg(test)]
#[path = "engine_tests.rs"]
mod tests;
