//! Command surface: messages from the host UI and their responses.
//!
//! The router that delivers these messages lives outside the core. Here we
//! fix the wire shape: a tagged command union with exhaustive dispatch, and
//! flat response objects that always carry an `ok` discriminant. Unknown
//! actions never error out of the core; they produce an error envelope.

use serde::{Deserialize, Serialize};

// ===== ElementMode =====

/// Selector language for element-search mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElementMode {
    #[default]
    Css,
    Xpath,
}

// ===== QuerySpec =====

/// A full search request: the query string plus all mode flags.
///
/// Stored by the engine while observing so mutation-driven re-search can
/// replay the exact request.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct QuerySpec {
    pub query: String,
    #[serde(default)]
    pub use_regex: bool,
    #[serde(default)]
    pub case_sensitive: bool,
    #[serde(default)]
    pub use_element_search: bool,
    #[serde(default)]
    pub element_mode: ElementMode,
    #[serde(default)]
    pub use_fuzzy: bool,
    #[serde(default)]
    pub show_results_list: bool,
}

impl QuerySpec {
    /// Plain literal search for `query` with default flags.
    pub fn literal(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            ..Self::default()
        }
    }
}

// ===== Command =====

/// Tagged union of every message the core accepts.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Command {
    Search {
        #[serde(flatten)]
        spec: QuerySpec,
    },
    Clear,
    NavigateNext,
    NavigatePrev,
    JumpToMatch {
        index: usize,
    },
    GetState,
    GetResultsList {
        #[serde(default)]
        context_length: Option<usize>,
    },
}

impl Command {
    /// Decode a command from a JSON value.
    ///
    /// Distinguishes an unknown `action` (handled with an error envelope,
    /// state untouched) from structurally invalid input.
    pub fn from_value(value: serde_json::Value) -> Result<Command, CommandDecodeError> {
        let action = value
            .get("action")
            .and_then(|a| a.as_str())
            .map(str::to_string);
        match serde_json::from_value::<Command>(value) {
            Ok(command) => Ok(command),
            Err(err) => match action {
                Some(name) if !KNOWN_ACTIONS.contains(&name.as_str()) => {
                    Err(CommandDecodeError::UnknownAction { name })
                }
                _ => Err(CommandDecodeError::Malformed {
                    reason: err.to_string(),
                }),
            },
        }
    }
}

const KNOWN_ACTIONS: &[&str] = &[
    "search",
    "clear",
    "navigate_next",
    "navigate_prev",
    "jump_to_match",
    "get_state",
    "get_results_list",
];

/// Why a JSON message failed to decode into a `Command`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandDecodeError {
    /// The `action` field named no known command.
    UnknownAction { name: String },
    /// A known action with missing or mistyped fields, or no action at all.
    Malformed { reason: String },
}

// ===== Responses =====

/// Engine phase as reported by `get_state`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PhaseName {
    Idle,
    Active,
    Observing,
}

/// Read-only state snapshot for `get_state`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StateSnapshot {
    pub phase: PhaseName,
    /// The active query spec; absent in `Idle`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub query_spec: Option<QuerySpec>,
}

/// One row of the results list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResultItem {
    pub index: usize,
    pub matched_text: String,
    pub context_before: String,
    pub context_after: String,
    pub full_text: String,
}

/// All response shapes, serialised untagged as flat JSON objects.
///
/// `current_index` is `-1` whenever there is no cursor, so clients can
/// render "0 of 0" without a null check.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Response {
    Search {
        ok: bool,
        count: usize,
        current_index: i64,
        total_matches: usize,
    },
    Ack {
        ok: bool,
    },
    Navigate {
        ok: bool,
        current_index: i64,
        total_matches: usize,
    },
    State {
        ok: bool,
        state: StateSnapshot,
        current_index: i64,
        total_matches: usize,
    },
    ResultsList {
        ok: bool,
        items: Vec<ResultItem>,
        total_matches: usize,
    },
    Error {
        ok: bool,
        error: String,
    },
}

impl Response {
    pub fn ack() -> Self {
        Response::Ack { ok: true }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Response::Error {
            ok: false,
            error: message.into(),
        }
    }

    pub fn unknown_action(name: &str) -> Self {
        Response::error(format!("Unknown action: {name}"))
    }

    /// The `ok` discriminant, regardless of variant.
    pub fn is_ok(&self) -> bool {
        match self {
            Response::Search { ok, .. }
            | Response::Ack { ok }
            | Response::Navigate { ok, .. }
            | Response::State { ok, .. }
            | Response::ResultsList { ok, .. }
            | Response::Error { ok, .. } => *ok,
        }
    }
}

// ===== Tests =====
