use crate::api::types::{Court, DocumentContent, SearchQuery, SearchResult};
use crate::api::ApiStatus;
use crate::calc::interest::InterestInput;
use crate::calc::penalty::{self, PenaltyOutcome, ReductionRule, DEFAULT_BASE_MONTHS};

/// Canned queries offered under the search box.
pub const EXAMPLE_QUERIES: &[&str] = &["TCK 141", "TCK 86", "trafik kazasi", "icra itiraz", "bosanma"];

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Tab {
    #[default]
    Search,
    Penalty,
    Interest,
}

#[derive(Debug, Clone, Default)]
pub struct SearchState {
    /// Text currently in the search box, untrimmed.
    pub input: String,
    pub court: Court,
    /// Query behind the current (or pending) results; drives paging.
    pub active_query: Option<SearchQuery>,
    pub loading: bool,
    pub results: Option<SearchResult>,
    pub selected_doc: Option<String>,
    pub document: Option<DocumentContent>,
}

#[derive(Debug, Clone)]
pub struct PenaltyState {
    pub base_months: u32,
    pub rules: Vec<ReductionRule>,
}

impl Default for PenaltyState {
    fn default() -> Self {
        Self {
            base_months: DEFAULT_BASE_MONTHS,
            rules: penalty::default_rules(),
        }
    }
}

impl PenaltyState {
    pub fn outcome(&self) -> PenaltyOutcome {
        penalty::evaluate(f64::from(self.base_months), &self.rules)
    }

    /// Flip one rule. Returns false if no rule has that id.
    pub fn toggle(&mut self, id: &str) -> bool {
        match self.rules.iter_mut().find(|r| r.id == id) {
            Some(rule) => {
                rule.active = !rule.active;
                true
            }
            None => false,
        }
    }
}

/// Everything the view renders. Owned and mutated only by the controller.
#[derive(Debug, Clone, Default)]
pub struct AppState {
    pub tab: Tab,
    pub api_status: ApiStatus,
    pub search: SearchState,
    pub penalty: PenaltyState,
    pub interest: InterestInput,
    /// One-shot message for the user; cleared by the next action.
    pub notice: Option<String>,
}
