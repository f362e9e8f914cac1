use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Results per page served by the search endpoint.
pub const PAGE_SIZE: u64 = 10;

/// Decision collections exposed by the search endpoint's `court` parameter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Court {
    #[default]
    Yargitay,
    Danistay,
    Yerel,
    Istinaf,
    Kyb,
}

impl Court {
    pub const ALL: [Court; 5] = [
        Court::Yargitay,
        Court::Danistay,
        Court::Yerel,
        Court::Istinaf,
        Court::Kyb,
    ];

    /// Item type code the API forwards upstream.
    pub fn item_type(self) -> &'static str {
        match self {
            Court::Yargitay => "YARGITAYKARARI",
            Court::Danistay => "DANISTAYKARAR",
            Court::Yerel => "YERELHUKUK",
            Court::Istinaf => "ISTINAFHUKUK",
            Court::Kyb => "KYB",
        }
    }

    pub fn key(self) -> &'static str {
        match self {
            Court::Yargitay => "yargitay",
            Court::Danistay => "danistay",
            Court::Yerel => "yerel",
            Court::Istinaf => "istinaf",
            Court::Kyb => "kyb",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Court::Yargitay => "Yargıtay",
            Court::Danistay => "Danıştay",
            Court::Yerel => "Yerel Hukuk",
            Court::Istinaf => "İstinaf Hukuk",
            Court::Kyb => "Kanun Yararına Bozma",
        }
    }

    /// Accepts either the short key (`danistay`) or the item type code.
    pub fn parse(input: &str) -> Option<Self> {
        let needle = input.trim().to_lowercase();
        Court::ALL
            .into_iter()
            .find(|c| c.key() == needle || c.item_type().to_lowercase() == needle)
    }
}

/// A validated keyword search. The keyword is trimmed and never empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    pub keyword: String,
    pub court: Court,
    /// 1-based.
    pub page: u32,
}

impl SearchQuery {
    /// Returns `None` for blank input, which must not reach the network.
    pub fn new(raw: &str) -> Option<Self> {
        let keyword = raw.trim();
        if keyword.is_empty() {
            return None;
        }
        Some(Self {
            keyword: keyword.to_string(),
            court: Court::default(),
            page: 1,
        })
    }

    pub fn with_court(mut self, court: Court) -> Self {
        self.court = court;
        self
    }

    pub fn with_page(mut self, page: u32) -> Self {
        self.page = page.max(1);
        self
    }

    /// Query string pairs. Defaults are omitted so the plain request stays
    /// `?keyword=...`.
    pub fn params(&self) -> Vec<(&'static str, String)> {
        let mut params = vec![("keyword", self.keyword.clone())];
        if self.court != Court::default() {
            params.push(("court", self.court.item_type().to_string()));
        }
        if self.page > 1 {
            params.push(("page", self.page.to_string()));
        }
        params
    }
}

/// One row of a search response. Every field is display-only, so any JSON
/// scalar is accepted and shown as text.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DecisionSummary {
    #[serde(default, deserialize_with = "lenient_string")]
    pub id: String,
    /// Chamber that issued the decision.
    #[serde(default, deserialize_with = "lenient_string")]
    pub daire: String,
    /// Display-only date, never parsed.
    #[serde(default, deserialize_with = "lenient_string")]
    pub tarih: String,
    #[serde(rename = "esasNo", default, deserialize_with = "lenient_string")]
    pub esas_no: String,
    #[serde(rename = "kararNo", default, deserialize_with = "lenient_string")]
    pub karar_no: String,
    /// Summary excerpt; only some API deployments send it.
    #[serde(default, deserialize_with = "lenient_opt_string")]
    pub ozet: Option<String>,
}

/// Raw `/search` body. Field presence and types are not validated.
#[derive(Debug, Default, Deserialize)]
pub struct SearchPayload {
    #[serde(default, deserialize_with = "lenient_bool")]
    pub success: bool,
    #[serde(default, deserialize_with = "lenient_count")]
    pub total: Option<u64>,
    #[serde(default)]
    pub decisions: Option<Vec<DecisionSummary>>,
    #[serde(default, deserialize_with = "lenient_opt_string")]
    pub error: Option<String>,
}

/// Raw `/document` body.
#[derive(Debug, Default, Deserialize)]
pub struct DocumentPayload {
    #[serde(default, deserialize_with = "lenient_bool")]
    pub success: bool,
    #[serde(default, deserialize_with = "lenient_opt_string")]
    pub content: Option<String>,
    #[serde(default, deserialize_with = "lenient_opt_string")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SearchResult {
    Found {
        total: Option<u64>,
        decisions: Vec<DecisionSummary>,
    },
    /// The API answered with `success: false`.
    Rejected { error: String },
    /// Transport failure or unparseable body.
    Unreachable { error: String },
}

impl SearchResult {
    pub fn decisions(&self) -> &[DecisionSummary] {
        match self {
            SearchResult::Found { decisions, .. } => decisions,
            _ => &[],
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            SearchResult::Found { .. } => None,
            SearchResult::Rejected { error } | SearchResult::Unreachable { error } => Some(error),
        }
    }

    /// True when a response came back and parsed, whatever it said.
    pub fn reached_api(&self) -> bool {
        !matches!(self, SearchResult::Unreachable { .. })
    }
}

impl From<SearchPayload> for SearchResult {
    fn from(payload: SearchPayload) -> Self {
        if payload.success {
            SearchResult::Found {
                total: payload.total,
                decisions: payload.decisions.unwrap_or_default(),
            }
        } else {
            SearchResult::Rejected {
                error: payload.error.unwrap_or_default(),
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum DocumentContent {
    Loading,
    Ready(String),
    Failed(String),
}

impl From<DocumentPayload> for DocumentContent {
    fn from(payload: DocumentPayload) -> Self {
        if payload.success {
            DocumentContent::Ready(payload.content.unwrap_or_default())
        } else {
            DocumentContent::Failed(payload.error.unwrap_or_default())
        }
    }
}

/// JSON scalar as display text: strings verbatim, null as absent,
/// anything else in its JSON form (`2023`, `true`).
fn value_text(value: Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s),
        Value::Null => None,
        other => Some(other.to_string()),
    }
}

fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(value_text(Value::deserialize(deserializer)?).unwrap_or_default())
}

fn lenient_opt_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(value_text(Value::deserialize(deserializer)?))
}

/// Only a literal `true` counts as success.
fn lenient_bool<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(matches!(Value::deserialize(deserializer)?, Value::Bool(true)))
}

/// Non-negative integer, also when sent as a numeric string.
fn lenient_count<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    })
}
