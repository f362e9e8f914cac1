pub mod state;

use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::api::types::{Court, DocumentContent, SearchQuery, SearchResult, PAGE_SIZE};
use crate::api::{ApiStatus, DecisionSource};
use crate::calc::penalty::{BASE_MONTHS_MAX, BASE_MONTHS_MIN};

use state::{AppState, Tab, EXAMPLE_QUERIES};

/// A user intent, already parsed and validated for type.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    SwitchTab(Tab),
    /// Submit a search. `Some` replaces the search box text first.
    Search(Option<String>),
    /// Copy example query n (1-based) into the search box.
    UseExample(usize),
    SetCourt(Court),
    NextPage,
    PrevPage,
    /// Open decision n (1-based) of the current result list.
    OpenDecision(usize),
    CloseDocument,
    SetBaseMonths(u32),
    ToggleRule(&'static str),
    SetPrincipal(f64),
    SetRate(f64),
    SetDays(u32),
}

/// Identifies one outstanding request of a given kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestToken(u64);

/// Issues monotonically increasing tokens; only the newest is current.
#[derive(Debug, Default)]
struct RequestSeq {
    latest: u64,
}

impl RequestSeq {
    fn issue(&mut self) -> RequestToken {
        self.latest += 1;
        RequestToken(self.latest)
    }

    fn is_current(&self, token: RequestToken) -> bool {
        token.0 == self.latest
    }
}

/// A finished network call, delivered back to the event loop.
#[derive(Debug)]
pub enum Completion {
    HealthCheck(ApiStatus),
    Search {
        token: RequestToken,
        result: SearchResult,
    },
    Document {
        token: RequestToken,
        id: String,
        content: DocumentContent,
    },
}

/// Owns the application state and turns actions and completions into
/// state changes. Network calls run as spawned tasks and report back
/// through `completions`; results from superseded requests are dropped.
pub struct Controller {
    state: AppState,
    source: Arc<dyn DecisionSource>,
    completions: mpsc::UnboundedSender<Completion>,
    searches: RequestSeq,
    documents: RequestSeq,
}

impl Controller {
    pub fn new(
        source: Arc<dyn DecisionSource>,
        completions: mpsc::UnboundedSender<Completion>,
    ) -> Self {
        Self {
            state: AppState::default(),
            source,
            completions,
            searches: RequestSeq::default(),
            documents: RequestSeq::default(),
        }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// Kick off the one-time availability check.
    pub fn start(&self) {
        let source = self.source.clone();
        let tx = self.completions.clone();
        tokio::spawn(async move {
            let status = source.check().await;
            let _ = tx.send(Completion::HealthCheck(status));
        });
    }

    pub fn notify(&mut self, message: impl Into<String>) {
        self.state.notice = Some(message.into());
    }

    pub fn dispatch(&mut self, action: Action) {
        self.state.notice = None;
        debug!(?action, "dispatch");

        match action {
            Action::SwitchTab(tab) => self.state.tab = tab,
            Action::Search(keyword) => {
                if let Some(keyword) = keyword {
                    self.state.search.input = keyword;
                }
                // Blank input is silently ignored.
                if let Some(query) = SearchQuery::new(&self.state.search.input) {
                    self.submit_search(query.with_court(self.state.search.court));
                }
            }
            Action::UseExample(n) => match n.checked_sub(1).and_then(|i| EXAMPLE_QUERIES.get(i)) {
                Some(example) => self.state.search.input = example.to_string(),
                None => self.notify(format!("Örnek 1-{} arasında olmalı", EXAMPLE_QUERIES.len())),
            },
            Action::SetCourt(court) => self.state.search.court = court,
            Action::NextPage => self.turn_page(true),
            Action::PrevPage => self.turn_page(false),
            Action::OpenDecision(n) => {
                let id = self
                    .state
                    .search
                    .results
                    .as_ref()
                    .and_then(|r| n.checked_sub(1).and_then(|i| r.decisions().get(i)))
                    .map(|d| d.id.clone());
                match id {
                    Some(id) => self.load_document(id),
                    None => self.notify(format!("{}. karar listede yok", n)),
                }
            }
            Action::CloseDocument => {
                self.documents.issue();
                self.state.search.document = None;
            }
            Action::SetBaseMonths(months) => {
                self.state.penalty.base_months = months.clamp(BASE_MONTHS_MIN, BASE_MONTHS_MAX);
            }
            Action::ToggleRule(id) => {
                if !self.state.penalty.toggle(id) {
                    self.notify(format!("Bilinmeyen indirim: {}", id));
                }
            }
            Action::SetPrincipal(value) => self.state.interest.principal = value,
            Action::SetRate(value) => self.state.interest.annual_rate_percent = value,
            Action::SetDays(days) => self.state.interest.days = days,
        }
    }

    pub fn complete(&mut self, completion: Completion) {
        match completion {
            Completion::HealthCheck(status) => {
                self.state.api_status = self.state.api_status.after_check(status);
                info!(status = ?self.state.api_status, "API health check finished");
            }
            Completion::Search { token, result } => {
                if !self.searches.is_current(token) {
                    debug!(?token, "stale search result discarded");
                    return;
                }
                self.state.api_status = self.state.api_status.after_search(result.reached_api());
                self.state.search.loading = false;
                self.state.search.results = Some(result);
            }
            Completion::Document { token, id, content } => {
                if !self.documents.is_current(token) {
                    debug!(doc_id = %id, "stale document discarded");
                    return;
                }
                self.state.search.document = Some(content);
            }
        }
    }

    fn submit_search(&mut self, query: SearchQuery) {
        let token = self.searches.issue();
        // A new search invalidates any document still loading.
        self.documents.issue();

        let search = &mut self.state.search;
        search.loading = true;
        search.results = None;
        search.selected_doc = None;
        search.document = None;
        search.active_query = Some(query.clone());

        info!(keyword = %query.keyword, court = query.court.key(), page = query.page, "search started");

        let source = self.source.clone();
        let tx = self.completions.clone();
        tokio::spawn(async move {
            let result = source.search(&query).await;
            let _ = tx.send(Completion::Search { token, result });
        });
    }

    fn turn_page(&mut self, forward: bool) {
        if self.state.search.loading {
            self.notify("Arama sürüyor, lütfen bekleyin");
            return;
        }
        let Some(query) = self.state.search.active_query.clone() else {
            self.notify("Önce bir arama yapın");
            return;
        };

        let page = if forward {
            let has_more = match &self.state.search.results {
                Some(SearchResult::Found {
                    total: Some(total),
                    ..
                }) => u64::from(query.page) * PAGE_SIZE < *total,
                Some(SearchResult::Found { decisions, .. }) => decisions.len() as u64 >= PAGE_SIZE,
                _ => false,
            };
            if !has_more {
                self.notify("Son sayfadasınız");
                return;
            }
            query.page + 1
        } else {
            if query.page <= 1 {
                self.notify("İlk sayfadasınız");
                return;
            }
            query.page - 1
        };

        self.submit_search(query.with_page(page));
    }

    fn load_document(&mut self, id: String) {
        let token = self.documents.issue();
        self.state.search.selected_doc = Some(id.clone());
        self.state.search.document = Some(DocumentContent::Loading);

        debug!(doc_id = %id, "document requested");

        let source = self.source.clone();
        let tx = self.completions.clone();
        tokio::spawn(async move {
            let content = source.fetch_document(&id).await;
            let _ = tx.send(Completion::Document { token, id, content });
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::types::DecisionSummary;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;
    use tokio::sync::oneshot;

    /// Answers immediately unless a gate was registered for the keyword or
    /// document id, in which case it waits for the test to release it.
    struct FakeSource {
        health: ApiStatus,
        search_calls: AtomicUsize,
        search_gates: Mutex<HashMap<String, oneshot::Receiver<SearchResult>>>,
        doc_gates: Mutex<HashMap<String, oneshot::Receiver<DocumentContent>>>,
    }

    impl FakeSource {
        fn new(health: ApiStatus) -> Self {
            Self {
                health,
                search_calls: AtomicUsize::new(0),
                search_gates: Mutex::new(HashMap::new()),
                doc_gates: Mutex::new(HashMap::new()),
            }
        }

        fn gate_search(&self, keyword: &str) -> oneshot::Sender<SearchResult> {
            let (tx, rx) = oneshot::channel();
            self.search_gates.lock().unwrap().insert(keyword.to_string(), rx);
            tx
        }

        fn gate_document(&self, id: &str) -> oneshot::Sender<DocumentContent> {
            let (tx, rx) = oneshot::channel();
            self.doc_gates.lock().unwrap().insert(id.to_string(), rx);
            tx
        }
    }

    fn decision(id: &str) -> DecisionSummary {
        DecisionSummary {
            id: id.to_string(),
            daire: "3. Ceza Dairesi".to_string(),
            tarih: "12.03.2024".to_string(),
            esas_no: "2023/1".to_string(),
            karar_no: "2024/1".to_string(),
            ozet: None,
        }
    }

    fn found(ids: &[&str], total: u64) -> SearchResult {
        SearchResult::Found {
            total: Some(total),
            decisions: ids.iter().map(|id| decision(id)).collect(),
        }
    }

    #[async_trait]
    impl DecisionSource for FakeSource {
        async fn search(&self, query: &SearchQuery) -> SearchResult {
            self.search_calls.fetch_add(1, Ordering::SeqCst);
            let gate = self.search_gates.lock().unwrap().remove(&query.keyword);
            match gate {
                Some(rx) => rx.await.unwrap(),
                None => found(&["a", "b"], 2),
            }
        }

        async fn fetch_document(&self, id: &str) -> DocumentContent {
            let gate = self.doc_gates.lock().unwrap().remove(id);
            match gate {
                Some(rx) => rx.await.unwrap(),
                None => DocumentContent::Ready(format!("metin {}", id)),
            }
        }

        async fn check(&self) -> ApiStatus {
            self.health
        }
    }

    fn setup(
        health: ApiStatus,
    ) -> (Arc<FakeSource>, Controller, mpsc::UnboundedReceiver<Completion>) {
        let source = Arc::new(FakeSource::new(health));
        let (tx, rx) = mpsc::unbounded_channel();
        let controller = Controller::new(source.clone(), tx);
        (source, controller, rx)
    }

    async fn settle(controller: &mut Controller, rx: &mut mpsc::UnboundedReceiver<Completion>) {
        let completion = rx.recv().await.unwrap();
        controller.complete(completion);
    }

    #[tokio::test]
    async fn test_health_check_sets_status() {
        let (_, mut controller, mut rx) = setup(ApiStatus::Offline);
        assert_eq!(controller.state().api_status, ApiStatus::Checking);
        controller.start();
        settle(&mut controller, &mut rx).await;
        assert_eq!(controller.state().api_status, ApiStatus::Offline);
    }

    #[tokio::test]
    async fn test_search_populates_and_revives_status() {
        let (source, mut controller, mut rx) = setup(ApiStatus::Offline);
        controller.start();
        settle(&mut controller, &mut rx).await;

        controller.dispatch(Action::Search(Some("  TCK 141 ".into())));
        assert!(controller.state().search.loading);
        settle(&mut controller, &mut rx).await;

        let search = &controller.state().search;
        assert!(!search.loading);
        assert_eq!(search.results, Some(found(&["a", "b"], 2)));
        assert_eq!(search.active_query.as_ref().unwrap().keyword, "TCK 141");
        assert_eq!(controller.state().api_status, ApiStatus::Live);
        assert_eq!(source.search_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_blank_search_is_ignored() {
        let (source, mut controller, mut rx) = setup(ApiStatus::Live);
        controller.dispatch(Action::Search(Some("bosanma".into())));
        settle(&mut controller, &mut rx).await;
        let before = controller.state().search.results.clone();

        controller.dispatch(Action::Search(Some("   ".into())));
        tokio::task::yield_now().await;

        assert_eq!(source.search_calls.load(Ordering::SeqCst), 1);
        assert!(rx.try_recv().is_err());
        assert!(!controller.state().search.loading);
        assert_eq!(controller.state().search.results, before);
        assert!(controller.state().notice.is_none());
    }

    #[tokio::test]
    async fn test_api_error_shown_without_decisions() {
        let (source, mut controller, mut rx) = setup(ApiStatus::Live);
        let gate = source.gate_search("x");
        controller.dispatch(Action::Search(Some("x".into())));
        gate.send(SearchResult::Rejected { error: "X".into() }).unwrap();
        settle(&mut controller, &mut rx).await;

        let results = controller.state().search.results.as_ref().unwrap();
        assert_eq!(results.error(), Some("X"));
        assert!(results.decisions().is_empty());
    }

    #[tokio::test]
    async fn test_connection_failure_keeps_offline() {
        let (source, mut controller, mut rx) = setup(ApiStatus::Offline);
        controller.start();
        settle(&mut controller, &mut rx).await;

        let gate = source.gate_search("x");
        controller.dispatch(Action::Search(Some("x".into())));
        gate.send(SearchResult::Unreachable { error: "down".into() }).unwrap();
        settle(&mut controller, &mut rx).await;

        assert_eq!(controller.state().api_status, ApiStatus::Offline);
    }

    #[tokio::test]
    async fn test_stale_search_discarded() {
        let (source, mut controller, mut rx) = setup(ApiStatus::Live);
        let first = source.gate_search("eski");
        let second = source.gate_search("yeni");

        controller.dispatch(Action::Search(Some("eski".into())));
        controller.dispatch(Action::Search(Some("yeni".into())));

        second.send(found(&["yeni"], 1)).unwrap();
        settle(&mut controller, &mut rx).await;
        first.send(found(&["eski"], 1)).unwrap();
        settle(&mut controller, &mut rx).await;

        assert_eq!(controller.state().search.results, Some(found(&["yeni"], 1)));
        assert!(!controller.state().search.loading);
    }

    #[tokio::test]
    async fn test_last_selected_document_wins() {
        let (source, mut controller, mut rx) = setup(ApiStatus::Live);
        controller.dispatch(Action::Search(Some("TCK 86".into())));
        settle(&mut controller, &mut rx).await;

        let doc_a = source.gate_document("a");
        let doc_b = source.gate_document("b");
        controller.dispatch(Action::OpenDecision(1));
        assert_eq!(controller.state().search.document, Some(DocumentContent::Loading));
        controller.dispatch(Action::OpenDecision(2));

        // b resolves first, then the superseded a arrives late.
        doc_b.send(DocumentContent::Ready("B".into())).unwrap();
        settle(&mut controller, &mut rx).await;
        doc_a.send(DocumentContent::Ready("A".into())).unwrap();
        settle(&mut controller, &mut rx).await;

        let search = &controller.state().search;
        assert_eq!(search.selected_doc.as_deref(), Some("b"));
        assert_eq!(search.document, Some(DocumentContent::Ready("B".into())));
    }

    #[tokio::test]
    async fn test_new_search_clears_document() {
        let (source, mut controller, mut rx) = setup(ApiStatus::Live);
        controller.dispatch(Action::Search(Some("TCK 86".into())));
        settle(&mut controller, &mut rx).await;

        let doc_a = source.gate_document("a");
        controller.dispatch(Action::OpenDecision(1));
        controller.dispatch(Action::Search(Some("icra itiraz".into())));
        assert!(controller.state().search.selected_doc.is_none());
        assert!(controller.state().search.document.is_none());

        doc_a.send(DocumentContent::Ready("A".into())).unwrap();
        // Two completions arrive: the new search and the stale document.
        settle(&mut controller, &mut rx).await;
        settle(&mut controller, &mut rx).await;

        assert!(controller.state().search.document.is_none());
        assert!(controller.state().search.results.is_some());
    }

    #[tokio::test]
    async fn test_open_missing_decision() {
        let (_, mut controller, _rx) = setup(ApiStatus::Live);
        controller.dispatch(Action::OpenDecision(3));
        assert!(controller.state().search.document.is_none());
        assert!(controller.state().notice.is_some());
    }

    #[tokio::test]
    async fn test_paging() {
        let (source, mut controller, mut rx) = setup(ApiStatus::Live);
        let gate = source.gate_search("TCK 141");
        controller.dispatch(Action::SetCourt(Court::Istinaf));
        controller.dispatch(Action::Search(Some("TCK 141".into())));
        gate.send(found(&["a"], 25)).unwrap();
        settle(&mut controller, &mut rx).await;

        controller.dispatch(Action::PrevPage);
        assert_eq!(controller.state().notice.as_deref(), Some("İlk sayfadasınız"));

        controller.dispatch(Action::NextPage);
        let query = controller.state().search.active_query.clone().unwrap();
        assert_eq!(query.page, 2);
        assert_eq!(query.court, Court::Istinaf);
        settle(&mut controller, &mut rx).await;
        assert_eq!(source.search_calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_last_page() {
        let (_, mut controller, mut rx) = setup(ApiStatus::Live);
        controller.dispatch(Action::Search(Some("bosanma".into())));
        settle(&mut controller, &mut rx).await;

        controller.dispatch(Action::NextPage);
        assert_eq!(controller.state().notice.as_deref(), Some("Son sayfadasınız"));
        assert_eq!(controller.state().search.active_query.as_ref().unwrap().page, 1);
    }

    #[tokio::test]
    async fn test_paging_waits_for_pending_search() {
        let (source, mut controller, mut rx) = setup(ApiStatus::Live);
        let gate = source.gate_search("TCK 141");
        controller.dispatch(Action::Search(Some("TCK 141".into())));

        controller.dispatch(Action::NextPage);
        assert_eq!(
            controller.state().notice.as_deref(),
            Some("Arama sürüyor, lütfen bekleyin")
        );
        assert_eq!(controller.state().search.active_query.as_ref().unwrap().page, 1);
        assert!(controller.state().search.loading);

        gate.send(found(&["a"], 25)).unwrap();
        settle(&mut controller, &mut rx).await;
        assert_eq!(source.search_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_tabs_keep_state() {
        let (_, mut controller, _rx) = setup(ApiStatus::Live);
        controller.dispatch(Action::UseExample(3));
        controller.dispatch(Action::SwitchTab(Tab::Penalty));
        controller.dispatch(Action::SetBaseMonths(30));
        controller.dispatch(Action::ToggleRule("tahrik"));
        controller.dispatch(Action::SwitchTab(Tab::Interest));
        controller.dispatch(Action::SetDays(365));
        controller.dispatch(Action::SwitchTab(Tab::Search));

        let state = controller.state();
        assert_eq!(state.tab, Tab::Search);
        assert_eq!(state.search.input, "trafik kazasi");
        assert_eq!(state.penalty.base_months, 30);
        assert_eq!(state.penalty.outcome().months, 22.5);
        assert_eq!(state.interest.days, 365);
    }

    #[tokio::test]
    async fn test_base_months_clamped() {
        let (_, mut controller, _rx) = setup(ApiStatus::Live);
        controller.dispatch(Action::SetBaseMonths(0));
        assert_eq!(controller.state().penalty.base_months, 1);
        controller.dispatch(Action::SetBaseMonths(999));
        assert_eq!(controller.state().penalty.base_months, 240);
    }

    #[tokio::test]
    async fn test_close_document_drops_pending() {
        let (source, mut controller, mut rx) = setup(ApiStatus::Live);
        controller.dispatch(Action::Search(Some("TCK 86".into())));
        settle(&mut controller, &mut rx).await;

        let doc_a = source.gate_document("a");
        controller.dispatch(Action::OpenDecision(1));
        controller.dispatch(Action::CloseDocument);
        doc_a.send(DocumentContent::Ready("A".into())).unwrap();
        settle(&mut controller, &mut rx).await;

        assert!(controller.state().search.document.is_none());
    }

    #[test]
    fn test_request_seq() {
        let mut seq = RequestSeq::default();
        let first = seq.issue();
        assert!(seq.is_current(first));
        let second = seq.issue();
        assert!(!seq.is_current(first));
        assert!(seq.is_current(second));
    }
}
