use async_trait::async_trait;
use chrono::{DateTime, Utc};
use minutes::errors::{ExtractError, PromptError, StoreError};
use minutes::extract::ContentExtractor;
use minutes::providers::ai::{AiProvider, GenerationOptions};
use minutes::store::DocumentStore;
use minutes::types::{AnnotationBlock, ExtractedContent, NewRecord, PageStatus, TargetDocument};
use std::collections::{HashMap, HashSet, VecDeque};
use std::fmt::Debug;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

// --- Mock AI Provider ---

/// A scripted model. Responses are served in the order they were queued; an
/// empty queue is an API error.
#[derive(Clone, Debug, Default)]
pub struct MockAiProvider {
    responses: Arc<Mutex<VecDeque<Result<Option<String>, String>>>>,
    calls: Arc<Mutex<Vec<(String, String, GenerationOptions)>>>,
}

impl MockAiProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a response with content.
    pub fn add_response(&self, response: &str) {
        self.responses
            .lock()
            .unwrap()
            .push_back(Ok(Some(response.to_string())));
    }

    /// Queues a response with no content.
    pub fn add_empty_response(&self) {
        self.responses.lock().unwrap().push_back(Ok(None));
    }

    /// Queues a provider error.
    pub fn add_error(&self, message: &str) {
        self.responses
            .lock()
            .unwrap()
            .push_back(Err(message.to_string()));
    }

    /// Retrieves the recorded `(system, user, options)` calls for assertion.
    pub fn get_calls(&self) -> Vec<(String, String, GenerationOptions)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl AiProvider for MockAiProvider {
    async fn generate(
        &self,
        system_prompt: &str,
        user_prompt: &str,
        options: &GenerationOptions,
    ) -> Result<Option<String>, PromptError> {
        self.calls.lock().unwrap().push((
            system_prompt.to_string(),
            user_prompt.to_string(),
            *options,
        ));

        match self.responses.lock().unwrap().pop_front() {
            Some(Ok(response)) => Ok(response),
            Some(Err(message)) => Err(PromptError::AiApi(message)),
            None => Err(PromptError::AiApi(
                "MockAiProvider: no response programmed".to_string(),
            )),
        }
    }
}

// --- In-Memory Document Store ---

#[derive(Debug, Default)]
struct StoreState {
    documents: Vec<TargetDocument>,
    status_history: HashMap<String, Vec<PageStatus>>,
    records: Vec<(String, NewRecord)>,
    appended: HashMap<String, Vec<AnnotationBlock>>,
    failing_record_titles: HashSet<String>,
    failing_status_writes: HashSet<(String, PageStatus)>,
    fail_queries: usize,
    fail_appends: bool,
    next_record_id: usize,
}

/// A [`DocumentStore`] backed by memory, with failure injection.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    state: Arc<Mutex<StoreState>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_document(&self, id: &str, title: &str, status: PageStatus) {
        self.add_document_edited_at(id, title, status, Utc::now());
    }

    pub fn add_document_edited_at(
        &self,
        id: &str,
        title: &str,
        status: PageStatus,
        last_edited: DateTime<Utc>,
    ) {
        self.state.lock().unwrap().documents.push(TargetDocument {
            id: id.to_string(),
            url: format!("https://example.test/{id}"),
            title: title.to_string(),
            status: Some(status),
            last_edited: Some(last_edited),
        });
    }

    /// Changes a status without recording it in the history, as another
    /// writer would.
    pub fn set_status_externally(&self, id: &str, status: PageStatus) {
        let mut state = self.state.lock().unwrap();
        if let Some(doc) = state.documents.iter_mut().find(|d| d.id == id) {
            doc.status = Some(status);
        }
    }

    pub fn status_of(&self, id: &str) -> Option<PageStatus> {
        let state = self.state.lock().unwrap();
        state
            .documents
            .iter()
            .find(|d| d.id == id)
            .and_then(|d| d.status)
    }

    /// Every status written through the store for `id`, in order.
    pub fn status_history(&self, id: &str) -> Vec<PageStatus> {
        let state = self.state.lock().unwrap();
        state.status_history.get(id).cloned().unwrap_or_default()
    }

    pub fn created_records(&self) -> Vec<(String, NewRecord)> {
        self.state.lock().unwrap().records.clone()
    }

    pub fn appended_blocks(&self, id: &str) -> Vec<AnnotationBlock> {
        let state = self.state.lock().unwrap();
        state.appended.get(id).cloned().unwrap_or_default()
    }

    /// Makes `create_record` fail for records with this title.
    pub fn fail_record_titled(&self, title: &str) {
        self.state
            .lock()
            .unwrap()
            .failing_record_titles
            .insert(title.to_string());
    }

    pub fn fail_status_write(&self, id: &str, status: PageStatus) {
        self.state
            .lock()
            .unwrap()
            .failing_status_writes
            .insert((id.to_string(), status));
    }

    /// Makes the next `count` calls to `query_by_status` fail.
    pub fn fail_next_queries(&self, count: usize) {
        self.state.lock().unwrap().fail_queries = count;
    }

    pub fn fail_appends(&self) {
        self.state.lock().unwrap().fail_appends = true;
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn query_by_status(
        &self,
        status: PageStatus,
    ) -> Result<Vec<TargetDocument>, StoreError> {
        let mut state = self.state.lock().unwrap();
        if state.fail_queries > 0 {
            state.fail_queries -= 1;
            return Err(StoreError::Request("connection refused".to_string()));
        }
        Ok(state
            .documents
            .iter()
            .filter(|d| d.status == Some(status))
            .cloned()
            .collect())
    }

    async fn get_document(&self, document_id: &str) -> Result<TargetDocument, StoreError> {
        let state = self.state.lock().unwrap();
        state
            .documents
            .iter()
            .find(|d| d.id == document_id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(document_id.to_string()))
    }

    async fn update_status(
        &self,
        document_id: &str,
        status: PageStatus,
    ) -> Result<(), StoreError> {
        let mut state = self.state.lock().unwrap();
        if state
            .failing_status_writes
            .contains(&(document_id.to_string(), status))
        {
            return Err(StoreError::Api {
                status: 500,
                body: "status write rejected".to_string(),
            });
        }
        let doc = state
            .documents
            .iter_mut()
            .find(|d| d.id == document_id)
            .ok_or_else(|| StoreError::NotFound(document_id.to_string()))?;
        doc.status = Some(status);
        doc.last_edited = Some(Utc::now());
        state
            .status_history
            .entry(document_id.to_string())
            .or_default()
            .push(status);
        Ok(())
    }

    async fn create_record(&self, record: &NewRecord) -> Result<String, StoreError> {
        let mut state = self.state.lock().unwrap();
        if state.failing_record_titles.contains(&record.title) {
            return Err(StoreError::Api {
                status: 400,
                body: format!("cannot create '{}'", record.title),
            });
        }
        state.next_record_id += 1;
        let id = format!("record-{}", state.next_record_id);
        state.records.push((id.clone(), record.clone()));
        Ok(id)
    }

    async fn append_blocks(
        &self,
        document_id: &str,
        blocks: &[AnnotationBlock],
    ) -> Result<(), StoreError> {
        let mut state = self.state.lock().unwrap();
        if state.fail_appends {
            return Err(StoreError::Api {
                status: 502,
                body: "append rejected".to_string(),
            });
        }
        state
            .appended
            .entry(document_id.to_string())
            .or_default()
            .extend_from_slice(blocks);
        Ok(())
    }
}

// --- Scripted Extractor ---

/// A [`ContentExtractor`] that replays queued results. When one result is
/// left it is repeated for every further call.
#[derive(Clone, Debug)]
pub struct ScriptedExtractor {
    results: Arc<Mutex<VecDeque<Result<ExtractedContent, ExtractError>>>>,
    calls: Arc<AtomicUsize>,
}

impl ScriptedExtractor {
    pub fn new(results: Vec<Result<ExtractedContent, ExtractError>>) -> Self {
        Self {
            results: Arc::new(Mutex::new(results.into())),
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn returning(text: &str, marker_found: bool) -> Self {
        Self::new(vec![Ok(content(text, marker_found))])
    }

    pub fn failing(error: ExtractError) -> Self {
        Self::new(vec![Err(error)])
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ContentExtractor for ScriptedExtractor {
    async fn extract(&self, _document_id: &str) -> Result<ExtractedContent, ExtractError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let mut results = self.results.lock().unwrap();
        let next = if results.len() > 1 {
            results.pop_front()
        } else {
            results.front().cloned()
        };
        next.unwrap_or_else(|| Err(ExtractError::Api("no result scripted".to_string())))
    }
}

pub fn content(text: &str, marker_found: bool) -> ExtractedContent {
    ExtractedContent {
        text: text.to_string(),
        marker_found,
    }
}
