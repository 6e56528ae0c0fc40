//! Shared test helpers for pipeline tests.

use async_trait::async_trait;
use groundcrew_core::error::ModelError;
use groundcrew_core::{LanguageModel, SearchBackend};
use groundcrew_retrieval::Retriever;
use std::sync::{Arc, Mutex};

/// A mock model that returns a sequence of scripted completions.
pub struct ScriptedModel {
    completions: Mutex<Vec<String>>,
    call_count: Mutex<usize>,
}

impl ScriptedModel {
    pub fn new(completions: Vec<&str>) -> Self {
        Self {
            completions: Mutex::new(completions.into_iter().map(String::from).collect()),
            call_count: Mutex::new(0),
        }
    }

    pub fn single(completion: &str) -> Self {
        Self::new(vec![completion])
    }

    pub fn calls(&self) -> usize {
        *self.call_count.lock().unwrap()
    }
}

#[async_trait]
impl LanguageModel for ScriptedModel {
    fn name(&self) -> &str {
        "scripted_mock"
    }

    async fn generate(&self, _prompt: &str) -> Result<String, ModelError> {
        let mut count = self.call_count.lock().unwrap();
        let completions = self.completions.lock().unwrap();

        if *count >= completions.len() {
            panic!(
                "ScriptedModel: no more completions (call #{}, have {})",
                *count,
                completions.len()
            );
        }

        let completion = completions[*count].clone();
        *count += 1;
        Ok(completion)
    }
}

/// A mock model that always fails with a network error.
pub struct FailingModel;

#[async_trait]
impl LanguageModel for FailingModel {
    fn name(&self) -> &str {
        "failing_mock"
    }

    async fn generate(&self, _prompt: &str) -> Result<String, ModelError> {
        Err(ModelError::Network("connection refused".into()))
    }
}

/// A stub search backend that records queries.
pub struct RecordingBackend {
    reply: String,
    queries: Mutex<Vec<String>>,
}

impl RecordingBackend {
    pub fn new(reply: &str) -> Arc<Self> {
        Arc::new(Self {
            reply: reply.into(),
            queries: Mutex::new(Vec::new()),
        })
    }

    pub fn query_count(&self) -> usize {
        self.queries.lock().unwrap().len()
    }

    pub fn last_query(&self) -> Option<String> {
        self.queries.lock().unwrap().last().cloned()
    }
}

#[async_trait]
impl SearchBackend for RecordingBackend {
    fn name(&self) -> &str {
        "recording_stub"
    }

    async fn search(&self, query: &str) -> String {
        self.queries.lock().unwrap().push(query.to_string());
        self.reply.clone()
    }
}

/// A retriever backed by a single recording stub.
pub fn stub_retriever(backend: Arc<RecordingBackend>) -> Arc<Retriever> {
    Arc::new(Retriever::new(None, backend))
}
