//! End-to-end cascade tests: a real controller wired from real
//! components, with only the model and search backend mocked.

use async_trait::async_trait;
use groundcrew_config::AgentConfig;
use groundcrew_core::error::ModelError;
use groundcrew_core::prompt::PromptLibrary;
use groundcrew_core::{LanguageModel, SearchBackend};
use groundcrew_pipeline::build_controller;
use groundcrew_pipeline::deterministic::PIPELINE_FAILURE_REPLY;
use groundcrew_retrieval::Retriever;
use std::sync::{Arc, Mutex};

/// A model scripted with per-call results, including failures.
struct SequencedModel {
    results: Mutex<Vec<Result<String, ModelError>>>,
    call_count: Mutex<usize>,
}

impl SequencedModel {
    fn new(results: Vec<Result<String, ModelError>>) -> Arc<Self> {
        Arc::new(Self {
            results: Mutex::new(results),
            call_count: Mutex::new(0),
        })
    }

    fn calls(&self) -> usize {
        *self.call_count.lock().unwrap()
    }
}

#[async_trait]
impl LanguageModel for SequencedModel {
    fn name(&self) -> &str {
        "sequenced_mock"
    }

    async fn generate(&self, _prompt: &str) -> Result<String, ModelError> {
        let mut count = self.call_count.lock().unwrap();
        let results = self.results.lock().unwrap();

        if *count >= results.len() {
            panic!(
                "SequencedModel: no more results (call #{}, have {})",
                *count,
                results.len()
            );
        }

        let result = results[*count].clone();
        *count += 1;
        result
    }
}

/// A model that fails every call.
struct DeadModel;

#[async_trait]
impl LanguageModel for DeadModel {
    fn name(&self) -> &str {
        "dead_mock"
    }

    async fn generate(&self, _prompt: &str) -> Result<String, ModelError> {
        Err(ModelError::Network("backend is down".into()))
    }
}

/// A search backend that records queries.
struct RecordingBackend {
    reply: String,
    queries: Mutex<Vec<String>>,
}

impl RecordingBackend {
    fn new(reply: &str) -> Arc<Self> {
        Arc::new(Self {
            reply: reply.into(),
            queries: Mutex::new(Vec::new()),
        })
    }

    fn query_count(&self) -> usize {
        self.queries.lock().unwrap().len()
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

fn controller_with(
    model: Arc<dyn LanguageModel>,
    backend: Arc<RecordingBackend>,
) -> groundcrew_pipeline::FallbackController {
    build_controller(
        model,
        Arc::new(Retriever::new(None, backend)),
        Arc::new(PromptLibrary::builtin()),
        &AgentConfig::default(),
    )
}

#[tokio::test]
async fn autonomous_tier_answers_on_the_first_try() {
    let model = SequencedModel::new(vec![Ok(
        "Thought: I can answer directly.\nFinal Answer: Machine learning is the study of \
         algorithms that improve through experience."
            .to_string(),
    )]);
    let backend = RecordingBackend::new("unused");
    let controller = controller_with(model.clone(), backend.clone());

    let answer = controller.handle("What is machine learning?").await;
    assert!(answer.contains("improve through experience"));
    assert_eq!(model.calls(), 1);
    assert_eq!(backend.query_count(), 0);
}

#[tokio::test]
async fn maximum_iterations_response_falls_to_smart_pipeline() {
    // The autonomous tier's own output leaks a stopped-loop message;
    // the controller must reject it and run the deterministic pipeline,
    // which retrieves context and synthesizes.
    let model = SequencedModel::new(vec![
        Ok("Final Answer: Agent stopped due to maximum iterations.".to_string()),
        Ok("Machine learning is a field of AI that learns patterns from data.".to_string()),
    ]);
    let backend = RecordingBackend::new("From Wikipedia (Machine learning):\nML is a field of AI.");
    let controller = controller_with(model.clone(), backend.clone());

    let answer = controller.handle("What is machine learning?").await;
    assert_eq!(
        answer,
        "Machine learning is a field of AI that learns patterns from data."
    );
    assert_eq!(model.calls(), 2);
    // The smart pipeline retrieved once for the context-free question.
    assert_eq!(backend.query_count(), 1);
}

#[tokio::test]
async fn dead_model_still_yields_an_answer_string() {
    // Autonomous escalates its model failure; the smart pipeline
    // swallows its own and degrades to the generic apology, which the
    // ungated tier accepts. Nothing propagates to the caller.
    let backend = RecordingBackend::new("Some retrieved text.");
    let controller = controller_with(Arc::new(DeadModel), backend);

    let answer = controller.handle("What is machine learning?").await;
    assert_eq!(answer, PIPELINE_FAILURE_REPLY);
}
