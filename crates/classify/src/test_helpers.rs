//! Shared test helpers for classifier tests.

use async_trait::async_trait;
use groundcrew_core::LanguageModel;
use groundcrew_core::error::ModelError;
use std::sync::Mutex;

/// A mock model that returns a sequence of scripted completions.
///
/// Each call to `generate` returns the next completion in the queue.
/// Panics if more calls are made than completions provided.
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
