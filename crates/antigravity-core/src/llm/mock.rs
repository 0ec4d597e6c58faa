//! Scripted provider for tests.

use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use antigravity_types::llm::{CompletionRequest, CompletionResponse, LlmError};

use super::provider::LlmProvider;
use crate::credential::pool::Credential;

/// Replays scripted outcomes in order, then answers `"ok"`.
#[derive(Default)]
pub struct ScriptedProvider {
    script: Mutex<VecDeque<Result<String, LlmError>>>,
    calls: Mutex<Vec<(usize, CompletionRequest)>>,
    delay: Option<Duration>,
    in_flight: AtomicUsize,
    peak_in_flight: AtomicUsize,
}

impl ScriptedProvider {
    pub fn new(script: Vec<Result<String, LlmError>>) -> Self {
        Self {
            script: Mutex::new(script.into()),
            ..Self::default()
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Credential index of every call, in order.
    pub fn credential_indices(&self) -> Vec<usize> {
        self.calls.lock().unwrap().iter().map(|(i, _)| *i).collect()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub fn last_request(&self) -> Option<CompletionRequest> {
        self.calls.lock().unwrap().last().map(|(_, r)| r.clone())
    }

    /// Every request received, in call order.
    pub fn requests(&self) -> Vec<CompletionRequest> {
        self.calls.lock().unwrap().iter().map(|(_, r)| r.clone()).collect()
    }

    pub fn peak_in_flight(&self) -> usize {
        self.peak_in_flight.load(Ordering::SeqCst)
    }
}

impl LlmProvider for ScriptedProvider {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn complete(
        &self,
        credential: &Credential,
        request: &CompletionRequest,
    ) -> Result<CompletionResponse, LlmError> {
        self.calls
            .lock()
            .unwrap()
            .push((credential.index(), request.clone()));
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak_in_flight.fetch_max(now, Ordering::SeqCst);

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        let next = self.script.lock().unwrap().pop_front();
        next.unwrap_or_else(|| Ok("ok".to_string()))
            .map(|content| CompletionResponse {
                content,
                model: request.model.clone(),
                usage: None,
            })
    }
}
