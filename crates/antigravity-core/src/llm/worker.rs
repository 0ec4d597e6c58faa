//! Bounded completion worker pool.
//!
//! Each call runs on its own spawned task so a slow endpoint never blocks the
//! caller's executor thread, and a semaphore caps how many calls are in flight.
//! A call that outlives the configured timeout fails with
//! [`LlmError::Timeout`].

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Semaphore;

use antigravity_types::llm::{CompletionRequest, CompletionResponse, LlmError};

use super::provider::LlmProvider;
use crate::credential::pool::Credential;

pub const DEFAULT_MAX_CONCURRENT: usize = 4;
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

pub struct CompletionWorkers<P: LlmProvider> {
    provider: Arc<P>,
    permits: Arc<Semaphore>,
    timeout: Duration,
}

impl<P: LlmProvider + 'static> CompletionWorkers<P> {
    /// Create a pool; `max_concurrent` is clamped to at least 1.
    pub fn new(provider: P, max_concurrent: usize, timeout: Duration) -> Self {
        Self {
            provider: Arc::new(provider),
            permits: Arc::new(Semaphore::new(max_concurrent.max(1))),
            timeout,
        }
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }

    /// Run one completion on the pool and wait for its result.
    pub async fn complete(
        &self,
        credential: Arc<Credential>,
        request: CompletionRequest,
    ) -> Result<CompletionResponse, LlmError> {
        let permit = self
            .permits
            .clone()
            .acquire_owned()
            .await
            .map_err(|_| LlmError::Provider {
                status: None,
                message: "completion worker pool is closed".to_string(),
            })?;

        let provider = Arc::clone(&self.provider);
        let timeout = self.timeout;
        let handle = tokio::spawn(async move {
            let _permit = permit;
            match tokio::time::timeout(timeout, provider.complete(&credential, &request)).await {
                Ok(result) => result,
                Err(_) => Err(LlmError::Timeout {
                    after_ms: u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX),
                }),
            }
        });

        handle.await.map_err(|e| LlmError::Provider {
            status: None,
            message: format!("completion task failed: {e}"),
        })?
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::credential::pool::CredentialPool;
    use crate::llm::mock::ScriptedProvider;
    use antigravity_types::llm::{FailureKind, GenerationSettings, Message};
    use secrecy::SecretString;

    fn request() -> CompletionRequest {
        let settings = GenerationSettings::default();
        CompletionRequest {
            model: settings.model,
            messages: vec![Message::user("hi")],
            max_tokens: settings.max_tokens,
            temperature: settings.temperature,
        }
    }

    fn credential() -> Arc<Credential> {
        CredentialPool::new(vec![SecretString::from("k1")])
            .current()
            .unwrap()
    }

    #[tokio::test]
    async fn passes_through_result() {
        let workers = CompletionWorkers::new(
            ScriptedProvider::new(vec![Ok("xin chào".into())]),
            2,
            DEFAULT_TIMEOUT,
        );
        let response = workers.complete(credential(), request()).await.unwrap();
        assert_eq!(response.content, "xin chào");
        assert_eq!(workers.provider().credential_indices(), vec![0]);
    }

    #[tokio::test]
    async fn slow_call_times_out() {
        let workers = CompletionWorkers::new(
            ScriptedProvider::new(vec![]).with_delay(Duration::from_secs(5)),
            1,
            Duration::from_millis(50),
        );
        let err = workers.complete(credential(), request()).await.unwrap_err();
        assert_eq!(err.kind(), FailureKind::Timeout);
    }

    #[tokio::test]
    async fn concurrency_is_bounded() {
        let workers = Arc::new(CompletionWorkers::new(
            ScriptedProvider::new(vec![]).with_delay(Duration::from_millis(30)),
            2,
            DEFAULT_TIMEOUT,
        ));

        let mut handles = Vec::new();
        for _ in 0..6 {
            let workers = workers.clone();
            handles.push(tokio::spawn(async move {
                workers.complete(credential(), request()).await
            }));
        }
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        assert_eq!(workers.provider().call_count(), 6);
        assert!(workers.provider().peak_in_flight() <= 2);
    }
}
