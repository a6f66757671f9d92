//! Learning backend boundary.
//!
//! The engine prepares a [`LearningRequest`] per feedback entry; submitting
//! it is modeled as an injected capability so tests substitute a no-op or
//! failing stub. Submission is fire and forget: local confidence adjustments
//! and learned-principle synthesis happen before the request leaves the
//! process and are never rolled back on remote failure.

use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex};

use serde::{Deserialize, Serialize};
use tokio::task::JoinHandle;

use crate::error::LearningError;
use crate::principles::engine::{ConstructionPrinciple, PrincipleFeedback, PrinciplesEngine};

/// Context shipped alongside one feedback entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LearningContext {
    pub principles: Vec<ConstructionPrinciple>,
    pub recent_history: Vec<PrincipleFeedback>,
}

/// The single request shape the backend accepts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LearningRequest {
    /// Always `"construction_principle"`
    #[serde(rename = "type")]
    pub kind: String,
    pub feedback: PrincipleFeedback,
    pub context: LearningContext,
}

impl LearningRequest {
    pub fn new(feedback: PrincipleFeedback, context: LearningContext) -> Self {
        Self {
            kind: "construction_principle".to_string(),
            feedback,
            context,
        }
    }
}

/// Optional backend response, merged into the engine when present.
/// Field names are camelCase on the wire.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LearningResponse {
    #[serde(default)]
    pub updated_principles: Option<Vec<ConstructionPrinciple>>,
    #[serde(default)]
    pub new_principles: Option<Vec<ConstructionPrinciple>>,
}

pub type SubmitFuture = Pin<Box<dyn Future<Output = Result<LearningResponse, LearningError>> + Send>>;

/// Transport for learning submissions. Object safe so engines can hold any
/// backend behind `Arc<dyn LearningClient>`.
pub trait LearningClient: Send + Sync {
    fn submit(&self, request: LearningRequest) -> SubmitFuture;
}

/// HTTP JSON client: POSTs the request to `{endpoint}` and decodes the
/// optional response body.
pub struct HttpLearningClient {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpLearningClient {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: endpoint.into(),
        }
    }
}

impl LearningClient for HttpLearningClient {
    fn submit(&self, request: LearningRequest) -> SubmitFuture {
        let client = self.client.clone();
        let endpoint = self.endpoint.clone();
        Box::pin(async move {
            let response = client.post(&endpoint).json(&request).send().await?;
            let status = response.status();
            if !status.is_success() {
                return Err(LearningError::Status {
                    status: status.as_u16(),
                });
            }
            response
                .json::<LearningResponse>()
                .await
                .map_err(|e| LearningError::Format(e.to_string()))
        })
    }
}

/// Client that drops every submission. For tests and offline use.
pub struct NoopLearningClient;

impl LearningClient for NoopLearningClient {
    fn submit(&self, _request: LearningRequest) -> SubmitFuture {
        Box::pin(async { Ok(LearningResponse::default()) })
    }
}

/// Detached submission task. On success the response merges into the engine
/// under the lock; on failure a warning is logged and the response is
/// dropped. The caller may abandon the handle without corrupting the engine.
pub fn submit_feedback(
    engine: Arc<Mutex<PrinciplesEngine>>,
    client: Arc<dyn LearningClient>,
    request: LearningRequest,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        match client.submit(request).await {
            Ok(response) => {
                let mut guard = match engine.lock() {
                    Ok(guard) => guard,
                    Err(poisoned) => poisoned.into_inner(),
                };
                guard.merge_remote(response);
            }
            Err(err) => {
                eprintln!("Warning: learning submission failed: {err}");
            }
        }
    })
}
