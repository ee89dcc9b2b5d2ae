//! Single-request completion client with failure classification.
//!
//! One call to [`CompletionClient::send`] is one exchange: the tentative
//! user turn goes in, the whole transcript goes over the wire, and either
//! a (user, assistant) pair is committed or the transcript is rolled back
//! to its pre-call state. The transaction guard holds that invariant on
//! every failure path at once.

use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::chat::{Transcript, Turn};
use crate::paths;
use crate::ui::Console;

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: &'a [Turn],
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    usage: Usage,
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Usage {
    total_tokens: u64,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: Turn,
}

// Validation errors carry a server-supplied message that is surfaced
// verbatim to the user.
#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    error: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    message: String,
}

/// How one exchange ended.
#[derive(Debug)]
pub enum SendOutcome {
    /// The assistant turn, already appended to the transcript. An empty
    /// content string is a valid reply and is kept as-is.
    Reply(Turn),
    /// Recoverable failure: reported to the console, transcript reverted.
    Failure,
    /// Ctrl+C while the request was in flight: transcript reverted.
    Aborted,
    /// Unclassified failure: transcript reverted, emergency backup
    /// written. The session must terminate.
    Fatal,
}

/// Issues conversational requests against one fixed endpoint and model.
pub struct CompletionClient {
    http: Client,
    endpoint: String,
    api_key: String,
    model: String,
}

impl CompletionClient {
    pub fn new(endpoint: String, api_key: String, model: String) -> Self {
        Self {
            http: Client::new(),
            endpoint,
            api_key,
            model,
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Sends `message` with the full transcript as context.
    ///
    /// On success the user and assistant turns are committed and the
    /// usage counters updated. On any failure the transcript is restored
    /// exactly to its pre-call state; see [`SendOutcome`] for how each
    /// class is reported.
    pub async fn send(
        &self,
        transcript: &mut Transcript,
        message: &str,
        timeout_secs: f64,
        console: &dyn Console,
    ) -> SendOutcome {
        let mut txn = transcript.begin();
        txn.push(Turn::user(message));

        let request = self
            .http
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .timeout(Duration::from_secs_f64(timeout_secs))
            .json(&ChatCompletionRequest {
                model: &self.model,
                messages: txn.turns(),
            });

        let result = tokio::select! {
            result = request.send() => result,
            _ = tokio::signal::ctrl_c() => {
                console.notice("Aborted.");
                tracing::info!("request aborted by user");
                return SendOutcome::Aborted;
            }
        };

        let response = match result {
            Ok(response) => response,
            Err(e) if e.is_timeout() => {
                console.error(&format!(
                    "API request timed out ({timeout_secs}s). \
                     You can retry or increase the timeout with /timeout."
                ));
                tracing::error!(timeout_secs, "request timed out");
                return SendOutcome::Failure;
            }
            Err(e) => {
                console.error(&e.to_string());
                tracing::error!(error = %e, "request failed");
                return SendOutcome::Failure;
            }
        };

        let status = response.status();
        if status == StatusCode::BAD_REQUEST {
            // The server explains what was wrong with the request; pass
            // its message through verbatim.
            let detail = match response.json::<ApiErrorBody>().await {
                Ok(body) => body.error.message,
                Err(_) => format!("API request failed with status {status}"),
            };
            console.error(&detail);
            tracing::error!(%status, detail = %detail, "request rejected");
            return SendOutcome::Failure;
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            console.error(&format!("API request failed with status {status}: {body}"));
            tracing::error!(%status, body = %body, "request failed");
            return SendOutcome::Failure;
        }

        match Self::extract_reply(response).await {
            Ok((usage, reply)) => {
                txn.record_usage(usage);
                txn.push(reply.clone());
                txn.commit();
                tracing::debug!(tokens = usage, "exchange succeeded");
                SendOutcome::Reply(reply)
            }
            Err(e) => {
                // An unknown failure mode must not silently continue with
                // corrupted assumptions: snapshot what we have and stop.
                console.error(&format!("{e}. Check the log for more information."));
                tracing::error!(error = %e, "unclassified completion failure");
                drop(txn);
                emergency_backup(transcript, console);
                SendOutcome::Fatal
            }
        }
    }

    async fn extract_reply(response: reqwest::Response) -> Result<(u64, Turn), anyhow::Error> {
        let payload = response
            .json::<ChatCompletionResponse>()
            .await
            .map_err(|e| anyhow::anyhow!("Unexpected response from the API: {e}"))?;
        let choice = payload
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| anyhow::anyhow!("Response contained no choices"))?;
        Ok((payload.usage.total_tokens, choice.message))
    }
}

/// Best-effort snapshot of the committed history before a fatal exit.
///
/// A failed backup is reported, never masked: the user should know the
/// snapshot did not land before the session dies.
fn emergency_backup(transcript: &Transcript, console: &dyn Console) {
    let stamp = chrono::Local::now().format("%Y-%m-%d_%H-%M-%S");
    let path = paths::data_dir().join(format!("chat_history_backup_{stamp}.json"));
    match transcript.save_to(&path) {
        Ok(()) => {
            console.notice(&format!("Chat history saved to: {}", path.display()));
            tracing::info!(path = %path.display(), "emergency backup written");
        }
        Err(e) => {
            console.error(&format!("Failed to write emergency backup: {e:#}"));
            tracing::error!(error = %e, "emergency backup failed");
        }
    }
}
