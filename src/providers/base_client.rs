use crate::core::error::ChatError;
use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

const POLICY_VIOLATION_CODE: &str = "content_policy_violation";

#[derive(Clone)]
pub struct BaseApiClient {
    http: Client,
    endpoint: String,
    api_key: String,
}

impl BaseApiClient {
    pub fn new(endpoint: String, api_key: String) -> Self {
        Self {
            http: Client::new(),
            endpoint: endpoint.trim_end_matches('/').to_string(),
            api_key,
        }
    }

    pub async fn send_request<T: Serialize + ?Sized>(
        &self,
        path: &str,
        payload: &T,
    ) -> Result<Response, ChatError> {
        let url = format!("{}/{}", self.endpoint, path);

        let response = self
            .http
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(payload)
            .send()
            .await?;
        Ok(response)
    }

    /// POSTs `payload` and decodes a successful JSON body; error statuses
    /// are turned into a classified `ChatError`.
    pub async fn post_json<T, R>(&self, path: &str, payload: &T) -> Result<R, ChatError>
    where
        T: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let response = self.send_request(path, payload).await?;
        let status = response.status();
        let response_body = response.text().await?;

        if !status.is_success() {
            return Err(classify_error(status, &response_body));
        }

        Ok(serde_json::from_str(&response_body)?)
    }
}

#[derive(Deserialize)]
struct ErrorEnvelope {
    error: ErrorDetail,
}

#[derive(Deserialize)]
struct ErrorDetail {
    #[serde(default)]
    message: String,
    #[serde(default, rename = "type")]
    kind: Option<String>,
    #[serde(default)]
    code: Option<String>,
}

pub fn classify_error(status: StatusCode, body: &str) -> ChatError {
    let Ok(envelope) = serde_json::from_str::<ErrorEnvelope>(body) else {
        return ChatError::Api(format!("{}: {}", status, body.trim()));
    };
    let detail = envelope.error;

    let is_policy = [detail.code.as_deref(), detail.kind.as_deref()]
        .into_iter()
        .flatten()
        .any(|v| v == POLICY_VIOLATION_CODE);

    if is_policy {
        ChatError::PolicyViolation(detail.message)
    } else {
        ChatError::Api(format!("{}: {}", status, detail.message))
    }
}
