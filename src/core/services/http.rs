use serde::de::DeserializeOwned;
use serde::Deserialize;
use thiserror::Error;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;

/// Why a client-side fetch produced no data.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    /// The request never produced a response (offline, DNS, CORS, ...).
    #[error("network error: {0}")]
    Transport(String),
    /// The server answered with a non-2xx status.
    #[error("server responded {status}: {message}")]
    Upstream { status: u16, message: String },
    /// The response body was not the expected JSON.
    #[error("unexpected response: {0}")]
    Decode(String),
}

impl FetchError {
    /// True for 4xx responses, which retrying will not fix.
    pub fn is_client_error(&self) -> bool {
        matches!(self, FetchError::Upstream { status, .. } if (400..500).contains(status))
    }
}

#[derive(Deserialize)]
struct ErrorBody {
    error: String,
}

/// Picks the server's `{"error": ...}` message out of a failed response body.
pub fn upstream_error(status: u16, status_text: &str, body: &str) -> FetchError {
    let message = serde_json::from_str::<ErrorBody>(body)
        .map(|b| b.error)
        .unwrap_or_else(|_| {
            if status_text.is_empty() {
                format!("HTTP {status}")
            } else {
                status_text.to_string()
            }
        });
    FetchError::Upstream { status, message }
}

pub fn decode_json<T: DeserializeOwned>(body: &str) -> Result<T, FetchError> {
    serde_json::from_str(body).map_err(|e| FetchError::Decode(e.to_string()))
}

fn js_message(value: &JsValue) -> String {
    value
        .as_string()
        .or_else(|| js_sys::JSON::stringify(value).ok().map(String::from))
        .unwrap_or_else(|| "unknown error".to_string())
}

async fn response_text(response: &web_sys::Response) -> Result<String, FetchError> {
    let promise = response.text().map_err(|e| FetchError::Transport(js_message(&e)))?;
    let text = JsFuture::from(promise)
        .await
        .map_err(|e| FetchError::Transport(js_message(&e)))?;
    Ok(text.as_string().unwrap_or_default())
}

// Generic GET executor: non-2xx and transport failures both surface as errors
pub async fn get_json<T: DeserializeOwned>(url: &str) -> Result<T, FetchError> {
    let window = web_sys::window().ok_or_else(|| FetchError::Transport("no window".to_string()))?;
    let response = JsFuture::from(window.fetch_with_str(url))
        .await
        .map_err(|e| FetchError::Transport(js_message(&e)))?
        .dyn_into::<web_sys::Response>()
        .map_err(|_| FetchError::Transport("fetch did not return a Response".to_string()))?;

    let body = response_text(&response).await?;
    if !response.ok() {
        return Err(upstream_error(response.status(), &response.status_text(), &body));
    }
    decode_json(&body)
}
