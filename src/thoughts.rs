//! Optional flavor-text service
//!
//! Asks a backend for a short in-character thought for the overlay card.
//! Strictly cosmetic and fire-and-forget: any failure (offline, bad status,
//! unparseable body, missing window) degrades to the fixed fallback, and
//! nothing here ever touches gameplay state.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Emotion {
    Happy,
    Tired,
    Excited,
    Hungry,
    Philosophical,
    Scared,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DogThought {
    pub text: String,
    pub emotion: Emotion,
}

impl DogThought {
    /// Shown whenever the generator is unavailable
    pub fn fallback() -> Self {
        Self {
            text: "Is that a banana??".to_string(),
            emotion: Emotion::Excited,
        }
    }
}

/// One-line context string for the generator
pub fn context_line(score: u32, lives: f32, combo: u32) -> String {
    format!("score {score}, lives {lives:.1}, combo {combo}")
}

#[cfg(target_arch = "wasm32")]
pub async fn generate_thought(context: &str) -> DogThought {
    match try_fetch(context).await {
        Ok(thought) => thought,
        Err(err) => {
            log::warn!("thought generator unavailable: {err:?}");
            DogThought::fallback()
        }
    }
}

#[cfg(target_arch = "wasm32")]
async fn try_fetch(context: &str) -> Result<DogThought, wasm_bindgen::JsValue> {
    use wasm_bindgen::{JsCast, JsValue};
    use wasm_bindgen_futures::JsFuture;
    use web_sys::{Headers, Request, RequestInit, RequestMode, Response};

    let body = serde_json::json!({ "context": context }).to_string();

    let headers = Headers::new()?;
    headers.set("Content-Type", "application/json")?;

    let opts = RequestInit::new();
    opts.set_method("POST");
    opts.set_mode(RequestMode::SameOrigin);
    opts.set_headers(headers.as_ref());
    opts.set_body(&JsValue::from_str(&body));

    let request = Request::new_with_str_and_init("/api/thought", &opts)?;
    let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
    let resp: Response = JsFuture::from(window.fetch_with_request(&request))
        .await?
        .dyn_into()?;
    if !resp.ok() {
        return Err(JsValue::from_str("bad status"));
    }
    let text = JsFuture::from(resp.text()?)
        .await?
        .as_string()
        .ok_or_else(|| JsValue::from_str("non-string body"))?;
    serde_json::from_str(&text).map_err(|err| JsValue::from_str(&err.to_string()))
}

/// Native builds have no generator; the fallback keeps the API total.
#[cfg(not(target_arch = "wasm32"))]
pub async fn generate_thought(_context: &str) -> DogThought {
    DogThought::fallback()
}
