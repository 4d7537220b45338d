use super::error::{Result, StorefrontError};
use super::request::StoreRequest;
use crate::log_internal;
use serde_json::Value;
use std::time::Duration;

/// Sends [`StoreRequest`]s somewhere and hands back what came back.
#[serenity::async_trait]
pub trait Transport: Send + Sync {
    /// Send the request and decode the response body as JSON, whatever the HTTP status.
    async fn send(&self, request: &StoreRequest) -> Result<Value>;
    /// Send the request, follow redirects, and return the URL the chain ended on.
    async fn final_url(&self, request: &StoreRequest) -> Result<String>;
}

/// The real thing, over `reqwest`.
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { client })
    }

    fn prepare(&self, request: &StoreRequest) -> reqwest::RequestBuilder {
        let mut builder = self.client.request(request.method.clone(), &request.url);
        for (name, value) in &request.headers {
            builder = builder.header(*name, value);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }
        builder
    }
}

#[serenity::async_trait]
impl Transport for HttpTransport {
    async fn send(&self, request: &StoreRequest) -> Result<Value> {
        log_internal!("{} {}... ", request.method, request.url);
        let response = self.prepare(request).send().await?;
        let status = response.status();
        let body = response.bytes().await?;
        log_internal!("{} {}... {}", request.method, request.url, status);

        // The store reports refusals as JSON with a non-2xx status, so the status is not an error
        // by itself.
        serde_json::from_slice(&body).map_err(|e| {
            StorefrontError::UnexpectedResponse(format!("{} returned invalid JSON: {}", status, e))
        })
    }

    async fn final_url(&self, request: &StoreRequest) -> Result<String> {
        log_internal!("Following {}... ", request.url);
        let response = self.prepare(request).send().await?;
        let url = response.url().to_string();
        log_internal!("Following {}... landed on {}", request.url, url);
        Ok(url)
    }
}

#[cfg(test)]
pub(crate) mod fake {
    use super::*;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    /// Replays canned responses in order and remembers every request it was given.
    #[derive(Default)]
    pub struct RecordingTransport {
        responses: Mutex<VecDeque<Value>>,
        urls: Mutex<VecDeque<String>>,
        pub sent: Mutex<Vec<StoreRequest>>,
    }

    impl RecordingTransport {
        pub fn replying(responses: impl IntoIterator<Item = Value>) -> Self {
            Self {
                responses: Mutex::new(responses.into_iter().collect()),
                ..Default::default()
            }
        }

        pub fn redirecting_to(url: &str) -> Self {
            Self {
                urls: Mutex::new(VecDeque::from([url.to_owned()])),
                ..Default::default()
            }
        }

        pub fn sent(&self) -> Vec<StoreRequest> {
            self.sent.lock().unwrap().clone()
        }
    }

    #[serenity::async_trait]
    impl Transport for RecordingTransport {
        async fn send(&self, request: &StoreRequest) -> Result<Value> {
            self.sent.lock().unwrap().push(request.clone());
            self.responses.lock().unwrap().pop_front().ok_or_else(|| {
                StorefrontError::UnexpectedResponse("no canned response left".to_owned())
            })
        }

        async fn final_url(&self, request: &StoreRequest) -> Result<String> {
            self.sent.lock().unwrap().push(request.clone());
            self.urls.lock().unwrap().pop_front().ok_or_else(|| {
                StorefrontError::UnexpectedResponse("no canned redirect left".to_owned())
            })
        }
    }
}
