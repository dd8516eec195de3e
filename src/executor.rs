use std::{fmt, sync::Arc};

use serde::de::DeserializeOwned;
use tokio_util::sync::CancellationToken;

use crate::{
    decode::{decode_json, DecodeOptions},
    policy::{BoxFuture, BufferedResponse, ResiliencePolicy, RetryTimeoutPolicy},
    ClientError, ClientOptions, Result,
};

/// Runs request invocations under a [`ResiliencePolicy`] and decodes the
/// final response.
///
/// An invocation is any `Fn(&reqwest::Client) -> reqwest::RequestBuilder`.
/// It is called once per attempt, so it must be safe to call repeatedly.
#[derive(Clone)]
pub struct ResilientExecutor {
    http: reqwest::Client,
    policy: Arc<dyn ResiliencePolicy>,
    decode: DecodeOptions,
}

impl fmt::Debug for ResilientExecutor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResilientExecutor")
            .field("policy", &self.policy)
            .field("decode", &self.decode)
            .finish()
    }
}

impl ResilientExecutor {
    /// Creates an executor whose policy is built from `opts`.
    pub fn new(http: reqwest::Client, opts: &ClientOptions) -> Self {
        Self::with_policy(http, Arc::new(RetryTimeoutPolicy::from_options(opts)))
    }

    /// Creates an executor around a caller-supplied policy.
    pub fn with_policy(http: reqwest::Client, policy: Arc<dyn ResiliencePolicy>) -> Self {
        Self {
            http,
            policy,
            decode: DecodeOptions::default(),
        }
    }

    pub fn with_decode_options(mut self, decode: DecodeOptions) -> Self {
        self.decode = decode;
        self
    }

    pub fn policy(&self) -> &Arc<dyn ResiliencePolicy> {
        &self.policy
    }

    pub fn decode_options(&self) -> DecodeOptions {
        self.decode
    }

    pub fn http(&self) -> &reqwest::Client {
        &self.http
    }

    /// Runs `invocation` and decodes the JSON body into `T`.
    pub async fn execute_json<T, F>(&self, invocation: F) -> Result<T>
    where
        T: DeserializeOwned,
        F: Fn(&reqwest::Client) -> reqwest::RequestBuilder + Send + Sync,
    {
        let response = self.run(&invocation, None).await?;
        decode_json(&response.body, self.decode)
    }

    /// Like [`execute_json`](Self::execute_json), abandoning all work once
    /// `cancel` fires.
    pub async fn execute_json_with_cancel<T, F>(
        &self,
        invocation: F,
        cancel: &CancellationToken,
    ) -> Result<T>
    where
        T: DeserializeOwned,
        F: Fn(&reqwest::Client) -> reqwest::RequestBuilder + Send + Sync,
    {
        let response = self.run(&invocation, Some(cancel)).await?;
        decode_json(&response.body, self.decode)
    }

    /// Runs `invocation` and discards the body.
    pub async fn execute<F>(&self, invocation: F) -> Result<()>
    where
        F: Fn(&reqwest::Client) -> reqwest::RequestBuilder + Send + Sync,
    {
        self.run(&invocation, None).await.map(drop)
    }

    pub async fn execute_with_cancel<F>(&self, invocation: F, cancel: &CancellationToken) -> Result<()>
    where
        F: Fn(&reqwest::Client) -> reqwest::RequestBuilder + Send + Sync,
    {
        self.run(&invocation, Some(cancel)).await.map(drop)
    }

    async fn run<F>(&self, invocation: &F, cancel: Option<&CancellationToken>) -> Result<BufferedResponse>
    where
        F: Fn(&reqwest::Client) -> reqwest::RequestBuilder + Send + Sync,
    {
        let http = &self.http;
        let attempt = move || -> BoxFuture<'static, Result<BufferedResponse>> {
            Box::pin(send_checked(invocation(http)))
        };
        self.policy.execute(&attempt, cancel).await
    }

}

/// Sends one attempt and reads its body to the end, so the policy's timeout
/// and cancellation cover the whole exchange. A non-success status becomes
/// [`ClientError::Http`].
async fn send_checked(request: reqwest::RequestBuilder) -> Result<BufferedResponse> {
    let response = request.send().await.map_err(ClientError::Transport)?;
    let status = response.status();
    let body = response.text().await.map_err(ClientError::Transport)?;
    if !status.is_success() {
        return Err(ClientError::Http {
            status: status.as_u16(),
            body,
        });
    }

    Ok(BufferedResponse {
        status: status.as_u16(),
        body,
    })
}
