//! CloudStack Client
//!
//! Builds signed API requests, injects the configured project scope into
//! every call, unwraps the per-command response envelope, and polls
//! asynchronous jobs to completion.

use super::http::ApiHttpClient;
use super::sign;
use crate::config::Config;
use anyhow::{anyhow, bail, Result};
use serde_json::Value;
use std::collections::BTreeMap;
use std::time::Duration;

/// Per-request HTTP timeout; the job-wait budget is configured separately
const HTTP_TIMEOUT: Duration = Duration::from_secs(60);

/// Poll interval while waiting on an asynchronous job
const JOB_POLL_INTERVAL: Duration = Duration::from_secs(2);

/// Main CloudStack client
#[derive(Clone)]
pub struct CloudStackClient {
    http: ApiHttpClient,
    api_url: String,
    api_key: String,
    secret_key: String,
    project_id: Option<String>,
    asyncblock: bool,
    job_budget: Duration,
}

impl CloudStackClient {
    /// Create a new client from validated configuration
    pub fn new(config: &Config) -> Result<Self> {
        config.validate()?;
        let http = ApiHttpClient::new(HTTP_TIMEOUT)?;

        Ok(Self {
            http,
            api_url: config.api_url.clone(),
            api_key: config.api_key.clone(),
            secret_key: config.secret_key.clone(),
            project_id: config.project_id.clone(),
            asyncblock: config.asyncblock,
            job_budget: Duration::from_secs(config.timeout_secs),
        })
    }

    /// Execute a named API command and return the response body with its
    /// envelope removed.
    ///
    /// When a project is configured its id is set on every call,
    /// overwriting any caller-supplied `projectid`. For asynchronous
    /// commands the call blocks until the job reaches a terminal state
    /// (unless `asyncblock` is off, in which case the job handle is
    /// returned as-is).
    pub async fn execute(
        &self,
        command: &str,
        params: &[(&str, &str)],
        is_async: bool,
    ) -> Result<Value> {
        let mut query: BTreeMap<String, String> = params
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        if let Some(ref project_id) = self.project_id {
            query.insert("projectid".to_string(), project_id.clone());
        }

        let response = self.call(command, &query).await?;
        if is_async && self.asyncblock {
            self.wait_for_job(&response).await
        } else {
            Ok(response)
        }
    }

    /// Issue one signed GET and unwrap the `<command>response` envelope
    async fn call(&self, command: &str, params: &BTreeMap<String, String>) -> Result<Value> {
        let url = self.build_url(command, params);
        let body = self.http.get(&url).await?;
        unwrap_envelope(command, body)
    }

    fn build_url(&self, command: &str, params: &BTreeMap<String, String>) -> String {
        let mut pairs: Vec<(String, String)> = params
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        pairs.push(("command".to_string(), command.to_string()));
        pairs.push(("apikey".to_string(), self.api_key.clone()));
        pairs.push(("response".to_string(), "json".to_string()));

        let query = sign::canonical_query(&pairs);
        let signature = sign::sign(&query, &self.secret_key);
        format!(
            "{}?{}&signature={}",
            self.api_url,
            query,
            urlencoding::encode(&signature)
        )
    }

    /// Poll `queryAsyncJobResult` until the job reaches a terminal state
    /// and return its `jobresult`. The caller never sees a pending job.
    async fn wait_for_job(&self, response: &Value) -> Result<Value> {
        let job_id = response
            .get("jobid")
            .and_then(|v| v.as_str())
            .ok_or_else(|| anyhow!("asynchronous response carries no jobid"))?
            .to_string();

        let deadline = tokio::time::Instant::now() + self.job_budget;
        loop {
            let params = BTreeMap::from([("jobid".to_string(), job_id.clone())]);
            let status = self.call("queryAsyncJobResult", &params).await?;

            match status.get("jobstatus").and_then(Value::as_i64).unwrap_or(0) {
                // 0: still in progress
                0 => {}
                // 1: completed successfully
                1 => return Ok(status.get("jobresult").cloned().unwrap_or(Value::Null)),
                // 2 (or anything else): failed
                _ => {
                    let text = status
                        .pointer("/jobresult/errortext")
                        .and_then(|v| v.as_str())
                        .unwrap_or("job failed");
                    bail!("job {} failed: {}", job_id, text);
                }
            }

            if tokio::time::Instant::now() >= deadline {
                bail!("timed out waiting for job {}", job_id);
            }
            tokio::time::sleep(JOB_POLL_INTERVAL).await;
        }
    }
}

/// CloudStack wraps every response as `{"<command>response": {...}}` with
/// the command name lower-cased in the key.
fn unwrap_envelope(command: &str, body: Value) -> Result<Value> {
    let key = format!("{}response", command.to_lowercase());
    match body {
        Value::Object(mut map) => map
            .remove(&key)
            .ok_or_else(|| anyhow!("response is missing the \"{}\" envelope", key)),
        _ => bail!("response is not a JSON object"),
    }
}
