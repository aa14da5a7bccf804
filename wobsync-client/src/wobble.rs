//! Wobble service client over blocking HTTP.

use std::cell::Cell;
use std::time::Duration;

use serde_json::{json, Value};

use wobsync_core::types::{PostId, Topic, TopicId};
use wobsync_core::{ApiError, WobbleApi};

use crate::protocol::{self, to_wire_flag};

/// Idle time before an in-flight request is abandoned.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Blocking JSON-RPC client for the Wobble service.
///
/// Construct with [`WobbleClient::new`], establish a session with
/// [`WobbleClient::login`], then hand a shared reference to the engine as a
/// [`WobbleApi`]. Trait calls take `&self`; the request-id counter lives in a
/// `Cell` to keep them that way.
pub struct WobbleClient {
    agent: ureq::Agent,
    endpoint: String,
    next_id: Cell<u64>,
    apikey: Option<String>,
}

impl WobbleClient {
    /// Client for the service at `endpoint` (scheme + host, trailing slash
    /// tolerated).
    pub fn new(endpoint: &str) -> Self {
        let agent = ureq::AgentBuilder::new().timeout(REQUEST_TIMEOUT).build();
        WobbleClient {
            agent,
            endpoint: endpoint.trim_end_matches('/').to_owned(),
            next_id: Cell::new(1),
            apikey: None,
        }
    }

    fn rpc_url(&self) -> String {
        format!("{}/api/rpc", self.endpoint)
    }

    fn next_request_id(&self) -> u64 {
        let id = self.next_id.get();
        self.next_id.set(id + 1);
        id
    }

    /// Issue one JSON-RPC call and unwrap its result payload.
    fn call(&self, method: &str, params: Value) -> Result<Value, ApiError> {
        let id = self.next_request_id();
        tracing::debug!(method, id, "rpc call");
        let request = protocol::request(id, method, params);
        let response = self
            .agent
            .post(&self.rpc_url())
            .send_json(&request)
            .map_err(map_ureq_error)?;
        let parsed: protocol::RpcResponse = response
            .into_json()
            .map_err(|e| ApiError::Transport(format!("malformed rpc response: {e}")))?;
        protocol::into_result(parsed)
    }

    /// Merge the session key into a params object. Fails fast when no
    /// session is established yet.
    fn authed_params(&self, mut params: Value) -> Result<Value, ApiError> {
        let Some(apikey) = self.apikey.as_deref() else {
            return Err(ApiError::Auth);
        };
        match params.as_object_mut() {
            Some(map) => {
                map.insert("apikey".to_owned(), Value::String(apikey.to_owned()));
                Ok(params)
            }
            None => Err(ApiError::Transport("params must be an object".to_owned())),
        }
    }

    /// Establish a session. Must precede any [`WobbleApi`] call.
    pub fn login(&mut self, username: &str, password: &str) -> Result<(), ApiError> {
        let result = self.call(
            "user_login",
            json!({"username": username, "password": password}),
        )?;
        let session: protocol::SessionDto = serde_json::from_value(result)
            .map_err(|e| ApiError::Transport(format!("malformed login payload: {e}")))?;
        self.apikey = Some(session.apikey);
        tracing::info!(username, "authenticated with wobble service");
        Ok(())
    }

    /// Tear down the session. No-op without one.
    pub fn logout(&mut self) -> Result<(), ApiError> {
        if self.apikey.is_none() {
            return Ok(());
        }
        let params = self.authed_params(json!({}))?;
        self.call("user_signout", params)?;
        self.apikey = None;
        tracing::info!("wobble session closed");
        Ok(())
    }
}

fn map_ureq_error(err: ureq::Error) -> ApiError {
    match err {
        ureq::Error::Status(code, response) => {
            protocol::map_error_code(i64::from(code), response.status_text())
        }
        ureq::Error::Transport(transport) => ApiError::Transport(transport.to_string()),
    }
}

impl WobbleApi for WobbleClient {
    fn get_topic(&self, topic_id: &TopicId) -> Result<Topic, ApiError> {
        let params = self.authed_params(json!({"id": topic_id.0}))?;
        let result = self.call("topic_get_details", params)?;
        let dto: protocol::TopicDto = serde_json::from_value(result)
            .map_err(|e| ApiError::Transport(format!("malformed topic payload: {e}")))?;
        Ok(dto.into())
    }

    fn create_topic(&self, topic_id: &TopicId) -> Result<(), ApiError> {
        let params = self.authed_params(json!({"id": topic_id.0}))?;
        self.call("topics_create", params)?;
        Ok(())
    }

    fn create_post(
        &self,
        topic_id: &TopicId,
        post_id: &PostId,
        parent_id: &PostId,
        intended_post: bool,
    ) -> Result<(), ApiError> {
        let params = self.authed_params(json!({
            "topic_id": topic_id.0,
            "post_id": post_id.0,
            "parent_post_id": parent_id.0,
            "intended_post": to_wire_flag(intended_post),
        }))?;
        self.call("post_create", params)?;
        Ok(())
    }

    fn edit_post(
        &self,
        topic_id: &TopicId,
        post_id: &PostId,
        content: &str,
        revision: u32,
    ) -> Result<(), ApiError> {
        let params = self.authed_params(json!({
            "topic_id": topic_id.0,
            "post_id": post_id.0,
            "content": content,
            "revision_no": revision,
        }))?;
        self.call("post_edit", params)?;
        Ok(())
    }

    fn delete_post(&self, topic_id: &TopicId, post_id: &PostId) -> Result<(), ApiError> {
        let params = self.authed_params(json!({
            "topic_id": topic_id.0,
            "post_id": post_id.0,
        }))?;
        self.call("post_delete", params)?;
        Ok(())
    }

    fn change_post_read(
        &self,
        topic_id: &TopicId,
        post_id: &PostId,
        read: bool,
    ) -> Result<(), ApiError> {
        let params = self.authed_params(json!({
            "topic_id": topic_id.0,
            "post_id": post_id.0,
            "read": to_wire_flag(read),
        }))?;
        self.call("post_change_read", params)?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
