//! Wobble JSON-RPC wire protocol — envelopes, payload DTOs, error mapping.
//!
//! # Method map
//!
//! | Method              | Params                                              |
//! |---------------------|-----------------------------------------------------|
//! | `user_login`        | `username`, `password`                              |
//! | `user_signout`      | `apikey`                                            |
//! | `topic_get_details` | `apikey`, `id`                                      |
//! | `topics_create`     | `apikey`, `id`                                      |
//! | `post_create`       | `apikey`, `topic_id`, `post_id`, `parent_post_id`, `intended_post` |
//! | `post_edit`         | `apikey`, `topic_id`, `post_id`, `content`, `revision_no` |
//! | `post_delete`       | `apikey`, `topic_id`, `post_id`                     |
//! | `post_change_read`  | `apikey`, `topic_id`, `post_id`, `read`             |
//!
//! The service reuses HTTP status semantics inside JSON-RPC error objects,
//! and encodes booleans as 0/1 integers on the wire. Everything here is a
//! pure function over serde values, so the full encode/decode surface runs
//! in tests without a socket.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use wobsync_core::types::{Post, PostId, Topic, TopicId};
use wobsync_core::ApiError;

/// JSON-RPC protocol version tag sent with every request.
pub const JSONRPC_VERSION: &str = "2.0";

// ---------------------------------------------------------------------------
// Envelopes
// ---------------------------------------------------------------------------

/// Outgoing request envelope.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct RpcRequest {
    pub jsonrpc: &'static str,
    pub id: u64,
    pub method: String,
    pub params: Value,
}

/// Build a request envelope for `method` with the given params object.
pub fn request(id: u64, method: &str, params: Value) -> RpcRequest {
    RpcRequest {
        jsonrpc: JSONRPC_VERSION,
        id,
        method: method.to_owned(),
        params,
    }
}

/// Incoming response envelope.
#[derive(Debug, Deserialize)]
pub struct RpcResponse {
    #[serde(default)]
    pub result: Option<Value>,
    #[serde(default)]
    pub error: Option<RpcErrorObject>,
}

/// JSON-RPC error member.
#[derive(Debug, Deserialize)]
pub struct RpcErrorObject {
    pub code: i64,
    #[serde(default)]
    pub message: String,
}

/// Unwrap a response envelope into its result payload.
///
/// A missing `result` with no error is treated as `null`; mutation methods
/// legitimately return nothing of interest.
pub fn into_result(response: RpcResponse) -> Result<Value, ApiError> {
    if let Some(err) = response.error {
        return Err(map_error_code(err.code, &err.message));
    }
    Ok(response.result.unwrap_or(Value::Null))
}

/// Map an application error code to the client error taxonomy.
pub fn map_error_code(code: i64, message: &str) -> ApiError {
    match code {
        401 => ApiError::Auth,
        404 => ApiError::NotFound,
        409 => ApiError::Conflict,
        _ => ApiError::Transport(format!("rpc error {code}: {message}")),
    }
}

// ---------------------------------------------------------------------------
// Wire flags
// ---------------------------------------------------------------------------

/// Encode a boolean as the wire's 0/1 integer.
pub fn to_wire_flag(value: bool) -> u8 {
    value as u8
}

/// Decode the wire's 0/1 integer into a boolean. Nonzero reads as true.
pub fn from_wire_flag(value: u8) -> bool {
    value != 0
}

// ---------------------------------------------------------------------------
// Payload DTOs
// ---------------------------------------------------------------------------

/// `user_login` result payload.
#[derive(Debug, Deserialize)]
pub struct SessionDto {
    pub apikey: String,
}

/// `topic_get_details` result payload.
#[derive(Debug, Deserialize)]
pub struct TopicDto {
    pub id: String,
    #[serde(default)]
    pub posts: Vec<PostDto>,
}

/// One post inside a [`TopicDto`].
#[derive(Debug, Deserialize)]
pub struct PostDto {
    pub post_id: String,
    #[serde(default)]
    pub content: Option<String>,
    pub revision_no: u32,
    #[serde(default)]
    pub unread: u8,
    #[serde(default)]
    pub deleted: u8,
}

impl From<PostDto> for Post {
    fn from(dto: PostDto) -> Self {
        Post {
            id: PostId::from(dto.post_id),
            content: dto.content,
            revision: dto.revision_no,
            unread: from_wire_flag(dto.unread),
            deleted: from_wire_flag(dto.deleted),
        }
    }
}

impl From<TopicDto> for Topic {
    fn from(dto: TopicDto) -> Self {
        Topic {
            id: TopicId::from(dto.id),
            posts: dto.posts.into_iter().map(Post::from).collect(),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
