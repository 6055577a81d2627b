use serde::{Deserialize, Serialize};

/// Body returned by a successful `/login`.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub access_token: String,
}
