//! User Info Types
//!
//! Yandex ID profile returned by the `info` endpoint.

use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashMap;

/// Avatar host.
pub const AVATAR_BASE_URL: &str = "https://avatars.yandex.net/get-yapic";

/// Default phone number entry.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Phone {
    pub id: u64,
    pub number: String,
}

/// User profile. Fields the provider omits stay `None`; unknown fields are kept in `extra`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct UserInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub login: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub real_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sex: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_email: Option<String>,
    #[serde(default, deserialize_with = "null_as_empty", skip_serializing_if = "Vec::is_empty")]
    pub emails: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_avatar_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_avatar_empty: Option<bool>,
    /// `YYYY-MM-DD`, parts the user hid are zeroed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub birthday: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_phone: Option<Phone>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub psuid: Option<String>,
    /// Present when requested with `with_openid_identity`.
    #[serde(default, deserialize_with = "null_as_empty", skip_serializing_if = "Vec::is_empty")]
    pub openid_identities: Vec<String>,
    /// Additional fields.
    #[serde(flatten)]
    pub extra: HashMap<String, serde_json::Value>,
}

fn null_as_empty<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<String>, D::Error> {
    Ok(Option::<Vec<String>>::deserialize(deserializer)?.unwrap_or_default())
}

impl UserInfo {
    /// Avatar URL for a size such as `islands-200`, when the user has one.
    pub fn avatar_url(&self, size: &str) -> Option<String> {
        if self.is_avatar_empty.unwrap_or(false) {
            return None;
        }
        self.default_avatar_id
            .as_ref()
            .map(|id| format!("{}/{}/{}", AVATAR_BASE_URL, id, size))
    }
}
