//! Shopper profiles as stored by the remote user service.

use serde::{Deserialize, Serialize};

use super::address::Address;
use super::id::UserId;

/// A shopper's profile, including the saved address list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: UserId,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(default)]
    pub addresses: Vec<Address>,
}

impl UserProfile {
    /// An empty profile for a shopper the service has not seen yet.
    #[must_use]
    pub fn empty(id: UserId) -> Self {
        Self {
            id,
            name: String::new(),
            email: String::new(),
            phone: None,
            avatar_url: None,
            language: None,
            addresses: Vec::new(),
        }
    }

    /// Apply a patch, returning the updated profile.
    #[must_use]
    pub fn patched(&self, patch: &UserPatch) -> Self {
        let mut next = self.clone();
        if let Some(name) = &patch.name {
            next.name.clone_from(name);
        }
        if let Some(phone) = &patch.phone {
            next.phone = Some(phone.clone());
        }
        if let Some(avatar_url) = &patch.avatar_url {
            next.avatar_url = Some(avatar_url.clone());
        }
        if let Some(language) = &patch.language {
            next.language = Some(language.clone());
        }
        if let Some(addresses) = &patch.addresses {
            next.addresses.clone_from(addresses);
        }
        next
    }
}

/// Partial profile update sent to the remote user service.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub addresses: Option<Vec<Address>>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_patched_only_touches_present_fields() {
        let mut profile = UserProfile::empty(UserId::new("u1"));
        profile.name = "Asha".to_string();

        let next = profile.patched(&UserPatch {
            language: Some("hi".to_string()),
            ..UserPatch::default()
        });
        assert_eq!(next.name, "Asha");
        assert_eq!(next.language.as_deref(), Some("hi"));
        assert!(next.addresses.is_empty());
    }

    #[test]
    fn test_patch_serializes_sparse() {
        let patch = UserPatch {
            avatar_url: Some("https://cdn.example.com/a.png".to_string()),
            ..UserPatch::default()
        };
        let json = serde_json::to_value(&patch).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "avatarUrl": "https://cdn.example.com/a.png" })
        );
    }
}
