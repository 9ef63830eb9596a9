//! Wire models
//!
//! The backend speaks camelCase JSON. Unknown fields are ignored so the
//! profile can grow without breaking older clients.

use serde::{Deserialize, Serialize};

pub const ADMIN_ROLE: &str = "ROLE_ADMIN";

/// User profile as returned by `GET /api/user/me`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    #[serde(default)]
    pub id: Option<i64>,
    pub username: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub firstname: Option<String>,
    #[serde(default)]
    pub lastname: Option<String>,
    #[serde(default)]
    pub roles: Vec<String>,
}

impl Profile {
    /// Minimal profile for a known username
    pub fn with_username(username: impl Into<String>) -> Self {
        Self {
            id: None,
            username: username.into(),
            email: None,
            firstname: None,
            lastname: None,
            roles: Vec::new(),
        }
    }

    pub fn has_role(&self, role: &str) -> bool {
        self.roles.iter().any(|r| r == role)
    }

    /// Gate for the admin dashboard
    pub fn is_admin(&self) -> bool {
        self.has_role(ADMIN_ROLE)
    }

    pub fn display_name(&self) -> String {
        match (self.firstname.as_deref(), self.lastname.as_deref()) {
            (Some(first), Some(last)) => format!("{} {}", first, last),
            (Some(first), None) => first.to_string(),
            _ => self.username.clone(),
        }
    }
}

#[derive(Clone, Serialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

impl LoginRequest {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

impl std::fmt::Debug for LoginRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginRequest")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// `POST /api/login` success body: tokens plus the profile fields
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub token: String,
    pub refresh_token: String,
    #[serde(flatten)]
    pub profile: LoginProfile,
}

/// Profile fields as they appear in the login body, where the backend may
/// leave out the username it just authenticated
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginProfile {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub firstname: Option<String>,
    #[serde(default)]
    pub lastname: Option<String>,
    #[serde(default)]
    pub roles: Vec<String>,
}

impl LoginProfile {
    /// Full profile; a missing or blank username becomes `submitted`
    pub fn into_profile(self, submitted: &str) -> Profile {
        let username = self
            .username
            .filter(|name| !name.is_empty())
            .unwrap_or_else(|| submitted.to_string());

        Profile {
            id: self.id,
            username,
            email: self.email,
            firstname: self.firstname,
            lastname: self.lastname,
            roles: self.roles,
        }
    }
}

impl From<Profile> for LoginProfile {
    fn from(profile: Profile) -> Self {
        Self {
            id: profile.id,
            username: Some(profile.username),
            email: profile.email,
            firstname: profile.firstname,
            lastname: profile.lastname,
            roles: profile.roles,
        }
    }
}

/// `POST /api/oauth/complete` success body
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenPair {
    pub token: String,
    pub refresh_token: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshRequest {
    pub refresh_token: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshResponse {
    pub access_token: String,
}

/// `GET /api/cart` summary; only the item count matters to the session
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartSummary {
    #[serde(default)]
    pub total_quantity: u32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_profile_accepts_minimal_body() {
        let profile: Profile =
            serde_json::from_value(json!({"username": "alice", "roles": ["ROLE_USER"]})).unwrap();

        assert_eq!(profile.username, "alice");
        assert_eq!(profile.roles, vec!["ROLE_USER"]);
        assert!(profile.id.is_none());
        assert!(!profile.is_admin());
    }

    #[test]
    fn test_login_response_flattens_profile() {
        let body = json!({
            "token": "a.b.c",
            "refreshToken": "r-1",
            "username": "alice",
            "id": 7,
            "email": "alice@example.com",
            "firstname": "Alice",
            "lastname": "Liddell",
            "roles": ["ROLE_USER", "ROLE_ADMIN"],
            "somethingNew": true
        });

        let response: LoginResponse = serde_json::from_value(body).unwrap();
        assert_eq!(response.token, "a.b.c");
        assert_eq!(response.refresh_token, "r-1");

        let profile = response.profile.into_profile("someone-else");
        assert_eq!(profile.username, "alice");
        assert_eq!(profile.id, Some(7));
        assert_eq!(profile.display_name(), "Alice Liddell");
        assert!(profile.is_admin());
    }

    #[test]
    fn test_login_response_without_username() {
        let body = json!({"token": "a.b.c", "refreshToken": "r-1", "roles": ["ROLE_USER"]});

        let response: LoginResponse = serde_json::from_value(body).unwrap();
        assert_eq!(response.profile.username, None);

        let profile = response.profile.into_profile("alice");
        assert_eq!(profile.username, "alice");
        assert_eq!(profile.roles, vec!["ROLE_USER"]);

        let blank = LoginProfile {
            username: Some(String::new()),
            ..LoginProfile::default()
        };
        assert_eq!(blank.into_profile("alice").username, "alice");
    }

    #[test]
    fn test_profile_endpoint_requires_username() {
        let result = serde_json::from_value::<Profile>(json!({"roles": ["ROLE_USER"]}));
        assert!(result.is_err());
    }

    #[test]
    fn test_request_bodies_are_camel_case() {
        let body = serde_json::to_value(RefreshRequest {
            refresh_token: "r-1".into(),
        })
        .unwrap();
        assert_eq!(body, json!({"refreshToken": "r-1"}));

        let login = LoginRequest::new("alice", "hunter2");
        assert_eq!(
            serde_json::to_value(&login).unwrap(),
            json!({"username": "alice", "password": "hunter2"})
        );
        assert!(!format!("{:?}", login).contains("hunter2"));
    }

    #[test]
    fn test_cart_summary_defaults_to_zero() {
        let cart: CartSummary = serde_json::from_value(json!({"items": []})).unwrap();
        assert_eq!(cart.total_quantity, 0);

        let cart: CartSummary = serde_json::from_value(json!({"totalQuantity": 3})).unwrap();
        assert_eq!(cart.total_quantity, 3);
    }
}
