use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Admin => "admin",
        }
    }
}

impl TryFrom<&str> for Role {
    type Error = ();

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "user" => Ok(Role::User),
            "admin" => Ok(Role::Admin),
            _ => Err(()),
        }
    }
}

pub trait RequiredRole {
    fn required() -> Role;
}

pub struct UserRole;

impl RequiredRole for UserRole {
    fn required() -> Role {
        Role::User
    }
}

pub struct AdminRole;

impl RequiredRole for AdminRole {
    fn required() -> Role {
        Role::Admin
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    pub sub: String, // auth user id
    pub exp: usize,  // expiry (unix)
    pub iat: usize,  // issued at
    pub roles: Vec<Role>,
}

/// Access/refresh pair handed to a client after login, registration or a
/// refresh rotation.
#[derive(Debug, Clone)]
pub struct TokenBundle {
    pub user_id: Uuid,
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: &'static str,
    pub expires_in: usize,
    pub refresh_expires_in: usize,
}

/// The caller as resolved from a verified access token.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Identity {
    pub user_id: Uuid,
    pub roles: Vec<Role>,
    pub expires_at: usize,
}

impl Identity {
    /// `None` when the subject is not an identity id.
    pub fn from_claims(claims: &Claims) -> Option<Self> {
        let user_id = claims.sub.parse().ok()?;
        Some(Self {
            user_id,
            roles: claims.roles.clone(),
            expires_at: claims.exp,
        })
    }

    pub fn has_role(&self, role: &Role) -> bool {
        self.roles.iter().any(|candidate| candidate == role)
    }
}

#[cfg(test)]
mod tests {
    use uuid::Uuid;

    use super::{AdminRole, Claims, Identity, RequiredRole, Role, UserRole};

    #[test]
    fn role_string_roundtrip() {
        assert_eq!(Role::User.as_str(), "user");
        assert_eq!(Role::Admin.as_str(), "admin");

        assert_eq!(Role::try_from("user"), Ok(Role::User));
        assert_eq!(Role::try_from("admin"), Ok(Role::Admin));
        assert!(Role::try_from("partner").is_err());
    }

    #[test]
    fn required_role_markers_map_to_expected_role() {
        assert_eq!(UserRole::required(), Role::User);
        assert_eq!(AdminRole::required(), Role::Admin);
    }

    #[test]
    fn identity_requires_uuid_subject() {
        let user_id = Uuid::new_v4();
        let claims = Claims {
            sub: user_id.to_string(),
            exp: 200,
            iat: 100,
            roles: vec![Role::User],
        };
        let identity = Identity::from_claims(&claims).expect("subject should parse");
        assert_eq!(identity.user_id, user_id);
        assert!(identity.has_role(&Role::User));
        assert!(!identity.has_role(&Role::Admin));

        let claims = Claims {
            sub: "admin@example.com".to_string(),
            ..claims
        };
        assert!(Identity::from_claims(&claims).is_none());
    }
}
