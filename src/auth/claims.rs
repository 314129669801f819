use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// JWT claims carried by the access token. Token issuance lives outside
/// this service; we only validate and extract the subject.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// User id (UUID string)
    pub sub: String,
    pub username: String,
    pub iat: i64,
    pub exp: i64,
}

impl Claims {
    pub fn new(user_id: Uuid, username: String, expires_in_hours: i64) -> Self {
        let now = Utc::now().timestamp();
        Self {
            sub: user_id.to_string(),
            username,
            iat: now,
            exp: now + expires_in_hours * 3600,
        }
    }

    pub fn is_expired(&self) -> bool {
        Utc::now().timestamp() >= self.exp
    }

    pub fn user_id(&self) -> Option<Uuid> {
        Uuid::parse_str(&self.sub).ok()
    }
}

/// Opaque authenticated identity handed to the services. The core never
/// authenticates; it only scopes queries by this id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthUser(pub Uuid);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_claims_round_trip_user_id() {
        let user_id = Uuid::new_v4();
        let claims = Claims::new(user_id, "alice".to_string(), 24);
        assert_eq!(claims.user_id(), Some(user_id));
        assert!(!claims.is_expired());
    }

    #[test]
    fn test_expired_claims() {
        let mut claims = Claims::new(Uuid::new_v4(), "bob".to_string(), 24);
        claims.exp = Utc::now().timestamp() - 10;
        assert!(claims.is_expired());
    }
}
