//! JWT token validation service.

use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use uuid::Uuid;

use crate::auth::claims::Claims;
use crate::error::AppError;

#[derive(Clone)]
pub struct JwtService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    algorithm: Algorithm,
}

#[derive(Debug, Clone)]
pub struct JwtConfig {
    pub secret: String,
    pub algorithm: Algorithm,
    pub expires_in_hours: i64,
}

impl Default for JwtConfig {
    fn default() -> Self {
        Self {
            secret: "change-me-in-production".to_string(),
            algorithm: Algorithm::HS256,
            expires_in_hours: 24,
        }
    }
}

impl JwtService {
    pub fn new(config: JwtConfig) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(config.secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(config.secret.as_bytes()),
            algorithm: config.algorithm,
        }
    }

    pub fn from_secret(secret: &str) -> Self {
        Self::new(JwtConfig {
            secret: secret.to_string(),
            ..JwtConfig::default()
        })
    }

    /// Used by tests and tooling; token issuance proper is an external
    /// collaborator of this service.
    pub fn generate_token(
        &self,
        user_id: Uuid,
        username: String,
        expires_in_hours: i64,
    ) -> Result<String, AppError> {
        let claims = Claims::new(user_id, username, expires_in_hours);
        let header = Header::new(self.algorithm);

        encode(&header, &claims, &self.encoding_key)
            .map_err(|e| AppError::AuthenticationError(format!("Failed to generate token: {}", e)))
    }

    pub fn validate_token(&self, token: &str) -> Result<Claims, AppError> {
        let mut validation = Validation::new(self.algorithm);
        validation.validate_exp = true;

        decode::<Claims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|e| AppError::AuthenticationError(format!("Invalid token: {}", e)))
    }

    pub fn extract_token_from_header(auth_header: &str) -> Option<&str> {
        auth_header.strip_prefix("Bearer ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_and_validate_token() {
        let service = JwtService::from_secret("test-secret");
        let user_id = Uuid::new_v4();

        let token = service
            .generate_token(user_id, "alice".to_string(), 1)
            .unwrap();
        let claims = service.validate_token(&token).unwrap();

        assert_eq!(claims.user_id(), Some(user_id));
        assert_eq!(claims.username, "alice");
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let issuer = JwtService::from_secret("secret-a");
        let verifier = JwtService::from_secret("secret-b");

        let token = issuer
            .generate_token(Uuid::new_v4(), "mallory".to_string(), 1)
            .unwrap();
        assert!(verifier.validate_token(&token).is_err());
    }

    #[test]
    fn test_extract_token_from_header() {
        assert_eq!(
            JwtService::extract_token_from_header("Bearer abc.def.ghi"),
            Some("abc.def.ghi")
        );
        assert_eq!(JwtService::extract_token_from_header("Basic abc"), None);
    }
}
