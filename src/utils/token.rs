use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::models::user::User;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub username: String,
    pub role: String,
    pub exp: i64,
    pub iat: i64,
}

impl Claims {
    pub fn user_id(&self) -> Option<i64> {
        self.sub.parse().ok()
    }
}

#[derive(Clone)]
pub struct TokenService {
    algorithm: Algorithm,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    expire_minutes: i64,
}

impl TokenService {
    pub fn new(secret: &str, algorithm: Algorithm, expire_minutes: i64) -> Self {
        Self {
            algorithm,
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            expire_minutes,
        }
    }

    pub fn from_config() -> Self {
        let config = crate::config::get_config();
        Self::new(
            &config.jwt_secret,
            config.jwt_algorithm,
            config.access_token_expire_minutes,
        )
    }

    pub fn issue(&self, user: &User) -> Result<String> {
        let now = Utc::now();
        let claims = Claims {
            sub: user.id.to_string(),
            username: user.username.clone(),
            role: user.role.clone(),
            exp: (now + Duration::minutes(self.expire_minutes)).timestamp(),
            iat: now.timestamp(),
        };
        encode(&Header::new(self.algorithm), &claims, &self.encoding_key)
            .map_err(|e| Error::Internal(format!("Failed to sign access token: {}", e)))
    }

    pub fn decode(&self, token: &str) -> Result<Claims> {
        let mut validation = Validation::new(self.algorithm);
        validation.validate_exp = true;
        let data = decode::<Claims>(token, &self.decoding_key, &validation)?;
        Ok(data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn user(id: i64, role: &str) -> User {
        let now = Utc::now();
        User {
            id,
            username: "lan".into(),
            email: "lan@example.com".into(),
            full_name: "Lan".into(),
            hashed_password: String::new(),
            role: role.into(),
            grade: Some(7),
            class_name: None,
            is_active: true,
            is_verified: false,
            created_at: now,
            updated_at: now,
            last_login: None,
        }
    }

    #[test]
    fn issued_token_decodes_to_same_subject() {
        let tokens = TokenService::new("test-secret", Algorithm::HS256, 30);
        let token = tokens.issue(&user(42, "teacher")).unwrap();
        let claims = tokens.decode(&token).unwrap();
        assert_eq!(claims.user_id(), Some(42));
        assert_eq!(claims.username, "lan");
        assert_eq!(claims.role, "teacher");
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let issuer = TokenService::new("secret-a", Algorithm::HS256, 30);
        let verifier = TokenService::new("secret-b", Algorithm::HS256, 30);
        let token = issuer.issue(&user(1, "student")).unwrap();
        assert!(matches!(verifier.decode(&token), Err(Error::Token(_))));
    }

    #[test]
    fn expired_token_is_rejected() {
        let tokens = TokenService::new("test-secret", Algorithm::HS256, -5);
        let token = tokens.issue(&user(1, "student")).unwrap();
        assert!(tokens.decode(&token).is_err());
    }

    #[test]
    fn non_numeric_subject_has_no_user_id() {
        let claims = Claims {
            sub: "abc".into(),
            username: "x".into(),
            role: "student".into(),
            exp: 0,
            iat: 0,
        };
        assert_eq!(claims.user_id(), None);
    }
}
