//! Signed identity tokens
//!
//! Login and registration hand out an HS256 token carrying the user id and
//! role. A request presenting a valid token is resolved to that principal
//! without trusting any caller-supplied identity headers.

use jsonwebtoken::{
    Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode, errors::Result,
    get_current_timestamp,
};
use serde::{Deserialize, Serialize};

use crate::{
    middleware::Principal,
    models::user::{Role, User},
};

/// JWT claims structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    /// User ID
    pub sub: i64,
    /// User role
    pub role: Role,
    /// Issued at time
    pub iat: u64,
    /// Expiration time
    pub exp: u64,
}

impl Claims {
    /// Principal asserted by these claims
    pub fn principal(&self) -> Principal {
        Principal {
            id: Some(self.sub),
            role: self.role,
        }
    }
}

/// JWT service
#[derive(Clone)]
pub struct JwtService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    token_ttl: u64,
}

impl JwtService {
    /// Initialize a new JWT service from a shared secret
    pub fn new(secret: &[u8], token_ttl: u64) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;

        JwtService {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            validation,
            token_ttl,
        }
    }

    /// Generate a token for a user
    pub fn issue(&self, user: &User) -> Result<String> {
        let now = get_current_timestamp();
        let claims = Claims {
            sub: user.id,
            role: user.role,
            iat: now,
            exp: now + self.token_ttl,
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
    }

    /// Validate a token and return the claims
    pub fn validate(&self, token: &str) -> Result<Claims> {
        let token_data = decode::<Claims>(token, &self.decoding_key, &self.validation)?;
        Ok(token_data.claims)
    }

    /// Token lifetime in seconds
    pub fn token_ttl(&self) -> u64 {
        self.token_ttl
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn admin() -> User {
        User {
            id: 1,
            first_name: "Admin".to_string(),
            last_name: "User".to_string(),
            email: "admin@site.com".to_string(),
            role: Role::Admin,
        }
    }

    #[test]
    fn test_issued_token_resolves_to_principal() {
        let service = JwtService::new(b"test-secret", 60);
        let token = service.issue(&admin()).unwrap();

        let claims = service.validate(&token).unwrap();
        assert_eq!(claims.sub, 1);
        assert_eq!(claims.exp - claims.iat, 60);
        assert_eq!(
            claims.principal(),
            Principal {
                id: Some(1),
                role: Role::Admin
            }
        );
    }

    #[test]
    fn test_token_signed_with_other_secret_is_rejected() {
        let issuer = JwtService::new(b"secret-a", 60);
        let verifier = JwtService::new(b"secret-b", 60);
        let token = issuer.issue(&admin()).unwrap();

        assert!(verifier.validate(&token).is_err());
    }

    #[test]
    fn test_expired_token_is_rejected() {
        let service = JwtService::new(b"test-secret", 60);
        let past = get_current_timestamp() - 3600;
        let claims = Claims {
            sub: 1,
            role: Role::Admin,
            iat: past - 60,
            exp: past,
        };
        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(b"test-secret"),
        )
        .unwrap();

        assert!(service.validate(&token).is_err());
    }

    #[test]
    fn test_garbage_is_rejected() {
        let service = JwtService::new(b"test-secret", 60);
        assert!(service.validate("not.a.token").is_err());
    }
}
