use chrono::{Duration, Utc};
use jsonwebtoken::{
    Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode, errors::ErrorKind,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Durée de vie des sessions (clients et admin).
pub const TOKEN_LIFETIME_HOURS: i64 = 24;

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: i32, // user id
    pub email: String,
    pub role: String,
    pub exp: i64, // expiration timestamp
}

#[derive(Debug, Error)]
pub enum TokenError {
    #[error("token expired")]
    Expired,

    #[error("invalid token: {0}")]
    Invalid(String),
}

/// Génère un JWT signé (HS256) pour un utilisateur.
/// Le secret vient de la configuration, jamais d'une valeur par défaut.
pub fn generate_token(
    secret: &str,
    user_id: i32,
    email: &str,
    role: &str,
) -> Result<String, String> {
    let expiration = Utc::now()
        .checked_add_signed(Duration::hours(TOKEN_LIFETIME_HOURS))
        .ok_or("Failed to calculate expiration")?
        .timestamp();

    let claims = Claims {
        sub: user_id,
        email: email.to_string(),
        role: role.to_string(),
        exp: expiration,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_ref()),
    )
    .map_err(|e| format!("Failed to generate token: {}", e))
}

/// Vérifie et décode un JWT. Distingue l'expiration des autres échecs
/// pour que l'API puisse renvoyer TOKEN_EXPIRED plutôt qu'un 401 générique.
pub fn verify_token(secret: &str, token: &str) -> Result<Claims, TokenError> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_ref()),
        &Validation::new(Algorithm::HS256),
    )
    .map(|data| data.claims)
    .map_err(|e| match e.kind() {
        ErrorKind::ExpiredSignature => TokenError::Expired,
        _ => TokenError::Invalid(e.to_string()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test-secret";

    #[test]
    fn test_generate_and_verify_token() {
        let token = generate_token(SECRET, 123, "ada@example.com", "customer").unwrap();
        let claims = verify_token(SECRET, &token).unwrap();

        assert_eq!(claims.sub, 123);
        assert_eq!(claims.email, "ada@example.com");
        assert_eq!(claims.role, "customer");
    }

    #[test]
    fn test_invalid_token() {
        let result = verify_token(SECRET, "invalid.token.here");
        assert!(matches!(result, Err(TokenError::Invalid(_))));
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let token = generate_token(SECRET, 1, "a@x.com", "admin").unwrap();
        let result = verify_token("another-secret", &token);
        assert!(matches!(result, Err(TokenError::Invalid(_))));
    }
}
