use std::sync::Arc;

use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};

use parley_db::Database;
use parley_types::api::Claims;

pub type AppState = Arc<AppStateInner>;

pub struct AppStateInner {
    pub db: Database,
    pub jwt_secret: String,
}

/// Mint a bearer token the same way the identity service does.
/// Used for local development and tests.
pub fn issue_token(secret: &str, user_id: i64, username: &str) -> anyhow::Result<String> {
    let claims = Claims {
        sub: user_id,
        username: username.to_string(),
        exp: (chrono::Utc::now() + chrono::Duration::days(30)).timestamp() as usize,
    };

    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )?;

    Ok(token)
}

/// Check signature and expiry, returning the embedded claims.
pub fn verify_token(secret: &str, token: &str) -> jsonwebtoken::errors::Result<Claims> {
    let data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )?;
    Ok(data.claims)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn issued_token_verifies() {
        let token = issue_token("s3cret", 7, "alice").unwrap();
        let claims = verify_token("s3cret", &token).unwrap();
        assert_eq!(claims.sub, 7);
        assert_eq!(claims.username, "alice");
    }

    #[test]
    fn wrong_secret_fails() {
        let token = issue_token("s3cret", 7, "alice").unwrap();
        assert!(verify_token("other", &token).is_err());
        assert!(verify_token("s3cret", "not-a-jwt").is_err());
    }
}
