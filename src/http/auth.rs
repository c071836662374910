use crate::error::ApiError;
use crate::AppState;
use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use axum::http::HeaderMap;
use jsonwebtoken::{DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub id: Uuid,
    pub exp: i64,
}

/// Resolves a bearer credential to a user id, or rejects the request before
/// any handler body runs.
#[derive(Clone)]
pub struct AuthContext {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl AuthContext {
    pub fn new(secret: &str) -> Self {
        Self {
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation: Validation::default(),
        }
    }

    pub fn resolve(&self, headers: &HeaderMap) -> Result<Uuid, ApiError> {
        let header = headers
            .get(AUTHORIZATION)
            .and_then(|h| h.to_str().ok())
            .ok_or_else(|| ApiError::Auth("no token provided".to_string()))?;

        let token = header
            .strip_prefix("Bearer ")
            .ok_or_else(|| ApiError::Auth("malformed authorization header".to_string()))?;

        let data = jsonwebtoken::decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map_err(|_| ApiError::Auth("invalid or expired token".to_string()))?;

        Ok(data.claims.id)
    }
}

pub struct AuthedUser(pub Uuid);

#[axum::async_trait]
impl FromRequestParts<AppState> for AuthedUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        state.auth.resolve(&parts.headers).map(AuthedUser)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;
    use jsonwebtoken::{EncodingKey, Header};

    fn bearer(secret: &str, claims: &Claims) -> HeaderMap {
        let token = jsonwebtoken::encode(
            &Header::default(),
            claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .unwrap();

        let mut headers = HeaderMap::new();
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {token}")).unwrap(),
        );
        headers
    }

    #[test]
    fn resolves_a_valid_bearer_token() {
        let ctx = AuthContext::new("super-secret-key");
        let user_id = Uuid::new_v4();
        let headers = bearer(
            "super-secret-key",
            &Claims {
                id: user_id,
                exp: (chrono::Utc::now() + chrono::Duration::days(2)).timestamp(),
            },
        );

        assert_eq!(ctx.resolve(&headers).unwrap(), user_id);
    }

    #[test]
    fn rejects_a_missing_header() {
        let ctx = AuthContext::new("super-secret-key");
        assert!(matches!(
            ctx.resolve(&HeaderMap::new()),
            Err(ApiError::Auth(_))
        ));
    }

    #[test]
    fn rejects_a_token_signed_with_another_secret() {
        let ctx = AuthContext::new("super-secret-key");
        let headers = bearer(
            "some-other-secret",
            &Claims {
                id: Uuid::new_v4(),
                exp: (chrono::Utc::now() + chrono::Duration::days(2)).timestamp(),
            },
        );

        assert!(matches!(ctx.resolve(&headers), Err(ApiError::Auth(_))));
    }

    #[test]
    fn rejects_an_expired_token() {
        let ctx = AuthContext::new("super-secret-key");
        let headers = bearer(
            "super-secret-key",
            &Claims {
                id: Uuid::new_v4(),
                exp: (chrono::Utc::now() - chrono::Duration::days(1)).timestamp(),
            },
        );

        assert!(matches!(ctx.resolve(&headers), Err(ApiError::Auth(_))));
    }
}
