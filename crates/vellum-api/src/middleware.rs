use axum::{
    extract::Request,
    http::{HeaderMap, StatusCode, header},
    middleware::Next,
    response::Response,
};
use jsonwebtoken::{DecodingKey, Validation, decode};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    pub username: String,
    pub exp: usize,
}

/// Extract and validate JWT from Authorization header.
pub async fn require_auth(mut req: Request, next: Next) -> Result<Response, StatusCode> {
    let secret =
        std::env::var("VELLUM_JWT_SECRET").unwrap_or_else(|_| "dev-secret-change-me".into());

    let claims = bearer_claims(req.headers(), &secret).ok_or(StatusCode::UNAUTHORIZED)?;

    req.extensions_mut().insert(claims);
    Ok(next.run(req).await)
}

/// Claims from a bearer token when one is present and valid. Public
/// endpoints that honor an optional token (draft visibility) use this
/// directly.
pub fn bearer_claims(headers: &HeaderMap, secret: &str) -> Option<Claims> {
    let token = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())?
        .strip_prefix("Bearer ")?;

    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .ok()
    .map(|data| data.claims)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;
    use jsonwebtoken::{EncodingKey, Header, encode};

    fn token(secret: &str) -> String {
        let claims = Claims {
            sub: Uuid::new_v4(),
            username: "ada".into(),
            exp: (chrono::Utc::now() + chrono::Duration::hours(1)).timestamp() as usize,
        };
        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .unwrap()
    }

    fn headers_with(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(
            axum::http::header::AUTHORIZATION,
            HeaderValue::from_str(value).unwrap(),
        );
        headers
    }

    #[test]
    fn valid_bearer_token_yields_claims() {
        let headers = headers_with(&format!("Bearer {}", token("secret")));
        let claims = bearer_claims(&headers, "secret").unwrap();
        assert_eq!(claims.username, "ada");
    }

    #[test]
    fn wrong_secret_yields_none() {
        let headers = headers_with(&format!("Bearer {}", token("secret")));
        assert!(bearer_claims(&headers, "other").is_none());
    }

    #[test]
    fn missing_or_malformed_header_yields_none() {
        assert!(bearer_claims(&HeaderMap::new(), "secret").is_none());
        let headers = headers_with("Basic abc");
        assert!(bearer_claims(&headers, "secret").is_none());
    }
}
