//! Identity extractor for audit fields.
//!
//! Authentication lives in the upstream gateway; by the time a request
//! reaches this service the authenticated user is carried in the `x-user`
//! header. The extractor never rejects: an absent or unreadable header
//! degrades to the "inconnu" placeholder so audit fields are always
//! populated.

use std::convert::Infallible;

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

/// Header set by the upstream identity collaborator.
const USER_HEADER: &str = "x-user";

/// Placeholder recorded when no identity was forwarded.
const UNKNOWN_ACTOR: &str = "inconnu";

/// The acting user, for `last_modified_by` audit stamps.
#[derive(Debug, Clone)]
pub struct Actor(pub String);

impl Actor {
    /// Returns the actor name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.0
    }
}

impl<S> FromRequestParts<S> for Actor
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let actor = parts
            .headers
            .get(USER_HEADER)
            .and_then(|value| value.to_str().ok())
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .unwrap_or(UNKNOWN_ACTOR);

        Ok(Self(actor.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    async fn extract(request: Request<()>) -> Actor {
        let (mut parts, ()) = request.into_parts();
        Actor::from_request_parts(&mut parts, &()).await.unwrap()
    }

    #[tokio::test]
    async fn test_reads_user_header() {
        let request = Request::builder()
            .header("x-user", "a.kouassi@plant.ci")
            .body(())
            .unwrap();
        assert_eq!(extract(request).await.name(), "a.kouassi@plant.ci");
    }

    #[tokio::test]
    async fn test_missing_header_degrades_to_placeholder() {
        let request = Request::builder().body(()).unwrap();
        assert_eq!(extract(request).await.name(), "inconnu");
    }

    #[tokio::test]
    async fn test_blank_header_degrades_to_placeholder() {
        let request = Request::builder().header("x-user", "   ").body(()).unwrap();
        assert_eq!(extract(request).await.name(), "inconnu");
    }
}
