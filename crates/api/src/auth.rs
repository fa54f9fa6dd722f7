//! Caller identity extraction.
//!
//! Token issuance and verification live in the upstream identity context;
//! this surface consumes the forwarded seller id from the `Authorization`
//! header. A missing or unparseable credential yields an anonymous caller,
//! and anonymous callers are denied by the ownership guard downstream.

use std::convert::Infallible;

use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use common::SellerId;
use uuid::Uuid;

/// The authenticated seller making a request, or anonymous.
#[derive(Debug, Clone, Copy)]
pub struct CallerIdentity(pub Option<SellerId>);

impl CallerIdentity {
    /// Returns the caller's seller id, if authenticated.
    pub fn seller(&self) -> Option<SellerId> {
        self.0
    }
}

impl<S: Send + Sync> FromRequestParts<S> for CallerIdentity {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let caller = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "))
            .and_then(|token| Uuid::parse_str(token.trim()).ok())
            .map(SellerId::from_uuid);

        Ok(CallerIdentity(caller))
    }
}
