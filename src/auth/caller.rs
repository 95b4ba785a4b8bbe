use axum::async_trait;
use axum::extract::{FromRequest, RequestParts};
use uuid::Uuid;

use crate::entities::Identity;
use crate::error::{unauthenticated_error, Error};

pub const CALLER_ID_HEADER: &str = "x-caller-id";
pub const CALLER_EMAIL_HEADER: &str = "x-caller-email";

/// The authenticated party behind a request, as asserted by the external
/// session provider. Both the id and the email are required on every call;
/// role resolution against stored records may match on either.
#[derive(Clone, Debug)]
pub struct Caller {
    pub id: Uuid,
    pub email: String,
}

impl Caller {
    pub fn identity(&self) -> Identity {
        Identity::new(self.id, self.email.clone())
    }
}

#[async_trait]
impl<B: Send> FromRequest<B> for Caller {
    type Rejection = Error;

    async fn from_request(req: &mut RequestParts<B>) -> Result<Self, Self::Rejection> {
        let headers = req.headers();

        let id = headers
            .get(CALLER_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| Uuid::parse_str(v).ok())
            .ok_or_else(unauthenticated_error)?;

        let email = headers
            .get(CALLER_EMAIL_HEADER)
            .and_then(|v| v.to_str().ok())
            .filter(|v| !v.is_empty())
            .ok_or_else(unauthenticated_error)?
            .to_string();

        Ok(Self { id, email })
    }
}
