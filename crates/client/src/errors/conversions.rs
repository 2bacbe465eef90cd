//! Conversions from external client errors into domain errors.

use memberlink_domain::MemberLinkError;
use reqwest::Error as HttpError;

/// Error newtype that keeps conversions on the client side and can be
/// converted back into the domain error.
#[derive(Debug)]
pub struct ClientError(pub MemberLinkError);

impl From<ClientError> for MemberLinkError {
    fn from(value: ClientError) -> Self {
        value.0
    }
}

impl From<MemberLinkError> for ClientError {
    fn from(value: MemberLinkError) -> Self {
        ClientError(value)
    }
}

/// Extension trait to make the conversion logic explicit in tests and within
/// this module.
trait IntoMemberLinkError {
    fn into_memberlink(self) -> MemberLinkError;
}

/* -------------------------------------------------------------------------- */
/* reqwest::Error → MemberLinkError */
/* -------------------------------------------------------------------------- */

impl IntoMemberLinkError for HttpError {
    fn into_memberlink(self) -> MemberLinkError {
        if self.is_timeout() {
            return MemberLinkError::Timeout("HTTP request timed out".into());
        }

        if self.is_connect() {
            return MemberLinkError::Network("HTTP connection failure".into());
        }

        if self.is_decode() {
            return MemberLinkError::Deserialization(self.to_string());
        }

        if let Some(status) = self.status() {
            let code = status.as_u16();
            let reason = status.canonical_reason().unwrap_or("unknown status");
            return MemberLinkError::Http { status: code, body: reason.to_string() };
        }

        MemberLinkError::Network(self.to_string())
    }
}

impl From<HttpError> for ClientError {
    fn from(value: HttpError) -> Self {
        ClientError(value.into_memberlink())
    }
}

/* -------------------------------------------------------------------------- */
/* Tests */
/* -------------------------------------------------------------------------- */
