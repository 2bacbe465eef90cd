//! Transfer records exchanged with the member CRUD API

use serde::{Deserialize, Serialize};

/// Member record exchanged with the CRUD API
///
/// Plain transfer object with no identity; the remote service owns any
/// validation beyond field presence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    pub name: String,
    pub email: String,
    pub organization: String,
}

impl Member {
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        organization: impl Into<String>,
    ) -> Self {
        Self { name: name.into(), email: email.into(), organization: organization.into() }
    }
}
