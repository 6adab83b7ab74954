use super::error::HeaderError;

/// The parsed value of an `Authorization` header.  The credentials are
/// opaque and kept exactly as received, including any spaces.
#[derive(Clone, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Authorization {
    pub scheme: String,
    pub credentials: String,
}

impl Authorization {
    #[must_use]
    pub fn new<S, C>(
        scheme: S,
        credentials: C,
    ) -> Self
        where S: Into<String>, C: Into<String>
    {
        Self{
            scheme: scheme.into(),
            credentials: credentials.into(),
        }
    }
}

impl std::fmt::Display for Authorization {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.scheme, self.credentials)
    }
}

/// Split an `Authorization` header value on its first space into the
/// scheme and the credentials.
///
/// # Errors
///
/// [`HeaderError::MaliciousAuthorization`] is returned if there is no space,
/// or if either the scheme or the credentials are empty.
pub fn parse_authorization(value: &str) -> Result<Authorization, HeaderError> {
    match value.split_once(' ') {
        Some((scheme, credentials))
            if !scheme.is_empty() && !credentials.is_empty()
        => Ok(Authorization::new(scheme, credentials)),
        _ => Err(HeaderError::MaliciousAuthorization(value.into())),
    }
}
