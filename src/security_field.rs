use super::cookie::split_pair;
use super::error::HeaderError;

/// One `name=value` field of a `Sec-*` header value.
#[derive(Clone, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SecurityField {
    pub field_name: String,
    pub field_value: String,
}

impl SecurityField {
    #[must_use]
    pub fn new<N, V>(
        field_name: N,
        field_value: V,
    ) -> Self
        where N: Into<String>, V: Into<String>
    {
        Self{
            field_name: field_name.into(),
            field_value: field_value.into(),
        }
    }
}

impl std::fmt::Display for SecurityField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}={}", self.field_name, self.field_value)
    }
}

/// Break the value of any header whose name begins with `Sec-` into its
/// `,`-separated fields, in order.
///
/// # Errors
///
/// [`HeaderError::MaliciousSecurityField`] is returned if any field does
/// not contain exactly one `=`, or has an empty name or value.
pub fn parse_security_fields(value: &str) -> Result<Vec<SecurityField>, HeaderError> {
    value.split(',')
        .map(|field| {
            split_pair(field)
                .map(|(name, field_value)| SecurityField::new(name, field_value))
                .ok_or_else(|| HeaderError::MaliciousSecurityField(value.into()))
        })
        .collect()
}
