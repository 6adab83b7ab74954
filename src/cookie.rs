use super::error::HeaderError;

/// One `name=value` pair of a `Cookie` header value.
#[derive(Clone, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Cookie {
    pub name: String,
    pub value: String,
}

impl Cookie {
    #[must_use]
    pub fn new<N, V>(
        name: N,
        value: V,
    ) -> Self
        where N: Into<String>, V: Into<String>
    {
        Self{
            name: name.into(),
            value: value.into(),
        }
    }
}

impl std::fmt::Display for Cookie {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}={}", self.name, self.value)
    }
}

// Split one trimmed piece into a name and value around its only `=`.
// Neither side may be empty after trimming.
pub(crate) fn split_pair(piece: &str) -> Option<(&str, &str)> {
    let mut parts = piece.trim().split('=');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(name), Some(value), None) => {
            let name = name.trim();
            let value = value.trim();
            if name.is_empty() || value.is_empty() {
                None
            } else {
                Some((name, value))
            }
        },
        _ => None,
    }
}

/// Break a `Cookie` header value into its `;`-separated pairs, in order.
///
/// # Errors
///
/// [`HeaderError::MaliciousCookie`] is returned if any piece does not
/// contain exactly one `=`, or has an empty name or value.  One bad pair
/// fails the whole header.
pub fn parse_cookies(value: &str) -> Result<Vec<Cookie>, HeaderError> {
    value.split(';')
        .map(|piece| {
            split_pair(piece)
                .map(|(name, pair_value)| Cookie::new(name, pair_value))
                .ok_or_else(|| HeaderError::MaliciousCookie(value.into()))
        })
        .collect()
}
