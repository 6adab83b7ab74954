use super::error::HeaderError;

/// One space-delimited token of a `User-Agent` header value.  A token
/// containing a `/` is a product and version pair; any other token is kept
/// whole as a bare comment, with the product and version left empty.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct UserAgent {
    pub product: String,
    pub version: String,
    pub comment: String,
}

impl UserAgent {
    #[must_use]
    pub fn new_product<P, V>(
        product: P,
        version: V,
    ) -> Self
        where P: Into<String>, V: Into<String>
    {
        Self{
            product: product.into(),
            version: version.into(),
            comment: String::new(),
        }
    }

    #[must_use]
    pub fn new_comment<C>(comment: C) -> Self
        where C: Into<String>
    {
        Self{
            comment: comment.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn is_comment(&self) -> bool {
        self.product.is_empty()
    }
}

impl std::fmt::Display for UserAgent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_comment() {
            write!(f, "{}", self.comment)
        } else {
            write!(f, "{}/{}", self.product, self.version)
        }
    }
}

fn parse_token(token: &str) -> Option<UserAgent> {
    if token.is_empty() {
        return None;
    }
    match token.split_once('/') {
        Some((product, version)) => {
            if product.is_empty() || version.is_empty() || version.contains('/') {
                None
            } else {
                Some(UserAgent::new_product(product, version))
            }
        },
        None => Some(UserAgent::new_comment(token)),
    }
}

/// Break a `User-Agent` header value into its space-delimited tokens.  Every
/// token yields exactly one entry, so a parenthesized comment containing
/// spaces comes back as several bare-comment entries.
///
/// # Errors
///
/// [`HeaderError::MaliciousUserAgent`] is returned if the value is empty,
/// contains an empty token (leading, trailing, or repeated spaces), or
/// contains a token which does not split cleanly on a single `/` into a
/// non-empty product and version.
pub fn parse_user_agent(value: &str) -> Result<Vec<UserAgent>, HeaderError> {
    if value.is_empty() {
        return Err(HeaderError::MaliciousUserAgent(value.into()));
    }
    value.split(' ')
        .map(|token| {
            parse_token(token)
                .ok_or_else(|| HeaderError::MaliciousUserAgent(value.into()))
        })
        .collect()
}
