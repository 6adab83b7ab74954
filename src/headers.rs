use super::authorization::{
    parse_authorization,
    Authorization,
};
use super::cookie::{
    parse_cookies,
    Cookie,
};
use super::error::{
    Error,
    HeaderError,
};
use super::security_field::{
    parse_security_fields,
    SecurityField,
};
use super::user_agent::{
    parse_user_agent,
    UserAgent,
};
use super::CRLF;

/// The value of one header, either kept verbatim or decomposed into the
/// structured shape selected by the header name.
#[derive(Clone, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum HeaderValue {
    Authorization(Authorization),
    Cookies(Vec<Cookie>),
    Raw(String),
    SecurityFields(Vec<SecurityField>),
    UserAgents(Vec<UserAgent>),
}

impl HeaderValue {
    /// Parse the value of the header with the given name.  The name is
    /// matched case-insensitively: `User-Agent`, `Cookie`, `Authorization`,
    /// and any name beginning with `Sec-` get a structured value; every
    /// other header is kept as raw text.
    ///
    /// # Errors
    ///
    /// The [`HeaderError`] of the selected value parser is returned if the
    /// value fails its grammar.
    pub fn parse(
        name: &str,
        value: &str,
    ) -> Result<Self, HeaderError> {
        let name = name.to_ascii_lowercase();
        match name.as_str() {
            "user-agent" => parse_user_agent(value).map(HeaderValue::UserAgents),
            "cookie" => parse_cookies(value).map(HeaderValue::Cookies),
            "authorization" => parse_authorization(value).map(HeaderValue::Authorization),
            name if name.starts_with("sec-") => {
                parse_security_fields(value).map(HeaderValue::SecurityFields)
            },
            _ => Ok(HeaderValue::Raw(value.into())),
        }
    }

    #[must_use]
    pub fn as_raw(&self) -> Option<&str> {
        match self {
            HeaderValue::Raw(value) => Some(value),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_user_agents(&self) -> Option<&[UserAgent]> {
        match self {
            HeaderValue::UserAgents(user_agents) => Some(user_agents),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_cookies(&self) -> Option<&[Cookie]> {
        match self {
            HeaderValue::Cookies(cookies) => Some(cookies),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_security_fields(&self) -> Option<&[SecurityField]> {
        match self {
            HeaderValue::SecurityFields(fields) => Some(fields),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_authorization(&self) -> Option<&Authorization> {
        match self {
            HeaderValue::Authorization(authorization) => Some(authorization),
            _ => None,
        }
    }
}

fn write_joined<T>(
    f: &mut std::fmt::Formatter<'_>,
    items: &[T],
    separator: &str,
) -> std::fmt::Result
    where T: std::fmt::Display
{
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            f.write_str(separator)?;
        }
        write!(f, "{}", item)?;
    }
    Ok(())
}

// The canonical text form.  Structured values are rendered with fixed
// separators, so this need not match the spacing of the text they were
// parsed from.
impl std::fmt::Display for HeaderValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HeaderValue::Authorization(authorization) => write!(f, "{}", authorization),
            HeaderValue::Cookies(cookies) => write_joined(f, cookies, "; "),
            HeaderValue::Raw(value) => f.write_str(value),
            HeaderValue::SecurityFields(fields) => write_joined(f, fields, ", "),
            HeaderValue::UserAgents(user_agents) => write_joined(f, user_agents, " "),
        }
    }
}

impl From<&str> for HeaderValue {
    fn from(value: &str) -> Self {
        HeaderValue::Raw(value.into())
    }
}

impl From<String> for HeaderValue {
    fn from(value: String) -> Self {
        HeaderValue::Raw(value)
    }
}

impl From<Authorization> for HeaderValue {
    fn from(authorization: Authorization) -> Self {
        HeaderValue::Authorization(authorization)
    }
}

impl From<Vec<Cookie>> for HeaderValue {
    fn from(cookies: Vec<Cookie>) -> Self {
        HeaderValue::Cookies(cookies)
    }
}

impl From<Vec<SecurityField>> for HeaderValue {
    fn from(fields: Vec<SecurityField>) -> Self {
        HeaderValue::SecurityFields(fields)
    }
}

impl From<Vec<UserAgent>> for HeaderValue {
    fn from(user_agents: Vec<UserAgent>) -> Self {
        HeaderValue::UserAgents(user_agents)
    }
}

/// An ordered collection of headers.  Names are compared
/// case-insensitively, and each name appears at most once: setting a header
/// which is already present replaces its value but keeps the position and
/// spelling of the name from when it was first set.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(
    feature = "serde",
    serde(from = "Vec<(String, HeaderValue)>", into = "Vec<(String, HeaderValue)>")
)]
pub struct Headers {
    headers: Vec<(String, HeaderValue)>,
}

impl Headers {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.headers.iter()
            .position(|(existing, _)| existing.eq_ignore_ascii_case(name))
    }

    /// Set the value of the named header, returning the value it replaced,
    /// if any.
    pub fn set_header<N, V>(
        &mut self,
        name: N,
        value: V,
    ) -> Option<HeaderValue>
        where N: AsRef<str> + Into<String>, V: Into<HeaderValue>
    {
        let value = value.into();
        match self.position(name.as_ref()) {
            Some(i) => Some(std::mem::replace(&mut self.headers[i].1, value)),
            None => {
                self.headers.push((name.into(), value));
                None
            },
        }
    }

    #[must_use]
    pub fn header_value(&self, name: &str) -> Option<&HeaderValue> {
        self.position(name)
            .map(|i| &self.headers[i].1)
    }

    #[must_use]
    pub fn has_header(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    pub fn remove_header(&mut self, name: &str) -> Option<HeaderValue> {
        self.position(name)
            .map(|i| self.headers.remove(i).1)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.headers.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.headers.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &HeaderValue)> {
        self.headers.iter()
            .map(|(name, value)| (name.as_str(), value))
    }

    /// Render each header as a `Name: value` line terminated by CRLF.  The
    /// blank line ending the header block is not included.
    ///
    /// # Errors
    ///
    /// [`Error::HeaderNotRenderable`], carrying the header name, is returned
    /// if the name is empty or contains `": "`, or if the name or rendered
    /// value contains a CR or LF, since such a header would not read back as
    /// the same single line.
    pub fn generate(&self) -> Result<String, Error> {
        let mut output = String::new();
        for (name, value) in &self.headers {
            let value = value.to_string();
            if
                name.is_empty()
                || name.contains(": ")
                || name.contains(&['\r', '\n'][..])
                || value.contains(&['\r', '\n'][..])
            {
                return Err(Error::HeaderNotRenderable(name.clone()));
            }
            output.push_str(&format!("{}: {}{}", name, value, CRLF));
        }
        Ok(output)
    }
}

impl<N, V> std::iter::FromIterator<(N, V)> for Headers
    where N: AsRef<str> + Into<String>, V: Into<HeaderValue>
{
    fn from_iter<I>(iter: I) -> Self
        where I: IntoIterator<Item = (N, V)>
    {
        let mut headers = Headers::new();
        for (name, value) in iter {
            headers.set_header(name, value);
        }
        headers
    }
}

impl From<Vec<(String, HeaderValue)>> for Headers {
    fn from(headers: Vec<(String, HeaderValue)>) -> Self {
        headers.into_iter().collect()
    }
}

impl From<Headers> for Vec<(String, HeaderValue)> {
    fn from(headers: Headers) -> Self {
        headers.headers
    }
}

/// Parse header lines, in order, up to the first empty line.  Returns the
/// headers along with the index of that empty line within `lines`.
///
/// # Errors
///
/// * [`Error::HeaderLineMissingDelimiter`] if a line has no `": "`.
/// * [`Error::HeaderLineEmptyName`] if a line has nothing before its `": "`.
/// * [`Error::HeaderValue`] if a structured value fails its grammar.
/// * [`Error::MissingHeaderSeparator`] if the lines run out before an empty
///   line is found.
pub fn parse_header_block<S>(lines: &[S]) -> Result<(Headers, usize), Error>
    where S: AsRef<str>
{
    let mut headers = Headers::new();
    for (i, line) in lines.iter().enumerate() {
        let line = line.as_ref();
        if line.is_empty() {
            tracing::trace!(count = headers.len(), "parsed header block");
            return Ok((headers, i));
        }
        let (name, value) = line.split_once(": ")
            .ok_or_else(|| Error::HeaderLineMissingDelimiter(line.into()))?;
        if name.is_empty() {
            return Err(Error::HeaderLineEmptyName(line.into()));
        }
        let value = HeaderValue::parse(name, value)
            .map_err(|source| {
                tracing::warn!(
                    header = name,
                    kind = ?source.kind(),
                    "rejected suspicious header value"
                );
                Error::HeaderValue {
                    name: name.into(),
                    source,
                }
            })?;
        headers.set_header(name, value);
    }
    Err(Error::MissingHeaderSeparator)
}
