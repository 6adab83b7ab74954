/// This is the enumeration of the ways a single header value can fail its
/// grammar.  Each is treated as a possible injection or smuggling attempt
/// rather than a formatting slip, so callers are expected to reject the
/// whole request.  The attached string is the offending header value.
#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
pub enum HeaderError {
    /// The `Authorization` value has no scheme/credentials delimiter, or
    /// one of the two parts is empty.
    #[error("malicious Authorization header value")]
    MaliciousAuthorization(String),

    /// A `Cookie` pair lacks exactly one `=`, or has an empty name or value.
    #[error("malicious Cookie header value")]
    MaliciousCookie(String),

    /// A `Sec-*` field lacks exactly one `=`, or has an empty name or value.
    #[error("malicious security field header value")]
    MaliciousSecurityField(String),

    /// The `User-Agent` value is empty, has an empty token, or has a token
    /// which cannot be split unambiguously into product and version.
    #[error("malicious User-Agent header value")]
    MaliciousUserAgent(String),
}

/// This is the enumeration of all the different kinds of errors which this
/// crate generates.  Every variant is a malformed request; header values
/// which failed their grammar are attached as the source of
/// [`Error::HeaderValue`].
#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
pub enum Error {
    /// The named header cannot be written as a single `Name: value` line,
    /// because the name is empty or contains `": "`, or because the name or
    /// value contains a CR or LF.
    #[error("header {0} cannot be written as a single line")]
    HeaderNotRenderable(String),

    /// A header line had nothing before its `": "` delimiter.
    #[error("header line has an empty name")]
    HeaderLineEmptyName(String),

    /// A header line did not contain the `": "` delimiter between the
    /// header name and value.
    #[error("header line is missing the \": \" delimiter")]
    HeaderLineMissingDelimiter(String),

    /// The value of the named header failed its grammar.
    #[error("malformed request: invalid value for header {name}")]
    HeaderValue {
        name: String,
        #[source]
        source: HeaderError,
    },

    /// The message is larger than the configured size limit, which is
    /// attached.
    #[error("message exceeds maximum size limit of {0} bytes")]
    MessageTooLong(usize),

    /// The input ended before the blank line separating the headers from
    /// the body.
    #[error("missing blank line between headers and body")]
    MissingHeaderSeparator,

    /// The request is not valid UTF-8 text.
    #[error("request is not valid text")]
    NotValidText(#[source] std::str::Utf8Error),

    /// One of the method, target, or protocol fields of the attached
    /// request line is empty.
    #[error("request line has an empty field")]
    RequestLineEmptyField(String),

    /// The attached request line does not split on spaces into exactly
    /// three fields.
    #[error("request line does not have exactly three fields")]
    RequestLineFieldCount(String),

    /// The attached method, target, or protocol cannot be written into a
    /// request line, because it is empty or contains a space, CR, or LF.
    #[error("request line field cannot be written")]
    RequestLineNotRenderable(String),

    /// The request line is longer than the configured limit, which is
    /// attached.
    #[error("request line exceeds limit of {0} bytes")]
    RequestLineTooLong(usize),
}

/// This is the coarse classification of an [`Error`], for callers which only
/// want to know whether a request was rejected for its structure or for a
/// suspicious header shape.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum ErrorKind {
    MalformedRequest,
    MaliciousAuthorization,
    MaliciousCookie,
    MaliciousSecurityField,
    MaliciousUserAgent,
}

impl HeaderError {
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            HeaderError::MaliciousAuthorization(_) => ErrorKind::MaliciousAuthorization,
            HeaderError::MaliciousCookie(_) => ErrorKind::MaliciousCookie,
            HeaderError::MaliciousSecurityField(_) => ErrorKind::MaliciousSecurityField,
            HeaderError::MaliciousUserAgent(_) => ErrorKind::MaliciousUserAgent,
        }
    }

    /// Returns the header value which failed its grammar.
    #[must_use]
    pub fn value(&self) -> &str {
        match self {
            HeaderError::MaliciousAuthorization(value)
            | HeaderError::MaliciousCookie(value)
            | HeaderError::MaliciousSecurityField(value)
            | HeaderError::MaliciousUserAgent(value) => value,
        }
    }
}

impl Error {
    /// Returns the most specific kind of the error: the `Malicious*` kind of
    /// an attached header error, or `MalformedRequest` otherwise.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        self.header_error()
            .map_or(ErrorKind::MalformedRequest, HeaderError::kind)
    }

    #[must_use]
    pub fn header_error(&self) -> Option<&HeaderError> {
        match self {
            Error::HeaderValue {source, ..} => Some(source),
            _ => None,
        }
    }

    #[must_use]
    pub fn is_malicious(&self) -> bool {
        self.header_error().is_some()
    }
}
