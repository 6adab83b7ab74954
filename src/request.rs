use super::error::Error;
use super::headers::{
    parse_header_block,
    Headers,
};
use super::CRLF;

/// Split a request line, which must not include its line terminator, on
/// single spaces into the method, target URI, and protocol.  No
/// normalization is done on any of the three.
///
/// # Errors
///
/// * [`Error::RequestLineFieldCount`] if the line does not contain exactly
///   two spaces, which includes a target URI with unescaped spaces.
/// * [`Error::RequestLineEmptyField`] if any of the three fields is empty.
pub fn parse_request_line(request_line: &str) -> Result<(&str, &str, &str), Error> {
    let mut fields = request_line.split(' ');
    match (fields.next(), fields.next(), fields.next(), fields.next()) {
        (Some(method), Some(target), Some(protocol), None) => {
            if method.is_empty() || target.is_empty() || protocol.is_empty() {
                Err(Error::RequestLineEmptyField(request_line.into()))
            } else {
                Ok((method, target, protocol))
            }
        },
        _ => Err(Error::RequestLineFieldCount(request_line.into())),
    }
}

/// Settings used when parsing requests.  No limits are set by default, in
/// which case the caller is responsible for bounding the size of what it
/// passes in.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct Parser {
    pub max_message_size: Option<usize>,
    pub request_line_limit: Option<usize>,
}

impl Parser {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a complete raw request: request line, CRLF-terminated header
    /// lines, a blank line, and the body.  Lines are delimited strictly by
    /// CRLF; bare line feeds are not recognized as line breaks.
    ///
    /// # Errors
    ///
    /// Any problem with the request is returned as an [`Error`].  When a
    /// header value fails its grammar, the [`HeaderError`] is attached as
    /// the source of [`Error::HeaderValue`].
    ///
    /// [`HeaderError`]: crate::HeaderError
    pub fn parse<T>(
        &self,
        raw_request: T
    ) -> Result<Request, Error>
        where T: AsRef<[u8]>
    {
        let result = self.parse_request(raw_request.as_ref());
        if let Err(error) = &result {
            tracing::debug!(%error, kind = ?error.kind(), "rejected request");
        }
        result
    }

    fn parse_request(
        &self,
        raw_request: &[u8]
    ) -> Result<Request, Error> {
        match self.max_message_size {
            Some(max_message_size) if raw_request.len() > max_message_size => {
                return Err(Error::MessageTooLong(max_message_size));
            },
            _ => (),
        }
        let raw_request = std::str::from_utf8(raw_request)
            .map_err(Error::NotValidText)?;
        let (request_line, remainder) = match raw_request.split_once(CRLF) {
            Some((request_line, remainder)) => (request_line, Some(remainder)),
            None => (raw_request, None),
        };
        match self.request_line_limit {
            Some(limit) if request_line.len() > limit => {
                return Err(Error::RequestLineTooLong(limit));
            },
            _ => (),
        }
        let (method, target, protocol) = parse_request_line(request_line)?;
        tracing::trace!(method, target, protocol, "parsed request line");
        let remainder = remainder.ok_or(Error::MissingHeaderSeparator)?;
        let lines = remainder.split(CRLF).collect::<Vec<_>>();

        // The last piece is not followed by a CRLF, so it can never be the
        // blank line which ends the headers.
        let terminated = &lines[..lines.len().saturating_sub(1)];
        let (headers, separator) = parse_header_block(terminated)?;
        Ok(Request{
            method: method.into(),
            target: target.into(),
            protocol: protocol.into(),
            headers,
            body: lines[separator + 1..].join(CRLF),
        })
    }
}

/// A complete HTTP request.  The body is everything after the blank line
/// which ends the headers.
#[derive(Clone, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Request {
    pub method: String,
    pub target: String,
    pub protocol: String,
    pub headers: Headers,
    pub body: String,
}

impl Request {
    /// Parse a complete raw request with no size limits.  See
    /// [`Parser::parse`].
    ///
    /// # Errors
    ///
    /// Any problem with the request is returned as an [`Error`].
    pub fn parse<T>(raw_request: T) -> Result<Self, Error>
        where T: AsRef<[u8]>
    {
        Parser::new().parse(raw_request)
    }

    /// Render the request as raw bytes.  Structured header values are
    /// written in their canonical form, which may differ in spacing from
    /// the text originally parsed, so parsing and then generating a request
    /// is not guaranteed to reproduce the original bytes.
    ///
    /// # Errors
    ///
    /// * [`Error::RequestLineNotRenderable`] if the method, target, or
    ///   protocol is empty or contains a space, CR, or LF.
    /// * [`Error::HeaderNotRenderable`] if a header could not be read back as
    ///   the same single line (see [`Headers::generate`]).
    pub fn generate(&self) -> Result<Vec<u8>, Error> {
        for field in &[&self.method, &self.target, &self.protocol] {
            if field.is_empty() || field.contains(&[' ', '\r', '\n'][..]) {
                return Err(Error::RequestLineNotRenderable((*field).clone()));
            }
        }
        let mut output = format!(
            "{} {} {}{}",
            self.method,
            self.target,
            self.protocol,
            CRLF
        );
        output.push_str(&self.headers.generate()?);
        output.push_str(CRLF);
        output.push_str(&self.body);
        Ok(output.into_bytes())
    }

    #[must_use]
    pub fn new() -> Self {
        Self{
            method: "GET".into(),
            target: "/".into(),
            protocol: "HTTP/1.1".into(),
            headers: Headers::new(),
            body: String::new(),
        }
    }
}

impl Default for Request {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {

    use super::*;
    use crate::{
        Authorization,
        Cookie,
        ErrorKind,
        HeaderError,
        HeaderValue,
        SecurityField,
        UserAgent,
    };

    #[test]
    fn parse_request_line_fields() {
        assert_eq!(
            Ok(("GET", "/api/v1/users?page=2", "HTTP/1.1")),
            parse_request_line("GET /api/v1/users?page=2 HTTP/1.1")
        );
        assert_eq!(
            Ok(("get", "*", "http/2")),
            parse_request_line("get * http/2")
        );
    }

    #[test]
    fn parse_request_line_wrong_field_count() {
        for request_line in &[
            "GET /hello.txt",
            "GET",
            "",
            "GET /hello world.txt HTTP/1.1",
            "GET /hello.txt HTTP/1.1 ",
        ] {
            assert_eq!(
                Err(Error::RequestLineFieldCount((*request_line).into())),
                parse_request_line(request_line)
            );
        }
    }

    #[test]
    fn parse_request_line_empty_field() {
        for request_line in &[" /hello.txt HTTP/1.1", "GET  HTTP/1.1", "GET /hello.txt "] {
            assert_eq!(
                Err(Error::RequestLineEmptyField((*request_line).into())),
                parse_request_line(request_line)
            );
        }
    }

    #[test]
    fn parse_get_request() {
        let request = Request::parse(concat!(
            "GET /api/v1/users HTTP/1.1\r\n",
            "Host: example.com\r\n",
            "Cookie: a=1; b=2\r\n",
            "\r\n",
        )).unwrap();
        assert_eq!("GET", request.method);
        assert_eq!("/api/v1/users", request.target);
        assert_eq!("HTTP/1.1", request.protocol);
        assert_eq!(2, request.headers.len());
        assert_eq!(
            Some(&HeaderValue::Raw("example.com".into())),
            request.headers.header_value("Host")
        );
        assert_eq!(
            Some(&HeaderValue::Cookies(vec![
                Cookie::new("a", "1"),
                Cookie::new("b", "2"),
            ])),
            request.headers.header_value("Cookie")
        );
        assert_eq!("", request.body);
    }

    #[test]
    fn parse_structured_headers() {
        let request = Request::parse(concat!(
            "GET /hello.txt HTTP/1.1\r\n",
            "User-Agent: curl/7.16.3 libcurl/7.16.3 OpenSSL/0.9.7l zlib/1.2.3\r\n",
            "Authorization: Bearer abc.def.ghi\r\n",
            "Sec-Fetch: mode=navigate, dest=document\r\n",
            "Accept-Language: en, mi\r\n",
            "\r\n",
        )).unwrap();
        assert_eq!(
            Some(&[
                UserAgent::new_product("curl", "7.16.3"),
                UserAgent::new_product("libcurl", "7.16.3"),
                UserAgent::new_product("OpenSSL", "0.9.7l"),
                UserAgent::new_product("zlib", "1.2.3"),
            ][..]),
            request.headers.header_value("user-agent").and_then(HeaderValue::as_user_agents)
        );
        assert_eq!(
            Some(&Authorization::new("Bearer", "abc.def.ghi")),
            request.headers.header_value("Authorization").and_then(HeaderValue::as_authorization)
        );
        assert_eq!(
            Some(&[
                SecurityField::new("mode", "navigate"),
                SecurityField::new("dest", "document"),
            ][..]),
            request.headers.header_value("Sec-Fetch").and_then(HeaderValue::as_security_fields)
        );
        assert_eq!(
            Some("en, mi"),
            request.headers.header_value("Accept-Language").and_then(HeaderValue::as_raw)
        );
    }

    #[test]
    fn parse_post_request_body_keeps_line_breaks() {
        let request = Request::parse(concat!(
            "POST / HTTP/1.1\r\n",
            "Host: foo.com\r\n",
            "Content-Type: text/plain\r\n",
            "\r\n",
            "line one\r\n",
            "\r\n",
            "line three\r\n",
        )).unwrap();
        assert_eq!("POST", request.method);
        assert_eq!("line one\r\n\r\nline three\r\n", request.body);
    }

    #[test]
    fn parse_request_with_no_headers() {
        assert_eq!(
            Ok(Request{
                method: "OPTIONS".into(),
                target: "*".into(),
                protocol: "HTTP/1.0".into(),
                headers: Headers::new(),
                body: "ping".into(),
            }),
            Request::parse("OPTIONS * HTTP/1.0\r\n\r\nping")
        );
    }

    #[test]
    fn parse_invalid_missing_separator() {
        assert_eq!(
            Err(Error::MissingHeaderSeparator),
            Request::parse("GET / HTTP/1.1\r\nHost: foo.com\r\n")
        );
        assert_eq!(
            Err(Error::MissingHeaderSeparator),
            Request::parse("GET / HTTP/1.1")
        );
    }

    #[test]
    fn parse_invalid_no_headers_and_no_separator() {
        assert_eq!(
            Err(Error::MissingHeaderSeparator),
            Request::parse("GET / HTTP/1.1\r\n")
        );
        assert_eq!(
            Err(Error::MissingHeaderSeparator),
            Request::parse("GET / HTTP/1.1\r\nHost: foo.com\r\nAccept: */*\r\n")
        );
    }

    #[test]
    fn parse_separator_followed_by_nothing() {
        let request = Request::parse("GET / HTTP/1.1\r\nHost: foo.com\r\n\r\n").unwrap();
        assert_eq!(1, request.headers.len());
        assert_eq!("", request.body);
    }

    #[test]
    fn parse_invalid_bare_line_feeds() {
        assert_eq!(
            Err(Error::RequestLineFieldCount("GET / HTTP/1.1\nHost: foo.com\n\n".into())),
            Request::parse("GET / HTTP/1.1\nHost: foo.com\n\n")
        );
        assert_eq!(
            Err(Error::MissingHeaderSeparator),
            Request::parse("GET / HTTP/1.1\r\nHost: foo.com\n\n")
        );
    }

    #[test]
    fn parse_invalid_request_line() {
        assert_eq!(
            Err(Error::RequestLineFieldCount("GET /hello world HTTP/1.1".into())),
            Request::parse("GET /hello world HTTP/1.1\r\n\r\n")
        );
        assert_eq!(
            Err(Error::RequestLineFieldCount(String::new())),
            Request::parse("")
        );
    }

    #[test]
    fn parse_invalid_text() {
        let result = Request::parse(b"GET /\xff HTTP/1.1\r\n\r\n");
        assert!(matches!(result, Err(Error::NotValidText(_))));
        assert_eq!(ErrorKind::MalformedRequest, result.unwrap_err().kind());
    }

    #[test]
    fn parse_invalid_damaged_header() {
        assert_eq!(
            Err(Error::HeaderLineMissingDelimiter("User-Agent curl/7.16.3".into())),
            Request::parse(concat!(
                "GET /hello.txt HTTP/1.1\r\n",
                "User-Agent curl/7.16.3\r\n",
                "\r\n",
            ))
        );
    }

    #[test]
    fn parse_malicious_header_fails_whole_request() {
        let result = Request::parse(concat!(
            "GET / HTTP/1.1\r\n",
            "Host: foo.com\r\n",
            "Cookie: a=1; b\r\n",
            "\r\n",
        ));
        assert_eq!(
            Err(Error::HeaderValue {
                name: "Cookie".into(),
                source: HeaderError::MaliciousCookie("a=1; b".into()),
            }),
            result
        );
        assert_eq!(ErrorKind::MaliciousCookie, result.unwrap_err().kind());
    }

    #[test]
    fn parse_malicious_kinds() {
        let cases = [
            ("User-Agent: a/b/c", ErrorKind::MaliciousUserAgent),
            ("Authorization: Bearer", ErrorKind::MaliciousAuthorization),
            ("Sec-Fetch-Mode: navigate", ErrorKind::MaliciousSecurityField),
            ("cookie: =", ErrorKind::MaliciousCookie),
        ];
        for (header_line, kind) in &cases {
            let raw_request = format!("GET / HTTP/1.1\r\n{}\r\n\r\n", header_line);
            let error = Request::parse(raw_request).unwrap_err();
            assert_eq!(*kind, error.kind());
            assert!(error.is_malicious());
        }
    }

    #[test]
    fn parse_duplicate_header_last_wins() {
        let request = Request::parse(concat!(
            "GET / HTTP/1.1\r\n",
            "Cookie: a=1\r\n",
            "Host: foo.com\r\n",
            "cookie: b=2\r\n",
            "\r\n",
        )).unwrap();
        assert_eq!(2, request.headers.len());
        assert_eq!(
            vec![
                ("Cookie", &HeaderValue::Cookies(vec![Cookie::new("b", "2")])),
                ("Host", &HeaderValue::Raw("foo.com".into())),
            ],
            request.headers.iter().collect::<Vec<_>>()
        );
    }

    #[test]
    fn max_message_size_checked() {
        let raw_request = "GET / HTTP/1.1\r\nHost: foo.com\r\n\r\n";
        let mut parser = Parser::new();
        parser.max_message_size = Some(raw_request.len());
        assert!(parser.parse(raw_request).is_ok());
        parser.max_message_size = Some(raw_request.len() - 1);
        assert_eq!(
            Err(Error::MessageTooLong(raw_request.len() - 1)),
            parser.parse(raw_request)
        );
    }

    #[test]
    fn request_line_limit_checked() {
        let raw_request = String::from("GET /")
            + &"X".repeat(100)
            + " HTTP/1.1\r\n\r\n";
        let mut parser = Parser::new();
        parser.request_line_limit = Some(114);
        assert!(parser.parse(&raw_request).is_ok());
        parser.request_line_limit = Some(113);
        assert_eq!(
            Err(Error::RequestLineTooLong(113)),
            parser.parse(&raw_request)
        );
    }

    #[test]
    fn request_line_limit_checked_without_line_break() {
        let mut parser = Parser::new();
        parser.request_line_limit = Some(10);
        assert_eq!(
            Err(Error::RequestLineTooLong(10)),
            parser.parse("GET /".to_string() + &"X".repeat(100))
        );
    }

    #[test]
    fn generate_get_request() {
        let mut request = Request::new();
        request.target = "/foo".into();
        request.headers.set_header("Host", "www.example.com");
        request.headers.set_header("Content-Type", "text/plain");
        assert_eq!(
            Ok(concat!(
                "GET /foo HTTP/1.1\r\n",
                "Host: www.example.com\r\n",
                "Content-Type: text/plain\r\n",
                "\r\n",
            ).as_bytes()),
            request.generate().as_deref()
        );
    }

    #[test]
    fn generate_put_request_with_structured_headers() {
        let mut request = Request::new();
        request.method = "PUT".into();
        request.target = "/foo".into();
        request.headers.set_header("Authorization", Authorization::new("Basic", "dXNlcg=="));
        request.headers.set_header("Cookie", vec![Cookie::new("a", "1"), Cookie::new("b", "2")]);
        request.body = "FeelsGoodMan".into();
        assert_eq!(
            Ok(concat!(
                "PUT /foo HTTP/1.1\r\n",
                "Authorization: Basic dXNlcg==\r\n",
                "Cookie: a=1; b=2\r\n",
                "\r\n",
                "FeelsGoodMan",
            ).as_bytes()),
            request.generate().as_deref()
        );
    }

    #[test]
    fn generate_request_with_no_headers() {
        assert_eq!(
            Ok(&b"GET / HTTP/1.1\r\n\r\n"[..]),
            Request::new().generate().as_deref()
        );
    }

    #[test]
    fn generate_refuses_unwritable_request_line() {
        let mut request = Request::new();
        request.target = "/a b".into();
        assert_eq!(
            Err(Error::RequestLineNotRenderable("/a b".into())),
            request.generate()
        );
        let mut request = Request::new();
        request.protocol = "HTTP/1.1\r\nInjected: 1".into();
        assert_eq!(
            Err(Error::RequestLineNotRenderable("HTTP/1.1\r\nInjected: 1".into())),
            request.generate()
        );
        let mut request = Request::new();
        request.method = String::new();
        assert_eq!(
            Err(Error::RequestLineNotRenderable(String::new())),
            request.generate()
        );
    }

    #[test]
    fn generate_refuses_header_line_injection() {
        let mut request = Request::new();
        request.headers.set_header("X-Evil", "a\r\nInjected: 1");
        assert_eq!(
            Err(Error::HeaderNotRenderable("X-Evil".into())),
            request.generate()
        );
    }

    #[test]
    fn raw_headers_regenerate_verbatim() {
        let raw_request = concat!(
            "GET / HTTP/1.1\r\n",
            "X-Custom:   spaced ; odd,value: here  \r\n",
            "\r\n",
        );
        let request = Request::parse(raw_request).unwrap();
        assert_eq!(
            Some("  spaced ; odd,value: here  "),
            request.headers.header_value("X-Custom").and_then(HeaderValue::as_raw)
        );
        assert_eq!(Ok(raw_request.as_bytes()), request.generate().as_deref());
    }

    #[test]
    fn structured_headers_regenerate_in_canonical_form() {
        let raw_request = concat!(
            "GET / HTTP/1.1\r\n",
            "Cookie: a=1;b=2\r\n",
            "Sec-Test:  x=1 ,y=2\r\n",
            "\r\n",
        );
        let request = Request::parse(raw_request).unwrap();
        let generated = request.generate().unwrap();
        assert_ne!(raw_request.as_bytes(), &generated[..]);
        assert_eq!(
            concat!(
                "GET / HTTP/1.1\r\n",
                "Cookie: a=1; b=2\r\n",
                "Sec-Test: x=1, y=2\r\n",
                "\r\n",
            ).as_bytes(),
            &generated[..]
        );
        assert_eq!(Ok(request), Request::parse(generated));
    }

}
