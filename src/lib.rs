#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

mod authorization;
mod cookie;
mod error;
mod headers;
mod request;
mod security_field;
mod user_agent;

pub use crate::authorization::{
    parse_authorization,
    Authorization,
};
pub use crate::cookie::{
    parse_cookies,
    Cookie,
};
pub use crate::error::{
    Error,
    ErrorKind,
    HeaderError,
};
pub use crate::headers::{
    parse_header_block,
    HeaderValue,
    Headers,
};
pub use crate::request::{
    parse_request_line,
    Parser,
    Request,
};
pub use crate::security_field::{
    parse_security_fields,
    SecurityField,
};
pub use crate::user_agent::{
    parse_user_agent,
    UserAgent,
};

// This is the character sequence corresponding to a carriage return (CR)
// followed by a line feed (LF), which officially delimits each
// line of an HTTP request.
const CRLF: &str = "\r\n";
