//! Reference tokens (`node://<id>`, `asset://<id>`).
//!
//! Link editors store links to other nodes and assets as reference tokens.
//! A property may be a single token or free text with tokens embedded in it
//! (e.g. an `href` inside rich text).

use std::borrow::Cow;
use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

#[allow(clippy::expect_used)]
static NODE_URI: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^node://[a-z0-9-]+$").expect("valid node URI pattern"));

#[allow(clippy::expect_used)]
static ASSET_URI: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^asset://[a-z0-9-]+$").expect("valid asset URI pattern"));

/// Shared pattern for tokens embedded in text. Group 1 is the scheme.
#[allow(clippy::expect_used)]
static SUPPORTED_URIS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(node|asset)://([a-z0-9-]+)").expect("valid reference URI pattern")
});

/// Scheme of a reference token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReferenceScheme {
    Node,
    Asset,
}

impl ReferenceScheme {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReferenceScheme::Node => "node",
            ReferenceScheme::Asset => "asset",
        }
    }

    fn from_scheme(scheme: &str) -> Option<Self> {
        match scheme {
            "node" => Some(ReferenceScheme::Node),
            "asset" => Some(ReferenceScheme::Asset),
            _ => None,
        }
    }
}

/// A parsed reference token borrowing from its source string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReferenceToken<'a> {
    pub scheme: ReferenceScheme,
    /// Identifier after `://`.
    pub identifier: &'a str,
    /// Full token text, e.g. `node://abc-123`.
    pub uri: &'a str,
}

impl fmt::Display for ReferenceToken<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.uri)
    }
}

/// Parse a string that consists of exactly one reference token.
///
/// A single trailing newline is tolerated and excluded from the token.
pub fn parse_exact(value: &str) -> Option<ReferenceToken<'_>> {
    let value = value.strip_suffix('\n').unwrap_or(value);
    let scheme = if NODE_URI.is_match(value) {
        ReferenceScheme::Node
    } else if ASSET_URI.is_match(value) {
        ReferenceScheme::Asset
    } else {
        return None;
    };

    let identifier = &value[scheme.as_str().len() + "://".len()..];
    Some(ReferenceToken {
        scheme,
        identifier,
        uri: value,
    })
}

/// Replace every token embedded in `input` with its resolved URI.
///
/// A token resolving to `None` is replaced by the empty string. The first
/// resolver error aborts the rewrite. Input without tokens is borrowed back.
pub fn rewrite_embedded<F, E>(input: &str, mut resolve: F) -> Result<Cow<'_, str>, E>
where
    F: FnMut(ReferenceToken<'_>) -> Result<Option<String>, E>,
{
    let mut matches = SUPPORTED_URIS.captures_iter(input).peekable();
    if matches.peek().is_none() {
        return Ok(Cow::Borrowed(input));
    }

    let mut result = String::with_capacity(input.len());
    let mut last_end = 0;

    for caps in matches {
        let (Some(whole), Some(scheme), Some(identifier)) = (caps.get(0), caps.get(1), caps.get(2))
        else {
            continue;
        };
        let Some(scheme) = ReferenceScheme::from_scheme(scheme.as_str()) else {
            continue;
        };

        let token = ReferenceToken {
            scheme,
            identifier: identifier.as_str(),
            uri: whole.as_str(),
        };

        result.push_str(&input[last_end..whole.start()]);
        if let Some(resolved) = resolve(token)? {
            result.push_str(&resolved);
        }
        last_end = whole.end();
    }

    result.push_str(&input[last_end..]);
    Ok(Cow::Owned(result))
}
