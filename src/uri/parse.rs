//! Low-level URI splitting and percent-coding.
//!
//! The split follows the generic RFC 3986 appendix B expression, which
//! matches any input: a string with no `scheme:` prefix simply yields an
//! empty scheme. Validation of the pieces happens in [`super::Uri`].

use std::sync::LazyLock;

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, percent_decode_str, utf8_percent_encode};
use regex::{Captures, Regex};

static URI_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(([^:/?#]+?):)?(//([^/?#]*))?([^?#]*)(\?([^#]*))?(#(.*))?")
        .expect("uri split pattern is valid")
});

static ESCAPE_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(%[0-9A-Fa-f]{2})+").expect("escape run pattern is valid"));

/// Everything except the RFC 3986 unreserved characters.
const RESERVED: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

const SUB_DELIMS_ALLOWED: &AsciiSet = &RESERVED
    .remove(b'!')
    .remove(b'$')
    .remove(b'&')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')')
    .remove(b'*')
    .remove(b'+')
    .remove(b',')
    .remove(b';')
    .remove(b'=');

/// Bytes escaped in the authority.
pub(super) const AUTHORITY_ESCAPE: &AsciiSet = &SUB_DELIMS_ALLOWED
    .remove(b':')
    .remove(b'@')
    .remove(b'[')
    .remove(b']');
/// Bytes escaped in the path.
pub(super) const PATH_ESCAPE: &AsciiSet = &SUB_DELIMS_ALLOWED
    .remove(b'/')
    .remove(b':')
    .remove(b'@');
/// Bytes escaped in the query and fragment.
pub(super) const QUERY_ESCAPE: &AsciiSet = &PATH_ESCAPE.remove(b'?');

/// Borrowed, still-encoded pieces of a URI string.
#[derive(Debug, Default, PartialEq, Eq)]
pub(super) struct RawParts<'a> {
    pub scheme: &'a str,
    pub authority: &'a str,
    pub path: &'a str,
    pub query: &'a str,
    pub fragment: &'a str,
}

/// Split `input` into its five components without decoding them.
pub(super) fn split(input: &str) -> RawParts<'_> {
    let Some(caps) = URI_PATTERN.captures(input) else {
        return RawParts::default();
    };
    let group = |i: usize| caps.get(i).map_or("", |m| m.as_str());

    RawParts {
        scheme: group(2),
        authority: group(4),
        path: group(5),
        query: group(7),
        fragment: group(9),
    }
}

/// `^\w[\w\d+.-]*$` over ASCII word characters.
pub(super) fn is_valid_scheme(scheme: &str) -> bool {
    let mut chars = scheme.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphanumeric() || first == '_' => {
            chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '+' | '.' | '-'))
        }
        _ => false,
    }
}

/// Decode `%XX` escapes.
///
/// Each run of consecutive escapes is decoded on its own. Bytes of a run
/// that do not form valid UTF-8 keep their original escapes, so one bad
/// sequence never blocks decoding of the rest of the component.
pub(super) fn percent_decode(input: &str) -> String {
    if !input.contains('%') {
        return input.to_owned();
    }
    ESCAPE_RUN
        .replace_all(input, |caps: &Captures<'_>| decode_run(&caps[0]))
        .into_owned()
}

/// `run` is a sequence of `%XX` escapes, three input bytes per decoded byte.
fn decode_run(run: &str) -> String {
    if let Ok(decoded) = percent_decode_str(run).decode_utf8() {
        return decoded.into_owned();
    }

    let bytes: Vec<u8> = percent_decode_str(run).collect();
    let mut out = String::with_capacity(run.len());
    let mut offset = 0;
    for chunk in bytes.utf8_chunks() {
        out.push_str(chunk.valid());
        offset += chunk.valid().len();

        let invalid = chunk.invalid().len();
        out.push_str(&run[offset * 3..(offset + invalid) * 3]);
        offset += invalid;
    }
    out
}

/// Escape every byte in `set`.
pub(super) fn percent_encode(input: &str, set: &'static AsciiSet) -> String {
    utf8_percent_encode(input, set).to_string()
}
