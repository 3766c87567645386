//! URI values exchanged with the main-side window service.
//!
//! A [`Uri`] is always valid once constructed: both [`Uri::parse`] and
//! [`Uri::from_components`] run the same checks. [`UriComponents`] is the
//! unvalidated wire shape that crosses the process boundary.

mod parse;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use parse::{AUTHORITY_ESCAPE, PATH_ESCAPE, QUERY_ESCAPE};

/// Well-known scheme names.
pub mod schemes {
    pub const HTTP: &str = "http";
    pub const HTTPS: &str = "https";
    pub const FILE: &str = "file";
    /// Internal command links. Never accepted from extension input.
    pub const COMMAND: &str = "command";
}

/// URI validation error.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UriError {
    /// The scheme contains characters outside `[A-Za-z0-9_+.-]` or starts
    /// with one of `+.-`.
    #[error("scheme contains illegal characters: '{0}'")]
    IllegalScheme(String),
    /// An authority is present but the path does not start with `/`.
    #[error("path must be empty or start with '/' when an authority is present: '{0}'")]
    AuthorityPathNotAbsolute(String),
    /// No authority is present but the path starts with `//`.
    #[error("path cannot start with '//' when there is no authority: '{0}'")]
    DoubleSlashPathWithoutAuthority(String),
}

/// Wire form of a [`Uri`]. Fields are decoded and unvalidated.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UriComponents {
    pub scheme: String,
    #[serde(default)]
    pub authority: String,
    #[serde(default)]
    pub path: String,
    #[serde(default)]
    pub query: String,
    #[serde(default)]
    pub fragment: String,
}

impl fmt::Display for UriComponents {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.scheme.is_empty() {
            write!(f, "{}:", self.scheme)?;
        }
        if !self.authority.is_empty() {
            write!(f, "//{}", self.authority)?;
        }
        f.write_str(&self.path)?;
        if !self.query.is_empty() {
            write!(f, "?{}", self.query)?;
        }
        if !self.fragment.is_empty() {
            write!(f, "#{}", self.fragment)?;
        }
        Ok(())
    }
}

/// A validated URI.
///
/// Components are stored decoded; [`fmt::Display`] re-encodes them.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "UriComponents", try_from = "UriComponents")]
pub struct Uri {
    scheme: String,
    authority: String,
    path: String,
    query: String,
    fragment: String,
}

impl Uri {
    /// Parse a URI string.
    ///
    /// A string without a `scheme:` prefix parses successfully with an
    /// empty scheme; callers decide whether that is acceptable.
    pub fn parse(value: &str) -> Result<Self, UriError> {
        let parts = parse::split(value);
        Self::build(UriComponents {
            scheme: parts.scheme.to_owned(),
            authority: parse::percent_decode(parts.authority),
            path: parse::percent_decode(parts.path),
            query: parse::percent_decode(parts.query),
            fragment: parse::percent_decode(parts.fragment),
        })
    }

    /// Build a URI from already-decoded components, validating them.
    pub fn from_components(components: UriComponents) -> Result<Self, UriError> {
        Self::build(components)
    }

    fn build(components: UriComponents) -> Result<Self, UriError> {
        let UriComponents {
            scheme,
            authority,
            path,
            query,
            fragment,
        } = components;

        let path = resolve_reference_path(&scheme, path);
        validate(&scheme, &authority, &path)?;

        Ok(Self {
            scheme,
            authority,
            path,
            query,
            fragment,
        })
    }

    pub fn scheme(&self) -> &str {
        &self.scheme
    }

    pub fn authority(&self) -> &str {
        &self.authority
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn fragment(&self) -> &str {
        &self.fragment
    }

    pub fn to_components(&self) -> UriComponents {
        UriComponents {
            scheme: self.scheme.clone(),
            authority: self.authority.clone(),
            path: self.path.clone(),
            query: self.query.clone(),
            fragment: self.fragment.clone(),
        }
    }
}

/// Web and file URIs always carry an absolute path.
fn resolve_reference_path(scheme: &str, path: String) -> String {
    match scheme {
        schemes::HTTP | schemes::HTTPS | schemes::FILE => {
            if path.is_empty() {
                "/".to_owned()
            } else if !path.starts_with('/') {
                format!("/{path}")
            } else {
                path
            }
        }
        _ => path,
    }
}

fn validate(scheme: &str, authority: &str, path: &str) -> Result<(), UriError> {
    if !scheme.is_empty() && !parse::is_valid_scheme(scheme) {
        return Err(UriError::IllegalScheme(scheme.to_owned()));
    }

    if path.is_empty() {
        return Ok(());
    }
    if !authority.is_empty() {
        if !path.starts_with('/') {
            return Err(UriError::AuthorityPathNotAbsolute(path.to_owned()));
        }
    } else if path.starts_with("//") {
        return Err(UriError::DoubleSlashPathWithoutAuthority(path.to_owned()));
    }
    Ok(())
}

impl fmt::Display for Uri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.scheme.is_empty() {
            write!(f, "{}:", self.scheme)?;
        }
        if !self.authority.is_empty() || self.scheme == schemes::FILE {
            write!(f, "//{}", parse::percent_encode(&self.authority, AUTHORITY_ESCAPE))?;
        }
        f.write_str(&parse::percent_encode(&self.path, PATH_ESCAPE))?;
        if !self.query.is_empty() {
            write!(f, "?{}", parse::percent_encode(&self.query, QUERY_ESCAPE))?;
        }
        if !self.fragment.is_empty() {
            write!(f, "#{}", parse::percent_encode(&self.fragment, QUERY_ESCAPE))?;
        }
        Ok(())
    }
}

impl FromStr for Uri {
    type Err = UriError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<UriComponents> for Uri {
    type Error = UriError;

    fn try_from(components: UriComponents) -> Result<Self, Self::Error> {
        Self::from_components(components)
    }
}

impl From<Uri> for UriComponents {
    fn from(uri: Uri) -> Self {
        UriComponents {
            scheme: uri.scheme,
            authority: uri.authority,
            path: uri.path,
            query: uri.query,
            fragment: uri.fragment,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_http_uri() {
        let uri = Uri::parse("https://example.com/docs?page=2#intro").unwrap();
        assert_eq!(uri.scheme(), "https");
        assert_eq!(uri.authority(), "example.com");
        assert_eq!(uri.path(), "/docs");
        assert_eq!(uri.query(), "page=2");
        assert_eq!(uri.fragment(), "intro");
    }

    #[test]
    fn parse_without_scheme_is_not_an_error() {
        let uri = Uri::parse("not a uri with spaces and no scheme").unwrap();
        assert_eq!(uri.scheme(), "");
        assert_eq!(uri.path(), "not a uri with spaces and no scheme");
    }

    #[test]
    fn web_uri_without_path_gets_root() {
        let uri = Uri::parse("http://localhost:3000").unwrap();
        assert_eq!(uri.authority(), "localhost:3000");
        assert_eq!(uri.path(), "/");
        assert_eq!(uri.to_string(), "http://localhost:3000/");
    }

    #[test]
    fn illegal_scheme_is_rejected() {
        let err = Uri::parse("a b:c").unwrap_err();
        assert_eq!(err, UriError::IllegalScheme("a b".into()));
    }

    #[test]
    fn authority_requires_absolute_path() {
        let err = Uri::from_components(UriComponents {
            scheme: "vscode-remote".into(),
            authority: "host".into(),
            path: "relative".into(),
            ..Default::default()
        })
        .unwrap_err();
        assert!(matches!(err, UriError::AuthorityPathNotAbsolute(_)));
    }

    #[test]
    fn web_scheme_fixes_relative_path() {
        let uri = Uri::from_components(UriComponents {
            scheme: "https".into(),
            authority: "host".into(),
            path: "relative".into(),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(uri.path(), "/relative");
    }

    #[test]
    fn double_slash_path_needs_authority() {
        let err = Uri::from_components(UriComponents {
            scheme: "untitled".into(),
            path: "//x".into(),
            ..Default::default()
        })
        .unwrap_err();
        assert!(matches!(err, UriError::DoubleSlashPathWithoutAuthority(_)));
    }

    #[test]
    fn percent_escapes_are_decoded_then_reencoded() {
        let uri = Uri::parse("file:///tmp/a%20b.txt").unwrap();
        assert_eq!(uri.path(), "/tmp/a b.txt");
        assert_eq!(uri.to_string(), "file:///tmp/a%20b.txt");

        let uri = Uri::parse("https://example.com/search?q=rust lang#top").unwrap();
        assert_eq!(uri.query(), "q=rust lang");
        assert_eq!(uri.to_string(), "https://example.com/search?q=rust%20lang#top");
    }

    #[test]
    fn invalid_escape_keeps_other_escapes_decoded() {
        let uri = Uri::parse("https://h/a%20b%FF").unwrap();
        assert_eq!(uri.path(), "/a b%FF");
        assert_eq!(uri.to_string(), "https://h/a%20b%25FF");

        let uri = Uri::parse("https://h/%E2%82%AC%80").unwrap();
        assert_eq!(uri.path(), "/€%80");
        assert_eq!(uri.to_string(), "https://h/%E2%82%AC%2580");
    }

    #[test]
    fn command_uri_parses() {
        let uri: Uri = "command:workbench.action.reloadWindow".parse().unwrap();
        assert_eq!(uri.scheme(), schemes::COMMAND);
        assert_eq!(uri.path(), "workbench.action.reloadWindow");
    }

    #[test]
    fn components_display_is_raw() {
        let components = UriComponents {
            scheme: "http".into(),
            authority: "localhost:8080".into(),
            path: "/a b".into(),
            query: "x=1".into(),
            fragment: String::new(),
        };
        assert_eq!(components.to_string(), "http://localhost:8080/a b?x=1");
    }

    #[test]
    fn uri_travels_as_components() {
        let uri = Uri::parse("https://example.com:443/path?x=1").unwrap();
        let bytes = rmp_serde::to_vec_named(&uri).unwrap();

        let components: UriComponents = rmp_serde::from_slice(&bytes).unwrap();
        assert_eq!(components, uri.to_components());

        let back: Uri = rmp_serde::from_slice(&bytes).unwrap();
        assert_eq!(back, uri);
    }

    #[test]
    fn invalid_components_fail_to_deserialize() {
        let bad = UriComponents {
            scheme: "no spaces".into(),
            ..Default::default()
        };
        let bytes = rmp_serde::to_vec_named(&bad).unwrap();
        assert!(rmp_serde::from_slice::<Uri>(&bytes).is_err());
    }
}
