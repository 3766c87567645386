//! Main-side window service boundary.
//!
//! [`service::MainWindowService`] is the capability the proxy is built
//! with. The types here are what travels across the process boundary.

pub mod service;

#[cfg(test)]
pub(crate) mod fake;

use futures::future::BoxFuture;
use serde::{Deserialize, Serialize};

use crate::uri::UriComponents;

/// Boxed future returned by every remote request.
pub type RemoteFuture<'a, T> = BoxFuture<'a, Result<T, RemoteError>>;

/// Failure reported by the remote side or the transport carrying the call.
///
/// The proxy never rewrites these; they reach the caller as returned.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RemoteError {
    /// The main process is gone or the channel to it closed.
    #[error("main window service is unavailable")]
    Disconnected,
    /// The main side rejected or failed the request.
    #[error("{0}")]
    Failed(String),
}

/// Opaque id of a resolved-URI mapping held by the main side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExternalUriHandle(pub u64);

impl std::fmt::Display for ExternalUriHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Display::fmt(&self.0, f)
    }
}

/// Reply to a resolve request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedExternalUri {
    pub result: UriComponents,
    pub handle: ExternalUriHandle,
}

/// Which contributed openers the main side may use.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ContributedOpeners {
    /// Allow (`true`) or forbid (`false`) all of them.
    All(bool),
    /// Prefer the opener with this id.
    Only(String),
}

/// Open/resolve options. Forwarded to the main side untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UriOpenOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allow_tunneling: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allow_contributed_openers: Option<ContributedOpeners>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_reply_survives_msgpack() {
        let reply = ResolvedExternalUri {
            result: UriComponents {
                scheme: "http".into(),
                authority: "127.0.0.1:49152".into(),
                path: "/".into(),
                ..Default::default()
            },
            handle: ExternalUriHandle(7),
        };
        let bytes = rmp_serde::to_vec_named(&reply).unwrap();
        let back: ResolvedExternalUri = rmp_serde::from_slice(&bytes).unwrap();
        assert_eq!(back, reply);
    }

    #[test]
    fn options_keep_opener_preference() {
        let options = UriOpenOptions {
            allow_tunneling: Some(true),
            allow_contributed_openers: Some(ContributedOpeners::Only("simpleBrowser".into())),
        };
        let bytes = rmp_serde::to_vec_named(&options).unwrap();
        let back: UriOpenOptions = rmp_serde::from_slice(&bytes).unwrap();
        assert_eq!(back, options);
    }

    #[test]
    fn remote_error_text_is_passed_through() {
        assert_eq!(
            RemoteError::Failed("no handler for scheme".into()).to_string(),
            "no handler for scheme"
        );
    }
}
