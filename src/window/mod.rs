//! Extension-host window proxy.
//!
//! Mirrors the window focus reported by the main process and forwards URI
//! requests to it. Focus notifications must be delivered serially by the
//! transport; every applied change reaches subscribers in subscription
//! order before [`WindowProxy::on_remote_focus_changed`] returns.

pub mod resolved;

use std::sync::{Arc, Weak};

use tokio::sync::watch;

use crate::error::{InvalidScheme, WindowError};
use crate::event::{Emitter, Subscription};
use crate::remote::service::MainWindowService;
use crate::remote::{ResolvedExternalUri, UriOpenOptions};
use crate::uri::{Uri, schemes};

use resolved::{ReleaseHandle, ResolvedUri};

/// Snapshot of the window state. Replaced, never mutated, on change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowState {
    pub focused: bool,
}

impl WindowState {
    /// State assumed until the main side reports otherwise.
    pub const INITIAL: WindowState = WindowState { focused: true };
}

impl Default for WindowState {
    fn default() -> Self {
        Self::INITIAL
    }
}

/// Target accepted by [`WindowProxy::open_uri`].
#[derive(Debug, Clone)]
pub enum UriInput {
    /// Parsed before validation.
    Text(String),
    Parsed(Uri),
}

impl From<&str> for UriInput {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

impl From<String> for UriInput {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<Uri> for UriInput {
    fn from(value: Uri) -> Self {
        Self::Parsed(value)
    }
}

/// Extension-host view of the main-side window.
pub struct WindowProxy {
    service: Arc<dyn MainWindowService>,
    state: watch::Sender<WindowState>,
    on_did_change_window_state: Emitter<WindowState>,
}

impl WindowProxy {
    /// Create a proxy over `service` and ask it for the current focus.
    ///
    /// Returns immediately with [`WindowState::INITIAL`]; the answer is
    /// applied through [`on_remote_focus_changed`](Self::on_remote_focus_changed)
    /// when it arrives. The query needs an ambient tokio runtime.
    pub fn new(service: Arc<dyn MainWindowService>) -> Arc<Self> {
        let (state, _) = watch::channel(WindowState::INITIAL);
        let proxy = Arc::new(Self {
            service,
            state,
            on_did_change_window_state: Emitter::new(),
        });
        proxy.query_initial_visibility();
        proxy
    }

    fn query_initial_visibility(self: &Arc<Self>) {
        let Ok(runtime) = tokio::runtime::Handle::try_current() else {
            tracing::warn!("no tokio runtime, window focus stays at its default until notified");
            return;
        };

        let service = Arc::clone(&self.service);
        let proxy: Weak<Self> = Arc::downgrade(self);
        runtime.spawn(async move {
            match service.get_window_visibility().await {
                Ok(focused) => {
                    if let Some(proxy) = proxy.upgrade() {
                        proxy.on_remote_focus_changed(focused);
                    }
                }
                Err(e) => tracing::warn!(error = %e, "window visibility query failed"),
            }
        });
    }

    /// Current window state.
    pub fn state(&self) -> WindowState {
        *self.state.borrow()
    }

    /// Receiver that observes every applied state change.
    pub fn watch_state(&self) -> watch::Receiver<WindowState> {
        self.state.subscribe()
    }

    /// Call `listener` with each new state, synchronously.
    pub fn on_did_change_window_state<F>(&self, listener: F) -> Subscription
    where
        F: Fn(&WindowState) + Send + Sync + 'static,
    {
        self.on_did_change_window_state.subscribe(listener)
    }

    /// Apply a focus notification pushed by the main side.
    ///
    /// A value equal to the cached one is ignored.
    pub fn on_remote_focus_changed(&self, focused: bool) {
        let mut next = None;
        self.state.send_if_modified(|state| {
            if state.focused == focused {
                return false;
            }
            *state = WindowState { focused };
            next = Some(*state);
            true
        });

        if let Some(state) = next {
            tracing::debug!(focused, "window focus changed");
            self.on_did_change_window_state.fire(&state);
        }
    }

    /// Ask the main side to open `target`.
    ///
    /// Strings are parsed first. Empty schemes and `command:` URIs are
    /// rejected without contacting the main side.
    pub async fn open_uri(
        &self,
        target: impl Into<UriInput>,
        options: UriOpenOptions,
    ) -> Result<bool, WindowError> {
        let uri = match target.into() {
            UriInput::Text(text) => Uri::parse(&text)
                .map_err(|source| WindowError::InvalidUri { input: text, source })?,
            UriInput::Parsed(uri) => uri,
        };
        check_open_scheme(uri.scheme())?;

        tracing::debug!(uri = %uri, "opening uri");
        Ok(self.service.open_uri(uri, options).await?)
    }

    /// Ask the main side for an externally reachable form of `uri`.
    ///
    /// Only `http` and `https` are accepted. The returned [`ResolvedUri`]
    /// owns the main-side mapping until released or dropped: keep it alive
    /// for as long as the resolved address is in use. Cloning the
    /// [`Uri`] out of it and dropping the guard releases the mapping at
    /// once.
    pub async fn resolve_external_uri(
        &self,
        uri: Uri,
        options: UriOpenOptions,
    ) -> Result<ResolvedUri, WindowError> {
        check_external_scheme(uri.scheme())?;

        tracing::debug!(uri = %uri, "resolving external uri");
        let ResolvedExternalUri { result, handle } =
            self.service.resolve_external_uri(uri, options).await?;

        // Guard first so a malformed reply still frees the handle.
        let release = ReleaseHandle::new(Arc::clone(&self.service), handle);
        let input = result.to_string();
        let resolved = Uri::from_components(result)
            .map_err(|source| WindowError::InvalidUri { input, source })?;

        Ok(ResolvedUri::new(resolved, release))
    }
}

fn check_open_scheme(scheme: &str) -> Result<(), InvalidScheme> {
    if scheme.trim().is_empty() {
        Err(InvalidScheme::Empty)
    } else if scheme == schemes::COMMAND {
        Err(InvalidScheme::NotAllowed(scheme.to_owned()))
    } else {
        Ok(())
    }
}

fn check_external_scheme(scheme: &str) -> Result<(), InvalidScheme> {
    if scheme.trim().is_empty() {
        Err(InvalidScheme::Empty)
    } else if scheme != schemes::HTTP && scheme != schemes::HTTPS {
        Err(InvalidScheme::NotAllowed(scheme.to_owned()))
    } else {
        Ok(())
    }
}
