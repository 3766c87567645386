//! MainWindowService trait — the requests the proxy sends to the main side.

use super::{ExternalUriHandle, RemoteFuture, ResolvedExternalUri, UriOpenOptions};
use crate::uri::Uri;

/// Remote half of the window service, living in the main process.
///
/// Implementations wrap whatever transport connects the two processes.
/// Requests return boxed futures so the proxy can hold the service as
/// `Arc<dyn MainWindowService>`; releases are fire-and-forget.
pub trait MainWindowService: Send + Sync {
    /// Whether the window currently has OS focus.
    fn get_window_visibility(&self) -> RemoteFuture<'_, bool>;

    /// Open `uri` with whatever handler the main side picks. Resolves to
    /// whether something was opened.
    fn open_uri(&self, uri: Uri, options: UriOpenOptions) -> RemoteFuture<'_, bool>;

    /// Map `uri` to a form reachable from outside the extension host.
    ///
    /// The main side keeps state for the returned handle until
    /// [`release_resolved_external_uri`](Self::release_resolved_external_uri)
    /// is called with it.
    fn resolve_external_uri(
        &self,
        uri: Uri,
        options: UriOpenOptions,
    ) -> RemoteFuture<'_, ResolvedExternalUri>;

    /// Drop the main-side state behind `handle`.
    fn release_resolved_external_uri(&self, handle: ExternalUriHandle);
}
