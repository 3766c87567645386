//! Resolved external URIs and their main-side handles.

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::remote::ExternalUriHandle;
use crate::remote::service::MainWindowService;
use crate::uri::Uri;

/// Guard owning one main-side handle. Sends at most one release.
pub(crate) struct ReleaseHandle {
    handle: ExternalUriHandle,
    service: Arc<dyn MainWindowService>,
    released: AtomicBool,
}

impl ReleaseHandle {
    pub(crate) fn new(service: Arc<dyn MainWindowService>, handle: ExternalUriHandle) -> Self {
        Self {
            handle,
            service,
            released: AtomicBool::new(false),
        }
    }

    /// Returns `true` if this call sent the release.
    fn release(&self) -> bool {
        if self.released.swap(true, Ordering::AcqRel) {
            return false;
        }
        tracing::debug!(handle = %self.handle, "releasing resolved external uri");
        self.service.release_resolved_external_uri(self.handle);
        true
    }
}

impl Drop for ReleaseHandle {
    fn drop(&mut self) {
        self.release();
    }
}

/// An external URI resolved by the main side.
///
/// The main side keeps a mapping alive for [`resolved`](Self::resolved)
/// until [`release`](Self::release) is called or this value is dropped,
/// whichever comes first. Further releases are no-ops.
#[must_use = "dropping a ResolvedUri releases its main-side mapping"]
pub struct ResolvedUri {
    resolved: Uri,
    release: ReleaseHandle,
}

impl ResolvedUri {
    pub(crate) fn new(resolved: Uri, release: ReleaseHandle) -> Self {
        Self { resolved, release }
    }

    pub fn resolved(&self) -> &Uri {
        &self.resolved
    }

    pub fn handle(&self) -> ExternalUriHandle {
        self.release.handle
    }

    /// Tell the main side it may forget this mapping.
    pub fn release(&self) {
        self.release.release();
    }

    pub fn is_released(&self) -> bool {
        self.release.released.load(Ordering::Acquire)
    }
}

impl fmt::Debug for ResolvedUri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResolvedUri")
            .field("resolved", &self.resolved)
            .field("handle", &self.release.handle)
            .field("released", &self.is_released())
            .finish()
    }
}
