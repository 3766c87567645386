//! In-memory [`MainWindowService`] that records every request.

use std::sync::Mutex;

use super::service::MainWindowService;
use super::{ExternalUriHandle, RemoteError, RemoteFuture, ResolvedExternalUri, UriOpenOptions};
use crate::uri::{Uri, UriComponents};

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Call {
    GetWindowVisibility,
    OpenUri(Uri, UriOpenOptions),
    ResolveExternalUri(Uri, UriOpenOptions),
}

pub(crate) struct RecordingService {
    /// `None` leaves the visibility query pending forever.
    pub visibility: Option<Result<bool, RemoteError>>,
    pub open_result: Result<bool, RemoteError>,
    pub resolve_result: Result<ResolvedExternalUri, RemoteError>,
    calls: Mutex<Vec<Call>>,
    released: Mutex<Vec<ExternalUriHandle>>,
}

impl RecordingService {
    pub fn new() -> Self {
        Self {
            visibility: None,
            open_result: Ok(true),
            resolve_result: Ok(ResolvedExternalUri {
                result: UriComponents {
                    scheme: "http".into(),
                    authority: "127.0.0.1:49152".into(),
                    path: "/".into(),
                    ..Default::default()
                },
                handle: ExternalUriHandle(1),
            }),
            calls: Mutex::new(Vec::new()),
            released: Mutex::new(Vec::new()),
        }
    }

    pub fn with_visibility(mut self, visibility: Result<bool, RemoteError>) -> Self {
        self.visibility = Some(visibility);
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    /// Calls other than the construction-time visibility query.
    pub fn uri_calls(&self) -> Vec<Call> {
        self.calls()
            .into_iter()
            .filter(|c| *c != Call::GetWindowVisibility)
            .collect()
    }

    pub fn released(&self) -> Vec<ExternalUriHandle> {
        self.released.lock().unwrap().clone()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }
}

impl MainWindowService for RecordingService {
    fn get_window_visibility(&self) -> RemoteFuture<'_, bool> {
        self.record(Call::GetWindowVisibility);
        let Some(result) = self.visibility.clone() else {
            return Box::pin(futures::future::pending::<Result<bool, RemoteError>>());
        };
        Box::pin(async move { result })
    }

    fn open_uri(&self, uri: Uri, options: UriOpenOptions) -> RemoteFuture<'_, bool> {
        self.record(Call::OpenUri(uri, options));
        let result = self.open_result.clone();
        Box::pin(async move { result })
    }

    fn resolve_external_uri(
        &self,
        uri: Uri,
        options: UriOpenOptions,
    ) -> RemoteFuture<'_, ResolvedExternalUri> {
        self.record(Call::ResolveExternalUri(uri, options));
        let result = self.resolve_result.clone();
        Box::pin(async move { result })
    }

    fn release_resolved_external_uri(&self, handle: ExternalUriHandle) {
        self.released.lock().unwrap().push(handle);
    }
}
