//! Extension-host side of the window service.
//!
//! [`WindowProxy`] mirrors the focus state owned by the main process and
//! forwards URI open/resolve requests to it through an injected
//! [`MainWindowService`]. The transport that actually crosses the process
//! boundary lives outside this crate.

pub mod error;
pub mod event;
pub mod logging;
pub mod remote;
pub mod uri;
pub mod window;

pub use error::{InvalidScheme, WindowError};
pub use event::{Emitter, Subscription};
pub use logging::{LogConfig, LoggingError, init_logging};
pub use remote::service::MainWindowService;
pub use remote::{
    ContributedOpeners, ExternalUriHandle, RemoteError, RemoteFuture, ResolvedExternalUri,
    UriOpenOptions,
};
pub use uri::{Uri, UriComponents, UriError, schemes};
pub use window::resolved::ResolvedUri;
pub use window::{UriInput, WindowProxy, WindowState};
