//! Upload services.
//!
//! # Services
//!
//! - [`upload`] - upload sessions: validation, progress, outcome, cancellation
//! - [`transport`] - the transport seam and the `XMLHttpRequest` implementation
//! - [`fetch`] - `fetch`-based transport via `gloo-net` (no progress)

pub mod upload;
pub mod transport;
pub mod fetch;

pub use upload::*;
pub use transport::*;
pub use fetch::*;
