//! UI Components for PDFTool.
//!
//! # Layout Components
//! - [`Header`] - Navigation bar with the theme toggle
//! - [`Hero`] - Main title and description
//! - [`Footer`] - Page footer
//! - [`LoadingOverlay`] - Full-page spinner shown while navigating
//!
//! # Feature Components
//! - [`UploadPanel`] - Drop zone, file input and upload controls
//! - [`FileList`] - Files selected for the next upload
//! - [`UploadProgress`] - One progress widget per running upload
//! - [`NotificationHost`] - Toast stack fed by the [`Notifier`](crate::Notifier)

mod header;
mod hero;
mod upload;
mod file_list;
mod progress;
mod notifications;
mod loading;
mod footer;

pub use header::*;
pub use hero::*;
pub use upload::*;
pub use file_list::*;
pub use progress::*;
pub use notifications::*;
pub use loading::*;
pub use footer::*;
