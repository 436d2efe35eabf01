//! tintwall-io: browser I/O for the tintwall gallery.
//!
//! Implements the core crate's `Page` over the live DOM, wraps image
//! load and decode events as futures, binds the page's `pixelsJS`
//! library as a filter engine, and drives the gallery from page load.

pub mod console_log;
pub mod dom;
pub mod driver;
pub mod error;
pub mod load;
pub mod pixels;
pub mod pixels_js;

pub use dom::DomPage;
pub use driver::{DriverError, run};
pub use error::DomError;
pub use pixels_js::{PixelsJsEngine, select_engine};
