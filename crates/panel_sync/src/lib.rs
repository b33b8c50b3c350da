pub mod names;
pub mod proxy;

mod entry;
pub use entry::*;

mod error;
pub use error::*;

mod reconciler;
pub use reconciler::*;

mod service;
pub use service::*;
