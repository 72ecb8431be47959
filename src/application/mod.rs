// Application layer - use cases on top of the record store.
// The aggregation itself lives in the domain and stays free of I/O.

pub mod error;
pub mod reporting;
pub mod service;

pub use error::*;
pub use reporting::*;
pub use service::*;
