//! Common test utilities for tofu-forms tests

pub mod fixtures;
pub mod mock_transport;
pub mod raw_server;

// Re-exports for convenience - not all test binaries use all exports
#[allow(unused_imports)]
pub use fixtures::*;
#[allow(unused_imports)]
pub use mock_transport::{MockTransport, RecordingSink};
#[allow(unused_imports)]
pub use raw_server::status_line_server;
