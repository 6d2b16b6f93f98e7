#![allow(dead_code, unused_imports)]

pub use buildgate_test_utils::builders::{RevisionBuilder, SettingsBuilder};
pub use buildgate_test_utils::fake_executor::FakeExecutor;
pub use buildgate_test_utils::fake_publisher::{FakePublisher, Published};
pub use buildgate_test_utils::{init_tracing, with_timeout};

use buildgate::revision::Revision;

/// The revision from the usual worked example: alice touches libs/core at 100.
pub fn alice_core_at(ts: i64) -> Revision {
    RevisionBuilder::new("r1")
        .author("alice", "alice@example.com")
        .message("fix parser")
        .at(ts)
        .path("libs/core/x.c")
        .build()
}
