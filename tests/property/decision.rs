use proptest::prelude::*;

use buildgate::engine::decide;
use buildgate::revision::Revision;
use buildgate::watermark::MemoryWatermarkStore;

use crate::common::{RevisionBuilder, SettingsBuilder};

const DIRS: [&str; 3] = ["libs/core", "libs/net", "apps/web"];
const AUTHORS: [&str; 3] = ["alice", "bob", "jenkins"];

// (author index, timestamp, bitmask of touched directories)
fn revision_strategy() -> impl Strategy<Value = (usize, i64, u8)> {
    (0..AUTHORS.len(), 1i64..10_000, 0u8..8)
}

fn build_history(raw: &[(usize, i64, u8)]) -> Vec<Revision> {
    raw.iter()
        .enumerate()
        .map(|(i, (author, ts, mask))| {
            let name = AUTHORS[*author];
            let mut builder = RevisionBuilder::new(&format!("r{i}"))
                .author(name, &format!("{name}@example.com"))
                .at(*ts);
            for (bit, dir) in DIRS.iter().enumerate() {
                if mask & (1 << bit) != 0 {
                    builder = builder.path(&format!("{dir}/file{i}.c"));
                }
            }
            builder.build()
        })
        .collect()
}

fn criteria() -> buildgate::criteria::Criteria {
    SettingsBuilder::new()
        .include_dir("libs/core")
        .include_dir("libs/net")
        .include_dir("apps/web")
        .exclude_user("jenkins")
        .criteria()
}

proptest! {
    #[test]
    fn newest_timestamp_is_max_of_qualifying_revisions(
        raw in proptest::collection::vec(revision_strategy(), 0..20),
        seed in proptest::option::of(0i64..10_000),
    ) {
        let history = build_history(&raw);
        let store = match seed {
            Some(ts) => MemoryWatermarkStore::new().with("libs/core", ts),
            None => MemoryWatermarkStore::new(),
        };

        let decision = decide(&criteria(), history.iter().cloned().map(Ok), &store).unwrap();

        let expected = decision
            .qualifying
            .iter()
            .map(|q| q.commit_timestamp)
            .max()
            .unwrap_or(0);
        prop_assert_eq!(decision.newest_qualifying_timestamp, expected);
        prop_assert_eq!(decision.must_run, !decision.directories.is_empty());
        prop_assert_eq!(decision.revisions_examined, history.len());
    }

    #[test]
    fn excluded_authors_never_qualify(
        raw in proptest::collection::vec(revision_strategy(), 0..20),
    ) {
        let history = build_history(&raw);
        let decision = decide(&criteria(), history.iter().cloned().map(Ok), &MemoryWatermarkStore::new()).unwrap();

        for q in &decision.qualifying {
            let rev = history.iter().find(|r| r.id == q.id).unwrap();
            prop_assert_ne!(rev.author_name.as_str(), "jenkins");
        }
    }

    #[test]
    fn selected_directories_are_unique_and_order_independent_as_a_set(
        raw in proptest::collection::vec(revision_strategy(), 0..20),
    ) {
        let history = build_history(&raw);
        let forward = decide(&criteria(), history.iter().cloned().map(Ok), &MemoryWatermarkStore::new()).unwrap();
        let backward = decide(&criteria(), history.iter().rev().cloned().map(Ok), &MemoryWatermarkStore::new()).unwrap();

        let mut seen = std::collections::HashSet::new();
        for dir in &forward.directories {
            prop_assert!(seen.insert(dir.clone()), "duplicate directory {}", dir);
        }

        let mut a = forward.directories.clone();
        let mut b = backward.directories.clone();
        a.sort();
        b.sort();
        prop_assert_eq!(a, b);
        prop_assert_eq!(forward.newest_qualifying_timestamp, backward.newest_qualifying_timestamp);
    }

    #[test]
    fn watermark_at_or_after_every_commit_blocks_directory(
        raw in proptest::collection::vec(revision_strategy(), 0..20),
    ) {
        let history = build_history(&raw);
        let store = MemoryWatermarkStore::new().with("libs/net", 10_000);

        let decision = decide(&criteria(), history.iter().cloned().map(Ok), &store).unwrap();

        prop_assert!(!decision.contains("libs/net"));
    }
}
