//! Retention plans and deletion against an in-memory tag store.

use std::cell::RefCell;
use std::collections::BTreeSet;

use rstest::rstest;
use syncwright_release::{
    delete_tags, plan_retention, DeletionOutcome, ReleaseError, TagStore,
};

/// Ten minor lines 1.1 to 1.10 with patches 1 to 3 each.
fn ten_minor_lines() -> Vec<String> {
    (1..=10)
        .flat_map(|minor| (1..=3).map(move |patch| format!("1.{minor}.{patch}")))
        .collect()
}

fn names(tags: &[syncwright_release::Tag]) -> Vec<String> {
    tags.iter().map(|t| t.name.clone()).collect()
}

#[test]
fn five_recent_buckets_kept_whole_older_keep_patch_one() {
    let plan = plan_retention(&ten_minor_lines()).unwrap();

    for minor in 6..=10 {
        for patch in 1..=3 {
            assert!(names(&plan.keep).contains(&format!("1.{minor}.{patch}")));
        }
    }
    for minor in 1..=5 {
        assert!(names(&plan.keep).contains(&format!("1.{minor}.1")));
        assert!(names(&plan.delete).contains(&format!("1.{minor}.2")));
        assert!(names(&plan.delete).contains(&format!("1.{minor}.3")));
    }
    assert_eq!(plan.keep.len(), 15 + 5);
    assert_eq!(plan.delete.len(), 10);
}

#[test]
fn buckets_order_numerically_not_lexically() {
    // 1.10 sorts after 1.9 and 2.0 after both.
    let mut tags = ten_minor_lines();
    tags.extend(["2.0.1".to_string(), "2.0.2".to_string()]);
    let plan = plan_retention(&tags).unwrap();
    assert!(names(&plan.delete).contains(&"1.6.3".to_string()));
    assert!(names(&plan.keep).contains(&"1.7.3".to_string()));
    assert!(names(&plan.keep).contains(&"2.0.2".to_string()));
}

#[rstest]
#[case(Some(3), vec!["1.5.3", "1.5.2", "1.4.3"])]
#[case(Some(0), vec![])]
#[case(Some(50), vec!["1.5.3", "1.5.2", "1.4.3", "1.4.2", "1.3.3", "1.3.2", "1.2.3", "1.2.2", "1.1.3", "1.1.2"])]
fn limit_caps_to_most_recent(#[case] limit: Option<usize>, #[case] expected: Vec<&str>) {
    let plan = plan_retention(&ten_minor_lines()).unwrap().limit(limit);
    let store = MemoryStore::new(&ten_minor_lines());
    let deletions = delete_tags(&plan, &store, true);
    let tags: Vec<_> = deletions.iter().map(|d| d.tag.as_str()).collect();
    assert_eq!(tags, expected);
    assert!(deletions.iter().all(|d| d.outcome == DeletionOutcome::Planned));
}

struct MemoryStore {
    local: RefCell<BTreeSet<String>>,
    remote: RefCell<BTreeSet<String>>,
    remote_rejects: Option<String>,
}

impl MemoryStore {
    fn new(tags: &[String]) -> Self {
        let set: BTreeSet<String> = tags.iter().cloned().collect();
        Self {
            local: RefCell::new(set.clone()),
            remote: RefCell::new(set),
            remote_rejects: None,
        }
    }
}

impl TagStore for MemoryStore {
    fn list_tags(&self) -> Result<Vec<String>, ReleaseError> {
        Ok(self.local.borrow().iter().cloned().collect())
    }

    fn delete_local(&self, tag: &str) -> Result<(), ReleaseError> {
        self.local.borrow_mut().remove(tag);
        Ok(())
    }

    fn delete_remote(&self, tag: &str) -> Result<(), ReleaseError> {
        if self.remote_rejects.as_deref() == Some(tag) {
            return Err(ReleaseError::Git {
                args: format!("push origin :refs/tags/{tag}"),
                status: "exit status: 1".into(),
                stderr: "permission denied".into(),
            });
        }
        self.remote.borrow_mut().remove(tag);
        Ok(())
    }
}

#[test]
fn dry_run_touches_nothing() {
    let store = MemoryStore::new(&ten_minor_lines());
    let plan = plan_retention(&store.list_tags().unwrap()).unwrap();
    delete_tags(&plan, &store, true);
    assert_eq!(store.local.borrow().len(), 30);
    assert_eq!(store.remote.borrow().len(), 30);
}

#[test]
fn remote_failure_is_reported_not_rolled_back() {
    let mut store = MemoryStore::new(&ten_minor_lines());
    store.remote_rejects = Some("1.3.2".into());
    let plan = plan_retention(&store.list_tags().unwrap()).unwrap();

    let deletions = delete_tags(&plan, &store, false);

    let failed: Vec<_> = deletions.iter().filter(|d| d.needs_fixup()).collect();
    assert_eq!(failed.len(), 1);
    assert_eq!(failed[0].tag, "1.3.2");
    assert!(!store.local.borrow().contains("1.3.2"));
    assert!(store.remote.borrow().contains("1.3.2"));
    assert_eq!(store.local.borrow().len(), 20);
    assert_eq!(store.remote.borrow().len(), 21);
}
