//! Inclusion filtering, descriptor loading, and error-tree ordering tests.

use assert_fs::prelude::*;
use predicates::prelude::*;
use rstest::rstest;
use syncwright_core::{
    build_catalog, config, get_included_ids, CanonicalId, CoreError, DescriptorFactory, ErrorTree,
};

fn seed_sources(dir: &assert_fs::TempDir) {
    dir.child("src").create_dir_all().unwrap();
    for id in ["alpha", "beta", "gamma"] {
        dir.child("src").child(format!("{id}.ts")).write_str("// unit").unwrap();
    }
}

fn names(ids: &[CanonicalId]) -> Vec<&str> {
    ids.iter().map(CanonicalId::as_str).collect()
}

// ---------------------------------------------------------------------------
// 1. Inclusion filtering
// ---------------------------------------------------------------------------

#[rstest]
#[case::commented_out("alpha\n# beta\n", &["alpha"])]
#[case::empty_includes_all("", &["alpha", "beta", "gamma"])]
#[case::comments_only("# nothing\n\n", &["alpha", "beta", "gamma"])]
#[case::unknown_ids_ignored("delta\ngamma\n", &["gamma"])]
fn inclusion_filter_cases(#[case] inclusion: &str, #[case] expected: &[&str]) {
    let dir = assert_fs::TempDir::new().unwrap();
    seed_sources(&dir);
    let cfg = dir.child("exchanges.cfg");
    cfg.write_str(inclusion).unwrap();

    let ids = get_included_ids(cfg.path(), &dir.path().join("src"), ".ts").expect("ids");
    assert_eq!(names(&ids), expected);
}

#[test]
fn missing_discovery_dir_reports_path() {
    let dir = assert_fs::TempDir::new().unwrap();
    let err = get_included_ids(&dir.path().join("none.cfg"), &dir.path().join("src"), "ts")
        .unwrap_err();
    assert!(matches!(err, CoreError::Io { .. }));
    assert!(predicate::str::contains("src").eval(&err.to_string()));
}

// ---------------------------------------------------------------------------
// 2. Catalog build from descriptors
// ---------------------------------------------------------------------------

#[test]
fn catalog_built_from_mixed_descriptor_shapes() {
    let dir = assert_fs::TempDir::new().unwrap();
    let descriptors = dir.child("descriptors");
    descriptors.create_dir_all().unwrap();
    descriptors
        .child("alpha.yaml")
        .write_str("id: alpha\nname: Alpha\ncertified: true\ndiscount: 0.1\n")
        .unwrap();
    descriptors
        .child("beta.yaml")
        .write_str("id: beta\nmeta:\n  name: Beta\n  pro: true\n")
        .unwrap();

    let ids = vec![CanonicalId::from("alpha"), CanonicalId::from("beta")];
    let catalog = build_catalog(&ids, &DescriptorFactory::new(descriptors.path())).expect("build");
    let records = catalog.records();
    assert_eq!(records[0].discount, Some(0.1));
    assert!(records[1].pro);
}

// ---------------------------------------------------------------------------
// 3. Error tree ordering
// ---------------------------------------------------------------------------

fn nested_source(depth: usize, breadth: usize) -> String {
    fn level(out: &mut String, prefix: &str, depth: usize, breadth: usize, indent: usize) {
        if depth == 0 {
            return;
        }
        for i in 0..breadth {
            let name = format!("{prefix}{i}");
            out.push_str(&" ".repeat(indent));
            out.push_str(&name);
            out.push_str(":\n");
            level(out, &format!("{name}_"), depth - 1, breadth, indent + 2);
        }
    }
    let mut out = String::from("BaseError:\n");
    level(&mut out, "E", depth, breadth, 2);
    out
}

#[rstest]
#[case(1, 4)]
#[case(3, 2)]
#[case(5, 2)]
fn flatten_lists_parents_before_children(#[case] depth: usize, #[case] breadth: usize) {
    let dir = assert_fs::TempDir::new().unwrap();
    let file = dir.child("errors.yaml");
    file.write_str(&nested_source(depth, breadth)).unwrap();

    let tree = ErrorTree::load(file.path()).expect("tree");
    let order = tree.flatten();
    assert_eq!(order[0], "BaseError");
    for node in tree.nodes() {
        if let Some(parent) = &node.parent {
            let p = order.iter().position(|n| *n == parent.as_str()).unwrap();
            let c = order.iter().position(|n| *n == node.name).unwrap();
            assert!(p < c, "{parent} must precede {}", node.name);
        }
    }
}

#[test]
fn config_parse_error_names_the_file() {
    let dir = assert_fs::TempDir::new().unwrap();
    dir.child("syncwright.yaml")
        .write_str("registries: [unclosed")
        .unwrap();
    let err = config::load_at(dir.path()).unwrap_err();
    assert!(matches!(err, CoreError::Parse { .. }));
    assert!(err.to_string().contains("syncwright.yaml"));
}
