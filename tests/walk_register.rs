// tests/walk_register.rs

use std::fs;
use std::path::PathBuf;

use vigil::watch::tree::register_task_roots;
use vigil::watch::TaskPathIndex;

mod common;
use common::{closure_task, node_task, ScriptedPrimitive};

#[test]
fn directory_task_registers_every_subdirectory() {
    let tmp = tempfile::tempdir().unwrap();
    let root = tmp.path().canonicalize().unwrap();
    let nested = root.join("a").join("b").join("c");
    fs::create_dir_all(&nested).unwrap();
    fs::write(root.join("a").join("x.js"), "x").unwrap();

    let task = node_task("T", &root);
    let mut primitive = ScriptedPrimitive::new();
    let mut index = TaskPathIndex::new();
    register_task_roots(&mut primitive, &mut index, &task);

    for dir in [
        root.clone(),
        root.join("a"),
        root.join("a").join("b"),
        nested.clone(),
    ] {
        assert!(primitive.is_registered(&dir), "missing watch on {dir:?}");
    }

    // A file anywhere in the tree resolves through its parent directory.
    assert_eq!(
        index.resolve(&nested.join("deep.js")),
        Some(&"T".to_string())
    );
}

#[test]
fn single_file_source_binds_the_exact_path_too() {
    let tmp = tempfile::tempdir().unwrap();
    let root = tmp.path().canonicalize().unwrap();
    let source = root.join("app.js");
    fs::write(&source, "x").unwrap();

    let task = closure_task("minify", vec![source.clone()], root.join("app.min.js"));
    let mut primitive = ScriptedPrimitive::new();
    let mut index = TaskPathIndex::new();
    register_task_roots(&mut primitive, &mut index, &task);

    assert!(primitive.is_registered(&root));
    assert_eq!(index.owner_of(&source), Some(&"minify".to_string()));
}

#[test]
fn missing_root_is_skipped_without_failing() {
    let tmp = tempfile::tempdir().unwrap();
    let root = tmp.path().canonicalize().unwrap();
    let task = node_task("T", root.join("does-not-exist"));

    let mut primitive = ScriptedPrimitive::new();
    let mut index = TaskPathIndex::new();
    register_task_roots(&mut primitive, &mut index, &task);

    assert!(primitive.registered().is_empty());
    assert!(index.is_empty());
}

#[test]
fn overlapping_roots_hand_the_overlap_to_the_later_task() {
    let tmp = tempfile::tempdir().unwrap();
    let root = tmp.path().canonicalize().unwrap();
    let shared = root.join("shared");
    fs::create_dir(&shared).unwrap();

    let first = node_task("first", &shared);
    let second = node_task("second", &shared);

    let mut primitive = ScriptedPrimitive::new();
    let mut index = TaskPathIndex::new();
    register_task_roots(&mut primitive, &mut index, &first);
    register_task_roots(&mut primitive, &mut index, &second);

    let file: PathBuf = shared.join("f.js");
    assert_eq!(index.resolve(&file), Some(&"second".to_string()));
}
