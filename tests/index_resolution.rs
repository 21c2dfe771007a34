// tests/index_resolution.rs

use std::path::Path;

use vigil::watch::TaskPathIndex;

#[test]
fn resolve_prefers_exact_match_over_parent() {
    let mut index = TaskPathIndex::new();
    index.bind("/proj/src".into(), "dir-task".to_string());
    index.bind("/proj/src/app.js".into(), "file-task".to_string());

    assert_eq!(
        index.resolve(Path::new("/proj/src/app.js")),
        Some(&"file-task".to_string())
    );
    assert_eq!(
        index.resolve(Path::new("/proj/src/other.js")),
        Some(&"dir-task".to_string())
    );
}

#[test]
fn resolve_does_not_walk_past_the_parent() {
    let mut index = TaskPathIndex::new();
    index.bind("/proj/src".into(), "T".to_string());

    // Grandparent is bound, parent is not: correctly NotFound rather than a
    // guess, since the tree walk registers every intermediate directory.
    assert_eq!(index.resolve(Path::new("/proj/src/unregistered/deep.js")), None);
}

#[test]
fn missing_paths_resolve_to_none() {
    let index = TaskPathIndex::new();
    assert_eq!(index.resolve(Path::new("/nowhere/file.js")), None);
}

#[test]
fn rebinding_a_path_replaces_the_owner() {
    let mut index = TaskPathIndex::new();
    index.bind("/proj/shared".into(), "first".to_string());
    index.bind("/proj/shared".into(), "second".to_string());

    assert_eq!(
        index.owner_of(Path::new("/proj/shared")),
        Some(&"second".to_string())
    );
    assert_eq!(index.len(), 1);
}
