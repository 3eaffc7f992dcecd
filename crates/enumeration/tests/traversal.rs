use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use enumeration::{
    EnumerationOptions, ErrorKind, FileAttributes, FileSystemEnumerable, SearchTarget, factory,
};
use test_support::FileTree;

fn collect(enumerable: &FileSystemEnumerable<PathBuf>) -> Vec<PathBuf> {
    enumerable
        .enumerator()
        .expect("enumerator")
        .map(|item| item.expect("entry"))
        .collect()
}

fn sample_tree() -> FileTree {
    FileTree::new().file("a.txt", "alpha").file("sub/b.txt", "beta")
}

#[test]
fn non_recursive_file_listing() {
    let tree = sample_tree();
    let files = factory::user_files(tree.path(), "*", EnumerationOptions::new()).expect("factory");
    assert_eq!(collect(&files), [tree.join("a.txt")]);
}

#[test]
fn recursive_file_listing_yields_root_entries_first() {
    let tree = sample_tree();
    let options = EnumerationOptions::new().with_recurse(true);
    let files = factory::user_files(tree.path(), "*", options).expect("factory");
    assert_eq!(collect(&files), [tree.join("a.txt"), tree.join("sub/b.txt")]);
}

#[test]
fn directory_contents_follow_their_parent_level() {
    let tree = FileTree::new()
        .file("one/x", "")
        .file("two/y", "")
        .file("one/nested/z", "")
        .file("top", "");
    let options = EnumerationOptions::new().with_recurse(true);
    let entries = factory::user_entries(tree.path(), "*", options).expect("factory");
    let paths = collect(&entries);

    let position = |relative: &str| {
        paths
            .iter()
            .position(|path| path == &tree.join(relative))
            .unwrap_or_else(|| panic!("{relative} missing from {paths:?}"))
    };
    let root_level = ["one", "two", "top"].map(position);
    let deeper = ["one/x", "two/y", "one/nested", "one/nested/z"].map(position);
    assert!(root_level.iter().max() < deeper.iter().min());
    assert!(position("one/nested") < position("one/nested/z"));
    assert_eq!(paths.len(), 7);
}

#[test]
fn dos_translation_requires_an_extension() {
    let tree = FileTree::new().file("foo", "").file("foo.txt", "");
    let entries =
        factory::user_entries(tree.path(), "*.txt", EnumerationOptions::new()).expect("factory");
    assert_eq!(collect(&entries), [tree.join("foo.txt")]);
}

#[test]
fn relative_roots_keep_their_form() {
    let tree = sample_tree();
    let cwd = std::env::current_dir().expect("cwd");
    let Ok(relative) = tree.path().strip_prefix(&cwd) else {
        // Temporary directory outside the working directory; nothing to test.
        return;
    };
    let files = factory::user_files(relative, "*", EnumerationOptions::new()).expect("factory");
    assert_eq!(collect(&files), [relative.join("a.txt")]);
}

#[test]
fn hidden_entries_can_be_skipped() {
    let tree = FileTree::new().file(".secret", "").file("plain", "").file(".dir/inner", "");
    let options = EnumerationOptions::new()
        .with_recurse(true)
        .with_attributes_to_skip(FileAttributes::HIDDEN);
    let entries = factory::user_entries(tree.path(), "*", options).expect("factory");
    assert_eq!(collect(&entries), [tree.join("plain")]);
}

#[test]
fn enumerate_filters_by_target() {
    let tree = sample_tree();
    let options = EnumerationOptions::new();
    let dirs = factory::enumerate(tree.path(), "*", SearchTarget::Directories, options)
        .expect("factory");
    assert_eq!(collect(&dirs), [tree.join("sub")]);

    let both: BTreeSet<_> = collect(
        &factory::enumerate(tree.path(), "*", SearchTarget::Both, options).expect("factory"),
    )
    .into_iter()
    .collect();
    assert_eq!(both, BTreeSet::from([tree.join("a.txt"), tree.join("sub")]));
}

#[test]
fn missing_root_is_reported_at_construction() {
    let tree = FileTree::new();
    let files = factory::user_files(tree.join("absent"), "*", EnumerationOptions::new())
        .expect("factory performs no I/O");
    let err = files.enumerator().expect_err("missing root");
    assert_eq!(err.kind(), ErrorKind::PathNotFound);
    assert_eq!(err.path(), Some(tree.join("absent").as_path()));
}

#[test]
fn builder_rejects_missing_pieces_before_io() {
    let err = FileSystemEnumerable::<PathBuf>::builder("/no/such/dir")
        .transform(|entry| entry.to_full_path())
        .build()
        .expect_err("include predicate missing");
    assert_eq!(err.kind(), ErrorKind::InvalidArgument);
}

#[test]
fn directory_finished_hook_runs_once_per_directory() {
    let tree = FileTree::new().file("a/1", "").file("a/b/2", "");
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    let enumerable = FileSystemEnumerable::builder(tree.path())
        .options(EnumerationOptions::new().with_recurse(true))
        .include_all()
        .transform(|entry| entry.to_full_path())
        .on_directory_finished(move |path: &Path| {
            sink.lock().expect("lock").push(path.to_path_buf());
        })
        .build()
        .expect("build");

    assert_eq!(collect(&enumerable).len(), 4);
    assert_eq!(seen.lock().expect("lock").len(), 3);
}

#[test]
fn dispose_twice_is_harmless() {
    let tree = sample_tree();
    let options = EnumerationOptions::new().with_recurse(true);
    let entries = factory::user_entries(tree.path(), "*", options).expect("factory");
    let mut enumerator = entries.enumerator().expect("enumerator");
    assert!(enumerator.advance().expect("advance"));
    enumerator.dispose();
    enumerator.dispose();
    assert!(!enumerator.advance().expect("disposed"));
    assert!(enumerator.current().is_none());
}

#[test]
fn independent_enumerators_run_on_separate_threads() {
    let tree = FileTree::new().file("a/1", "").file("b/2", "").file("c", "");
    let options = EnumerationOptions::new().with_recurse(true);
    let entries = factory::user_entries(tree.path(), "*", options).expect("factory");

    let counts: Vec<usize> = std::thread::scope(|scope| {
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let entries = entries.clone();
                scope.spawn(move || {
                    entries
                        .enumerator()
                        .expect("enumerator")
                        .map(|item| item.expect("entry"))
                        .count()
                })
            })
            .collect();
        handles
            .into_iter()
            .map(|handle| handle.join().expect("thread"))
            .collect()
    });
    assert_eq!(counts, [5, 5, 5, 5]);
}
