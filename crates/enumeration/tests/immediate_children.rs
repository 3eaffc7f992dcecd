use std::collections::BTreeSet;
use std::ffi::OsString;

use enumeration::{EnumerationOptions, FileSystemEnumerable};
use proptest::prelude::*;
use test_support::FileTree;

fn name_strategy() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9_.]{0,11}".prop_filter("no pseudo entries", |name| name != "." && name != "..")
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn star_lists_each_immediate_child_once(
        files in prop::collection::btree_set(name_strategy(), 0..20),
        dirs in prop::collection::btree_set(name_strategy(), 0..6),
    ) {
        let mut tree = FileTree::new();
        let mut expected = BTreeSet::new();
        for dir in &dirs {
            tree = tree.file(format!("{dir}/nested"), "");
            expected.insert(OsString::from(dir));
        }
        for file in files.difference(&dirs) {
            tree = tree.file(file, "");
            expected.insert(OsString::from(file));
        }

        let enumerable = FileSystemEnumerable::builder(tree.path())
            .options(EnumerationOptions::new().with_buffer_size_hint(1))
            .pattern("*")
            .include_all()
            .transform(|entry| entry.file_name().to_os_string())
            .build()
            .expect("build");

        let listed: Vec<OsString> = enumerable
            .enumerator()
            .expect("enumerator")
            .collect::<Result<_, _>>()
            .expect("entries");
        let unique: BTreeSet<OsString> = listed.iter().cloned().collect();

        prop_assert_eq!(listed.len(), unique.len());
        prop_assert_eq!(unique, expected);
    }
}
