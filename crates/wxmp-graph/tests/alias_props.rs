use std::path::PathBuf;

use proptest::prelude::*;
use wxmp_graph::{AliasEntry, AliasTable, Resolution, resolve};

fn segments() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec("[a-z][a-z0-9_-]{0,7}", 1..5)
}

proptest! {
    #[test]
    fn aliased_imports_land_under_alias_directory(segs in segments()) {
        let aliases = AliasTable::new([AliasEntry::new("@/", "/project/src/")]).unwrap();
        let import = format!("@/{}", segs.join("/"));

        let Resolution::Aliased(path) = resolve(&import, &aliases) else {
            panic!("{import} was not aliased");
        };
        prop_assert!(path.starts_with("/project/src"));
        prop_assert_eq!(path, PathBuf::from("/project/src").join(segs.join("/")));
    }

    #[test]
    fn resolving_a_resolved_path_is_stable(segs in segments()) {
        let aliases = AliasTable::new([
            AliasEntry::new("@/", "/project/src/"),
            AliasEntry::new("@components", "/project/src/components"),
        ])
        .unwrap();
        let import = format!("@components/{}", segs.join("/"));

        let Resolution::Aliased(first) = resolve(&import, &aliases) else {
            panic!("{import} was not aliased");
        };
        let again = resolve(&first.to_string_lossy(), &aliases);
        prop_assert_eq!(again, Resolution::Absolute(first));
    }

    #[test]
    fn longest_symbol_wins(segs in segments()) {
        let aliases = AliasTable::new([
            AliasEntry::new("@/", "/a/"),
            AliasEntry::new("@/deep/", "/b/"),
        ])
        .unwrap();
        let import = format!("@/deep/{}", segs.join("/"));

        prop_assert_eq!(
            resolve(&import, &aliases),
            Resolution::Aliased(PathBuf::from("/b").join(segs.join("/")))
        );
    }
}
