use cmdroute::resolve::argv::{leading_positionals, longest_known_prefix};
use cmdroute::CommandResolutionCache;
use proptest::prelude::*;
use std::fs;
use tempfile::TempDir;

fn positional() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9][a-zA-Z0-9_.]{0,11}"
}

fn flag() -> impl Strategy<Value = String> {
    "--?[a-z]{1,8}"
}

proptest! {
    #[test]
    fn longest_command_wins_with_trailing_positionals(
        trailing in prop::collection::vec(positional(), 0..4),
        flags in prop::collection::vec(flag(), 0..3),
    ) {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("commandIndex.csv");
        fs::write(&path, "resource,modB\nresource show,modA\n").unwrap();
        let cache = CommandResolutionCache::new(&path, true);

        let mut argv = vec!["resource".to_string(), "show".to_string()];
        argv.extend(trailing);
        argv.extend(flags);

        let hit = cache.lookup(&argv).unwrap();
        prop_assert_eq!(hit.command, "resource show");
        prop_assert_eq!(hit.module, "modA");
    }

    #[test]
    fn positionals_never_include_flags(
        words in prop::collection::vec(positional(), 0..5),
        flags in prop::collection::vec(flag(), 1..3),
        tail in prop::collection::vec(positional(), 0..3),
    ) {
        let mut argv = words.clone();
        argv.extend(flags);
        argv.extend(tail);

        let found = leading_positionals(&argv);
        prop_assert_eq!(found, words.iter().map(String::as_str).collect::<Vec<_>>());
    }

    #[test]
    fn found_prefix_is_a_leading_run(
        words in prop::collection::vec(positional(), 1..6),
        known_len in 1usize..6,
    ) {
        let known_len = known_len.min(words.len());
        let known = words[..known_len].join(" ");
        let refs: Vec<&str> = words.iter().map(String::as_str).collect();

        let found = longest_known_prefix(&refs, |candidate| candidate == known);

        prop_assert_eq!(found, Some(known));
    }
}
