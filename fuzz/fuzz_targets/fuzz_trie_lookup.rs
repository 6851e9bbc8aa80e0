#![no_main]

use libfuzzer_sys::fuzz_target;
use palisade_status::SegmentTrie;

fuzz_target!(|data: &[u8]| {
    let Ok(path) = std::str::from_utf8(data) else {
        return;
    };

    let mut trie = SegmentTrie::new();
    for (i, pattern) in ["storage", "storage.pg", "storage.*.connect", "auth.*.verify", "a.b.c.d"]
        .into_iter()
        .enumerate()
    {
        let _ = trie.insert(pattern, i);
    }

    // Any match must be a stored pattern that is a segment-aligned prefix
    if let Some((_, pattern)) = trie.lookup_with_pattern(path) {
        let depth = pattern.split('.').count();
        let head: Vec<&str> = path.split('.').take(depth).collect();
        assert_eq!(head.len(), depth);
        for (p, s) in pattern.split('.').zip(head) {
            assert!(p == "*" || p == s, "{pattern:?} does not prefix {path:?}");
        }
    }
});
