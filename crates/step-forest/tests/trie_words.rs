use step_forest::log::{StepRecord, TrieDeleteStep, TrieInsertStep};
use step_forest::{Snapshot, Structure, Trie};

#[test]
fn insert_search_and_prefix() {
    let mut trie = Trie::new();
    for word in ["car", "card", "care", "cat", "dog"] {
        assert!(trie.insert(word));
    }
    assert_eq!(trie.len(), 5);
    assert!(trie.search("car"));
    assert!(trie.search("card"));
    assert!(!trie.search("ca")); // prefix, not a word
    assert!(!trie.search("cards"));
    assert!(trie.starts_with("ca"));
    assert!(trie.starts_with("car"));
    assert!(!trie.starts_with("x"));
}

#[test]
fn reinsert_leaves_size_unchanged() {
    let mut trie = Trie::new();
    assert!(trie.insert("car"));
    assert!(!trie.insert("car"));
    assert_eq!(trie.len(), 1);
    assert!(matches!(
        trie.log().records().last().unwrap(),
        StepRecord::TrieInsert {
            step: TrieInsertStep::AlreadyExists,
            ..
        }
    ));
}

#[test]
fn empty_word_is_rejected_everywhere() {
    let mut trie = Trie::new();
    assert!(!trie.insert(""));
    assert!(!trie.search(""));
    assert!(!trie.delete(""));
    assert_eq!(trie.len(), 0);
}

#[test]
fn delete_prunes_but_keeps_shared_prefixes() {
    let mut trie = Trie::new();
    for word in ["car", "card", "cat"] {
        trie.insert(word);
    }
    let before = trie.node_count();
    assert!(trie.delete("card"));
    assert_eq!(trie.len(), 2);
    // Only the 'd' node goes; "car" survives as a word.
    assert_eq!(trie.node_count(), before - 1);
    assert!(trie.search("car"));
    assert!(!trie.search("card"));
    assert!(trie
        .log()
        .records()
        .iter()
        .any(|r| matches!(r, StepRecord::TrieDelete { step: TrieDeleteStep::PruneNode, .. })));
}

#[test]
fn delete_interior_word_keeps_its_branch() {
    let mut trie = Trie::new();
    trie.insert("car");
    trie.insert("card");
    let before = trie.node_count();
    // "car" is a prefix of "card": unmark only, no pruning.
    assert!(trie.delete("car"));
    assert_eq!(trie.node_count(), before);
    assert!(!trie.search("car"));
    assert!(trie.search("card"));

    assert!(!trie.delete("car"));
    assert!(!trie.delete("cash"));
}

#[test]
fn delete_last_word_prunes_to_the_root() {
    let mut trie = Trie::new();
    trie.insert("cat");
    assert!(trie.delete("cat"));
    assert!(trie.is_empty());
    assert_eq!(trie.node_count(), 1);
    assert!(trie.snapshot().is_none());
}

#[test]
fn prefix_queries_and_autocomplete() {
    let mut trie = Trie::new();
    for word in ["car", "card", "care", "cat", "dog"] {
        trie.insert(word);
    }
    assert_eq!(trie.words_with_prefix("car"), vec!["car", "card", "care"]);
    assert_eq!(trie.words_with_prefix("z"), Vec::<String>::new());
    assert_eq!(trie.autocomplete("ca", 2), vec!["car", "card"]);
    assert_eq!(trie.all_words().len(), 5);
    assert_eq!(
        trie.sorted_words(),
        vec!["car", "card", "care", "cat", "dog"]
    );
}

#[test]
fn pattern_star_matches_exactly_one_char() {
    let mut trie = Trie::new();
    for word in ["car", "cat", "cart", "dog", "dot"] {
        trie.insert(word);
    }
    assert_eq!(trie.match_pattern("ca*"), vec!["car", "cat"]);
    assert_eq!(trie.match_pattern("*o*"), vec!["dog", "dot"]);
    assert_eq!(trie.match_pattern("car*"), vec!["cart"]);
    assert_eq!(trie.match_pattern("*"), Vec::<String>::new());
}

#[test]
fn longest_common_prefix_stops_at_branches_and_terminals() {
    let mut trie = Trie::new();
    for word in ["flower", "flow", "flight"] {
        trie.insert(word);
    }
    assert_eq!(trie.longest_common_prefix(), "fl");

    let mut single = Trie::new();
    single.insert("solo");
    assert_eq!(single.longest_common_prefix(), "solo");

    let mut nested = Trie::new();
    nested.insert("do");
    nested.insert("dog");
    // "do" is itself a word, so the walk stops there.
    assert_eq!(nested.longest_common_prefix(), "do");

    let mut empty = Trie::new();
    assert_eq!(empty.longest_common_prefix(), "");
}

#[test]
fn info_reports_word_lengths() {
    let mut trie = Trie::new();
    for word in ["car", "card", "do"] {
        trie.insert(word);
    }
    let info = trie.info();
    assert_eq!(info.word_count, 3);
    assert_eq!(info.height, 4);
    assert_eq!(info.longest_word.as_deref(), Some("card"));
    assert_eq!(info.shortest_word.as_deref(), Some("do"));
    assert!((info.average_length - 3.0).abs() < 1e-9);

    let empty = Trie::new().info();
    assert_eq!(empty.word_count, 0);
    assert_eq!(empty.average_length, 0.0);
    assert!(empty.longest_word.is_none());
}

#[test]
fn stats_and_snapshot() {
    let mut trie = Trie::new();
    let empty = trie.stats();
    assert_eq!(empty.height, -1);
    assert!(empty.min_value.is_none());

    trie.insert("cat");
    trie.insert("car");
    let stats = trie.stats();
    assert_eq!(stats.size, 2);
    assert_eq!(stats.height, 3);

    match trie.snapshot().unwrap() {
        Snapshot::Trie { root } => {
            assert!(root.ch.is_none());
            assert_eq!(root.children.len(), 1);
            let c = &root.children[0];
            assert_eq!(c.ch, Some('c'));
            assert_eq!(c.depth, 1);
            assert!(!c.end_of_word);
        }
        other => panic!("unexpected snapshot: {other:?}"),
    }
}

#[test]
fn clear_resets_to_a_fresh_root() {
    let mut trie = Trie::new();
    trie.insert("cat");
    trie.clear();
    assert!(trie.is_empty());
    assert_eq!(trie.node_count(), 1);
    assert!(trie.log().is_empty());
    assert!(trie.insert("dog"));
}
