//! Prefix tree over `char` keys.
//!
//! Children hang off an `IndexMap` so iteration follows insertion order,
//! which keeps word collection and replayed traversals deterministic.
//! Deleting a word unmarks its terminal and prunes childless non-terminal
//! nodes on the way back up.

use indexmap::IndexMap;
use serde::Serialize;

use crate::contract::Structure;
use crate::log::{OpLog, StepRecord, TrieDeleteStep, TrieInsertStep, TrieQueryStep, TrieSearchStep};
use crate::snapshot::{Snapshot, StructureKind, TreeStats, TrieSnapshot};

#[derive(Clone, Debug, Default)]
pub struct TrieNode {
    pub children: IndexMap<char, u32>,
    pub end_of_word: bool,
    pub ch: Option<char>,
    pub p: Option<u32>,
    pub depth: u32,
}

/// Word-length statistics, serialized for display.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TrieInfo {
    pub word_count: usize,
    pub node_count: usize,
    pub height: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub longest_word: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shortest_word: Option<String>,
    pub average_length: f64,
}

#[derive(Clone, Debug)]
pub struct Trie {
    arena: Vec<TrieNode>,
    root: u32,
    size: usize,
    log: OpLog,
}

impl Default for Trie {
    fn default() -> Self {
        Trie::new()
    }
}

impl Trie {
    pub fn new() -> Self {
        Trie {
            arena: vec![TrieNode::default()],
            root: 0,
            size: 0,
            log: OpLog::new(),
        }
    }

    /// Number of stored words.
    pub fn len(&self) -> usize {
        self.size
    }

    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// Insert `word`, walking and creating one node per character.
    /// Returns `true` when the word is new; re-inserting an existing word
    /// logs a distinct step and leaves the size unchanged.
    pub fn insert(&mut self, word: &str) -> bool {
        if word.is_empty() {
            self.log.push(StepRecord::TrieInsert {
                word: String::new(),
                step: TrieInsertStep::EmptyWord,
                ch: None,
                node: None,
                path: None,
            });
            return false;
        }
        let mut n = self.root;
        let mut path = String::new();
        for ch in word.chars() {
            path.push(ch);
            match self.arena[n as usize].children.get(&ch) {
                Some(&child) => {
                    self.log.push(StepRecord::TrieInsert {
                        word: word.to_owned(),
                        step: TrieInsertStep::TraverseExisting,
                        ch: Some(ch),
                        node: Some(child),
                        path: Some(path.clone()),
                    });
                    n = child;
                }
                None => {
                    let id = self.arena.len() as u32;
                    let depth = self.arena[n as usize].depth + 1;
                    self.arena.push(TrieNode {
                        children: IndexMap::new(),
                        end_of_word: false,
                        ch: Some(ch),
                        p: Some(n),
                        depth,
                    });
                    self.arena[n as usize].children.insert(ch, id);
                    self.log.push(StepRecord::TrieInsert {
                        word: word.to_owned(),
                        step: TrieInsertStep::CreateNode,
                        ch: Some(ch),
                        node: Some(id),
                        path: Some(path.clone()),
                    });
                    n = id;
                }
            }
        }
        if self.arena[n as usize].end_of_word {
            self.log.push(StepRecord::TrieInsert {
                word: word.to_owned(),
                step: TrieInsertStep::AlreadyExists,
                ch: None,
                node: Some(n),
                path: None,
            });
            return false;
        }
        self.arena[n as usize].end_of_word = true;
        self.size += 1;
        self.log.push(StepRecord::TrieInsert {
            word: word.to_owned(),
            step: TrieInsertStep::MarkEnd,
            ch: None,
            node: Some(n),
            path: None,
        });
        true
    }

    /// Whole-word lookup, logging each character hop.
    pub fn search(&mut self, word: &str) -> bool {
        if word.is_empty() {
            self.log.push(StepRecord::TrieSearch {
                word: String::new(),
                step: TrieSearchStep::EmptyWord,
                ch: None,
                node: None,
                found: Some(false),
            });
            return false;
        }
        let mut n = self.root;
        for ch in word.chars() {
            match self.arena[n as usize].children.get(&ch) {
                Some(&child) => {
                    self.log.push(StepRecord::TrieSearch {
                        word: word.to_owned(),
                        step: TrieSearchStep::Traverse,
                        ch: Some(ch),
                        node: Some(child),
                        found: None,
                    });
                    n = child;
                }
                None => {
                    self.log.push(StepRecord::TrieSearch {
                        word: word.to_owned(),
                        step: TrieSearchStep::CharNotFound,
                        ch: Some(ch),
                        node: Some(n),
                        found: Some(false),
                    });
                    return false;
                }
            }
        }
        let found = self.arena[n as usize].end_of_word;
        self.log.push(StepRecord::TrieSearch {
            word: word.to_owned(),
            step: if found {
                TrieSearchStep::Found
            } else {
                TrieSearchStep::NotEndOfWord
            },
            ch: None,
            node: Some(n),
            found: Some(found),
        });
        found
    }

    /// True when any stored word starts with `prefix`.
    pub fn starts_with(&mut self, prefix: &str) -> bool {
        let mut n = self.root;
        for ch in prefix.chars() {
            match self.arena[n as usize].children.get(&ch) {
                Some(&child) => n = child,
                None => {
                    self.log.push(StepRecord::TrieSearch {
                        word: prefix.to_owned(),
                        step: TrieSearchStep::CharNotFound,
                        ch: Some(ch),
                        node: Some(n),
                        found: Some(false),
                    });
                    return false;
                }
            }
        }
        self.log.push(StepRecord::TrieSearch {
            word: prefix.to_owned(),
            step: TrieSearchStep::PrefixFound,
            ch: None,
            node: Some(n),
            found: Some(true),
        });
        true
    }

    fn contains(&self, word: &str) -> bool {
        self.node_for(word)
            .map(|n| self.arena[n as usize].end_of_word)
            .unwrap_or(false)
    }

    fn node_for(&self, prefix: &str) -> Option<u32> {
        let mut n = self.root;
        for ch in prefix.chars() {
            n = *self.arena[n as usize].children.get(&ch)?;
        }
        Some(n)
    }

    /// Delete `word`: unmark its terminal, then prune childless
    /// non-terminal nodes bottom-up.
    pub fn delete(&mut self, word: &str) -> bool {
        if word.is_empty() {
            self.log.push(StepRecord::TrieDelete {
                word: String::new(),
                step: TrieDeleteStep::EmptyWord,
                ch: None,
                node: None,
            });
            return false;
        }
        if !self.contains(word) {
            self.log.push(StepRecord::TrieDelete {
                word: word.to_owned(),
                step: TrieDeleteStep::WordNotFound,
                ch: None,
                node: None,
            });
            return false;
        }
        let chars: Vec<char> = word.chars().collect();
        self.delete_rec(self.root, word, &chars, 0);
        self.size -= 1;
        self.log.push(StepRecord::TrieDelete {
            word: word.to_owned(),
            step: TrieDeleteStep::Complete,
            ch: None,
            node: None,
        });
        true
    }

    /// Returns whether the node at `n` became prunable for its parent.
    fn delete_rec(&mut self, n: u32, word: &str, chars: &[char], i: usize) -> bool {
        if i == chars.len() {
            self.arena[n as usize].end_of_word = false;
            self.log.push(StepRecord::TrieDelete {
                word: word.to_owned(),
                step: TrieDeleteStep::UnmarkEnd,
                ch: None,
                node: Some(n),
            });
            return self.arena[n as usize].children.is_empty();
        }
        let ch = chars[i];
        let Some(&child) = self.arena[n as usize].children.get(&ch) else {
            return false;
        };
        if self.delete_rec(child, word, chars, i + 1) {
            self.arena[n as usize].children.shift_remove(&ch);
            self.log.push(StepRecord::TrieDelete {
                word: word.to_owned(),
                step: TrieDeleteStep::PruneNode,
                ch: Some(ch),
                node: Some(child),
            });
            return n != self.root
                && !self.arena[n as usize].end_of_word
                && self.arena[n as usize].children.is_empty();
        }
        false
    }

    /// Every word starting with `prefix`, in insertion-order pre-order.
    pub fn words_with_prefix(&mut self, prefix: &str) -> Vec<String> {
        let Some(n) = self.node_for(prefix) else {
            self.log.push(StepRecord::TrieQuery {
                step: TrieQueryStep::PrefixNotFound,
                prefix: Some(prefix.to_owned()),
                pattern: None,
                count: None,
            });
            return Vec::new();
        };
        let mut out = Vec::new();
        let mut buf = prefix.to_owned();
        self.collect_words(n, &mut buf, &mut out);
        self.log.push(StepRecord::TrieQuery {
            step: TrieQueryStep::FoundWords,
            prefix: Some(prefix.to_owned()),
            pattern: None,
            count: Some(out.len()),
        });
        out
    }

    /// First `limit` completions of `prefix`.
    pub fn autocomplete(&mut self, prefix: &str, limit: usize) -> Vec<String> {
        let mut words = self.words_with_prefix(prefix);
        words.truncate(limit);
        words
    }

    /// Every stored word, pre-order.
    pub fn all_words(&mut self) -> Vec<String> {
        let mut out = Vec::new();
        let mut buf = String::new();
        self.collect_words(self.root, &mut buf, &mut out);
        self.log.push(StepRecord::TrieQuery {
            step: TrieQueryStep::CollectedAll,
            prefix: None,
            pattern: None,
            count: Some(out.len()),
        });
        out
    }

    /// Every stored word, lexicographically sorted.
    pub fn sorted_words(&mut self) -> Vec<String> {
        let mut words = self.all_words();
        words.sort();
        words
    }

    fn collect_words(&self, n: u32, buf: &mut String, out: &mut Vec<String>) {
        if self.arena[n as usize].end_of_word {
            out.push(buf.clone());
        }
        for (&ch, &child) in &self.arena[n as usize].children {
            buf.push(ch);
            self.collect_words(child, buf, out);
            buf.pop();
        }
    }

    /// Words matching `pattern`, where `*` matches exactly one character.
    pub fn match_pattern(&mut self, pattern: &str) -> Vec<String> {
        let chars: Vec<char> = pattern.chars().collect();
        let mut out = Vec::new();
        let mut buf = String::new();
        self.match_rec(self.root, &chars, 0, &mut buf, &mut out);
        self.log.push(StepRecord::TrieQuery {
            step: TrieQueryStep::FoundMatches,
            prefix: None,
            pattern: Some(pattern.to_owned()),
            count: Some(out.len()),
        });
        out
    }

    fn match_rec(&self, n: u32, pattern: &[char], i: usize, buf: &mut String, out: &mut Vec<String>) {
        if i == pattern.len() {
            if self.arena[n as usize].end_of_word {
                out.push(buf.clone());
            }
            return;
        }
        let ch = pattern[i];
        if ch == '*' {
            for (&c, &child) in &self.arena[n as usize].children {
                buf.push(c);
                self.match_rec(child, pattern, i + 1, buf, out);
                buf.pop();
            }
        } else if let Some(&child) = self.arena[n as usize].children.get(&ch) {
            buf.push(ch);
            self.match_rec(child, pattern, i + 1, buf, out);
            buf.pop();
        }
    }

    /// Longest prefix shared by every stored word: walk while a node has
    /// exactly one child and is not itself a terminal.
    pub fn longest_common_prefix(&mut self) -> String {
        let mut out = String::new();
        let mut n = self.root;
        while self.arena[n as usize].children.len() == 1 && !self.arena[n as usize].end_of_word {
            let (&ch, &child) = match self.arena[n as usize].children.first() {
                Some(pair) => pair,
                None => break,
            };
            out.push(ch);
            n = child;
        }
        self.log.push(StepRecord::TrieQuery {
            step: TrieQueryStep::CommonPrefix,
            prefix: Some(out.clone()),
            pattern: None,
            count: None,
        });
        out
    }

    /// Live (reachable) node count, the root included.
    pub fn node_count(&self) -> usize {
        self.count_nodes(self.root)
    }

    fn count_nodes(&self, n: u32) -> usize {
        1 + self.arena[n as usize]
            .children
            .values()
            .map(|&c| self.count_nodes(c))
            .sum::<usize>()
    }

    /// Height in edges from the root to the deepest node.
    pub fn height(&self) -> u32 {
        self.depth_below(self.root)
    }

    fn depth_below(&self, n: u32) -> u32 {
        self.arena[n as usize]
            .children
            .values()
            .map(|&c| 1 + self.depth_below(c))
            .max()
            .unwrap_or(0)
    }

    pub fn info(&self) -> TrieInfo {
        let mut words = Vec::new();
        let mut buf = String::new();
        self.collect_words(self.root, &mut buf, &mut words);
        let longest = words.iter().max_by_key(|w| w.chars().count()).cloned();
        let shortest = words.iter().min_by_key(|w| w.chars().count()).cloned();
        let average = if words.is_empty() {
            0.0
        } else {
            words.iter().map(|w| w.chars().count()).sum::<usize>() as f64 / words.len() as f64
        };
        TrieInfo {
            word_count: self.size,
            node_count: self.node_count(),
            height: self.height(),
            longest_word: longest,
            shortest_word: shortest,
            average_length: average,
        }
    }

    fn snapshot_node(&self, n: u32) -> TrieSnapshot {
        let node = &self.arena[n as usize];
        TrieSnapshot {
            id: n,
            ch: node.ch,
            end_of_word: node.end_of_word,
            depth: node.depth,
            children: node.children.values().map(|&c| self.snapshot_node(c)).collect(),
        }
    }
}

impl Structure for Trie {
    fn kind(&self) -> StructureKind {
        StructureKind::Trie
    }

    fn size(&self) -> usize {
        self.size
    }

    fn stats(&mut self) -> TreeStats {
        TreeStats {
            kind: StructureKind::Trie,
            size: self.size,
            height: if self.size == 0 {
                -1
            } else {
                self.height() as i32
            },
            is_balanced: true,
            min_value: None,
            max_value: None,
        }
    }

    fn snapshot(&self) -> Option<Snapshot> {
        (self.size > 0).then(|| Snapshot::Trie {
            root: self.snapshot_node(self.root),
        })
    }

    fn clear(&mut self) {
        self.arena.clear();
        self.arena.push(TrieNode::default());
        self.root = 0;
        self.size = 0;
        self.log.clear();
    }

    fn log(&self) -> &OpLog {
        &self.log
    }

    fn log_mut(&mut self) -> &mut OpLog {
        &mut self.log
    }
}
