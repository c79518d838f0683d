//! Text-command front door over the `step-forest` engines.
//!
//! [`AnyTree`] owns one engine of any kind and applies parsed
//! [`Command`]s to it, replying with JSON values. [`render`] turns
//! snapshots and step records into flat render commands a frontend can
//! consume without understanding tree internals.

mod error;
mod render;

pub use error::ExplorerError;
pub use render::{narrate, render, RenderCommand};

use serde_json::{json, Value};
use step_forest::{
    AvlTree, BTree, BinaryTree, Bst, Heap, HeapKind, RbTree, Structure, Trie,
};

/// One engine behind a uniform command surface.
pub enum AnyTree {
    Binary(BinaryTree),
    Bst(Bst),
    Avl(AvlTree),
    RedBlack(RbTree),
    Heap(Heap),
    BTree(BTree),
    Trie(Trie),
}

/// One parsed input line.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    Insert(i64),
    Delete(i64),
    Search(i64),
    Update(i64, i64),
    InsertWord(String),
    DeleteWord(String),
    SearchWord(String),
    Prefix(String),
    Pattern(String),
    Words,
    CommonPrefix,
    Min,
    Max,
    Extract,
    Peek,
    Build(Vec<i64>),
    Validate,
    Stats,
    Snapshot,
    Steps,
    StepMode(bool),
    NextStep,
    Clear,
}

/// Parse a whitespace-separated command line, e.g. `insert 50`,
/// `update 30 35`, `insert cat` (trie), `step on`, `build 5 3 8`.
pub fn parse_command(line: &str) -> Result<Command, ExplorerError> {
    let mut parts = line.split_whitespace();
    let bad = || ExplorerError::BadCommand(line.to_owned());
    let head = parts.next().ok_or_else(bad)?;
    let cmd = match head {
        "insert" => {
            let arg = parts.next().ok_or_else(bad)?;
            match arg.parse::<i64>() {
                Ok(v) => Command::Insert(v),
                Err(_) => Command::InsertWord(arg.to_owned()),
            }
        }
        "delete" => {
            let arg = parts.next().ok_or_else(bad)?;
            match arg.parse::<i64>() {
                Ok(v) => Command::Delete(v),
                Err(_) => Command::DeleteWord(arg.to_owned()),
            }
        }
        "search" => {
            let arg = parts.next().ok_or_else(bad)?;
            match arg.parse::<i64>() {
                Ok(v) => Command::Search(v),
                Err(_) => Command::SearchWord(arg.to_owned()),
            }
        }
        "update" => {
            let old = parse_i64(parts.next().ok_or_else(bad)?, line)?;
            let new = parse_i64(parts.next().ok_or_else(bad)?, line)?;
            Command::Update(old, new)
        }
        "prefix" => Command::Prefix(parts.next().ok_or_else(bad)?.to_owned()),
        "pattern" => Command::Pattern(parts.next().ok_or_else(bad)?.to_owned()),
        "words" => Command::Words,
        "lcp" => Command::CommonPrefix,
        "min" => Command::Min,
        "max" => Command::Max,
        "extract" => Command::Extract,
        "peek" => Command::Peek,
        "build" => {
            let values = parts
                .by_ref()
                .map(|p| parse_i64(p, line))
                .collect::<Result<Vec<_>, _>>()?;
            Command::Build(values)
        }
        "validate" => Command::Validate,
        "stats" => Command::Stats,
        "snapshot" => Command::Snapshot,
        "steps" => Command::Steps,
        "step" => match parts.next().ok_or_else(bad)? {
            "on" => Command::StepMode(true),
            "off" => Command::StepMode(false),
            _ => return Err(bad()),
        },
        "next" => Command::NextStep,
        "clear" => Command::Clear,
        _ => return Err(bad()),
    };
    if parts.next().is_some() && !matches!(cmd, Command::Build(_)) {
        return Err(bad());
    }
    Ok(cmd)
}

fn parse_i64(s: &str, line: &str) -> Result<i64, ExplorerError> {
    s.parse()
        .map_err(|_| ExplorerError::BadCommand(line.to_owned()))
}

impl AnyTree {
    /// `kind` is one of `binary`, `bst`, `avl`, `red-black`, `min-heap`,
    /// `max-heap`, `btree` (with `order`), `trie`.
    pub fn create(kind: &str, order: Option<usize>) -> Result<AnyTree, ExplorerError> {
        Ok(match kind {
            "binary" => AnyTree::Binary(BinaryTree::new()),
            "bst" => AnyTree::Bst(Bst::new()),
            "avl" => AnyTree::Avl(AvlTree::new()),
            "red-black" | "rb" => AnyTree::RedBlack(RbTree::new()),
            "min-heap" => AnyTree::Heap(Heap::new(HeapKind::Min)),
            "max-heap" => AnyTree::Heap(Heap::new(HeapKind::Max)),
            "btree" => AnyTree::BTree(BTree::new(order.unwrap_or(3))?),
            "trie" => AnyTree::Trie(Trie::new()),
            other => return Err(ExplorerError::UnknownStructure(other.to_owned())),
        })
    }

    fn structure(&mut self) -> &mut dyn Structure {
        match self {
            AnyTree::Binary(t) => t,
            AnyTree::Bst(t) => t,
            AnyTree::Avl(t) => t,
            AnyTree::RedBlack(t) => t,
            AnyTree::Heap(t) => t,
            AnyTree::BTree(t) => t,
            AnyTree::Trie(t) => t,
        }
    }

    fn name(&self) -> &'static str {
        match self {
            AnyTree::Binary(_) => "binary",
            AnyTree::Bst(_) => "bst",
            AnyTree::Avl(_) => "avl",
            AnyTree::RedBlack(_) => "red-black",
            AnyTree::Heap(_) => "heap",
            AnyTree::BTree(_) => "btree",
            AnyTree::Trie(_) => "trie",
        }
    }

    fn unsupported(&self, command: &'static str) -> ExplorerError {
        ExplorerError::Unsupported {
            command,
            structure: self.name(),
        }
    }

    /// Apply one command and describe the outcome as a JSON value.
    pub fn apply(&mut self, cmd: &Command) -> Result<Value, ExplorerError> {
        match cmd {
            Command::Insert(v) => self.insert_value(*v),
            Command::Delete(v) => self.delete_value(*v),
            Command::Search(v) => self.search_value(*v),
            Command::Update(old, new) => self.update_value(*old, *new),
            Command::InsertWord(w) => match self {
                AnyTree::Trie(t) => Ok(json!({ "inserted": t.insert(w) })),
                _ => Err(self.unsupported("insert <word>")),
            },
            Command::DeleteWord(w) => match self {
                AnyTree::Trie(t) => Ok(json!({ "deleted": t.delete(w) })),
                _ => Err(self.unsupported("delete <word>")),
            },
            Command::SearchWord(w) => match self {
                AnyTree::Trie(t) => Ok(json!({ "found": t.search(w) })),
                _ => Err(self.unsupported("search <word>")),
            },
            Command::Prefix(p) => match self {
                AnyTree::Trie(t) => Ok(json!({ "words": t.words_with_prefix(p) })),
                _ => Err(self.unsupported("prefix")),
            },
            Command::Pattern(p) => match self {
                AnyTree::Trie(t) => Ok(json!({ "words": t.match_pattern(p) })),
                _ => Err(self.unsupported("pattern")),
            },
            Command::Words => match self {
                AnyTree::Trie(t) => Ok(json!({ "words": t.all_words() })),
                _ => Err(self.unsupported("words")),
            },
            Command::CommonPrefix => match self {
                AnyTree::Trie(t) => Ok(json!({ "prefix": t.longest_common_prefix() })),
                _ => Err(self.unsupported("lcp")),
            },
            Command::Min => self.scan_min(),
            Command::Max => self.scan_max(),
            Command::Extract => match self {
                AnyTree::Heap(h) => Ok(json!({ "value": h.extract() })),
                _ => Err(self.unsupported("extract")),
            },
            Command::Peek => match self {
                AnyTree::Heap(h) => Ok(json!({ "value": h.peek() })),
                _ => Err(self.unsupported("peek")),
            },
            Command::Build(values) => match self {
                AnyTree::Heap(h) => {
                    h.build(values);
                    Ok(json!({ "size": h.len() }))
                }
                _ => Err(self.unsupported("build")),
            },
            Command::Validate => self.validate(),
            Command::Stats => Ok(serde_json::to_value(self.structure().stats())?),
            Command::Snapshot => Ok(serde_json::to_value(self.structure().snapshot())?),
            Command::Steps => Ok(serde_json::to_value(self.structure().log().records())?),
            Command::StepMode(on) => {
                self.structure().set_step_mode(*on);
                Ok(json!({ "step_mode": on }))
            }
            Command::NextStep => {
                let step = self.structure().next_step();
                match step {
                    Some(record) => Ok(json!({
                        "record": serde_json::to_value(&record)?,
                        "render": serde_json::to_value(narrate(&record))?,
                    })),
                    None => Ok(json!({ "record": Value::Null })),
                }
            }
            Command::Clear => {
                self.structure().clear();
                Ok(json!({ "cleared": true }))
            }
        }
    }

    fn insert_value(&mut self, v: i64) -> Result<Value, ExplorerError> {
        let reply = match self {
            AnyTree::Binary(t) => json!({ "node": t.insert(v) }),
            AnyTree::Bst(t) => json!({ "node": t.insert(v) }),
            AnyTree::Avl(t) => json!({ "node": t.insert(v) }),
            AnyTree::RedBlack(t) => json!({ "node": t.insert(v) }),
            AnyTree::Heap(t) => {
                t.insert(v);
                json!({ "size": t.len() })
            }
            AnyTree::BTree(t) => json!({ "inserted": t.insert(v) }),
            AnyTree::Trie(t) => json!({ "inserted": t.insert(&v.to_string()) }),
        };
        Ok(reply)
    }

    fn delete_value(&mut self, v: i64) -> Result<Value, ExplorerError> {
        let reply = match self {
            AnyTree::Binary(t) => json!({ "deleted": t.delete(v) }),
            AnyTree::Bst(t) => json!({ "deleted": t.delete(v) }),
            AnyTree::Avl(t) => json!({ "deleted": t.delete(v) }),
            AnyTree::RedBlack(t) => json!({ "deleted": t.delete(v) }),
            AnyTree::Heap(t) => {
                let deleted = t.search(v).map(|i| t.delete_at(i)).unwrap_or(false);
                json!({ "deleted": deleted })
            }
            AnyTree::BTree(t) => json!({ "deleted": t.delete(v) }),
            AnyTree::Trie(t) => json!({ "deleted": t.delete(&v.to_string()) }),
        };
        Ok(reply)
    }

    fn search_value(&mut self, v: i64) -> Result<Value, ExplorerError> {
        let reply = match self {
            AnyTree::Binary(t) => json!({ "node": t.search(v) }),
            AnyTree::Bst(t) => json!({ "node": t.search(v) }),
            AnyTree::Avl(t) => json!({ "node": t.search(v) }),
            AnyTree::RedBlack(t) => json!({ "node": t.search(v) }),
            AnyTree::Heap(t) => json!({ "index": t.search(v) }),
            AnyTree::BTree(t) => json!({ "found": t.search(v).is_some() }),
            AnyTree::Trie(t) => json!({ "found": t.search(&v.to_string()) }),
        };
        Ok(reply)
    }

    fn update_value(&mut self, old: i64, new: i64) -> Result<Value, ExplorerError> {
        let updated = match self {
            AnyTree::Binary(t) => t.update_value(old, new),
            AnyTree::Bst(t) => t.update_value(old, new),
            AnyTree::Avl(t) => t.update_value(old, new),
            AnyTree::RedBlack(t) => t.update_value(old, new),
            AnyTree::Heap(t) => {
                let index = t.search(old);
                index.map(|i| t.update_at(i, new)).unwrap_or(false)
            }
            AnyTree::BTree(t) => t.update_value(old, new),
            AnyTree::Trie(_) => return Err(self.unsupported("update")),
        };
        Ok(json!({ "updated": updated }))
    }

    fn scan_min(&mut self) -> Result<Value, ExplorerError> {
        let value = match self {
            AnyTree::Bst(t) => t.find_min(),
            AnyTree::Avl(t) => t.find_min(),
            AnyTree::RedBlack(t) => t.find_min(),
            AnyTree::Heap(t) => match t.heap_kind() {
                HeapKind::Min => t.peek(),
                HeapKind::Max => t.as_slice().iter().min().copied(),
            },
            AnyTree::BTree(t) => t.sorted_keys().first().copied(),
            _ => return Err(self.unsupported("min")),
        };
        Ok(json!({ "value": value }))
    }

    fn scan_max(&mut self) -> Result<Value, ExplorerError> {
        let value = match self {
            AnyTree::Bst(t) => t.find_max(),
            AnyTree::Avl(t) => t.find_max(),
            AnyTree::RedBlack(t) => t.find_max(),
            AnyTree::Heap(t) => match t.heap_kind() {
                HeapKind::Max => t.peek(),
                HeapKind::Min => t.as_slice().iter().max().copied(),
            },
            AnyTree::BTree(t) => t.sorted_keys().last().copied(),
            _ => return Err(self.unsupported("max")),
        };
        Ok(json!({ "value": value }))
    }

    fn validate(&mut self) -> Result<Value, ExplorerError> {
        let reply = match self {
            AnyTree::Binary(t) => json!({
                "complete": t.is_complete(),
                "full": t.is_full(),
                "perfect": t.is_perfect(),
            }),
            AnyTree::Bst(t) => json!({
                "valid": t.is_valid_bst(),
                "violations": serde_json::to_value(t.ordering_violations())?,
            }),
            AnyTree::Avl(t) => json!({
                "max_balance_factor": t.max_balance_factor(),
                "unbalanced": serde_json::to_value(t.unbalanced_nodes())?,
            }),
            AnyTree::RedBlack(t) => json!({
                "valid": t.is_valid(),
                "violations": serde_json::to_value(t.check_red_black_properties())?,
            }),
            AnyTree::Heap(t) => json!({ "valid": t.is_heap() }),
            AnyTree::BTree(t) => json!({
                "valid": t.is_valid_btree(),
                "violations": serde_json::to_value(t.check_btree_properties())?,
            }),
            AnyTree::Trie(t) => serde_json::to_value(t.info())?,
        };
        Ok(reply)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_value_and_word_commands() {
        assert_eq!(parse_command("insert 50").unwrap(), Command::Insert(50));
        assert_eq!(
            parse_command("insert cat").unwrap(),
            Command::InsertWord("cat".to_owned())
        );
        assert_eq!(parse_command("update 3 4").unwrap(), Command::Update(3, 4));
        assert_eq!(
            parse_command("build 5 3 8").unwrap(),
            Command::Build(vec![5, 3, 8])
        );
        assert_eq!(parse_command("step on").unwrap(), Command::StepMode(true));
        assert!(parse_command("frobnicate").is_err());
        assert!(parse_command("insert").is_err());
    }

    #[test]
    fn unsupported_commands_are_rejected() {
        let mut bst = AnyTree::create("bst", None).unwrap();
        assert!(bst.apply(&Command::Extract).is_err());
        let mut trie = AnyTree::create("trie", None).unwrap();
        assert!(trie
            .apply(&Command::Update(1, 2))
            .is_err());
    }
}
