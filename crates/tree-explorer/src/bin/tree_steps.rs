//! Drive a tree engine from stdin, one command per line, printing one
//! JSON reply per line.
//!
//! ```text
//! echo -e "insert 50\ninsert 30\nstats" | tree-steps --tree avl
//! ```

use std::io::{self, BufRead, Write};
use std::process::exit;

use tree_explorer::{parse_command, AnyTree};

const USAGE: &str = "usage: tree-steps --tree <kind> [--order <n>] [--step]
  <kind>: binary | bst | avl | red-black | min-heap | max-heap | btree | trie
  --order <n>  b-tree order (default 3)
  --step       enable step replay mode before reading commands

commands (one per line on stdin):
  insert <value|word>   delete <value|word>   search <value|word>
  update <old> <new>    min | max             extract | peek
  build <v1> <v2> ...   prefix <p>            pattern <p>
  words | lcp           validate | stats | snapshot
  steps | step on|off | next | clear";

fn main() {
    let mut kind: Option<String> = None;
    let mut order: Option<usize> = None;
    let mut step_mode = false;

    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--tree" => {
                kind = args.next();
                if kind.is_none() {
                    eprintln!("--tree requires a value");
                    exit(1);
                }
            }
            "--order" => match args.next().and_then(|v| v.parse().ok()) {
                Some(n) => order = Some(n),
                None => {
                    eprintln!("--order requires a number");
                    exit(1);
                }
            },
            "--step" => step_mode = true,
            "--help" | "-h" => {
                println!("{USAGE}");
                return;
            }
            other => {
                eprintln!("unknown argument: {other}");
                eprintln!("{USAGE}");
                exit(1);
            }
        }
    }

    let Some(kind) = kind else {
        eprintln!("{USAGE}");
        exit(1);
    };

    let mut tree = match AnyTree::create(&kind, order) {
        Ok(tree) => tree,
        Err(err) => {
            eprintln!("error: {err}");
            exit(1);
        }
    };
    if step_mode {
        if let Err(err) = tree.apply(&tree_explorer::Command::StepMode(true)) {
            eprintln!("error: {err}");
            exit(1);
        }
    }

    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut out = stdout.lock();
    for line in stdin.lock().lines() {
        let line = match line {
            Ok(line) => line,
            Err(err) => {
                eprintln!("error reading stdin: {err}");
                exit(1);
            }
        };
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        let reply = parse_command(trimmed).and_then(|cmd| tree.apply(&cmd));
        let printed = match reply {
            Ok(value) => writeln!(out, "{value}"),
            Err(err) => writeln!(out, "{}", serde_json::json!({ "error": err.to_string() })),
        };
        if printed.is_err() {
            // Downstream consumer went away.
            return;
        }
    }
}
