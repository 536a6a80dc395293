// `edit` / `next` block tokenizer.
//
// Works on the body lines of one section. Depth is tracked by keyword
// rather than column, so hand-edited indentation is tolerated; nested
// `config … end` sub-blocks are skipped except for the names of their
// direct `edit` children (virtual-switch ports).

use std::collections::HashMap;

const PLACEHOLDER: &str = "''";

/// One `edit "<name>" … next` entry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Block {
    pub name: String,
    fields: HashMap<String, String>,
    /// `edit` names found one level down inside nested `config` blocks.
    pub children: Vec<String>,
}

impl Block {
    fn new(name: String) -> Self {
        Self {
            name,
            ..Self::default()
        }
    }

    /// De-quoted value of a `set` key, or `""` when absent or `''`.
    pub fn get(&self, key: &str) -> &str {
        match self.fields.get(key).map(String::as_str) {
            Some(PLACEHOLDER) | None => "",
            Some(value) => value,
        }
    }

    fn is_named(&self) -> bool {
        !self.name.is_empty() && self.name != PLACEHOLDER
    }
}

/// Split section lines into blocks, keeping only the `set` keys listed in
/// `keys`. The last occurrence of a key wins. Blocks without a usable name
/// and a block left open at the end of input are dropped.
pub fn tokenize(lines: &[&str], keys: &[&str]) -> Vec<Block> {
    let mut blocks = Vec::new();
    let mut current: Option<Block> = None;
    let mut nested = 0usize;

    for raw in lines {
        let line = raw.trim();

        let Some(block) = current.as_mut() else {
            if let Some(name) = line.strip_prefix("edit ") {
                current = Some(Block::new(dequote(name)));
                nested = 0;
            }
            continue;
        };

        if nested > 0 {
            if line == "end" {
                nested -= 1;
            } else if line.starts_with("config ") {
                nested += 1;
            } else if nested == 1 {
                if let Some(child) = line.strip_prefix("edit ") {
                    block.children.push(dequote(child));
                }
            }
            continue;
        }

        if line == "next" {
            if let Some(done) = current.take().filter(Block::is_named) {
                blocks.push(done);
            }
        } else if let Some(rest) = line.strip_prefix("set ") {
            let (key, value) = rest.split_once(' ').unwrap_or((rest, ""));
            if keys.contains(&key) {
                block.fields.insert(key.to_owned(), dequote(value));
            }
        } else if line.starts_with("config ") {
            nested = 1;
        } else if let Some(name) = line.strip_prefix("edit ") {
            // A new entry without the previous `next`: the open one is incomplete.
            *block = Block::new(dequote(name));
        }
    }

    blocks
}

/// Strip every double quote and surrounding whitespace.
fn dequote(raw: &str) -> String {
    raw.replace('"', "").trim().to_owned()
}
