//! Depth-first traversal over a decoded CBOR tree
//!
//! [`TextLeaves`] pulls every text string out of a [`Value`] tree, once per
//! occurrence. Arrays are walked in index order, maps entry by entry (key
//! before value, in decoded order), and tags are unwrapped to their content.
//! Every other scalar is stepped over.
//!
//! The walk uses an explicit stack, so deeply nested documents cannot
//! exhaust the call stack. Decoded trees are finite and acyclic, which is
//! all the traversal needs to terminate.

use ciborium::Value;

/// Pull iterator over all text leaves of a decoded tree
pub struct TextLeaves<'a> {
    stack: Vec<&'a Value>,
    nodes: usize,
}

impl<'a> TextLeaves<'a> {
    /// Start a traversal at `root`
    pub fn new(root: &'a Value) -> Self {
        Self {
            stack: vec![root],
            nodes: 0,
        }
    }

    /// Number of tree nodes popped so far (containers and scalars alike)
    pub fn nodes_visited(&self) -> usize {
        self.nodes
    }
}

impl<'a> Iterator for TextLeaves<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(value) = self.stack.pop() {
            self.nodes += 1;
            match value {
                Value::Text(text) => return Some(text.as_str()),
                Value::Array(items) => self.stack.extend(items.iter().rev()),
                Value::Map(entries) => {
                    for (key, val) in entries.iter().rev() {
                        self.stack.push(val);
                        self.stack.push(key);
                    }
                }
                Value::Tag(_, inner) => self.stack.push(inner),
                Value::Null
                | Value::Bool(_)
                | Value::Integer(_)
                | Value::Float(_)
                | Value::Bytes(_) => {}
                // Value is non_exhaustive; future kinds carry no text we know of
                _ => {}
            }
        }
        None
    }
}

/// Push-style traversal: call `visit` for every text leaf under `root`
///
/// Returns the number of nodes walked.
pub fn visit_text<'a, F>(root: &'a Value, mut visit: F) -> usize
where
    F: FnMut(&'a str),
{
    let mut leaves = TextLeaves::new(root);
    for text in leaves.by_ref() {
        visit(text);
    }
    leaves.nodes_visited()
}
