//! Addressing of tree nodes by path.
//!
//! Paths are built from the node's ancestry. Statically named collections
//! contribute a dot-joined segment (`widgets`), any other node with an id
//! contributes a bracketed segment (`[chart-1]`), giving addresses such as
//! `widgets[chart-1].traces[trace-1]`. Interaction records refer to nodes by
//! these strings, so the same ancestry must always yield the same path.

use crate::{
    build,
    node::TreeNode,
    widget::{Trace, Widget, WidgetKind},
};
use std::{fmt, str::FromStr};
use thiserror::Error;

/// Return a copy of `tree` with a `node_path` stamped onto every node.
pub fn add_node_path_to_tree(tree: &TreeNode) -> TreeNode {
    tree.clone().with_node_paths()
}

impl TreeNode {
    /// Stamp a `node_path` onto this node and all of its descendants.
    ///
    /// Any previously stamped paths are replaced.
    pub fn with_node_paths(self) -> Self {
        stamp(self, "")
    }
}

fn stamp(mut node: TreeNode, current: &str) -> TreeNode {
    let path = child_path(&node, current);
    node.children = std::mem::take(&mut node.children)
        .into_iter()
        .map(|child| stamp(child, &path))
        .collect();
    node.node_path = Some(path);
    node
}

/// The path of `node` given the path of its parent.
pub fn child_path(node: &TreeNode, parent_path: &str) -> String {
    match node.id() {
        Some(build::id::ROOT) => String::new(),
        Some(id) if node.statically_named_collection => {
            if parent_path.is_empty() {
                id.to_string()
            } else {
                format!("{parent_path}.{id}")
            }
        }
        Some(id) => format!("{parent_path}[{id}]"),
        None => parent_path.to_string(),
    }
}

/// A single segment of a [`NodePath`].
#[derive(Clone, Debug, Eq, Hash, PartialEq, PartialOrd, Ord)]
pub enum Segment {
    /// A statically named collection, e.g. `widgets`.
    Named(String),
    /// A bracket-addressed node, e.g. `[chart-1]`.
    Id(String),
}

/// A parsed node path.
///
/// The empty path addresses the root.
#[derive(Clone, Debug, Default, Eq, Hash, PartialEq, PartialOrd, Ord)]
pub struct NodePath {
    segments: Vec<Segment>,
}

/// The node path string is malformed.
#[derive(Clone, Debug, Error, Eq, PartialEq)]
pub enum ParseNodePathError {
    #[error("empty collection name at byte {0}")]
    EmptyName(usize),
    #[error("empty id at byte {0}")]
    EmptyId(usize),
    #[error("unterminated `[` at byte {0}")]
    Unterminated(usize),
    #[error("unexpected character {ch:?} at byte {at}")]
    Unexpected { ch: char, at: usize },
}

impl NodePath {
    /// The segments that make up the path.
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Whether or not this is the root path.
    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    /// The id that directly follows the named collection `name`.
    pub fn id_after(&self, name: &str) -> Option<&str> {
        self.segments.windows(2).find_map(|w| match w {
            [Segment::Named(n), Segment::Id(id)] if n == name => Some(id.as_str()),
            _ => None,
        })
    }

    /// The id of the widget the path runs through, if any.
    pub fn widget_id(&self) -> Option<&str> {
        self.id_after(build::id::WIDGETS)
    }

    /// The id of the chart trace the path addresses, if any.
    pub fn trace_id(&self) -> Option<&str> {
        self.id_after(build::id::TRACES)
    }

    /// The widget and trace ids for paths addressing a chart trace.
    pub fn trace_info(&self) -> Option<(&str, &str)> {
        Some((self.widget_id()?, self.trace_id()?))
    }

    /// Whether this path addresses a chart trace.
    pub fn is_trace_path(&self) -> bool {
        self.trace_id().is_some()
    }
}

impl FromStr for NodePath {
    type Err = ParseNodePathError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut segments = vec![];
        let mut rest = s;
        let offset = |rest: &str| s.len() - rest.len();
        // Whether the next named segment must be preceded by a `.`.
        let mut needs_dot = false;
        while let Some(ch) = rest.chars().next() {
            match ch {
                '[' => {
                    let start = offset(rest);
                    let end = rest.find(']').ok_or(ParseNodePathError::Unterminated(start))?;
                    let id = &rest[1..end];
                    if id.is_empty() {
                        return Err(ParseNodePathError::EmptyId(start));
                    }
                    segments.push(Segment::Id(id.to_string()));
                    rest = &rest[end + 1..];
                    needs_dot = true;
                }
                '.' if needs_dot => {
                    rest = &rest[1..];
                    let start = offset(rest);
                    let (name, tail) = split_name(rest);
                    if name.is_empty() {
                        return Err(ParseNodePathError::EmptyName(start));
                    }
                    segments.push(Segment::Named(name.to_string()));
                    rest = tail;
                }
                ch if needs_dot => {
                    return Err(ParseNodePathError::Unexpected { ch, at: offset(rest) });
                }
                _ => {
                    let (name, tail) = split_name(rest);
                    if name.is_empty() {
                        return Err(ParseNodePathError::EmptyName(offset(rest)));
                    }
                    segments.push(Segment::Named(name.to_string()));
                    rest = tail;
                    needs_dot = true;
                }
            }
        }
        Ok(NodePath { segments })
    }
}

fn split_name(s: &str) -> (&str, &str) {
    let end = s.find(['.', '[', ']']).unwrap_or(s.len());
    s.split_at(end)
}

impl fmt::Display for NodePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, seg) in self.segments.iter().enumerate() {
            match seg {
                Segment::Named(name) if i == 0 => write!(f, "{name}")?,
                Segment::Named(name) => write!(f, ".{name}")?,
                Segment::Id(id) => write!(f, "[{id}]")?,
            }
        }
        Ok(())
    }
}

/// The `node_path` of the first node, depth-first, whose id is `node_id`.
///
/// Returns `None` if no such node exists or the tree has not been stamped.
pub fn node_path_of<'a>(tree: &'a TreeNode, node_id: &str) -> Option<&'a str> {
    crate::query::find_node_by_id(tree, node_id)?.node_path()
}

/// Find the trace addressed by `node_path` within the charts of `widget`.
///
/// Returns `None` for paths that don't address a trace, unparsable paths and
/// widgets that are not charts.
pub fn extract_trace_from_widget_by_node_path<'a>(
    widget: &'a Widget,
    node_path: &str,
) -> Option<&'a Trace> {
    let path: NodePath = node_path.parse().ok()?;
    let trace_id = path.trace_id()?;
    let WidgetKind::Chart { charts } = &widget.kind else {
        return None;
    };
    charts
        .iter()
        .flat_map(|c| &c.traces)
        .find(|t| t.id.as_deref() == Some(trace_id))
}
