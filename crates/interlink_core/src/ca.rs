//! Content addressing of interaction trees.
//!
//! Hosts rebuild the tree on every relevant state change. Comparing the
//! content address of the new tree against the previous one tells whether
//! anything actually changed.

use crate::{
    Constraints,
    node::{EventDescriptor, InteractionMetadata, Mode, NodeKind, NodeType, TargetDescriptor, TreeNode},
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// The hasher used to produce content addresses.
pub type Hasher = blake3::Hasher;

/// The content address of a tree.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, PartialOrd, Ord, Deserialize, Serialize)]
pub struct TreeAddr([u8; 32]);

/// Types that can be hashed into a content address.
pub trait CaHash {
    /// Hash `self` to produce a stable content address.
    fn hash(&self, hasher: &mut Hasher);
}

/// The content address of the given tree.
pub fn tree_addr(tree: &TreeNode) -> TreeAddr {
    let mut hasher = Hasher::new();
    tree.hash(&mut hasher);
    TreeAddr(hasher.finalize().into())
}

impl TreeAddr {
    /// The raw bytes of the address.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// A short form of the address for display, e.g. in logs.
    pub fn short(&self) -> String {
        hex::encode(&self.0[..4])
    }
}

impl fmt::Display for TreeAddr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", hex::encode(self.0))
    }
}

impl From<[u8; 32]> for TreeAddr {
    fn from(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }
}

impl CaHash for bool {
    fn hash(&self, hasher: &mut Hasher) {
        hasher.update(&[u8::from(*self)]);
    }
}

impl CaHash for usize {
    fn hash(&self, hasher: &mut Hasher) {
        hasher.update(&(*self as u64).to_be_bytes());
    }
}

/// Strings are length-prefixed so that adjacent fields can't alias.
impl CaHash for str {
    fn hash(&self, hasher: &mut Hasher) {
        self.len().hash(hasher);
        hasher.update(self.as_bytes());
    }
}

impl CaHash for String {
    fn hash(&self, hasher: &mut Hasher) {
        self.as_str().hash(hasher);
    }
}

impl<T: CaHash> CaHash for Option<T> {
    fn hash(&self, hasher: &mut Hasher) {
        const NONE: u8 = 0;
        const SOME: u8 = 1;
        match self {
            None => {
                hasher.update(&[NONE]);
            }
            Some(t) => {
                hasher.update(&[SOME]);
                t.hash(hasher);
            }
        }
    }
}

impl<T: CaHash> CaHash for [T] {
    fn hash(&self, hasher: &mut Hasher) {
        self.len().hash(hasher);
        for t in self {
            t.hash(hasher);
        }
    }
}

impl<T: CaHash> CaHash for Vec<T> {
    fn hash(&self, hasher: &mut Hasher) {
        self[..].hash(hasher);
    }
}

/// Object keys are hashed in sorted order, matching the key order
/// independence of [`Constraints`] equality.
impl CaHash for Value {
    fn hash(&self, hasher: &mut Hasher) {
        match self {
            Value::Null => {
                hasher.update(&[0]);
            }
            Value::Bool(b) => {
                hasher.update(&[1]);
                b.hash(hasher);
            }
            Value::Number(n) => {
                hasher.update(&[2]);
                n.to_string().hash(hasher);
            }
            Value::String(s) => {
                hasher.update(&[3]);
                s.hash(hasher);
            }
            Value::Array(arr) => {
                hasher.update(&[4]);
                arr.hash(hasher);
            }
            Value::Object(map) => {
                hasher.update(&[5]);
                let mut entries: Vec<_> = map.iter().collect();
                entries.sort_unstable_by(|a, b| a.0.cmp(b.0));
                entries.len().hash(hasher);
                for (k, v) in entries {
                    k.hash(hasher);
                    v.hash(hasher);
                }
            }
        }
    }
}

impl CaHash for Constraints {
    fn hash(&self, hasher: &mut Hasher) {
        Value::Object(self.as_map().clone()).hash(hasher);
    }
}

impl CaHash for NodeType {
    fn hash(&self, hasher: &mut Hasher) {
        let tag: u8 = match self {
            NodeType::Element => 0,
            NodeType::Collection => 1,
        };
        hasher.update(&[tag]);
    }
}

impl CaHash for NodeKind {
    fn hash(&self, hasher: &mut Hasher) {
        hasher.update(&[*self as u8]);
    }
}

impl CaHash for Mode {
    fn hash(&self, hasher: &mut Hasher) {
        match self {
            Mode::Upsert => "upsert".hash(hasher),
        }
    }
}

impl CaHash for EventDescriptor {
    fn hash(&self, hasher: &mut Hasher) {
        self.event_type.as_str().hash(hasher);
        self.data_type.as_str().hash(hasher);
        self.constraints.hash(hasher);
    }
}

impl CaHash for TargetDescriptor {
    fn hash(&self, hasher: &mut Hasher) {
        self.target_type.as_str().hash(hasher);
        self.expected_data_type.as_str().hash(hasher);
        self.constraints.hash(hasher);
        self.target_property.hash(hasher);
        self.attribute_name.hash(hasher);
        self.mode.hash(hasher);
    }
}

impl CaHash for InteractionMetadata {
    fn hash(&self, hasher: &mut Hasher) {
        self.events.hash(hasher);
        self.targets.hash(hasher);
    }
}

impl CaHash for TreeNode {
    fn hash(&self, hasher: &mut Hasher) {
        self.ty.hash(hasher);
        self.id.hash(hasher);
        self.title.hash(hasher);
        self.icon.hash(hasher);
        self.node_type.hash(hasher);
        self.statically_named_collection.hash(hasher);
        self.interaction_metadata.hash(hasher);
        self.node_path.hash(hasher);
        self.children.hash(hasher);
    }
}
