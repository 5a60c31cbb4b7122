//! The widget interaction tree of a dashboard.
//!
//! Widgets and map layers are turned into a tree of nodes describing what
//! each of them can emit and receive ([`build`]). Every node is then given a
//! stable address ([`path`]) by which interaction records refer to it. The
//! tree can be pruned to the branches relevant to a given target type
//! ([`query`]) and each node checked for whether it can be plugged to a
//! signal ([`plug`]). Records binding sources to targets are edited through
//! [`interaction::Interactions`] and events are dispatched along the plugged
//! records by [`route::Router`], whose target operations are applied to
//! widget configurations by [`effect`].
//!
//! All operations are synchronous and pure. Inputs are never modified.

#[doc(inline)]
pub use build::{Builder, generate_root_tree};
#[doc(inline)]
pub use catalog::Catalog;
#[doc(inline)]
pub use constraint::Constraints;
#[doc(inline)]
pub use interaction::{Configuration, Interaction, Interactions};
#[doc(inline)]
pub use node::{NodeType, TreeNode};
#[doc(inline)]
pub use path::{NodePath, add_node_path_to_tree};
#[doc(inline)]
pub use widget::{Layer, Widget};

pub mod build;
pub mod ca;
pub mod catalog;
pub mod constraint;
pub mod effect;
pub mod interaction;
pub mod kind;
pub mod node;
pub mod path;
pub mod plug;
pub mod query;
pub mod route;
pub mod widget;
