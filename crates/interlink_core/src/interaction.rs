//! Interaction records binding an event source to a target.
//!
//! The records are owned by the host's widget configuration. Nodes of the
//! (freshly rebuilt) tree are matched to records purely through their
//! `node_path`, so a record is identified by its (source path, target path)
//! pair rather than by its own id.

use crate::{
    node::{TargetDescriptor, TreeNode},
    plug::{self, Signal},
};
use serde::{Deserialize, Serialize};

/// A persisted binding from an event source node to a target node.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Interaction {
    pub id: String,
    pub source: Source,
    pub target: Target,
    #[serde(default)]
    pub configuration: Configuration,
    #[serde(default)]
    pub plugged: bool,
}

/// The emitting end of an [`Interaction`].
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Source {
    pub node_path: String,
}

/// The receiving end of an [`Interaction`].
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Target {
    pub node_path: String,
    /// The target descriptor the interaction delivers to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta_data: Option<TargetDescriptor>,
}

/// User supplied flags attached to an [`Interaction`].
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Configuration {
    /// Plug the target even though its constraints don't match exactly.
    pub force_plug: bool,
}

/// The interactions stored on a widget under its `interactions` key.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(transparent)]
pub struct Interactions(Vec<Interaction>);

/// Assemble an interaction record.
///
/// A fresh random id is generated unless an existing one is given.
pub fn build_interaction_object(
    id: Option<&str>,
    source_path: &str,
    target_path: &str,
    meta_data: Option<TargetDescriptor>,
    configuration: Configuration,
    plugged: bool,
) -> Interaction {
    let id = id.map(str::to_string).unwrap_or_else(new_id);
    Interaction {
        id,
        source: Source {
            node_path: source_path.to_string(),
        },
        target: Target {
            node_path: target_path.to_string(),
            meta_data,
        },
        configuration,
        plugged,
    }
}

/// Whether `interaction` binds exactly the given source and target paths.
pub fn matches_interaction(interaction: &Interaction, source_path: &str, target_path: &str) -> bool {
    interaction.source.node_path == source_path && interaction.target.node_path == target_path
}

/// A fresh random interaction id.
pub fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

impl Interactions {
    pub fn new(interactions: Vec<Interaction>) -> Self {
        Self(interactions)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Interaction> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The plugged interactions.
    pub fn connected(&self) -> impl Iterator<Item = &Interaction> {
        self.0.iter().filter(|i| i.plugged)
    }

    /// The interaction binding the given source and target, if any.
    pub fn find(&self, source_path: &str, target_path: &str) -> Option<&Interaction> {
        self.0
            .iter()
            .find(|i| matches_interaction(i, source_path, target_path))
    }

    /// Look up an interaction by its id.
    pub fn get(&self, id: &str) -> Option<&Interaction> {
        self.0.iter().find(|i| i.id == id)
    }

    fn find_mut(&mut self, source_path: &str, target_path: &str) -> Option<&mut Interaction> {
        self.0
            .iter_mut()
            .find(|i| matches_interaction(i, source_path, target_path))
    }

    /// Whether the given source and target are currently plugged.
    pub fn is_plugged(&self, source_path: &str, target_path: &str) -> bool {
        self.find(source_path, target_path)
            .is_some_and(|i| i.plugged)
    }

    /// The configuration of the given pair, defaulted if no record exists.
    pub fn configuration(&self, source_path: &str, target_path: &str) -> Configuration {
        self.find(source_path, target_path)
            .map(|i| i.configuration)
            .unwrap_or_default()
    }

    /// Plug or unplug `target` to the given source for `signal`.
    ///
    /// Plugging only succeeds if the target is directly pluggable to the
    /// signal or its configuration forces the plug. Unplugging always
    /// succeeds. The record is created on first plug and updated in place
    /// afterwards.
    ///
    /// Returns the resulting plugged state.
    pub fn set_plugged(
        &mut self,
        source_path: &str,
        target: &TreeNode,
        signal: &impl Signal,
        plugged: bool,
    ) -> bool {
        let Some(target_path) = target.node_path() else {
            log::warn!("cannot plug target {:?} without a node path", target.id);
            return false;
        };
        let configuration = self.configuration(source_path, target_path);
        let status = plug::item_pluggable_status(target, signal, &configuration);
        if plugged && !status.is_pluggable() {
            log::debug!("refusing to plug `{source_path}` to `{target_path}`: not pluggable");
            return self.is_plugged(source_path, target_path);
        }
        match self.find_mut(source_path, target_path) {
            Some(interaction) => interaction.plugged = plugged,
            None if plugged => {
                let meta_data = matching_target(target, signal);
                let interaction = build_interaction_object(
                    None,
                    source_path,
                    target_path,
                    meta_data,
                    configuration,
                    true,
                );
                log::debug!("created interaction {} from `{source_path}` to `{target_path}`", interaction.id);
                self.0.push(interaction);
            }
            None => (),
        }
        plugged
    }

    /// Flip the plugged state of the given pair. See [`Interactions::set_plugged`].
    pub fn toggle_plugged(&mut self, source_path: &str, target: &TreeNode, signal: &impl Signal) -> bool {
        let plugged = target
            .node_path()
            .is_some_and(|target_path| self.is_plugged(source_path, target_path));
        self.set_plugged(source_path, target, signal, !plugged)
    }

    /// Replace the configuration of the given pair.
    ///
    /// Turning `force_plug` off unplugs the pair, as the connection is no
    /// longer sanctioned by the matching rules.
    pub fn set_configuration(
        &mut self,
        source_path: &str,
        target: &TreeNode,
        signal: &impl Signal,
        configuration: Configuration,
    ) {
        let Some(target_path) = target.node_path() else {
            log::warn!("cannot configure target {:?} without a node path", target.id);
            return;
        };
        match self.find_mut(source_path, target_path) {
            Some(interaction) => {
                if interaction.configuration.force_plug && !configuration.force_plug {
                    interaction.plugged = false;
                }
                interaction.configuration = configuration;
            }
            None => {
                let meta_data = matching_target(target, signal);
                let interaction = build_interaction_object(
                    None,
                    source_path,
                    target_path,
                    meta_data,
                    configuration,
                    false,
                );
                self.0.push(interaction);
            }
        }
    }

    /// Plug every element of `tree` that is pluggable to `signal`.
    ///
    /// `tree` is usually the stamped tree pruned to the signal's target type.
    /// Each element is judged against its own stored configuration, so forced
    /// targets are plugged too. Returns the number of elements plugged to the
    /// source afterwards.
    pub fn plug_all(&mut self, source_path: &str, tree: &TreeNode, signal: &impl Signal) -> usize {
        let mut elements = vec![];
        tree.visit(&mut |n| {
            if n.is_element() && n.node_path().is_some() {
                elements.push(n);
            }
        });
        let mut plugged = 0;
        for node in elements {
            let Some(target_path) = node.node_path() else {
                continue;
            };
            let configuration = self.configuration(source_path, target_path);
            if !plug::item_pluggable_status(node, signal, &configuration).is_pluggable() {
                continue;
            }
            if self.set_plugged(source_path, node, signal, true) {
                plugged += 1;
            }
        }
        log::debug!("plugged {plugged} targets to `{source_path}`");
        plugged
    }

    /// Remove the interaction with the given id, returning it.
    pub fn detach(&mut self, id: &str) -> Option<Interaction> {
        let ix = self.0.iter().position(|i| i.id == id)?;
        Some(self.0.remove(ix))
    }
}

/// The target descriptor to record for a new interaction.
///
/// Prefers a directly pluggable target, falling back to any target accepting
/// the signal's data type.
fn matching_target(node: &TreeNode, signal: &impl Signal) -> Option<TargetDescriptor> {
    plug::directly_pluggable_targets(node, signal)
        .into_iter()
        .chain(plug::configurable_targets(node, signal))
        .next()
        .cloned()
}

impl From<Vec<Interaction>> for Interactions {
    fn from(v: Vec<Interaction>) -> Self {
        Self(v)
    }
}

impl From<Interactions> for Vec<Interaction> {
    fn from(i: Interactions) -> Self {
        i.0
    }
}

impl<'a> IntoIterator for &'a Interactions {
    type Item = &'a Interaction;
    type IntoIter = std::slice::Iter<'a, Interaction>;
    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl FromIterator<Interaction> for Interactions {
    fn from_iter<I: IntoIterator<Item = Interaction>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}
