//! Rules deciding whether a node can be plugged to a signal.

use crate::{
    Constraints,
    catalog::PossibleTarget,
    interaction::Configuration,
    kind::DataType,
    node::{EventDescriptor, TargetDescriptor, TreeNode},
};
use serde::{Deserialize, Serialize};

/// Something carrying data that a target may receive.
pub trait Signal {
    /// The type of the carried data.
    fn data_type(&self) -> Option<&DataType>;
    /// The constraints the carried data is subject to.
    fn constraints(&self) -> &Constraints;
}

/// Whether a node can be plugged to a signal, and how.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PluggableStatus {
    /// Some target matches both the data type and the exact constraints.
    pub directly_pluggable: bool,
    /// The configuration explicitly forces the plug.
    pub configured_to_force_plug: bool,
}

impl PluggableStatus {
    /// Whether the plug may be enabled.
    pub fn is_pluggable(&self) -> bool {
        self.directly_pluggable || self.configured_to_force_plug
    }

    /// Whether the plug is only reachable through configuration.
    pub fn is_configurable(&self) -> bool {
        !self.directly_pluggable
    }
}

/// The node's targets accepting the signal's data type with exactly the
/// signal's constraints.
pub fn directly_pluggable_targets<'a>(
    node: &'a TreeNode,
    signal: &impl Signal,
) -> Vec<&'a TargetDescriptor> {
    node.targets()
        .iter()
        .filter(|t| accepts_data(t, signal) && t.constraints == *signal.constraints())
        .collect()
}

/// The node's targets accepting the signal's data type under different
/// constraints.
///
/// These can only be plugged once the user forces it through configuration.
pub fn configurable_targets<'a>(
    node: &'a TreeNode,
    signal: &impl Signal,
) -> Vec<&'a TargetDescriptor> {
    node.targets()
        .iter()
        .filter(|t| accepts_data(t, signal) && t.constraints != *signal.constraints())
        .collect()
}

/// The node's targets accepting the signal's data type for which the given
/// configuration is valid.
pub fn configured_targets<'a>(
    node: &'a TreeNode,
    signal: &impl Signal,
    configuration: &Configuration,
) -> Vec<&'a TargetDescriptor> {
    node.targets()
        .iter()
        .filter(|t| accepts_data(t, signal))
        .filter(|t| is_configuration_valid_for_target(configuration, t, signal))
        .collect()
}

/// Whether `configuration` may be applied to `target` for `signal`.
///
/// Every configuration is currently considered valid.
pub fn is_configuration_valid_for_target(
    _configuration: &Configuration,
    _target: &TargetDescriptor,
    _signal: &impl Signal,
) -> bool {
    true
}

/// Determine whether the node is directly pluggable to `signal`, or
/// configured to force the plug.
///
/// A node without interaction metadata is neither.
pub fn item_pluggable_status(
    node: &TreeNode,
    signal: &impl Signal,
    configuration: &Configuration,
) -> PluggableStatus {
    if node.interaction_metadata.is_none() {
        return PluggableStatus::default();
    }
    PluggableStatus {
        directly_pluggable: !directly_pluggable_targets(node, signal).is_empty(),
        configured_to_force_plug: configuration.force_plug,
    }
}

fn accepts_data(target: &TargetDescriptor, signal: &impl Signal) -> bool {
    signal.data_type() == Some(&target.expected_data_type)
}

impl Signal for EventDescriptor {
    fn data_type(&self) -> Option<&DataType> {
        Some(&self.data_type)
    }
    fn constraints(&self) -> &Constraints {
        &self.constraints
    }
}

impl Signal for PossibleTarget {
    fn data_type(&self) -> Option<&DataType> {
        self.data_type.as_ref()
    }
    fn constraints(&self) -> &Constraints {
        &self.constraints
    }
}

/// A target descriptor signals its expected data type, allowing targets to be
/// compared against one another.
impl Signal for TargetDescriptor {
    fn data_type(&self) -> Option<&DataType> {
        Some(&self.expected_data_type)
    }
    fn constraints(&self) -> &Constraints {
        &self.constraints
    }
}

impl<T: Signal + ?Sized> Signal for &T {
    fn data_type(&self) -> Option<&DataType> {
        (**self).data_type()
    }
    fn constraints(&self) -> &Constraints {
        (**self).constraints()
    }
}
