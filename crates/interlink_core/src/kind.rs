//! String-valued kinds describing what flows through an interaction.
//!
//! Each kind is a thin wrapper around a string so that host documents
//! carrying kinds unknown to this crate still round-trip unchanged.

use serde::{Deserialize, Serialize};
use std::{borrow::Cow, fmt};

macro_rules! string_kind {
    ($(#[$attr:meta])* $name:ident { $($(#[$c_attr:meta])* $konst:ident = $value:literal,)* }) => {
        $(#[$attr])*
        #[derive(Clone, Debug, Eq, Hash, PartialEq, PartialOrd, Ord, Deserialize, Serialize)]
        #[serde(transparent)]
        pub struct $name(Cow<'static, str>);

        impl $name {
            $(
                $(#[$c_attr])*
                pub const $konst: Self = Self(Cow::Borrowed($value));
            )*

            /// Create a kind from any string.
            pub fn new(s: impl Into<String>) -> Self {
                Self(Cow::Owned(s.into()))
            }

            /// The kind as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self::new(s)
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self::new(s)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                self.as_str()
            }
        }
    };
}

string_kind! {
    /// The type of the data carried by an event or expected by a target.
    DataType {
        /// A filter to apply to the features of a layer.
        LAYER_FILTER = "LAYER_FILTER",
        /// A bounding box, usually the current viewport.
        BBOX_COORDINATES = "BBOX_COORDINATES",
        /// A single point.
        POINT = "POINT",
        /// A plain number, e.g. a zoom level.
        NUMBER = "NUMBER",
        /// A single feature.
        FEATURE = "FEATURE",
        /// The name of a style.
        STYLE_NAME = "STYLE_NAME",
    }
}

string_kind! {
    /// A signal that a widget may emit.
    EventType {
        FILTER_CHANGE = "filter_change",
        STYLE_CHANGE = "style_change",
        VIEWPORT_CHANGE = "viewport_change",
        CENTER_CHANGE = "center_change",
        ZOOM_CHANGE = "zoom_change",
        FEATURE_CLICK = "feature_click",
        ZOOM_CLICK = "zoom_click",
    }
}

string_kind! {
    /// A capability a node exposes for receiving data.
    TargetType {
        APPLY_FILTER = "applyFilter",
        APPLY_STYLE = "applyStyle",
        FILTER_BY_VIEWPORT = "filterByViewport",
    }
}
