use std::fmt;

use serde::{Deserialize, Serialize};

/// Host documents are addressed by opaque string identifiers, so IDs here wrap
/// a `String` rather than a UUID.
macro_rules! define_id {
    ($name:ident) => {
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            pub fn new(value: impl Into<String>) -> Self {
                Self(value.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }

            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self(value.to_string())
            }
        }

        impl From<String> for $name {
            fn from(value: String) -> Self {
                Self(value)
            }
        }
    };
}

// Host entity IDs
define_id!(ActorId);
define_id!(UserId);

// Document reference (e.g. `Compendium.pf2e.feats-srd.Item.abc123`)
define_id!(ItemRef);

impl ItemRef {
    /// The compendium pack segment of a dotted reference, if present.
    pub fn pack_name(&self) -> Option<&str> {
        self.0.split('.').nth(2)
    }
}
