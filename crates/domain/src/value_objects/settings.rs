//! Sheet settings value object
//!
//! A single process-wide record, stored next to the character collection.
//! It is not part of any character.

use serde::{Deserialize, Serialize};

use crate::common::lenient;

/// Process-wide sheet settings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SheetSettings {
    /// Lets class-granted saving throws be unchecked by hand.
    #[serde(deserialize_with = "lenient::flag")]
    pub allow_class_override: bool,
}

impl SheetSettings {
    pub fn with_class_override(allow: bool) -> Self {
        Self {
            allow_class_override: allow,
        }
    }
}
