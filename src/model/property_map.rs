//! PropertyMap — the attribute sidecar attached to every scene.

use hashbrown::HashMap;
use super::Value;

/// A map of attribute names to values.
pub type PropertyMap = HashMap<String, Value>;
