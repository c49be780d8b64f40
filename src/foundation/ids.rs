use std::fmt;

/// Position of a node inside a [`crate::Pipeline`] arena.
///
/// Inputs always point at lower indices, so ascending index order is a valid topological order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeIndex(pub u32);

impl NodeIndex {
    pub(crate) fn as_usize(self) -> usize {
        self.0 as usize
    }
}

/// Stable, human-readable node identifier derived from scene ids.
///
/// Two builds of the same scene produce the same ids; the executor keys its texture cache by them.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(String);

impl NodeId {
    pub(crate) fn new(kind: &str, key: &str) -> Self {
        Self(format!("{kind}:{key}"))
    }

    pub(crate) fn named(name: &str) -> Self {
        Self(name.to_owned())
    }

    /// Raw id string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl PartialEq<str> for NodeId {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for NodeId {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

/// Handle to a texture allocated by a [`crate::RendererPort`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TextureId(pub u32);
