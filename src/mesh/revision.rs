use std::ops::{Deref, DerefMut};

use super::VertexData;

/// Revision counter of a mesh's working vertices.
///
/// Consumers such as GPU upload or bounds refresh remember the value they
/// last handled and poll [`Revision::changed_since`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord)]
pub struct Revision(u64);

impl Revision {
    pub(crate) fn bump(&mut self) {
        self.0 = self.0.wrapping_add(1);
    }

    #[inline]
    #[must_use]
    pub fn get(self) -> u64 {
        self.0
    }

    #[inline]
    #[must_use]
    pub fn changed_since(self, seen: u64) -> bool {
        self.0 != seen
    }
}

/// Write access to the working vertices of a mesh. The revision is bumped
/// when the guard goes out of scope.
pub struct VerticesMut<'a> {
    vertices: &'a mut VertexData,
    revision: &'a mut Revision,
}

impl<'a> VerticesMut<'a> {
    pub(crate) fn new(vertices: &'a mut VertexData, revision: &'a mut Revision) -> Self {
        Self { vertices, revision }
    }
}

impl Deref for VerticesMut<'_> {
    type Target = VertexData;

    fn deref(&self) -> &VertexData {
        self.vertices
    }
}

impl DerefMut for VerticesMut<'_> {
    fn deref_mut(&mut self) -> &mut VertexData {
        self.vertices
    }
}

impl Drop for VerticesMut<'_> {
    fn drop(&mut self) {
        self.revision.bump();
    }
}
