//! Treats smoothing groups as opaque identifiers.
//! Corners are compatible when their faces are in the same nonzero group.
//! Group `0` is never welded.

/// A set of welded corners, as seen by the smoothing policy.
#[derive(Clone, Copy, Debug)]
pub(crate) struct SmoothingClass {
    group: u32,
}

impl SmoothingClass {
    pub(crate) const fn new(group: u32) -> Self {
        Self { group }
    }

    /// Indicates a corner of a face in `group` may join this class.
    #[inline]
    pub(crate) const fn admits(&self, group: u32) -> bool {
        self.group != 0 && self.group == group
    }

    /// Records that a corner of a face in `group` joined this class.
    #[inline]
    pub(crate) fn absorb(&mut self, group: u32) {
        debug_assert!(self.admits(group));
    }
}
