//! Treats smoothing groups as 32-bit masks: each set bit is membership of one
//! of 32 groups.
//! Corners are compatible when their masks overlap, either directly or through
//! other corners already in the class, so a class accumulates the union of its
//! members' masks.
//! Group `0` overlaps nothing and is therefore never welded.

/// A set of welded corners, as seen by the smoothing policy.
#[derive(Clone, Copy, Debug)]
pub(crate) struct SmoothingClass {
    mask: u32,
}

impl SmoothingClass {
    pub(crate) const fn new(group: u32) -> Self {
        Self { mask: group }
    }

    /// Indicates a corner of a face in `group` may join this class.
    #[inline]
    pub(crate) const fn admits(&self, group: u32) -> bool {
        self.mask & group != 0
    }

    /// Records that a corner of a face in `group` joined this class.
    #[inline]
    pub(crate) fn absorb(&mut self, group: u32) {
        self.mask |= group;
    }
}
