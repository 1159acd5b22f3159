//! Classification of a mesh's smoothing groups, and the policy deciding which
//! face corners may be welded together.

#[cfg_attr(
    feature = "exact-smoothing-groups",
    path = "smoothing/compatibility_exact.rs"
)]
mod compatibility;

pub(crate) use self::compatibility::SmoothingClass;

/// Smoothing group assigned to every face when no usable smoothing groups are
/// supplied.
pub(crate) const DEFAULT_GROUP: u32 = 1;

/// Mesh-wide smoothing behavior, derived from the per-face smoothing groups.
///
/// This decides how corners sharing a position are welded:
///
/// - [`AllSmooth`](SmoothingMode::AllSmooth): all of them share one vertex.
/// - [`AllHard`](SmoothingMode::AllHard): none of them are shared.
/// - [`Mixed`](SmoothingMode::Mixed): corners share a vertex when their faces'
///   smoothing groups are compatible.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum SmoothingMode {
    AllSmooth,
    AllHard,
    Mixed,
}

impl SmoothingMode {
    /// Classifies a sequence of per-face smoothing groups.
    ///
    /// An empty sequence is smooth.
    /// A sequence where every face is in the same group is smooth, unless that
    /// group is `0` (hard edges).
    /// Anything else is mixed.
    pub fn classify(groups: &[u32]) -> Self {
        let Some((&first, rest)) = groups.split_first() else {
            return SmoothingMode::AllSmooth;
        };

        if rest.iter().any(|&group| group != first) {
            SmoothingMode::Mixed
        } else if first == 0 {
            SmoothingMode::AllHard
        } else {
            SmoothingMode::AllSmooth
        }
    }

    /// Classifies `groups` as the smoothing groups of `face_count` faces.
    ///
    /// Groups which don't cover exactly one entry per face are ignored, and the
    /// mesh is treated as smooth.
    pub fn for_faces(groups: &[u32], face_count: usize) -> Self {
        if groups.len() == face_count {
            Self::classify(groups)
        } else {
            SmoothingMode::AllSmooth
        }
    }
}

/// Returns the smoothing group of `face`, or [`DEFAULT_GROUP`] when `groups`
/// doesn't cover exactly `face_count` faces.
#[inline]
pub(crate) fn face_group(groups: &[u32], face_count: usize, face: usize) -> u32 {
    if groups.len() == face_count {
        groups[face]
    } else {
        DEFAULT_GROUP
    }
}
