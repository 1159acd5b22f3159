//! Per-triangle tangent-space solving, and repair of externally supplied frames.

use glam::{Vec2, Vec3};

use crate::math::{has_direction, not_zero};

/// A tangent-space frame: a normal, tangent and bitangent.
///
/// Frames produced by [`from_triangle`](TangentFrame::from_triangle) are
/// consistently handed but not necessarily orthogonal.
/// Use [`orthonormalized`](TangentFrame::orthonormalized) to obtain a frame
/// suitable for [encoding](crate::FrameEncoding).
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct TangentFrame {
    pub(crate) normal: Vec3,
    pub(crate) tangent: Vec3,
    pub(crate) bitangent: Vec3,
}

impl Default for TangentFrame {
    fn default() -> Self {
        Self::ZERO
    }
}

impl core::ops::Add for TangentFrame {
    type Output = TangentFrame;

    fn add(self, rhs: Self) -> Self::Output {
        TangentFrame {
            normal: self.normal + rhs.normal,
            tangent: self.tangent + rhs.tangent,
            bitangent: self.bitangent + rhs.bitangent,
        }
    }
}

impl TangentFrame {
    /// All three vectors zero; the frame of a fully degenerate triangle.
    pub const ZERO: Self = Self {
        normal: Vec3::ZERO,
        tangent: Vec3::ZERO,
        bitangent: Vec3::ZERO,
    };

    pub fn new(normal: [f32; 3], tangent: [f32; 3], bitangent: [f32; 3]) -> Self {
        Self {
            normal: normal.into(),
            tangent: tangent.into(),
            bitangent: bitangent.into(),
        }
    }

    #[inline]
    pub fn normal(&self) -> [f32; 3] {
        self.normal.to_array()
    }

    #[inline]
    pub fn tangent(&self) -> [f32; 3] {
        self.tangent.to_array()
    }

    #[inline]
    pub fn bitangent(&self) -> [f32; 3] {
        self.bitangent.to_array()
    }

    /// Returns `normal · (tangent × bitangent)`.
    /// Negative for left-handed frames, such as those produced by mirrored
    /// texture mapping.
    #[inline]
    pub fn handedness(&self) -> f32 {
        self.normal.dot(self.tangent.cross(self.bitangent))
    }

    #[inline]
    pub fn is_left_handed(&self) -> bool {
        self.handedness() < 0.0
    }

    /// Solves the frame of the triangle with corners at `positions`, mapped to
    /// `tex_coords`.
    pub fn from_triangle(positions: [[f32; 3]; 3], tex_coords: [[f32; 2]; 3]) -> Self {
        Self::solve(positions.map(Vec3::from), tex_coords.map(Vec2::from))
    }

    /// Normal from the winding of `p`; tangent and bitangent as the gradients
    /// of `u` and `v` across the triangle.
    ///
    /// When the texture mapping is singular the tangent falls back to the
    /// direction of the longer edge leaving `p[0]`.
    /// Coincident corners yield a zero normal, which is left as-is.
    pub(crate) fn solve(p: [Vec3; 3], uv: [Vec2; 3]) -> Self {
        let edges = [p[1] - p[0], p[2] - p[0]];
        let normal = edges[0].cross(edges[1]).normalize_or_zero();

        let d_uv = [uv[1] - uv[0], uv[2] - uv[0]];
        let determinant = d_uv[0].x * d_uv[1].y - d_uv[1].x * d_uv[0].y;

        if not_zero(determinant) {
            let r = determinant.recip();
            let tangent = (edges[0] * d_uv[1].y - edges[1] * d_uv[0].y) * r;
            let bitangent = (edges[1] * d_uv[0].x - edges[0] * d_uv[1].x) * r;

            if has_direction(tangent) && has_direction(bitangent) {
                return Self {
                    normal,
                    tangent: tangent.normalize(),
                    bitangent: bitangent.normalize(),
                };
            }
        }

        log::trace!(
            "singular texture mapping (determinant {determinant}), deriving tangent from edges"
        );
        Self::from_edges(normal, edges)
    }

    /// Builds a right-handed frame around `normal` from whichever of `edges`
    /// is longer.
    fn from_edges(normal: Vec3, edges: [Vec3; 2]) -> Self {
        if edges[0].length_squared() > edges[1].length_squared() {
            let tangent = edges[0].normalize_or_zero();
            Self {
                normal,
                tangent,
                bitangent: normal.cross(tangent),
            }
        } else {
            let bitangent = edges[1].normalize_or_zero();
            Self {
                normal,
                tangent: bitangent.cross(normal),
                bitangent,
            }
        }
    }

    /// Returns this frame with the normal replaced.
    #[inline]
    pub(crate) fn with_normal(self, normal: Vec3) -> Self {
        Self { normal, ..self }
    }

    /// Returns an orthonormal frame as close as possible to this one.
    ///
    /// The normal is normalized and kept (falling back to `+Z` when it has no
    /// direction), the tangent is projected onto the plane of the normal, and
    /// the bitangent is re-derived from the two, keeping the side the original
    /// bitangent pointed to.
    /// This always produces a valid frame, even from [`ZERO`](TangentFrame::ZERO).
    pub fn orthonormalized(self) -> Self {
        let normal = if has_direction(self.normal) {
            self.normal.normalize()
        } else {
            Vec3::Z
        };

        let project = |v: Vec3| v - normal * normal.dot(v);

        let tangent = project(self.tangent);
        let tangent = if has_direction(tangent) {
            tangent.normalize()
        } else {
            // Use the bitangent to recover the tangent if possible.
            let bitangent = project(self.bitangent);
            if has_direction(bitangent) {
                bitangent.normalize().cross(normal)
            } else {
                normal.any_orthonormal_vector()
            }
        };

        let bitangent = normal.cross(tangent);
        let bitangent = if bitangent.dot(self.bitangent) < 0.0 {
            -bitangent
        } else {
            bitangent
        };

        Self {
            normal,
            tangent,
            bitangent,
        }
    }
}

/// Indicates two or more corners of a face share a position.
#[inline]
pub(crate) fn is_degenerate_face(positions: [u32; 3]) -> bool {
    positions[0] == positions[1] || positions[1] == positions[2] || positions[2] == positions[0]
}
