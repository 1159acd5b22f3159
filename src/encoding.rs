//! Packing of tangent-space frames into the four tangent floats of an
//! [`OutputVertex`](crate::OutputVertex).

use glam::{Mat3, Quat, Vec3};

use crate::TangentFrame;

/// Converts orthonormal [`TangentFrame`]s to and from the four floats stored
/// per output vertex.
///
/// [`MeshBuilder`](crate::MeshBuilder) is generic over this trait so that an
/// alternative encoding can be substituted without touching the assembly code.
/// [`SignedQuaternion`] is used by default.
pub trait FrameEncoding {
    /// Encodes an orthonormal frame of either handedness.
    fn encode(frame: &TangentFrame) -> [f32; 4];

    /// Reconstructs the frame passed to [`encode`](FrameEncoding::encode),
    /// including its handedness.
    fn decode(encoded: [f32; 4]) -> TangentFrame;
}

/// Encodes a frame as the `[x, y, z, w]` quaternion rotating `+X`, `+Y` and
/// `+Z` onto the normal, tangent and bitangent respectively.
///
/// A quaternion can only represent right-handed frames, so handedness is
/// carried by the sign of `w`: right-handed frames are stored with `w >= 0`,
/// left-handed frames have their bitangent flipped before conversion and are
/// stored negated, with `w < 0`.
/// As `-q` and `q` describe the same rotation, decoding the rotation itself is
/// unaffected.
///
/// A left-handed frame whose quaternion has `w == 0` cannot be negated into a
/// negative `w`, so `w` is first replaced by the tiny [`MAGIC_SMALL`](SignedQuaternion::MAGIC_SMALL).
pub struct SignedQuaternion;

impl SignedQuaternion {
    /// Stand-in for a zero `w` in left-handed frames, keeping the sign flip
    /// representable.
    pub const MAGIC_SMALL: f32 = 1e-10;
}

impl FrameEncoding for SignedQuaternion {
    fn encode(frame: &TangentFrame) -> [f32; 4] {
        let left_handed = frame.is_left_handed();
        let bitangent = if left_handed {
            -frame.bitangent
        } else {
            frame.bitangent
        };

        let rotation = Mat3::from_cols(frame.normal, frame.tangent, bitangent);
        let [x, y, z, w] = Quat::from_mat3(&rotation).to_array();

        // Both `q` and `-q` are valid; pick the one with a non-negative `w`.
        let [x, y, z, mut w] = if w < 0.0 {
            [-x, -y, -z, -w]
        } else {
            [x, y, z, w]
        };

        if !left_handed {
            return [x, y, z, w];
        }

        if w == 0.0 {
            w = Self::MAGIC_SMALL;
        }

        [-x, -y, -z, -w]
    }

    fn decode(encoded: [f32; 4]) -> TangentFrame {
        let [x, y, z, w] = encoded;
        let left_handed = w < 0.0;

        let rotation = Quat::from_xyzw(x, y, z, w);
        let normal = rotation * Vec3::X;
        let tangent = rotation * Vec3::Y;
        let bitangent = rotation * Vec3::Z;

        TangentFrame {
            normal,
            tangent,
            bitangent: if left_handed { -bitangent } else { bitangent },
        }
    }
}
