use glam::Vec3;

pub(crate) fn fabsf(x: f32) -> f32 {
    if x.is_sign_negative() { -x } else { x }
}

pub(crate) fn not_zero(x: f32) -> bool {
    // Denormals count as zero.
    fabsf(x) > f32::MIN_POSITIVE
}

/// Returns `true` if `v` has a usable, finite direction.
pub(crate) fn has_direction(v: Vec3) -> bool {
    v.is_finite() && not_zero(v.length_squared())
}
