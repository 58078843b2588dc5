//! Math type aliases and helper functions.
//!
//! All rendering math is f32 and backed by nalgebra. Matrices are stored
//! column-major, which is also the upload order expected by shaders.

pub use nalgebra;

/// 3D vector (f32).
pub type Vec3 = nalgebra::Vector3<f32>;

/// 4D vector (f32).
pub type Vec4 = nalgebra::Vector4<f32>;

/// 4x4 matrix (f32).
pub type Mat4 = nalgebra::Matrix4<f32>;

/// Build a right-handed perspective projection with depth range [0, 1].
pub fn perspective_rh(yfov: f32, aspect: f32, znear: f32, zfar: f32) -> Mat4 {
    let f = 1.0 / (yfov / 2.0).tan();
    let nf = 1.0 / (znear - zfar);
    #[rustfmt::skip]
    let result = Mat4::new(
        f / aspect, 0.0,  0.0,              0.0,
        0.0,        f,    0.0,              0.0,
        0.0,        0.0,  zfar * nf,        znear * zfar * nf,
        0.0,        0.0,  -1.0,             0.0,
    );
    result
}

/// Build a right-handed orthographic projection with depth range [0, 1].
pub fn orthographic_rh(left: f32, right: f32, bottom: f32, top: f32, near: f32, far: f32) -> Mat4 {
    let rml = right - left;
    let tmb = top - bottom;
    let fmn = far - near;
    #[rustfmt::skip]
    let result = Mat4::new(
        2.0 / rml, 0.0,       0.0,         -(right + left) / rml,
        0.0,       2.0 / tmb, 0.0,         -(top + bottom) / tmb,
        0.0,       0.0,       -1.0 / fmn,  -near / fmn,
        0.0,       0.0,       0.0,          1.0,
    );
    result
}

/// Build a translation-only 4x4 matrix.
pub fn mat4_from_translation(t: Vec3) -> Mat4 {
    Mat4::new_translation(&t)
}

/// Build a uniform scale 4x4 matrix.
pub fn mat4_from_scale(s: f32) -> Mat4 {
    Mat4::new_scaling(s)
}

/// Write a 4x4 matrix into a flat column-major array.
///
/// The destination is caller-owned so upload paths can keep it on the stack.
pub fn mat4_write_cols(m: &Mat4, out: &mut [f32; 16]) {
    out.copy_from_slice(m.as_slice());
}

/// Convert a 4x4 matrix to a column-major `[[f32; 4]; 4]` array.
pub fn mat4_to_cols_array_2d(m: &Mat4) -> [[f32; 4]; 4] {
    let s = m.as_slice();
    [
        [s[0], s[1], s[2], s[3]],
        [s[4], s[5], s[6], s[7]],
        [s[8], s[9], s[10], s[11]],
        [s[12], s[13], s[14], s[15]],
    ]
}

/// Squared distance between two points given as arrays.
#[inline]
pub fn distance_squared(a: [f32; 3], b: [f32; 3]) -> f32 {
    let dx = a[0] - b[0];
    let dy = a[1] - b[1];
    let dz = a[2] - b[2];
    dx * dx + dy * dy + dz * dz
}
