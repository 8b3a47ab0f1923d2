//! 4x4 transformation matrix.
//!
//! # Convention
//! - Vectors are **column vectors** on the right: `Mat4 * Vec`
//! - Translation is stored in the **last column**
//! - Transforms chain **right-to-left**: `A * B * v` applies B first, then A
//! - Right-handed view space: the camera looks down **-Z**, so the near and
//!   far planes are negative with `near > far`
//!
//! # Example
//! ```ignore
//! let transform = rotation * scale;  // scale applied first, then rotation
//! let result = transform * vertex;   // transform the vertex
//! ```

use std::ops::Mul;

use approx::{AbsDiffEq, RelativeEq};

use super::basis::Basis3;
use super::vec3::Vec3;
use super::vec4::Vec4;

/// 4x4 matrix stored as `data[row][col]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Mat4 {
    data: [[f32; 4]; 4],
}

impl Default for Mat4 {
    fn default() -> Self {
        Self::identity()
    }
}

impl Mat4 {
    pub const fn new(data: [[f32; 4]; 4]) -> Self {
        Mat4 { data }
    }

    pub const fn identity() -> Self {
        Mat4::new([
            [1.0, 0.0, 0.0, 0.0],
            [0.0, 1.0, 0.0, 0.0],
            [0.0, 0.0, 1.0, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ])
    }

    /// Creates a translation matrix.
    pub fn translation(x: f32, y: f32, z: f32) -> Self {
        Mat4::new([
            [1.0, 0.0, 0.0, x],
            [0.0, 1.0, 0.0, y],
            [0.0, 0.0, 1.0, z],
            [0.0, 0.0, 0.0, 1.0],
        ])
    }

    /// Creates a non-uniform scale matrix.
    pub fn scaling(x: f32, y: f32, z: f32) -> Self {
        Mat4::new([
            [x, 0.0, 0.0, 0.0],
            [0.0, y, 0.0, 0.0],
            [0.0, 0.0, z, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ])
    }

    pub fn uniform_scaling(s: f32) -> Self {
        Mat4::scaling(s, s, s)
    }

    /// Creates a rotation matrix around the X axis (counter-clockwise looking
    /// down the axis toward the origin).
    pub fn rotation_x(angle: f32) -> Self {
        let (s, c) = angle.sin_cos();
        Mat4::new([
            [1.0, 0.0, 0.0, 0.0],
            [0.0, c, -s, 0.0],
            [0.0, s, c, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ])
    }

    /// Creates a rotation matrix around the Y axis.
    pub fn rotation_y(angle: f32) -> Self {
        let (s, c) = angle.sin_cos();
        Mat4::new([
            [c, 0.0, s, 0.0],
            [0.0, 1.0, 0.0, 0.0],
            [-s, 0.0, c, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ])
    }

    /// Creates a rotation matrix around the Z axis.
    pub fn rotation_z(angle: f32) -> Self {
        let (s, c) = angle.sin_cos();
        Mat4::new([
            [c, -s, 0.0, 0.0],
            [s, c, 0.0, 0.0],
            [0.0, 0.0, 1.0, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ])
    }

    /// Rotation by `angle` around an arbitrary axis through the origin.
    ///
    /// Built as a change into a frame whose first axis is `axis`, a rotation
    /// about X, and a change back.
    pub fn rotation_axis(axis: Vec3, angle: f32) -> Self {
        let frame = Basis3::from_direction(axis);
        Mat4::frame_to_canonical(&frame, Vec3::ZERO)
            * Mat4::rotation_x(angle)
            * Mat4::canonical_to_frame(&frame, Vec3::ZERO)
    }

    /// Maps the view volume `[l,r] x [b,t] x [f,n]` onto the canonical cube
    /// `[-1,1]^3`, with the near plane landing on `z = +1`.
    ///
    /// Requires `l < r`, `b < t` and `n > f` (both negative). Violations are
    /// not detected.
    pub fn orthographic(left: f32, right: f32, bottom: f32, top: f32, near: f32, far: f32) -> Self {
        Mat4::new([
            [2.0 / (right - left), 0.0, 0.0, -(right + left) / (right - left)],
            [0.0, 2.0 / (top - bottom), 0.0, -(top + bottom) / (top - bottom)],
            [0.0, 0.0, 2.0 / (near - far), -(near + far) / (near - far)],
            [0.0, 0.0, 0.0, 1.0],
        ])
    }

    /// Perspective projection onto the canonical cube.
    ///
    /// `left/right/bottom/top` are the extents of the near-plane window. After
    /// the homogeneous divide nearer points have larger `z`, matching the
    /// depth test in the rasterizer. Same ordering requirements as
    /// [`Mat4::orthographic`].
    pub fn perspective(left: f32, right: f32, bottom: f32, top: f32, near: f32, far: f32) -> Self {
        let squash = Mat4::new([
            [near, 0.0, 0.0, 0.0],
            [0.0, near, 0.0, 0.0],
            [0.0, 0.0, near + far, -far * near],
            [0.0, 0.0, 1.0, 0.0],
        ]);
        Mat4::orthographic(left, right, bottom, top, near, far) * squash
    }

    /// Local frame coordinates → world coordinates: columns are the frame
    /// axes, translation is the frame origin.
    pub fn frame_to_canonical(basis: &Basis3, origin: Vec3) -> Self {
        let Basis3 { r, s, t } = *basis;
        Mat4::new([
            [r.x, s.x, t.x, origin.x],
            [r.y, s.y, t.y, origin.y],
            [r.z, s.z, t.z, origin.z],
            [0.0, 0.0, 0.0, 1.0],
        ])
    }

    /// Inverse of [`Mat4::frame_to_canonical`]: transposed rotation followed
    /// by the rotated negative origin.
    pub fn canonical_to_frame(basis: &Basis3, origin: Vec3) -> Self {
        let Basis3 { r, s, t } = *basis;
        Mat4::new([
            [r.x, r.y, r.z, -r.dot(origin)],
            [s.x, s.y, s.z, -s.dot(origin)],
            [t.x, t.y, t.z, -t.dot(origin)],
            [0.0, 0.0, 0.0, 1.0],
        ])
    }

    /// Maps the canonical cube onto a `width x height` pixel rectangle.
    ///
    /// Pixel centers sit on integer coordinates, `(-1, -1)` lands on the
    /// bottom-left pixel and `z` is multiplied by `depth_scale`.
    pub fn viewport(width: u32, height: u32, depth_scale: f32) -> Self {
        let w = width as f32;
        let h = height as f32;
        Mat4::new([
            [w / 2.0, 0.0, 0.0, (w - 1.0) / 2.0],
            [0.0, h / 2.0, 0.0, (h - 1.0) / 2.0],
            [0.0, 0.0, depth_scale, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ])
    }

    pub fn transpose(&self) -> Self {
        let mut data = [[0.0f32; 4]; 4];
        for (row, out) in data.iter_mut().enumerate() {
            for (col, cell) in out.iter_mut().enumerate() {
                *cell = self.data[col][row];
            }
        }
        Mat4::new(data)
    }

    /// Determinant by cofactor expansion along the first row.
    pub fn determinant(&self) -> f32 {
        let m = &self.data;
        let minor = |c0: usize, c1: usize, c2: usize| {
            m[1][c0] * (m[2][c1] * m[3][c2] - m[2][c2] * m[3][c1])
                - m[1][c1] * (m[2][c0] * m[3][c2] - m[2][c2] * m[3][c0])
                + m[1][c2] * (m[2][c0] * m[3][c1] - m[2][c1] * m[3][c0])
        };
        m[0][0] * minor(1, 2, 3) - m[0][1] * minor(0, 2, 3) + m[0][2] * minor(0, 1, 3)
            - m[0][3] * minor(0, 1, 2)
    }

    pub fn column(&self, col: usize) -> Vec4 {
        Vec4::new(
            self.data[0][col],
            self.data[1][col],
            self.data[2][col],
            self.data[3][col],
        )
    }

    /// Transforms a direction: rotation/scale only, translation ignored.
    pub fn transform_direction(&self, v: Vec3) -> Vec3 {
        (*self * Vec4::from_vec3(v, 0.0)).to_vec3()
    }

    /// Access element at [row][col].
    #[inline]
    pub fn get(&self, row: usize, col: usize) -> f32 {
        self.data[row][col]
    }
}

impl AbsDiffEq for Mat4 {
    type Epsilon = f32;

    fn default_epsilon() -> f32 {
        f32::EPSILON
    }

    fn abs_diff_eq(&self, other: &Self, epsilon: f32) -> bool {
        self.data
            .iter()
            .flatten()
            .zip(other.data.iter().flatten())
            .all(|(a, b)| a.abs_diff_eq(b, epsilon))
    }
}

impl RelativeEq for Mat4 {
    fn default_max_relative() -> f32 {
        f32::EPSILON
    }

    fn relative_eq(&self, other: &Self, epsilon: f32, max_relative: f32) -> bool {
        self.data
            .iter()
            .flatten()
            .zip(other.data.iter().flatten())
            .all(|(a, b)| a.relative_eq(b, epsilon, max_relative))
    }
}

/// Matrix multiplication: Mat4 * Mat4.
///
/// `A * B * v` applies B first, then A.
impl Mul<Mat4> for Mat4 {
    type Output = Mat4;

    fn mul(self, rhs: Mat4) -> Self::Output {
        let mut result = [[0.0f32; 4]; 4];

        for (row, out) in result.iter_mut().enumerate() {
            for (col, cell) in out.iter_mut().enumerate() {
                *cell = self.data[row][0] * rhs.data[0][col]
                    + self.data[row][1] * rhs.data[1][col]
                    + self.data[row][2] * rhs.data[2][col]
                    + self.data[row][3] * rhs.data[3][col];
            }
        }

        Mat4::new(result)
    }
}

/// Transform a Vec4 by a matrix: Mat4 * Vec4 (column vector).
impl Mul<Vec4> for Mat4 {
    type Output = Vec4;

    fn mul(self, v: Vec4) -> Self::Output {
        let row = |r: usize| {
            self.data[r][0] * v.x + self.data[r][1] * v.y + self.data[r][2] * v.z + self.data[r][3] * v.w
        };
        Vec4::new(row(0), row(1), row(2), row(3))
    }
}

/// Transform a point: Mat4 * Vec3 (treats Vec3 as column vector with w=1).
///
/// Applies the homogeneous divide.
impl Mul<Vec3> for Mat4 {
    type Output = Vec3;

    fn mul(self, v: Vec3) -> Self::Output {
        (self * Vec4::from(v)).homogenize().to_vec3()
    }
}
