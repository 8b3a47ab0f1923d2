//! 2x2 matrix.

use std::ops::Mul;

use super::vec2::Vec2;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Mat2 {
    data: [[f32; 2]; 2],
}

impl Mat2 {
    pub const fn new(data: [[f32; 2]; 2]) -> Self {
        Mat2 { data }
    }

    /// Builds the matrix whose columns are `a` and `b`.
    pub fn from_columns(a: Vec2, b: Vec2) -> Self {
        Mat2::new([[a.x, b.x], [a.y, b.y]])
    }

    pub fn identity() -> Self {
        Mat2::new([[1.0, 0.0], [0.0, 1.0]])
    }

    pub fn rotation(angle: f32) -> Self {
        let (s, c) = angle.sin_cos();
        Mat2::new([[c, -s], [s, c]])
    }

    pub fn determinant(&self) -> f32 {
        self.data[0][0] * self.data[1][1] - self.data[0][1] * self.data[1][0]
    }

    pub fn transpose(&self) -> Self {
        Mat2::new([
            [self.data[0][0], self.data[1][0]],
            [self.data[0][1], self.data[1][1]],
        ])
    }

    pub fn column(&self, col: usize) -> Vec2 {
        Vec2::new(self.data[0][col], self.data[1][col])
    }

    #[inline]
    pub fn get(&self, row: usize, col: usize) -> f32 {
        self.data[row][col]
    }
}

impl Mul<Mat2> for Mat2 {
    type Output = Mat2;

    fn mul(self, rhs: Mat2) -> Self::Output {
        let mut result = [[0.0f32; 2]; 2];
        for (row, out) in result.iter_mut().enumerate() {
            for (col, cell) in out.iter_mut().enumerate() {
                *cell = self.data[row][0] * rhs.data[0][col] + self.data[row][1] * rhs.data[1][col];
            }
        }
        Mat2::new(result)
    }
}

impl Mul<Vec2> for Mat2 {
    type Output = Vec2;

    fn mul(self, v: Vec2) -> Self::Output {
        Vec2::new(
            self.data[0][0] * v.x + self.data[0][1] * v.y,
            self.data[1][0] * v.x + self.data[1][1] * v.y,
        )
    }
}
