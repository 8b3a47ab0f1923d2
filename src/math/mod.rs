//! Linear-algebra kernel.
//!
//! Small value types (`Copy`, no allocation) used by every other stage of the
//! pipeline. Matrices are row-major (`data[row][col]`) and act on column
//! vectors: `A * B * v` applies `B` first.
//!
//! Nothing here reports errors. Normalizing a zero vector, building a basis
//! from one, or constructing a projection with inverted planes produces
//! garbage (NaN or a meaningless matrix); callers validate their inputs.

/// Implements `approx` comparisons component-wise for a struct of `f32` fields.
/// Textually scoped, so it must stay above the `mod` items below.
macro_rules! impl_approx_eq {
    ($ty:ty, $($field:ident),+) => {
        impl approx::AbsDiffEq for $ty {
            type Epsilon = f32;

            fn default_epsilon() -> f32 {
                f32::EPSILON
            }

            fn abs_diff_eq(&self, other: &Self, epsilon: f32) -> bool {
                $(approx::AbsDiffEq::abs_diff_eq(&self.$field, &other.$field, epsilon))&&+
            }
        }

        impl approx::RelativeEq for $ty {
            fn default_max_relative() -> f32 {
                f32::EPSILON
            }

            fn relative_eq(&self, other: &Self, epsilon: f32, max_relative: f32) -> bool {
                $(approx::RelativeEq::relative_eq(
                    &self.$field,
                    &other.$field,
                    epsilon,
                    max_relative,
                ))&&+
            }
        }
    };
}

pub mod basis;
pub mod mat2;
pub mod mat3;
pub mod mat4;
pub mod vec2;
pub mod vec3;
pub mod vec4;

pub use basis::Basis3;
pub use mat2::Mat2;
pub use mat3::Mat3;
pub use mat4::Mat4;
pub use vec2::Vec2;
pub use vec3::Vec3;
pub use vec4::Vec4;
