//! Orthonormal frames.

use super::mat3::Mat3;
use super::vec3::Vec3;

/// A right-handed orthonormal frame `{r, s, t}` with `r × s = t`.
///
/// Used both for entity orientation (where `r`, `s`, `t` play the roles of
/// right, up and backward) and for building a frame around an arbitrary
/// axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Basis3 {
    pub r: Vec3,
    pub s: Vec3,
    pub t: Vec3,
}

impl Default for Basis3 {
    fn default() -> Self {
        Self {
            r: Vec3::RIGHT,
            s: Vec3::UP,
            t: Vec3::BACK,
        }
    }
}

impl Basis3 {
    /// Builds a frame whose first axis is `direction`.
    ///
    /// `s` comes from zeroing the smallest-magnitude component of `r` and
    /// swapping the other two with one negated, which is always perpendicular
    /// and never degenerate. `direction` must not be zero.
    pub fn from_direction(direction: Vec3) -> Self {
        let r = direction.normalize();
        let (ax, ay, az) = (r.x.abs(), r.y.abs(), r.z.abs());
        let s = if ax <= ay && ax <= az {
            Vec3::new(0.0, -r.z, r.y)
        } else if ay <= az {
            Vec3::new(-r.z, 0.0, r.x)
        } else {
            Vec3::new(-r.y, r.x, 0.0)
        }
        .normalize();
        let t = r.cross(s);
        Self { r, s, t }
    }

    /// Builds a view frame from a forward direction and an approximate up.
    ///
    /// The result has `r` = right, `s` = up and `t` = -forward. When `up` is
    /// parallel to `forward` an arbitrary perpendicular up is chosen.
    pub fn from_forward_up(forward: Vec3, up: Vec3) -> Self {
        let t = -forward.normalize();
        let right = up.cross(t);
        if right.magnitude() < 1e-6 {
            let around = Self::from_direction(t);
            return Self {
                r: around.s,
                s: around.t,
                t,
            };
        }
        let r = right.normalize();
        let s = t.cross(r);
        Self { r, s, t }
    }

    /// The view direction of a frame built by [`Basis3::from_forward_up`].
    pub fn forward(&self) -> Vec3 {
        -self.t
    }

    /// Rotation matrix whose columns are the frame axes.
    pub fn to_mat3(&self) -> Mat3 {
        Mat3::from_columns(self.r, self.s, self.t)
    }

    /// Expresses a world-space vector in this frame's coordinates.
    pub fn to_local(&self, v: Vec3) -> Vec3 {
        Vec3::new(v.dot(self.r), v.dot(self.s), v.dot(self.t))
    }

    /// Maps frame coordinates back to world space.
    pub fn to_world(&self, v: Vec3) -> Vec3 {
        self.r * v.x + self.s * v.y + self.t * v.z
    }
}
