use super::{matrix::Mat4, vector::Vec3};

/// Below this the spherical weights degrade to a linear blend
const SIN_EPSILON: f32 = 0.0005;

/// Rotation quaternion, scalar part plus imaginary vector part
///
/// Only a normalized quaternion represents a rotation. Operations that
/// require unit length (`to_mat4` in particular) normalize an internal copy
/// rather than trusting the caller, so keyframe data can be fed in as
/// imported.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Quat {
    pub w: f32,
    pub v: Vec3,
}

impl Default for Quat {
    fn default() -> Self {
        Self::identity()
    }
}

impl Quat {
    #[must_use]
    pub const fn identity() -> Self {
        Self {
            w: 1.0,
            v: Vec3::new(0.0, 0.0, 0.0),
        }
    }

    /// Scalar part first, matching the order most asset formats store
    /// rotations in
    #[must_use]
    pub const fn new(w: f32, x: f32, y: f32, z: f32) -> Self {
        Self {
            w,
            v: Vec3::new(x, y, z),
        }
    }

    #[must_use]
    pub const fn from_parts(w: f32, v: Vec3) -> Self {
        Self { w, v }
    }

    #[must_use]
    pub fn dot(self, rhs: Self) -> f32 {
        self.w * rhs.w + self.v.dot(rhs.v)
    }

    #[must_use]
    pub fn norm(self) -> f32 {
        (self.w * self.w + self.v.dot(self.v)).sqrt()
    }

    /// Normalizes in place. A zero quaternion is left unchanged.
    pub fn normalize(&mut self) {
        *self = self.normalized();
    }

    /// Returns a unit length copy. A zero quaternion is returned unchanged.
    #[must_use]
    pub fn normalized(self) -> Self {
        let norm = self.norm();
        if norm == 0.0 {
            return self;
        }
        Self {
            w: self.w / norm,
            v: self.v / norm,
        }
    }

    /// Rotation matrix for this quaternion. Works on a normalized copy, the
    /// source is not mutated.
    #[must_use]
    pub fn to_mat4(self) -> Mat4 {
        let base = self.normalized();
        let (w, x, y, z) = (base.w, base.v.x, base.v.y, base.v.z);

        let mut m = Mat4::identity();
        m[0].x = 1.0 - 2.0 * (y * y) - 2.0 * (z * z);
        m[0].y = 2.0 * (x * y + w * z);
        m[0].z = 2.0 * (x * z - w * y);

        m[1].x = 2.0 * (x * y - w * z);
        m[1].y = 1.0 - 2.0 * (x * x) - 2.0 * (z * z);
        m[1].z = 2.0 * (y * z + w * x);

        m[2].x = 2.0 * (x * z + w * y);
        m[2].y = 2.0 * (y * z - w * x);
        m[2].z = 1.0 - 2.0 * (x * x) - 2.0 * (y * y);

        m
    }

    /// Quaternion for the rotation part of a matrix. Branches on the trace
    /// and then the dominant diagonal element so the square root always has
    /// the largest available pivot under it.
    #[must_use]
    pub fn from_mat4(a: &Mat4) -> Self {
        let mut q = Self::identity();

        let trace = a[0].x + a[1].y + a[2].z;
        if trace > 0.0 {
            q.w = (trace + 1.0).sqrt() * 0.5;
            let s = 0.25 / q.w;

            q.v.x = (a[1].z - a[2].y) * s;
            q.v.y = (a[2].x - a[0].z) * s;
            q.v.z = (a[0].y - a[1].x) * s;
        } else if a[0].x > a[1].y && a[0].x > a[2].z {
            q.v.x = (a[0].x - a[1].y - a[2].z + 1.0).sqrt() * 0.5;
            let s = 0.25 / q.v.x;

            q.v.y = (a[0].y + a[1].x) * s;
            q.v.z = (a[2].x + a[0].z) * s;
            q.w = (a[1].z - a[2].y) * s;
        } else if a[1].y > a[2].z {
            q.v.y = (a[1].y - a[0].x - a[2].z + 1.0).sqrt() * 0.5;
            let s = 0.25 / q.v.y;

            q.v.x = (a[0].y + a[1].x) * s;
            q.v.z = (a[1].z + a[2].y) * s;
            q.w = (a[2].x - a[0].z) * s;
        } else {
            q.v.z = (a[2].z - a[0].x - a[1].y + 1.0).sqrt() * 0.5;
            let s = 0.25 / q.v.z;

            q.v.x = (a[2].x + a[0].z) * s;
            q.v.y = (a[1].z + a[2].y) * s;
            q.w = (a[0].y - a[1].x) * s;
        }

        q
    }

    /// Spherical interpolation from `a` at `t = 0` to `b` at `t = 1`.
    ///
    /// When the endpoints are nearly parallel the spherical weights are
    /// numerically useless, so the blend degrades to linear. Either way the
    /// result is renormalized.
    #[must_use]
    pub fn slerp(a: Self, b: Self, t: f32) -> Self {
        let theta = a.dot(b).clamp(-1.0, 1.0).acos();
        let sin_theta = theta.sin();

        let (wa, wb) = if sin_theta.abs() < SIN_EPSILON {
            (1.0 - t, t)
        } else {
            (
                ((1.0 - t) * theta).sin() / sin_theta,
                (t * theta).sin() / sin_theta,
            )
        };

        Self {
            w: wa * a.w + wb * b.w,
            v: a.v * wa + b.v * wb,
        }
        .normalized()
    }
}

#[cfg(test)]
mod tests {
    use super::{Quat, Vec3};

    const EPSILON: f32 = 0.0005;

    #[test]
    fn normalized_has_unit_norm() {
        let q = Quat::new(3.0, -1.0, 4.0, 1.0);
        assert!((q.normalized().norm() - 1.0).abs() < EPSILON);
    }

    #[test]
    fn zero_quaternion_stays_unnormalized() {
        let q = Quat::from_parts(0.0, Vec3::default());
        assert_eq!(q.normalized(), q);
    }

    #[test]
    fn slerp_between_identical_endpoints() {
        let q = Quat::new(0.8, 0.0, 0.6, 0.0);
        let r = Quat::slerp(q, q, 0.37);
        assert!((r.dot(q).abs() - 1.0).abs() < EPSILON);
    }
}
