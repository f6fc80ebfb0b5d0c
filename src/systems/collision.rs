use glam::Vec2;
use log::trace;

use crate::components::RigidBody;
use crate::geometry::sign;

use super::sat::{overlap, CollisionInfo};

// Impulse resolution tuning.
const CORRECTION_PERCENT: f32 = 0.2;
const CORRECTION_SLOP: f32 = 0.01;

/// Positional correction applies only when neither shape is a trigger and at
/// least one body can move.
fn resolves(a: &RigidBody, b: &RigidBody, col: &CollisionInfo) -> bool {
    !(col.shape_a.trigger || col.shape_b.trigger) && !(a.is_static() && b.is_static())
}

/// Collision responses. `self` is always shape_a.
///
/// Callbacks run after every mutation for the pair is done and receive the
/// collision by shared reference while both bodies are still mutably borrowed,
/// so a callback cannot reach back into either body. Work that should touch
/// them (forces, impulses) has to be queued and applied afterwards.
impl RigidBody {
    /// Positional correction with coarse velocity damping.
    ///
    /// - Other static: self moves by `-sep`. Self is grounded if the push was
    ///   upward (`sep.y > 0`), which zeroes `velocity.y`; any horizontal
    ///   separation zeroes `velocity.x` (a sticky-wall simplification).
    /// - Self static: the same, mirrored onto `other`.
    /// - Both dynamic: each moves half of `sep` apart, velocities untouched.
    pub fn collide<F>(&mut self, other: &mut RigidBody, callback: F) -> Option<CollisionInfo>
    where
        F: FnOnce(&CollisionInfo),
    {
        self.grounded = false;
        let col = overlap(self.placed(), other.placed())?;
        let sep = col.sep;

        if resolves(self, other, &col) {
            if other.is_static() {
                trace!("collide: self against static, sep {sep}");
                self.position -= sep;
                self.grounded = sign(sep.y) == 1;
                if self.grounded {
                    self.velocity.y = 0.0;
                }
                if sep.x != 0.0 {
                    self.velocity.x = 0.0;
                }
            } else if self.is_static() {
                trace!("collide: static against other, sep {sep}");
                other.position += sep;
                other.grounded = sign(sep.y) == -1;
                if other.grounded {
                    other.velocity.y = 0.0;
                }
                if sep.x != 0.0 {
                    other.velocity.x = 0.0;
                }
            } else {
                trace!("collide: split correction, sep {sep}");
                self.position -= sep / 2.0;
                other.position += sep / 2.0;
            }
        }

        callback(&col);
        Some(col)
    }

    /// Positional correction only; no velocity is touched.
    ///
    /// Kept at parity with the reference response: this does not yet transfer
    /// any linear or angular momentum. Use [`resolve_impulse`](Self::resolve_impulse)
    /// for a restitution-based response.
    pub fn bounce<F>(&mut self, other: &mut RigidBody, callback: F) -> Option<CollisionInfo>
    where
        F: FnOnce(&CollisionInfo),
    {
        self.grounded = false;
        let col = overlap(self.placed(), other.placed())?;
        let sep = col.sep;
        self.grounded = sign(sep.y) == 1;

        if resolves(self, other, &col) {
            if other.is_static() {
                self.position -= sep;
            } else if self.is_static() {
                other.position += sep;
            } else {
                self.position -= sep / 2.0;
                other.position += sep / 2.0;
            }
            trace!("bounce: sep {sep}");
        }

        callback(&col);
        Some(col)
    }

    /// Detection only. Reports the overlap; never moves either body.
    pub fn overlap<F>(&mut self, other: &RigidBody, callback: F) -> Option<CollisionInfo>
    where
        F: FnOnce(&CollisionInfo),
    {
        self.grounded = false;
        let col = overlap(self.placed(), other.placed())?;
        callback(&col);
        Some(col)
    }

    /// Mass-weighted positional correction plus a restitution and Coulomb
    /// friction impulse. Static bodies count as infinitely heavy.
    pub fn resolve_impulse<F>(&mut self, other: &mut RigidBody, callback: F) -> Option<CollisionInfo>
    where
        F: FnOnce(&CollisionInfo),
    {
        self.grounded = false;
        let col = overlap(self.placed(), other.placed())?;
        self.grounded = other.is_static() && sign(col.sep.y) == 1;

        if resolves(self, other, &col) {
            apply_impulse_response(self, other, col.sep);
        }

        callback(&col);
        Some(col)
    }
}

fn apply_impulse_response(a: &mut RigidBody, b: &mut RigidBody, sep: Vec2) {
    let (inv_a, inv_b) = (a.inverse_mass(), b.inverse_mass());
    let inv_sum = inv_a + inv_b;
    let Some(normal) = sep.try_normalize() else {
        return;
    };

    // Partial positional correction so stacked bodies do not jitter.
    let correction = (sep.length() - CORRECTION_SLOP).max(0.0) / inv_sum * CORRECTION_PERCENT;
    a.position -= normal * (correction * inv_a);
    b.position += normal * (correction * inv_b);

    // Positive = already separating.
    let vel_along_normal = (b.velocity - a.velocity).dot(normal);
    if vel_along_normal > 0.0 {
        return;
    }

    let e = a.bounciness.max(b.bounciness);
    let j = -(1.0 + e) * vel_along_normal / inv_sum;
    let impulse = normal * j;
    a.velocity -= impulse * inv_a;
    b.velocity += impulse * inv_b;
    trace!("impulse: j {j}, restitution {e}");

    let mu = (a.surface_friction.powi(2) + b.surface_friction.powi(2)) / 2.0;
    if mu == 0.0 {
        return;
    }

    let rv = b.velocity - a.velocity;
    let Some(tangent) = (rv - rv.dot(normal) * normal).try_normalize() else {
        return;
    };
    let jt = -rv.dot(tangent) / inv_sum;
    // Static friction holds while the tangential impulse stays inside the cone.
    let friction_impulse = if jt.abs() < j * mu {
        tangent * jt
    } else {
        tangent * (-j * mu)
    };
    a.velocity -= friction_impulse * inv_a;
    b.velocity += friction_impulse * inv_b;
}
