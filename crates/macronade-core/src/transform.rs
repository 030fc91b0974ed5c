//! 2D affine transforms and the provider seam to the rendering surface.

use serde::{Deserialize, Serialize};

use macronade_api_core::EntityId;

/// A 2D affine transform in SVG matrix layout:
///
/// ```text
/// | a c e |
/// | b d f |
/// ```
///
/// Mapping a point: `(a*x + c*y + e, b*x + d*y + f)`.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Affine2 {
    pub a: f32,
    pub b: f32,
    pub c: f32,
    pub d: f32,
    pub e: f32,
    pub f: f32,
}

impl Affine2 {
    pub const IDENTITY: Affine2 = Affine2 {
        a: 1.0,
        b: 0.0,
        c: 0.0,
        d: 1.0,
        e: 0.0,
        f: 0.0,
    };

    pub fn from_translation(tx: f32, ty: f32) -> Affine2 {
        Affine2 {
            e: tx,
            f: ty,
            ..Affine2::IDENTITY
        }
    }

    pub fn from_rotation_deg(degrees: f32) -> Affine2 {
        let (sin, cos) = degrees.to_radians().sin_cos();
        Affine2 {
            a: cos,
            b: sin,
            c: -sin,
            d: cos,
            e: 0.0,
            f: 0.0,
        }
    }

    pub fn from_scale(s: f32) -> Affine2 {
        Affine2 {
            a: s,
            d: s,
            ..Affine2::IDENTITY
        }
    }

    /// Map a point through this transform.
    #[inline]
    pub fn apply(&self, x: f32, y: f32) -> (f32, f32) {
        (
            self.a * x + self.c * y + self.e,
            self.b * x + self.d * y + self.f,
        )
    }

    /// `self ∘ other`: apply `other` first, then `self`.
    pub fn compose(&self, other: &Affine2) -> Affine2 {
        Affine2 {
            a: self.a * other.a + self.c * other.b,
            b: self.b * other.a + self.d * other.b,
            c: self.a * other.c + self.c * other.d,
            d: self.b * other.c + self.d * other.d,
            e: self.a * other.e + self.c * other.f + self.e,
            f: self.b * other.e + self.d * other.f + self.f,
        }
    }

    /// Inverse mapping, or `None` for a singular/degenerate matrix.
    pub fn inverse(&self) -> Option<Affine2> {
        let det = self.a * self.d - self.b * self.c;
        if !det.is_finite() || det.abs() < 1e-9 {
            return None;
        }
        Some(Affine2 {
            a: self.d / det,
            b: -self.b / det,
            c: -self.c / det,
            d: self.a / det,
            e: (self.c * self.f - self.d * self.e) / det,
            f: (self.b * self.e - self.a * self.f) / det,
        })
    }

    /// Rotation angle in degrees, extracted from the first basis vector.
    pub fn rotation_deg(&self) -> f32 {
        self.b.atan2(self.a).to_degrees()
    }

    /// Scale factor: magnitude of the first basis vector.
    pub fn scale_factor(&self) -> f32 {
        (self.a * self.a + self.b * self.b).sqrt()
    }
}

impl Default for Affine2 {
    fn default() -> Self {
        Affine2::IDENTITY
    }
}

/// Narrow seam to the live rendering surface.
///
/// Implementations return *screen* transforms. Rig geometry changes
/// continuously during playback and drags, so callers always re-read this
/// rather than caching results in persisted state.
pub trait TransformProvider {
    /// Current screen transform of a pantin's rig member, if the member is
    /// laid out.
    fn member_transform(&self, pantin_id: EntityId, member_id: &str) -> Option<Affine2>;

    /// Screen transform of the root canvas.
    fn canvas_transform(&self) -> Affine2 {
        Affine2::IDENTITY
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f32, b: f32) {
        assert!((a - b).abs() < 1e-4, "left={a} right={b}");
    }

    #[test]
    fn rotation_roundtrip() {
        let m = Affine2::from_rotation_deg(30.0);
        approx(m.rotation_deg(), 30.0);
        approx(m.scale_factor(), 1.0);
    }

    #[test]
    fn compose_applies_right_operand_first() {
        let rot = Affine2::from_rotation_deg(90.0);
        let shift = Affine2::from_translation(10.0, 0.0);
        // Rotate (1,0) to (0,1), then shift to (10,1).
        let (x, y) = shift.compose(&rot).apply(1.0, 0.0);
        approx(x, 10.0);
        approx(y, 1.0);
    }

    #[test]
    fn inverse_undoes_mapping() {
        let m = Affine2::from_translation(4.0, -2.0)
            .compose(&Affine2::from_rotation_deg(45.0))
            .compose(&Affine2::from_scale(2.0));
        let inv = m.inverse().unwrap();
        let (x, y) = inv.apply(m.apply(3.0, 7.0).0, m.apply(3.0, 7.0).1);
        approx(x, 3.0);
        approx(y, 7.0);
    }

    #[test]
    fn singular_matrix_has_no_inverse() {
        let m = Affine2 {
            a: 0.0,
            b: 0.0,
            c: 0.0,
            d: 0.0,
            e: 1.0,
            f: 1.0,
        };
        assert!(m.inverse().is_none());
    }
}
