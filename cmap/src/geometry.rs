//! Vertex geometry.
//!
//! This module provides [`Vertex`], the default geometry attached to vertex
//! orbits by an [`Embedding`]. Its components are [`nalgebra`] types.
//!
//! [`Embedding`]: crate::embedding::Embedding
//! [`Vertex`]: crate::geometry::Vertex

use approx::{AbsDiffEq, RelativeEq};
use nalgebra::{Point3, Vector2, Vector3, Vector4};

/// Position, normal, texture coordinates, and color of a vertex.
///
/// The default vertex is at the origin with a zero normal and zero texture
/// coordinates. Its color is opaque white.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Vertex {
    pub position: Point3<f32>,
    pub normal: Vector3<f32>,
    pub uv: Vector2<f32>,
    pub color: Vector4<f32>,
}

impl Vertex {
    pub fn from_position(position: Point3<f32>) -> Self {
        Vertex {
            position,
            ..Default::default()
        }
    }

    pub fn with_normal(mut self, normal: Vector3<f32>) -> Self {
        self.normal = normal;
        self
    }

    pub fn with_uv(mut self, uv: Vector2<f32>) -> Self {
        self.uv = uv;
        self
    }

    pub fn with_color(mut self, color: Vector4<f32>) -> Self {
        self.color = color;
        self
    }
}

impl AbsDiffEq for Vertex {
    type Epsilon = f32;

    fn default_epsilon() -> Self::Epsilon {
        f32::default_epsilon()
    }

    fn abs_diff_eq(&self, other: &Self, epsilon: Self::Epsilon) -> bool {
        self.position.abs_diff_eq(&other.position, epsilon)
            && self.normal.abs_diff_eq(&other.normal, epsilon)
            && self.uv.abs_diff_eq(&other.uv, epsilon)
            && self.color.abs_diff_eq(&other.color, epsilon)
    }
}

impl RelativeEq for Vertex {
    fn default_max_relative() -> Self::Epsilon {
        f32::default_max_relative()
    }

    fn relative_eq(
        &self,
        other: &Self,
        epsilon: Self::Epsilon,
        max_relative: Self::Epsilon,
    ) -> bool {
        self.position
            .relative_eq(&other.position, epsilon, max_relative)
            && self.normal.relative_eq(&other.normal, epsilon, max_relative)
            && self.uv.relative_eq(&other.uv, epsilon, max_relative)
            && self.color.relative_eq(&other.color, epsilon, max_relative)
    }
}

impl Default for Vertex {
    fn default() -> Self {
        Vertex {
            position: Point3::origin(),
            normal: Vector3::zeros(),
            uv: Vector2::zeros(),
            color: Vector4::repeat(1.0),
        }
    }
}

impl From<Point3<f32>> for Vertex {
    fn from(position: Point3<f32>) -> Self {
        Vertex::from_position(position)
    }
}

#[cfg(test)]
mod tests {
    use approx::{assert_abs_diff_eq, assert_relative_ne};
    use nalgebra::{Point3, Vector3, Vector4};

    use crate::geometry::Vertex;

    #[test]
    fn default_is_white_at_origin() {
        let vertex = Vertex::default();

        assert_eq!(Point3::origin(), vertex.position);
        assert_eq!(Vector3::zeros(), vertex.normal);
        assert_eq!(Vector4::new(1.0, 1.0, 1.0, 1.0), vertex.color);
    }

    #[test]
    fn approximate_comparison() {
        let a = Vertex::from_position(Point3::new(1.0, 0.0, 0.0)).with_normal(Vector3::z());
        let b = Vertex::from(Point3::new(1.0 + f32::EPSILON, 0.0, 0.0)).with_normal(Vector3::z());

        assert_abs_diff_eq!(a, b);
        assert_relative_ne!(a, b.with_color(Vector4::zeros()));
    }
}
