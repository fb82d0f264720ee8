//! Scene triangles
//!
//! [`TriangleData`] is what callers submit (model space); [`Triangle`] is what
//! the scene list stores after the transform stack has been applied.

use serde::{Deserialize, Serialize};

use crate::foundation::math::{utils, Vec2, Vec3};

use super::RenderError;

/// Per-vertex data for one triangle in model space
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TriangleData {
    /// Vertex positions
    pub positions: [Vec3; 3],
    /// Vertex normals
    pub normals: [Vec3; 3],
    /// Texture coordinates
    #[serde(default = "zero_uvs")]
    pub uvs: [Vec2; 3],
}

fn zero_uvs() -> [Vec2; 3] {
    [Vec2::zeros(); 3]
}

impl TriangleData {
    /// Triangle with explicit normals and UVs
    pub fn new(positions: [Vec3; 3], normals: [Vec3; 3], uvs: [Vec2; 3]) -> Self {
        Self { positions, normals, uvs }
    }

    /// Triangle whose vertex normals all equal the face normal.
    ///
    /// Fails for zero-area triangles, which have no face normal.
    pub fn flat(positions: [Vec3; 3]) -> Result<Self, RenderError> {
        let normal = face_normal(&positions).ok_or(RenderError::DegenerateVector("face normal"))?;
        Ok(Self::new(positions, [normal; 3], zero_uvs()))
    }
}

/// Triangle in camera/image space
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Triangle {
    /// Transformed vertex positions
    pub positions: [Vec3; 3],
    /// Transformed unit vertex normals
    pub normals: [Vec3; 3],
    /// Texture coordinates, untransformed
    pub uvs: [Vec2; 3],
}

impl Triangle {
    /// Triangle from positions only; normals are the face normal (zero if
    /// degenerate) and UVs are zero
    pub fn from_positions(positions: [Vec3; 3]) -> Self {
        let normal = face_normal(&positions).unwrap_or_else(Vec3::zeros);
        Self {
            positions,
            normals: [normal; 3],
            uvs: zero_uvs(),
        }
    }

    /// Unit normal of the supporting plane, `None` for zero-area triangles
    pub fn face_normal(&self) -> Option<Vec3> {
        face_normal(&self.positions)
    }

    /// Centroid
    pub fn centroid(&self) -> Vec3 {
        (self.positions[0] + self.positions[1] + self.positions[2]) / 3.0
    }
}

fn face_normal(p: &[Vec3; 3]) -> Option<Vec3> {
    utils::checked_normalize(&(p[1] - p[0]).cross(&(p[2] - p[0])))
}

/// Append-only, fixed-capacity list of transformed triangles
#[derive(Debug, Clone)]
pub struct SceneList {
    triangles: Vec<Triangle>,
    capacity: usize,
}

impl SceneList {
    /// Create an empty list that holds at most `capacity` triangles
    pub fn new(capacity: usize) -> Self {
        Self {
            triangles: Vec::with_capacity(capacity),
            capacity,
        }
    }

    /// Append a triangle, failing when the list is full
    pub fn push(&mut self, triangle: Triangle) -> Result<usize, RenderError> {
        if self.triangles.len() >= self.capacity {
            return Err(RenderError::SceneCapacityExceeded { capacity: self.capacity });
        }
        self.triangles.push(triangle);
        Ok(self.triangles.len() - 1)
    }

    /// Drop every triangle
    pub fn clear(&mut self) {
        self.triangles.clear();
    }

    /// Number of stored triangles
    pub fn len(&self) -> usize {
        self.triangles.len()
    }

    /// Whether the list is empty
    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty()
    }

    /// Maximum number of triangles
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    /// Triangle at `index`
    pub fn get(&self, index: usize) -> Option<&Triangle> {
        self.triangles.get(index)
    }

    /// All triangles in submission order
    pub fn as_slice(&self) -> &[Triangle] {
        &self.triangles
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn unit_triangle() -> [Vec3; 3] {
        [Vec3::new(0.0, 0.0, 0.0), Vec3::new(1.0, 0.0, 0.0), Vec3::new(0.0, 1.0, 0.0)]
    }

    #[test]
    fn test_flat_uses_face_normal() {
        let data = TriangleData::flat(unit_triangle()).unwrap();
        for n in data.normals {
            assert_relative_eq!(n, Vec3::new(0.0, 0.0, 1.0), epsilon = 1e-6);
        }
    }

    #[test]
    fn test_flat_rejects_degenerate() {
        let line = [Vec3::zeros(), Vec3::new(1.0, 0.0, 0.0), Vec3::new(2.0, 0.0, 0.0)];
        assert!(matches!(TriangleData::flat(line), Err(RenderError::DegenerateVector(_))));
    }

    #[test]
    fn test_centroid() {
        let t = Triangle::from_positions(unit_triangle());
        assert_relative_eq!(t.centroid(), Vec3::new(1.0 / 3.0, 1.0 / 3.0, 0.0), epsilon = 1e-6);
    }

    #[test]
    fn test_scene_list_capacity() {
        let mut list = SceneList::new(2);
        let t = Triangle::from_positions(unit_triangle());
        assert_eq!(list.push(t).unwrap(), 0);
        assert_eq!(list.push(t).unwrap(), 1);
        assert!(matches!(list.push(t), Err(RenderError::SceneCapacityExceeded { capacity: 2 })));
        assert_eq!(list.len(), 2);

        list.clear();
        assert!(list.is_empty());
        assert!(list.push(t).is_ok());
    }
}
