//! Triangle meshes and OBJ loading.
//!
//! A [`Mesh`] owns separate position, normal and texture-coordinate arrays.
//! Each [`Face`] corner indexes into those arrays independently, so a cube
//! can share 8 positions while keeping flat per-side normals.

use std::path::Path;

use log::{debug, warn};
use thiserror::Error;

use crate::math::{Vec2, Vec3};

/// Errors that can occur while building or loading a mesh.
#[derive(Error, Debug)]
pub enum LoadError {
    /// tobj rejected the file.
    #[error("failed to read OBJ: {0}")]
    Obj(#[from] tobj::LoadError),

    /// The file parsed but contained no triangles.
    #[error("mesh has no triangles")]
    Empty,

    /// A face refers past the end of one of the arrays.
    #[error("face {face} has {kind} index {index} but only {len} entries exist")]
    IndexOutOfRange {
        face: usize,
        kind: &'static str,
        index: usize,
        len: usize,
    },
}

pub type Result<T> = std::result::Result<T, LoadError>;

/// One triangle corner: indices into the owning mesh's arrays.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Corner {
    pub vertex: usize,
    pub normal: usize,
    pub texcoord: Option<usize>,
}

impl Corner {
    pub const fn new(vertex: usize, normal: usize) -> Self {
        Self {
            vertex,
            normal,
            texcoord: None,
        }
    }
}

/// A triangle, counter-clockwise when seen from the side its normal faces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Face {
    pub corners: [Corner; 3],
}

impl Face {
    pub const fn new(a: Corner, b: Corner, c: Corner) -> Self {
        Self { corners: [a, b, c] }
    }

    /// Corners that share position and normal indices.
    pub const fn shared(a: usize, b: usize, c: usize) -> Self {
        Self::new(Corner::new(a, a), Corner::new(b, b), Corner::new(c, c))
    }
}

#[derive(Debug, Clone, Default)]
pub struct Mesh {
    name: String,
    vertices: Vec<Vec3>,
    normals: Vec<Vec3>,
    texcoords: Vec<Vec2>,
    faces: Vec<Face>,
}

impl Mesh {
    /// Builds a mesh, checking every face index against the arrays.
    pub fn new(
        name: impl Into<String>,
        vertices: Vec<Vec3>,
        normals: Vec<Vec3>,
        texcoords: Vec<Vec2>,
        faces: Vec<Face>,
    ) -> Result<Self> {
        let mesh = Self {
            name: name.into(),
            vertices,
            normals,
            texcoords,
            faces,
        };
        mesh.validate()?;
        Ok(mesh)
    }

    /// Builds a mesh from positions and shared-index triangles, generating
    /// smooth vertex normals.
    pub fn from_triangles(
        name: impl Into<String>,
        vertices: Vec<Vec3>,
        triangles: &[[usize; 3]],
    ) -> Result<Self> {
        let faces = triangles.iter().map(|&[a, b, c]| Face::shared(a, b, c)).collect();
        let normals = vec![Vec3::ZERO; vertices.len()];
        let mut mesh = Self {
            name: name.into(),
            vertices,
            normals,
            texcoords: Vec::new(),
            faces,
        };
        mesh.validate()?;
        mesh.generate_normals();
        Ok(mesh)
    }

    /// A 2x2x2 cube centred on the origin with flat side normals.
    pub fn cube() -> Self {
        let vertices = vec![
            Vec3::new(-1.0, -1.0, -1.0),
            Vec3::new(1.0, -1.0, -1.0),
            Vec3::new(1.0, 1.0, -1.0),
            Vec3::new(-1.0, 1.0, -1.0),
            Vec3::new(-1.0, -1.0, 1.0),
            Vec3::new(1.0, -1.0, 1.0),
            Vec3::new(1.0, 1.0, 1.0),
            Vec3::new(-1.0, 1.0, 1.0),
        ];
        let normals = vec![
            Vec3::RIGHT,
            Vec3::LEFT,
            Vec3::UP,
            Vec3::DOWN,
            Vec3::BACK,
            Vec3::FORWARD,
        ];
        // (normal, two triangles over the side's corners)
        const SIDES: [(usize, [[usize; 3]; 2]); 6] = [
            (0, [[5, 1, 2], [5, 2, 6]]),
            (1, [[0, 4, 7], [0, 7, 3]]),
            (2, [[7, 6, 2], [7, 2, 3]]),
            (3, [[0, 1, 5], [0, 5, 4]]),
            (4, [[4, 5, 6], [4, 6, 7]]),
            (5, [[1, 0, 3], [1, 3, 2]]),
        ];
        let faces = SIDES
            .iter()
            .flat_map(|&(n, tris)| {
                tris.map(|[a, b, c]| Face::new(Corner::new(a, n), Corner::new(b, n), Corner::new(c, n)))
            })
            .collect();
        Self {
            name: "cube".to_string(),
            vertices,
            normals,
            texcoords: Vec::new(),
            faces,
        }
    }

    /// Loads every object in an OBJ file into one triangulated mesh.
    ///
    /// Objects without normals get smooth per-vertex normals.
    pub fn from_obj(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let options = tobj::LoadOptions {
            triangulate: true,
            single_index: true,
            ..Default::default()
        };
        let (models, _materials) = tobj::load_obj(path, &options)?;

        let mut mesh = Mesh {
            name: path
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_default(),
            ..Default::default()
        };
        let mut needs_normals = false;

        for model in &models {
            let m = &model.mesh;
            let base = mesh.vertices.len();
            let has_normals = m.normals.len() == m.positions.len();
            let has_texcoords = m.texcoords.len() / 2 == m.positions.len() / 3 && !m.texcoords.is_empty();
            needs_normals |= !has_normals;

            mesh.vertices
                .extend(m.positions.chunks_exact(3).map(|p| Vec3::new(p[0], p[1], p[2])));
            if has_normals {
                mesh.normals
                    .extend(m.normals.chunks_exact(3).map(|n| Vec3::new(n[0], n[1], n[2])));
            } else {
                mesh.normals.resize(mesh.vertices.len(), Vec3::ZERO);
            }
            if has_texcoords {
                mesh.texcoords.resize(base, Vec2::new(0.0, 0.0));
                mesh.texcoords
                    .extend(m.texcoords.chunks_exact(2).map(|t| Vec2::new(t[0], t[1])));
            }

            for tri in m.indices.chunks_exact(3) {
                let corner = |i: u32| {
                    let index = base + i as usize;
                    Corner {
                        vertex: index,
                        normal: index,
                        texcoord: has_texcoords.then_some(index),
                    }
                };
                mesh.faces.push(Face::new(corner(tri[0]), corner(tri[1]), corner(tri[2])));
            }
        }

        if mesh.faces.is_empty() {
            return Err(LoadError::Empty);
        }
        mesh.validate()?;
        if needs_normals {
            warn!("{}: no normals in file, generating smooth normals", path.display());
            mesh.generate_normals();
        }
        debug!(
            "loaded {} ({} vertices, {} faces)",
            path.display(),
            mesh.vertices.len(),
            mesh.faces.len()
        );
        Ok(mesh)
    }

    fn validate(&self) -> Result<()> {
        for (face, f) in self.faces.iter().enumerate() {
            for c in &f.corners {
                check_index(face, "vertex", c.vertex, self.vertices.len())?;
                check_index(face, "normal", c.normal, self.normals.len())?;
                if let Some(t) = c.texcoord {
                    check_index(face, "texcoord", t, self.texcoords.len())?;
                }
            }
        }
        Ok(())
    }

    /// Replaces every normal with the area-weighted average of the faces
    /// sharing its vertex, and points each corner's normal index at its
    /// vertex index.
    pub fn generate_normals(&mut self) {
        let mut normals = vec![Vec3::ZERO; self.vertices.len()];
        for face in &mut self.faces {
            let [a, b, c] = face.corners.map(|c| self.vertices[c.vertex]);
            // Cross product length is twice the area, which weights the sum.
            let n = (b - a).cross(c - a);
            for corner in &mut face.corners {
                normals[corner.vertex] += n;
                corner.normal = corner.vertex;
            }
        }
        for n in &mut normals {
            if n.magnitude_squared() > 0.0 {
                *n = n.normalize();
            }
        }
        self.normals = normals;
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn vertices(&self) -> &[Vec3] {
        &self.vertices
    }

    pub fn normals(&self) -> &[Vec3] {
        &self.normals
    }

    pub fn texcoords(&self) -> &[Vec2] {
        &self.texcoords
    }

    pub fn faces(&self) -> &[Face] {
        &self.faces
    }

    /// Model-space positions of a face's corners.
    #[inline]
    pub fn face_vertices(&self, face: &Face) -> [Vec3; 3] {
        face.corners.map(|c| self.vertices[c.vertex])
    }

    /// Model-space normals of a face's corners.
    #[inline]
    pub fn face_normals(&self, face: &Face) -> [Vec3; 3] {
        face.corners.map(|c| self.normals[c.normal])
    }
}

fn check_index(face: usize, kind: &'static str, index: usize, len: usize) -> Result<()> {
    if index < len {
        Ok(())
    } else {
        Err(LoadError::IndexOutOfRange {
            face,
            kind,
            index,
            len,
        })
    }
}
