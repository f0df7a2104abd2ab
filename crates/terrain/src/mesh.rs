use thiserror::Error;

/// Number of distinct vertices a 16-bit strip index buffer can address.
/// `0xFFFF` is the primitive-restart value for `Uint16` strips, so the
/// highest usable index is `0xFFFE`.
pub const MAX_VERTICES: usize = u16::MAX as usize;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum MeshError {
    #[error("plane needs at least one division, got {0}")]
    TooFewDivisions(u32),
    #[error(
        "{divisions} divisions need {vertices} vertices, more than 16-bit strip indices can address ({max})",
        max = MAX_VERTICES
    )]
    IndexOverflow { divisions: u32, vertices: usize },
}

/// Flat, square, subdivided ground plane ready for upload.
///
/// Vertices are generated row-major (Z outer, X inner) and the index buffer
/// is consumed as a single triangle strip.
#[derive(Debug, Clone, PartialEq)]
pub struct TerrainMesh {
    pub vertices: Vec<[f32; 3]>,
    pub indices: Vec<u16>,
    size: f32,
    divisions: u32,
}

impl TerrainMesh {
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn index_count(&self) -> usize {
        self.indices.len()
    }

    pub fn divisions(&self) -> u32 {
        self.divisions
    }

    pub fn size(&self) -> f32 {
        self.size
    }

    /// Distance between neighbouring vertices along either axis.
    pub fn vertex_spacing(&self) -> f32 {
        self.size / self.divisions as f32
    }

    /// The plane spans `[-half_extent, half_extent]` on X and Z.
    pub fn half_extent(&self) -> f32 {
        self.size / 2.0
    }

    /// Visible (non-degenerate) triangles: two per grid quad.
    pub fn triangle_count(&self) -> usize {
        2 * (self.divisions as usize).pow(2)
    }
}

/// Generate a `size` × `size` plane centred on the origin with `divisions`
/// quads along each edge.
///
/// For every row the strip walks the columns emitting the top vertex then
/// the bottom one. Rows are stitched with two repeated indices (the last
/// vertex of the finished row, then the first vertex of the next row) so the
/// strip continues through zero-area triangles.
pub fn generate(size: f32, divisions: u32) -> Result<TerrainMesh, MeshError> {
    if divisions < 1 {
        return Err(MeshError::TooFewDivisions(divisions));
    }
    let width = divisions as usize + 1;
    let vertex_total = width * width;
    if vertex_total > MAX_VERTICES {
        return Err(MeshError::IndexOverflow {
            divisions,
            vertices: vertex_total,
        });
    }

    let half = size / 2.0;
    let step = size / divisions as f32;
    let mut vertices = Vec::with_capacity(vertex_total);
    for z in 0..width {
        for x in 0..width {
            vertices.push([x as f32 * step - half, 0.0, z as f32 * step - half]);
        }
    }

    let rows = divisions as usize;
    // Two indices per column per row, plus one degenerate pair per row join.
    let mut indices = Vec::with_capacity(rows * 2 * width + (rows - 1) * 2);
    // Capacity was checked above, so every index below fits in u16.
    let index = |x: usize, z: usize| (z * width + x) as u16;
    for z in 0..rows {
        for x in 0..width {
            indices.push(index(x, z));
            indices.push(index(x, z + 1));
        }
        if z + 1 < rows {
            indices.push(index(width - 1, z + 1));
            indices.push(index(0, z + 1));
        }
    }

    tracing::debug!(
        size,
        divisions,
        vertices = vertices.len(),
        indices = indices.len(),
        "generated terrain mesh"
    );

    Ok(TerrainMesh {
        vertices,
        indices,
        size,
        divisions,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_quad_is_four_corners() {
        let mesh = generate(2.0, 1).unwrap();
        assert_eq!(
            mesh.vertices,
            vec![
                [-1.0, 0.0, -1.0],
                [1.0, 0.0, -1.0],
                [-1.0, 0.0, 1.0],
                [1.0, 0.0, 1.0],
            ]
        );
        assert_eq!(mesh.indices, vec![0, 2, 1, 3]);
    }

    #[test]
    fn two_rows_are_joined_by_one_degenerate_pair() {
        let mesh = generate(10.0, 2).unwrap();
        assert_eq!(mesh.index_count(), 14);
        assert_eq!(
            mesh.indices,
            vec![0, 3, 1, 4, 2, 5, 5, 3, 3, 6, 4, 7, 5, 8]
        );
        // The join repeats the last index of row 0 and the first of row 1.
        assert_eq!(mesh.indices[5], mesh.indices[6]);
        assert_eq!(mesh.indices[7], mesh.indices[8]);
    }

    #[test]
    fn counts_and_max_index_hold_for_many_sizes() {
        for divisions in [1u32, 2, 3, 7, 16, 100, 250, 254] {
            let mesh = generate(100.0, divisions).unwrap();
            let width = divisions as usize + 1;
            assert_eq!(mesh.vertex_count(), width * width);
            let max = *mesh.indices.iter().max().unwrap() as usize;
            assert_eq!(max, width * width - 1, "divisions={divisions}");
            let rows = divisions as usize;
            assert_eq!(mesh.index_count(), rows * 2 * width + (rows - 1) * 2);
        }
    }

    #[test]
    fn vertices_span_the_plane_on_a_flat_grid() {
        let mesh = generate(5000.0, 250).unwrap();
        assert!(mesh.vertices.iter().all(|v| v[1] == 0.0));
        assert_eq!(mesh.vertices.first().unwrap(), &[-2500.0, 0.0, -2500.0]);
        assert_eq!(mesh.vertices.last().unwrap(), &[2500.0, 0.0, 2500.0]);
        assert_eq!(mesh.vertex_spacing(), 20.0);
        let second = mesh.vertices[1];
        assert!((second[0] - (-2480.0)).abs() < 1e-3);
    }

    #[test]
    fn generation_is_idempotent() {
        let a = generate(640.0, 13).unwrap();
        let b = generate(640.0, 13).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.size(), 640.0);
        assert_eq!(a.divisions(), 13);
    }

    #[test]
    fn strip_triangles_cover_every_quad() {
        let mesh = generate(4.0, 3).unwrap();
        let area: usize = mesh
            .indices
            .windows(3)
            .filter(|t| t[0] != t[1] && t[1] != t[2] && t[0] != t[2])
            .count();
        assert_eq!(area, mesh.triangle_count());
    }

    #[test]
    fn zero_divisions_rejected() {
        assert_eq!(generate(1.0, 0), Err(MeshError::TooFewDivisions(0)));
    }

    #[test]
    fn index_capacity_is_enforced() {
        assert!(generate(1.0, 254).is_ok());
        let err = generate(1.0, 255).unwrap_err();
        assert_eq!(
            err,
            MeshError::IndexOverflow {
                divisions: 255,
                vertices: 256 * 256,
            }
        );
    }

    #[test]
    fn largest_mesh_never_emits_strip_restart_index() {
        let mesh = generate(1.0, 254).unwrap();
        assert!(mesh.indices.iter().all(|&i| i != u16::MAX));
        assert_eq!(*mesh.indices.iter().max().unwrap(), 255 * 255 - 1);
    }
}
