//! Flat buffer and OBJ export.
//!
//! Hosts that cannot hold Rust structures receive a polyhedron as two flat
//! buffers: coordinates `[x, y, z, x, y, z, ...]` and a face buffer where
//! each face is written as its vertex count followed by its indices.

use std::io::{self, Write};

use serde::Serialize;

use crate::config::HullConfig;
use crate::error::{HullError, HullResult};
use crate::polyhedron::Polyhedron;

/// Flat buffers for a host boundary.
///
/// # Examples
/// ```
/// use waterman_hull::{export::PolyhedronBuffers, waterman_polyhedron};
///
/// let octahedron = waterman_polyhedron(2.0).unwrap();
/// let buffers = PolyhedronBuffers::from_polyhedron(&octahedron, false);
///
/// assert_eq!(buffers.coords.len(), 6 * 3);
/// assert_eq!(buffers.faces.len(), 8 * 4); // count + 3 indices per triangle
/// assert_eq!(buffers.face_count, 8);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PolyhedronBuffers {
    /// Vertex coordinates, three per vertex, in hull-vertex order.
    pub coords: Vec<f64>,
    /// Count-prefixed face records.
    pub faces: Vec<usize>,
    pub vertex_count: usize,
    pub face_count: usize,
}

impl PolyhedronBuffers {
    /// Flattens a polyhedron, optionally rescaling the coordinates with
    /// [`normalize_coords`].
    pub fn from_polyhedron(polyhedron: &Polyhedron, normalize: bool) -> Self {
        let mut coords = flatten_coords(polyhedron);
        if normalize {
            normalize_coords(&mut coords);
        }
        Self {
            coords,
            faces: flatten_faces(polyhedron),
            vertex_count: polyhedron.num_vertices(),
            face_count: polyhedron.num_faces(),
        }
    }

    /// Flattens a polyhedron, rescaling the coordinates when
    /// `config.normalize_output` is set.
    pub fn with_config(polyhedron: &Polyhedron, config: &HullConfig) -> Self {
        Self::from_polyhedron(polyhedron, config.normalize_output)
    }
}

/// Vertex coordinates as `[x, y, z, ...]`.
pub fn flatten_coords(polyhedron: &Polyhedron) -> Vec<f64> {
    polyhedron
        .vertices()
        .iter()
        .flat_map(|v| v.to_array())
        .collect()
}

/// Faces as count-prefixed records.
///
/// # Examples
/// ```
/// use waterman_hull::export::{face_buffer_len, flatten_faces};
/// use waterman_hull::waterman_polyhedron;
///
/// let hull = waterman_polyhedron(1.5).unwrap();
/// assert_eq!(flatten_faces(&hull).len(), face_buffer_len(&hull));
/// ```
pub fn flatten_faces(polyhedron: &Polyhedron) -> Vec<usize> {
    let mut buffer = Vec::with_capacity(face_buffer_len(polyhedron));
    for face in polyhedron.faces() {
        buffer.push(face.len());
        buffer.extend_from_slice(face);
    }
    buffer
}

/// Length of the buffer [`flatten_faces`] produces: one count per face plus
/// the sum of the face sizes.
pub fn face_buffer_len(polyhedron: &Polyhedron) -> usize {
    polyhedron.num_faces() + polyhedron.faces().iter().map(Vec::len).sum::<usize>()
}

/// Divides every value by the overall range `|max − min|` of the buffer.
///
/// The buffer is left unchanged when it is empty or all values are equal.
///
/// # Examples
/// ```
/// use waterman_hull::export::normalize_coords;
///
/// let mut coords = vec![-2.0, 0.0, 2.0];
/// normalize_coords(&mut coords);
/// assert_eq!(coords, vec![-0.5, 0.0, 0.5]);
/// ```
pub fn normalize_coords(coords: &mut [f64]) {
    let Some(&first) = coords.first() else {
        return;
    };
    let (min, max) = coords
        .iter()
        .fold((first, first), |(lo, hi), &c| (lo.min(c), hi.max(c)));
    let range = (max - min).abs();
    if range == 0.0 {
        return;
    }
    for c in coords.iter_mut() {
        *c /= range;
    }
}

/// Splits a count-prefixed face buffer back into faces.
///
/// # Errors
///
/// [`HullError::MalformedFaceBuffer`] with the offset of the record that
/// runs past the end of the buffer.
pub fn decode_faces(buffer: &[usize]) -> HullResult<Vec<Vec<usize>>> {
    let mut faces = Vec::new();
    let mut offset = 0;
    while offset < buffer.len() {
        let count = buffer[offset];
        let start = offset + 1;
        let end = start
            .checked_add(count)
            .filter(|&end| end <= buffer.len())
            .ok_or(HullError::MalformedFaceBuffer { offset })?;
        faces.push(buffer[start..end].to_vec());
        offset = end;
    }
    Ok(faces)
}

/// Fan-triangulated index buffer `[i0, i1, i2, ...]` for GPU upload.
pub fn triangle_indices(polyhedron: &Polyhedron) -> Vec<u32> {
    polyhedron
        .triangles()
        .into_iter()
        .flatten()
        .map(|i| i as u32)
        .collect()
}

/// Writes the polyhedron as Wavefront OBJ with polygon faces (1-based),
/// optionally with coordinates rescaled by [`normalize_coords`].
///
/// # Examples
/// ```
/// use waterman_hull::{export::write_obj, waterman_polyhedron};
///
/// let hull = waterman_polyhedron(2.0).unwrap();
/// let mut out = Vec::new();
/// write_obj(&hull, false, &mut out).unwrap();
/// let text = String::from_utf8(out).unwrap();
/// assert_eq!(text.lines().filter(|l| l.starts_with("v ")).count(), 6);
/// assert_eq!(text.lines().filter(|l| l.starts_with("f ")).count(), 8);
/// ```
pub fn write_obj<W: Write>(polyhedron: &Polyhedron, normalize: bool, mut out: W) -> io::Result<()> {
    writeln!(out, "# Waterman polyhedron")?;
    writeln!(out, "# Vertices: {}", polyhedron.num_vertices())?;
    writeln!(out, "# Faces: {}", polyhedron.num_faces())?;
    writeln!(out)?;

    let mut coords = flatten_coords(polyhedron);
    if normalize {
        normalize_coords(&mut coords);
    }
    for v in coords.chunks_exact(3) {
        writeln!(out, "v {} {} {}", v[0], v[1], v[2])?;
    }
    writeln!(out)?;

    for face in polyhedron.faces() {
        write!(out, "f")?;
        for &i in face {
            write!(out, " {}", i + 1)?;
        }
        writeln!(out)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::waterman_polyhedron;

    #[test]
    fn test_normalize_noop_cases() {
        let mut empty: Vec<f64> = Vec::new();
        normalize_coords(&mut empty);
        assert!(empty.is_empty());

        let mut flat = vec![3.0, 3.0, 3.0];
        normalize_coords(&mut flat);
        assert_eq!(flat, vec![3.0, 3.0, 3.0]);
    }

    #[test]
    fn test_normalize_uses_overall_range() {
        let mut coords = vec![0.0, 1.0, 4.0, 2.0];
        normalize_coords(&mut coords);
        assert_eq!(coords, vec![0.0, 0.25, 1.0, 0.5]);
    }

    #[test]
    fn test_decode_inverts_flatten() {
        let hull = waterman_polyhedron(1.5).unwrap();
        let decoded = decode_faces(&flatten_faces(&hull)).unwrap();
        assert_eq!(decoded, hull.faces());
    }

    #[test]
    fn test_decode_rejects_truncated_record() {
        let err = decode_faces(&[3, 0, 1, 2, 4, 0, 1]).unwrap_err();
        assert_eq!(err, HullError::MalformedFaceBuffer { offset: 4 });
        assert!(decode_faces(&[]).unwrap().is_empty());
    }

    #[test]
    fn test_buffers_match_polyhedron() {
        let hull = waterman_polyhedron(1.5).unwrap();
        let buffers = PolyhedronBuffers::from_polyhedron(&hull, true);
        assert_eq!(buffers.vertex_count, 12);
        assert_eq!(buffers.face_count, 14);
        assert_eq!(buffers.coords.len(), 36);
        // 8 triangles and 6 squares
        assert_eq!(buffers.faces.len(), 14 + 8 * 3 + 6 * 4);
        // coordinates span [-1, 1], so the range is 2
        assert!(buffers.coords.iter().all(|c| c.abs() <= 0.5));
    }

    #[test]
    fn test_buffers_follow_config_flag() {
        let hull = waterman_polyhedron(2.0).unwrap();
        let raw = PolyhedronBuffers::with_config(&hull, &HullConfig::new(None, false).unwrap());
        let scaled = PolyhedronBuffers::with_config(&hull, &HullConfig::new(None, true).unwrap());

        assert_eq!(raw, PolyhedronBuffers::from_polyhedron(&hull, false));
        assert_eq!(raw.faces, scaled.faces);
        assert!(raw.coords.iter().any(|c| c.abs() == 2.0));
        // octahedron spans [-2, 2]
        for (r, s) in raw.coords.iter().zip(&scaled.coords) {
            assert_eq!(*s, r / 4.0);
        }
    }

    #[test]
    fn test_obj_faces_are_one_based() {
        let hull = waterman_polyhedron(1.5).unwrap();
        let mut out = Vec::new();
        write_obj(&hull, true, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();

        let indices: Vec<usize> = text
            .lines()
            .filter_map(|l| l.strip_prefix("f "))
            .flat_map(|l| l.split_whitespace().map(|i| i.parse::<usize>().unwrap()))
            .collect();
        assert_eq!(indices.iter().min(), Some(&1));
        assert_eq!(indices.iter().max(), Some(&12));
        assert!(text.contains("v 0.5 0.5 0\n") || text.contains("v 0.5 0 0.5\n"));
    }

    #[test]
    fn test_triangle_indices_in_bounds() {
        let hull = waterman_polyhedron(2.0).unwrap();
        let indices = triangle_indices(&hull);
        assert_eq!(indices.len(), 24);
        assert!(indices.iter().all(|&i| (i as usize) < hull.num_vertices()));
    }
}
