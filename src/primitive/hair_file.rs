//! Strand geometry stored outside the scene file.
//!
//! Two formats are read, chosen by extension:
//! - `.hair`: Cem Yuksel's binary HAIR format, per-strand segment counts or a
//!   default count, followed by the point array.
//! - `.ply`: a `vertex` element with `x`, `y`, `z`, cut into strands of a fixed
//!   number of points, as neural hair captures are stored.

use std::path::Path;

use anyhow::Context;

const HAIR_HEADER_LEN: usize = 128;
const HAIR_HAS_SEGMENTS: u32 = 1;
const HAIR_HAS_POINTS: u32 = 2;

pub fn read_strands_file(path: &Path, strand_length: usize) -> anyhow::Result<Vec<Vec<glam::Vec3A>>> {
    let ext = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase());
    match ext.as_deref() {
        Some("hair") => {
            let bytes = std::fs::read(path)?;
            parse_hair(&bytes)
        }
        Some("ply") => {
            let file = std::fs::File::open(path)?;
            let mut reader = std::io::BufReader::new(file);
            read_ply_strands(&mut reader, strand_length)
        }
        _ => anyhow::bail!("unsupported strands file, expected .hair or .ply"),
    }
}

fn parse_hair(bytes: &[u8]) -> anyhow::Result<Vec<Vec<glam::Vec3A>>> {
    if bytes.len() < HAIR_HEADER_LEN || &bytes[0..4] != b"HAIR" {
        anyhow::bail!("missing HAIR header");
    }
    let header_u32 = |offset: usize| {
        u32::from_le_bytes([
            bytes[offset],
            bytes[offset + 1],
            bytes[offset + 2],
            bytes[offset + 3],
        ])
    };
    let hair_count = header_u32(4) as usize;
    let point_count = header_u32(8) as usize;
    let arrays = header_u32(12);
    let default_segments = header_u32(16) as usize;

    if arrays & HAIR_HAS_POINTS == 0 {
        anyhow::bail!("HAIR file has no point array");
    }

    let mut cursor = HAIR_HEADER_LEN;
    let segments = if arrays & HAIR_HAS_SEGMENTS != 0 {
        take(bytes, &mut cursor, hair_count, 2)?
            .chunks_exact(2)
            .map(|c| u16::from_le_bytes([c[0], c[1]]) as usize)
            .collect()
    } else {
        vec![default_segments; hair_count]
    };
    let points = take(bytes, &mut cursor, point_count, 12)?
        .chunks_exact(12)
        .map(|c| {
            glam::Vec3A::new(
                f32::from_le_bytes([c[0], c[1], c[2], c[3]]),
                f32::from_le_bytes([c[4], c[5], c[6], c[7]]),
                f32::from_le_bytes([c[8], c[9], c[10], c[11]]),
            )
        })
        .collect::<Vec<_>>();

    let mut strands = Vec::with_capacity(hair_count);
    let mut start = 0;
    for (i, seg) in segments.into_iter().enumerate() {
        let end = start + seg + 1;
        if end > points.len() {
            anyhow::bail!("strand {} runs past the {} points of the file", i, points.len());
        }
        strands.push(points[start..end].to_vec());
        start = end;
    }
    Ok(strands)
}

fn take<'a>(
    bytes: &'a [u8],
    cursor: &mut usize,
    count: usize,
    stride: usize,
) -> anyhow::Result<&'a [u8]> {
    let end = count
        .checked_mul(stride)
        .and_then(|len| cursor.checked_add(len))
        .context("HAIR array size overflows")?;
    let data = bytes.get(*cursor..end).context("HAIR file is truncated")?;
    *cursor = end;
    Ok(data)
}

fn read_ply_strands<R: std::io::Read>(
    reader: &mut R,
    strand_length: usize,
) -> anyhow::Result<Vec<Vec<glam::Vec3A>>> {
    use ply_rs::{parser::Parser, ply::{DefaultElement, Property}};

    let ply = Parser::<DefaultElement>::new().read_ply(reader)?;
    let vertices = ply
        .payload
        .get("vertex")
        .context("PLY file has no 'vertex' element")?;

    let coord = |vertex: &DefaultElement, key: &str| -> anyhow::Result<f32> {
        match vertex.get(key) {
            Some(Property::Float(v)) => Ok(*v),
            Some(Property::Double(v)) => Ok(*v as f32),
            Some(_) => anyhow::bail!("PLY property '{}' should be float or double", key),
            None => anyhow::bail!("PLY vertex has no '{}' property", key),
        }
    };
    let mut points = Vec::with_capacity(vertices.len());
    for vertex in vertices {
        points.push(glam::Vec3A::new(
            coord(vertex, "x")?,
            coord(vertex, "y")?,
            coord(vertex, "z")?,
        ));
    }

    Ok(points
        .chunks(strand_length.max(1))
        .map(|strand| strand.to_vec())
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hair_bytes(segments: Option<&[u16]>, default_segments: u32, points: &[[f32; 3]]) -> Vec<u8> {
        let hair_count = segments.map_or(1, |s| s.len()) as u32;
        let arrays = HAIR_HAS_POINTS | if segments.is_some() { HAIR_HAS_SEGMENTS } else { 0 };
        let mut bytes = b"HAIR".to_vec();
        for v in &[hair_count, points.len() as u32, arrays, default_segments] {
            bytes.extend_from_slice(&v.to_le_bytes());
        }
        bytes.resize(HAIR_HEADER_LEN, 0);
        for s in segments.unwrap_or(&[]) {
            bytes.extend_from_slice(&s.to_le_bytes());
        }
        for p in points {
            for c in p {
                bytes.extend_from_slice(&c.to_le_bytes());
            }
        }
        bytes
    }

    #[test]
    fn hair_with_segment_array() {
        let points = [[0.0, 0.0, 0.0], [0.0, 1.0, 0.0], [1.0, 0.0, 0.0], [1.0, 1.0, 0.0], [1.0, 2.0, 0.0]];
        let strands = parse_hair(&hair_bytes(Some(&[1, 2]), 0, &points)).unwrap();
        assert_eq!(strands.len(), 2);
        assert_eq!(strands[0].len(), 2);
        assert_eq!(strands[1].len(), 3);
        assert_eq!(strands[1][2], glam::Vec3A::new(1.0, 2.0, 0.0));
    }

    #[test]
    fn hair_with_default_segments() {
        let points = [[0.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 2.0, 0.0]];
        let strands = parse_hair(&hair_bytes(None, 2, &points)).unwrap();
        assert_eq!(strands, vec![points.iter().map(|p| glam::Vec3A::from(*p)).collect::<Vec<_>>()]);
    }

    #[test]
    fn truncated_hair_is_rejected() {
        let points = [[0.0, 0.0, 0.0], [0.0, 1.0, 0.0]];
        let mut bytes = hair_bytes(Some(&[1]), 0, &points);
        bytes.truncate(bytes.len() - 4);
        assert!(parse_hair(&bytes).unwrap_err().to_string().contains("truncated"));
        assert!(parse_hair(b"NOPE").is_err());
    }

    #[test]
    fn segments_past_the_points_are_rejected() {
        let points = [[0.0, 0.0, 0.0], [0.0, 1.0, 0.0]];
        let err = parse_hair(&hair_bytes(Some(&[4]), 0, &points)).unwrap_err();
        assert!(err.to_string().contains("runs past"));
    }

    #[test]
    fn ply_vertices_are_cut_into_fixed_strands() {
        let ply = "ply\nformat ascii 1.0\nelement vertex 5\nproperty float x\nproperty float y\nproperty float z\nend_header\n\
                   0 0 0\n0 1 0\n0 2 0\n1 0 0\n1 1 0\n";
        let strands = read_ply_strands(&mut ply.as_bytes(), 3).unwrap();
        assert_eq!(strands.len(), 2);
        assert_eq!(strands[0].len(), 3);
        assert_eq!(strands[1], vec![glam::Vec3A::new(1.0, 0.0, 0.0), glam::Vec3A::new(1.0, 1.0, 0.0)]);
    }
}
