/// STL reader for binary and ASCII formats
use nom::{
    bytes::complete::{tag, take_till},
    character::complete::{multispace0, multispace1},
    multi::many0,
    number::complete::double,
    sequence::preceded,
    IResult,
};

use crate::ingest::{DecodedMesh, DecodedVertex, IngestError};
use crate::vector::Vector3;

const HEADER_LEN: usize = 80;
const FACET_LEN: usize = 50;

fn read_f32(data: &[u8], offset: usize) -> f64 {
    f32::from_le_bytes([data[offset], data[offset + 1], data[offset + 2], data[offset + 3]]) as f64
}

fn read_vector(data: &[u8], offset: usize) -> Vector3 {
    Vector3::new(
        read_f32(data, offset),
        read_f32(data, offset + 4),
        read_f32(data, offset + 8),
    )
}

/// Parse a binary STL file. The header's triangle count is the declared face count.
pub fn parse_binary_stl(name: &str, data: &[u8]) -> Result<DecodedMesh, IngestError> {
    if data.len() < HEADER_LEN + 4 {
        return Err(IngestError::Stl("file too small to be a valid STL".to_string()));
    }

    let data = &data[HEADER_LEN..];
    let face_count = u32::from_le_bytes([data[0], data[1], data[2], data[3]]) as usize;
    let body = &data[4..];

    let available = body.len() / FACET_LEN;
    if available < face_count {
        return Err(IngestError::Stl(format!(
            "header declares {} facets but only {} are present",
            face_count, available
        )));
    }

    let mut vertices = Vec::with_capacity(face_count * 3);
    for facet in body.chunks_exact(FACET_LEN).take(face_count) {
        // normal, three corners, then a 2-byte attribute count
        let normal = read_vector(facet, 0);
        for corner in 0..3 {
            vertices.push(DecodedVertex::new(read_vector(facet, 12 + corner * 12), normal));
        }
    }

    Ok(DecodedMesh::new(name, vertices, face_count))
}

/// Parse an ASCII STL file. The solid's own name wins over `name` when present.
pub fn parse_ascii_stl(name: &str, input: &str) -> Result<DecodedMesh, IngestError> {
    match solid(input) {
        Ok((_, (solid_name, vertices))) => {
            let solid_name = solid_name.trim();
            let name = if solid_name.is_empty() { name } else { solid_name };
            let face_count = vertices.len() / 3;
            Ok(DecodedMesh::new(name, vertices, face_count))
        }
        Err(e) => Err(IngestError::Stl(format!("failed to parse ASCII STL: {:?}", e))),
    }
}

fn solid(input: &str) -> IResult<&str, (&str, Vec<DecodedVertex>)> {
    let (input, _) = preceded(multispace0, tag("solid"))(input)?;
    let (input, solid_name) = take_till(|c: char| c == '\n' || c == '\r')(input)?;
    let (input, facets) = many0(facet)(input)?;
    let (input, _) = preceded(multispace0, tag("endsolid"))(input)?;

    Ok((input, (solid_name, facets.into_iter().flatten().collect())))
}

fn facet(input: &str) -> IResult<&str, [DecodedVertex; 3]> {
    let (input, _) = preceded(multispace0, tag("facet"))(input)?;
    let (input, _) = preceded(multispace1, tag("normal"))(input)?;
    let (input, normal) = vector(input)?;
    let (input, _) = preceded(multispace0, tag("outer"))(input)?;
    let (input, _) = preceded(multispace1, tag("loop"))(input)?;
    let (input, v1) = vertex(input, normal)?;
    let (input, v2) = vertex(input, normal)?;
    let (input, v3) = vertex(input, normal)?;
    let (input, _) = preceded(multispace0, tag("endloop"))(input)?;
    let (input, _) = preceded(multispace0, tag("endfacet"))(input)?;

    Ok((input, [v1, v2, v3]))
}

fn vertex(input: &str, normal: Vector3) -> IResult<&str, DecodedVertex> {
    let (input, _) = preceded(multispace0, tag("vertex"))(input)?;
    let (input, position) = vector(input)?;
    Ok((input, DecodedVertex::new(position, normal)))
}

fn vector(input: &str) -> IResult<&str, Vector3> {
    let (input, _) = multispace0(input)?;
    let (input, x) = double(input)?;
    let (input, _) = multispace1(input)?;
    let (input, y) = double(input)?;
    let (input, _) = multispace1(input)?;
    let (input, z) = double(input)?;
    Ok((input, Vector3::new(x, y, z)))
}

/// Detect and parse an STL file (ASCII first, then binary).
///
/// Binary files whose header happens to start with `solid` still load; when
/// neither reading works, the ASCII error is the one reported.
pub fn parse_stl(name: &str, data: &[u8]) -> Result<DecodedMesh, IngestError> {
    if !data.starts_with(b"solid") {
        return parse_binary_stl(name, data);
    }

    let ascii = match std::str::from_utf8(data) {
        Ok(text) => parse_ascii_stl(name, text),
        Err(e) => Err(IngestError::Stl(format!("ASCII STL is not valid UTF-8: {}", e))),
    };
    match ascii {
        Ok(mesh) => Ok(mesh),
        Err(ascii_error) => parse_binary_stl(name, data).map_err(|_| ascii_error),
    }
}
