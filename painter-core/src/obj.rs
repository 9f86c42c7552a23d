/// Wavefront OBJ reader
use nom::{
    character::complete::{char, i64 as integer, space0, space1},
    combinator::{eof, opt},
    multi::{many0, separated_list1},
    number::complete::double,
    sequence::{preceded, terminated, tuple},
    IResult,
};

use crate::geometry::Triangle;
use crate::ingest::{DecodedMesh, DecodedVertex, IngestError};
use crate::vector::Vector3;

const DEFAULT_NAME: &str = "default";

#[derive(Debug, Clone, Copy, PartialEq)]
struct Corner {
    position: i64,
    normal: Option<i64>,
}

/// Parse OBJ source text into one decoded mesh per `o` / `g` block.
///
/// Only positions, normals and faces are read. Polygons are fan-triangulated.
pub fn parse_obj(source: &str) -> Result<Vec<DecodedMesh>, IngestError> {
    let mut positions: Vec<Vector3> = Vec::new();
    let mut normals: Vec<Vector3> = Vec::new();
    let mut meshes = Vec::new();
    let mut current = DecodedMesh::new(DEFAULT_NAME, Vec::new(), 0);

    for (index, raw) in source.lines().enumerate() {
        let line = index + 1;
        let text = raw.split('#').next().unwrap_or("").trim();
        let (keyword, args) = match text.split_once(char::is_whitespace) {
            Some((keyword, args)) => (keyword, args.trim()),
            None => (text, ""),
        };
        let error = |message: String| IngestError::Parse { line, message };

        match keyword {
            "v" => positions.push(triple(args).map_err(|_| error(format!("bad vertex '{}'", args)))?),
            "vn" => normals.push(triple(args).map_err(|_| error(format!("bad normal '{}'", args)))?),
            "f" => {
                let corners = face(args).map_err(|_| error(format!("bad face '{}'", args)))?;
                if corners.len() < 3 {
                    return Err(error(format!("face needs 3 corners, got {}", corners.len())));
                }
                let resolved = corners
                    .iter()
                    .map(|c| resolve(c, &positions, &normals))
                    .collect::<Result<Vec<_>, String>>()
                    .map_err(error)?;
                for k in 1..resolved.len() - 1 {
                    push_triangle(&mut current, [resolved[0], resolved[k], resolved[k + 1]]);
                }
            }
            "o" | "g" => {
                let name = if args.is_empty() { DEFAULT_NAME } else { args };
                if current.face_count > 0 {
                    meshes.push(std::mem::replace(
                        &mut current,
                        DecodedMesh::new(name, Vec::new(), 0),
                    ));
                } else {
                    current.name = name.to_string();
                }
            }
            _ => {}
        }
    }

    if current.face_count > 0 {
        meshes.push(current);
    }
    Ok(meshes)
}

fn triple(args: &str) -> Result<Vector3, nom::Err<nom::error::Error<&str>>> {
    let (_, (x, y, z)) = coordinates(args)?;
    Ok(Vector3::new(x, y, z))
}

fn coordinates(input: &str) -> IResult<&str, (f64, f64, f64)> {
    // a trailing w (or vertex colour) is allowed and ignored
    terminated(
        tuple((
            preceded(space0, double),
            preceded(space1, double),
            preceded(space1, double),
        )),
        tuple((many0(preceded(space1, double)), space0, eof)),
    )(input)
}

fn face(args: &str) -> Result<Vec<Corner>, nom::Err<nom::error::Error<&str>>> {
    let (_, corners) = terminated(separated_list1(space1, corner), preceded(space0, eof))(args)?;
    Ok(corners)
}

/// `i`, `i/t`, `i//n` or `i/t/n`.
fn corner(input: &str) -> IResult<&str, Corner> {
    let (input, position) = integer(input)?;
    let (input, texture) = opt(preceded(char('/'), opt(integer)))(input)?;
    let (input, normal) = match texture {
        Some(_) => opt(preceded(char('/'), integer))(input)?,
        None => (input, None),
    };
    Ok((input, Corner { position, normal }))
}

/// 1-based index, or negative relative to the end of what has been read so far.
fn lookup(list: &[Vector3], index: i64, what: &str) -> Result<Vector3, String> {
    let len = list.len() as i64;
    let zero_based = if index < 0 { len + index } else { index - 1 };
    if index == 0 || zero_based < 0 || zero_based >= len {
        return Err(format!("{} index {} out of range (have {})", what, index, len));
    }
    Ok(list[zero_based as usize])
}

fn resolve(
    corner: &Corner,
    positions: &[Vector3],
    normals: &[Vector3],
) -> Result<(Vector3, Option<Vector3>), String> {
    let position = lookup(positions, corner.position, "vertex")?;
    let normal = corner
        .normal
        .map(|n| lookup(normals, n, "normal"))
        .transpose()?;
    Ok((position, normal))
}

fn push_triangle(mesh: &mut DecodedMesh, corners: [(Vector3, Option<Vector3>); 3]) {
    let face_normal = Triangle::new(corners[0].0, corners[1].0, corners[2].0)
        .normal()
        .unwrap_or_default();
    for (position, normal) in corners {
        mesh.vertices
            .push(DecodedVertex::new(position, normal.unwrap_or(face_normal)));
    }
    mesh.face_count += 1;
}
