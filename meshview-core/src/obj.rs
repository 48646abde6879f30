/// Line-oriented mesh text format (`v` / `vt` / `vn` / `f`)
use std::fmt::Write as _;

use nom::{
    character::complete::{char, digit1},
    combinator::{all_consuming, map_res, opt, recognize},
    number::complete::double,
    sequence::{pair, preceded, tuple},
    IResult,
};
use tracing::debug;

use crate::algebra::{Vector2, Vector3};
use crate::error::{ArgumentError, ParseError, ValidationError};
use crate::mesh::{Mesh, Polygon, Vertex};

/// One `v/t/n` corner of a face line, indices as written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct FaceRef {
    vertex: i64,
    texture: Option<i64>,
    normal: Option<i64>,
}

fn signed_index(input: &str) -> IResult<&str, i64> {
    map_res(recognize(pair(opt(char('-')), digit1)), str::parse::<i64>)(input)
}

/// `v`, `v/t`, `v//n` or `v/t/n`.
fn face_ref(input: &str) -> IResult<&str, FaceRef> {
    let (input, (vertex, rest)) = tuple((
        signed_index,
        opt(pair(
            preceded(char('/'), opt(signed_index)),
            opt(preceded(char('/'), signed_index)),
        )),
    ))(input)?;
    let (texture, normal) = rest.unwrap_or((None, None));
    Ok((
        input,
        FaceRef {
            vertex,
            texture,
            normal,
        },
    ))
}

fn number(token: &str) -> Result<f64, ArgumentError> {
    all_consuming(double)(token)
        .map(|(_, value)| value)
        .map_err(|_: nom::Err<nom::error::Error<&str>>| {
            ArgumentError::new(format!("malformed number {:?}", token))
        })
}

fn numbers<'a>(
    keyword: &str,
    tokens: impl Iterator<Item = &'a str>,
    min: usize,
) -> Result<Vec<f64>, ArgumentError> {
    let values = tokens.map(number).collect::<Result<Vec<_>, _>>()?;
    if values.len() < min {
        return Err(ArgumentError::new(format!(
            "`{}` needs at least {} numbers, got {}",
            keyword,
            min,
            values.len()
        )));
    }
    Ok(values)
}

/// Turns a 1-based (or negative, end-relative) index into a 0-based one.
fn resolve_index(kind: &str, raw: i64, count: usize) -> Result<usize, ArgumentError> {
    let resolved = match raw {
        0 => None,
        i if i > 0 => usize::try_from(i - 1).ok().filter(|&i| i < count),
        i => usize::try_from(count as i64 + i).ok(),
    };
    resolved.ok_or_else(|| {
        ArgumentError::new(format!(
            "{} index {} out of range ({} defined so far)",
            kind, raw, count
        ))
    })
}

fn parse_face<'a>(
    mesh: &Mesh,
    tokens: impl Iterator<Item = &'a str>,
) -> Result<Polygon, ArgumentError> {
    let refs = tokens
        .map(|token| {
            all_consuming(face_ref)(token)
                .map(|(_, r)| r)
                .map_err(|_: nom::Err<nom::error::Error<&str>>| {
                    ArgumentError::new(format!("malformed face index {:?}", token))
                })
        })
        .collect::<Result<Vec<_>, _>>()?;

    let mut vertices = Vec::with_capacity(refs.len());
    let mut textures = Vec::new();
    let mut normals = Vec::new();
    for r in &refs {
        vertices.push(resolve_index("vertex", r.vertex, mesh.vertex_count())?);
        if let Some(t) = r.texture {
            textures.push(resolve_index("texture", t, mesh.texture_coords.len())?);
        }
        if let Some(n) = r.normal {
            normals.push(resolve_index("normal", n, mesh.normals.len())?);
        }
    }

    Polygon::new(vertices)?
        .with_texture_indices(textures)?
        .with_normal_indices(normals)
}

fn parse_line(mesh: &mut Mesh, line: &str) -> Result<(), ArgumentError> {
    let mut tokens = line.split_whitespace();
    let Some(keyword) = tokens.next() else {
        return Ok(());
    };
    match keyword {
        "v" => {
            let v = numbers(keyword, tokens, 3)?;
            mesh.add_vertex(Vertex::new(v[0], v[1], v[2]));
        }
        "vt" => {
            let v = numbers(keyword, tokens, 2)?;
            mesh.add_texture_coord(Vector2::new(v[0], v[1]));
        }
        "vn" => {
            let v = numbers(keyword, tokens, 3)?;
            mesh.add_normal(Vector3::new(v[0], v[1], v[2]));
        }
        "f" => {
            let polygon = parse_face(mesh, tokens)?;
            mesh.add_polygon(polygon)?;
        }
        _ => {}
    }
    Ok(())
}

/// Parse mesh text into a [`Mesh`].
///
/// Blank lines, `#` comments and unknown keywords are skipped. The first
/// malformed line aborts the parse.
pub fn parse_mesh(input: &str) -> Result<Mesh, ParseError> {
    let mut mesh = Mesh::new();
    for (number, raw) in input.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        parse_line(&mut mesh, line).map_err(|e| ParseError::new(number + 1, raw, e))?;
    }
    debug!(
        vertices = mesh.vertex_count(),
        polygons = mesh.polygon_count(),
        "parsed mesh"
    );
    Ok(mesh)
}

/// Checks that a mesh can be written out.
pub fn validate_mesh(mesh: &Mesh) -> Result<(), ValidationError> {
    if mesh.vertices.is_empty() {
        return Err(ValidationError::new("mesh has no vertices"));
    }
    if mesh.polygons().is_empty() {
        return Err(ValidationError::new("mesh has no polygons"));
    }
    for (i, v) in mesh.vertices.iter().enumerate() {
        if !v.position.is_finite() {
            return Err(ValidationError::new(format!(
                "vertex {} has a non-finite coordinate",
                i + 1
            )));
        }
    }
    if let Some(i) = mesh.texture_coords.iter().position(|t| !t.is_finite()) {
        return Err(ValidationError::new(format!(
            "texture coordinate {} is not finite",
            i + 1
        )));
    }
    if let Some(i) = mesh.normals.iter().position(|n| !n.is_finite()) {
        return Err(ValidationError::new(format!("normal {} is not finite", i + 1)));
    }

    for (i, polygon) in mesh.polygons().iter().enumerate() {
        let indices = polygon.vertex_indices();
        if indices.len() < 3 {
            return Err(ValidationError::new(format!(
                "polygon {} has only {} vertices",
                i + 1,
                indices.len()
            )));
        }
        if let Some(bad) = indices.iter().find(|&&v| v >= mesh.vertex_count()) {
            return Err(ValidationError::new(format!(
                "polygon {} references missing vertex {}",
                i + 1,
                bad + 1
            )));
        }
        let textures = polygon.texture_indices();
        if !textures.is_empty() && textures.len() != indices.len() {
            return Err(ValidationError::new(format!(
                "polygon {} has {} texture indices for {} vertices",
                i + 1,
                textures.len(),
                indices.len()
            )));
        }
        if let Some(bad) = textures.iter().find(|&&t| t >= mesh.texture_coords.len()) {
            return Err(ValidationError::new(format!(
                "polygon {} references missing texture coordinate {}",
                i + 1,
                bad + 1
            )));
        }
        if let Some(bad) = polygon
            .normal_indices()
            .iter()
            .find(|&&n| n >= mesh.normals.len())
        {
            return Err(ValidationError::new(format!(
                "polygon {} references missing normal {}",
                i + 1,
                bad + 1
            )));
        }
    }
    Ok(())
}

/// Six decimals, without trailing zeros or a dangling decimal point.
fn format_float(value: f64) -> String {
    let text = format!("{:.6}", value);
    let text = text.trim_end_matches('0').trim_end_matches('.');
    if text == "-0" {
        "0".to_string()
    } else {
        text.to_string()
    }
}

/// Serialize a mesh to text after validating it.
pub fn write_mesh(mesh: &Mesh) -> Result<String, ValidationError> {
    validate_mesh(mesh)?;

    let mut out = String::new();
    // Writing into a String cannot fail.
    for v in &mesh.vertices {
        let p = v.position;
        let _ = writeln!(
            out,
            "v {} {} {}",
            format_float(p.x),
            format_float(p.y),
            format_float(p.z)
        );
    }
    for t in &mesh.texture_coords {
        let _ = writeln!(out, "vt {} {}", format_float(t.x), format_float(t.y));
    }
    for n in &mesh.normals {
        let _ = writeln!(
            out,
            "vn {} {} {}",
            format_float(n.x),
            format_float(n.y),
            format_float(n.z)
        );
    }

    for polygon in mesh.polygons() {
        let vertices = polygon.vertex_indices();
        let textures = Some(polygon.texture_indices()).filter(|t| t.len() == vertices.len());
        let normals = Some(polygon.normal_indices()).filter(|n| n.len() == vertices.len());

        out.push('f');
        for (corner, v) in vertices.iter().enumerate() {
            let _ = match (textures, normals) {
                (Some(t), Some(n)) => write!(out, " {}/{}/{}", v + 1, t[corner] + 1, n[corner] + 1),
                (Some(t), None) => write!(out, " {}/{}", v + 1, t[corner] + 1),
                (None, Some(n)) => write!(out, " {}//{}", v + 1, n[corner] + 1),
                (None, None) => write!(out, " {}", v + 1),
            };
        }
        out.push('\n');
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    const TRIANGLE: &str = "\
# a comment
v 0 0 0
v 1.5 0 0

v 0 2 -1
o ignored-object-name
f 1 2 3
";

    #[test]
    fn test_parse_basic() {
        let mesh = parse_mesh(TRIANGLE).unwrap();
        assert_eq!(mesh.vertex_count(), 3);
        assert_eq!(mesh.polygon_count(), 1);
        assert_eq!(mesh.polygons()[0].vertex_indices(), &[0, 1, 2]);
        assert_eq!(mesh.vertices[2].position, Vector3::new(0.0, 2.0, -1.0));
    }

    #[test]
    fn test_negative_indices_count_from_end() {
        let mesh = parse_mesh("v 0 0 0\nv 1 0 0\nv 0 1 0\nv 1 1 0\nf -4 -3 -1\n").unwrap();
        assert_eq!(mesh.polygons()[0].vertex_indices(), &[0, 1, 3]);
    }

    #[test]
    fn test_zero_and_out_of_range_indices_fail() {
        let err = parse_mesh("v 0 0 0\nv 1 0 0\nv 0 1 0\nf 0 1 2\n").unwrap_err();
        assert_eq!(err.line, 4);
        let err = parse_mesh("v 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 4\n").unwrap_err();
        assert_eq!(err.line, 4);
        assert_eq!(err.text, "f 1 2 4");
        assert!(parse_mesh("v 0 0 0\nv 1 0 0\nf 1 2 -3\n").is_err());
    }

    #[test]
    fn test_malformed_lines_report_line_number() {
        let err = parse_mesh("v 0 0 0\nv 1 zero 0\n").unwrap_err();
        assert_eq!(err.line, 2);
        assert_eq!(err.text, "v 1 zero 0");

        let err = parse_mesh("v 0 0\n").unwrap_err();
        assert_eq!(err.line, 1);

        let err = parse_mesh("v 0 0 0\nv 1 0 0\nf 1 2\n").unwrap_err();
        assert_eq!(err.line, 3);

        let err = parse_mesh("v 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 x\n").unwrap_err();
        assert_eq!(err.line, 4);
    }

    #[test]
    fn test_slash_forms() {
        let text = "\
v 0 0 0
v 1 0 0
v 0 1 0
vt 0 0
vt 1 0
vt 0 1
vn 0 0 -1
f 1/1/1 2/2/1 3/3/1
f 1//1 2//1 3//1
f 1/1 2/2 3/3
";
        let mesh = parse_mesh(text).unwrap();
        let polys = mesh.polygons();
        assert_eq!(polys[0].texture_indices(), &[0, 1, 2]);
        assert_eq!(polys[0].normal_indices(), &[0, 0, 0]);
        assert!(polys[1].texture_indices().is_empty());
        assert_eq!(polys[1].normal_indices(), &[0, 0, 0]);
        assert_eq!(polys[2].texture_indices(), &[0, 1, 2]);
        assert!(polys[2].normal_indices().is_empty());
    }

    #[test]
    fn test_mixed_texture_refs_rejected() {
        let text = "v 0 0 0\nv 1 0 0\nv 0 1 0\nvt 0 0\nf 1/1 2 3\n";
        assert_eq!(parse_mesh(text).unwrap_err().line, 5);
    }

    #[test]
    fn test_format_float() {
        assert_eq!(format_float(1.0), "1");
        assert_eq!(format_float(-0.5), "-0.5");
        assert_eq!(format_float(0.1234567), "0.123457");
        assert_eq!(format_float(-0.0000001), "0");
        assert_eq!(format_float(120.0), "120");
    }

    #[test]
    fn test_write_then_read_back() {
        let mesh = Mesh::cube(2.0);
        let text = write_mesh(&mesh).unwrap();
        assert!(text.starts_with("v -1 -1 -1\n"));
        assert!(text.contains("vt 1 0\n"));
        assert!(text.contains("f 5/1 6/2 7/3 8/4\n"));

        let parsed = parse_mesh(&text).unwrap();
        assert_eq!(parsed.vertex_count(), 8);
        assert_eq!(parsed.polygons(), mesh.polygons());
    }

    #[test]
    fn test_validation_failures() {
        assert!(write_mesh(&Mesh::new()).is_err());

        let mut no_faces = Mesh::new();
        no_faces.add_vertex(Vertex::new(0.0, 0.0, 0.0));
        assert!(write_mesh(&no_faces).is_err());

        let mut nan = parse_mesh(TRIANGLE).unwrap();
        nan.vertices[1].position.y = f64::NAN;
        assert!(write_mesh(&nan).is_err());

        let mut dangling = parse_mesh(TRIANGLE).unwrap();
        dangling.vertices.pop();
        assert!(write_mesh(&dangling).is_err());

        let mut infinite_uv = Mesh::cube(1.0);
        infinite_uv.texture_coords[0].x = f64::INFINITY;
        assert!(write_mesh(&infinite_uv).is_err());
    }
}
