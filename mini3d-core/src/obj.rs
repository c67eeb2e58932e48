//! Wavefront OBJ import and export.
//!
//! The importer reads the `v`/`vt`/`vn`/`f` record subset. Faces are fan
//! triangulated and vertices welded on (position, texcoord) pairs; file
//! normals are discarded and recomputed from the triangulated geometry,
//! so the normal index never participates in welding. Unknown record
//! types are skipped, not rejected. A parse error or unresolvable index
//! aborts the import with no partial mesh.

use std::collections::HashMap;
use std::fs;
use std::io::{BufWriter, Write};
use std::path::Path;

use log::{debug, warn};
use nom::{
    character::complete::{char, i64 as index, multispace0, multispace1},
    combinator::opt,
    multi::separated_list1,
    number::complete::double,
    sequence::preceded,
    IResult,
};

use crate::error::ObjError;
use crate::math::{Vec2, Vec3};
use crate::mesh::Mesh;

/// One `f`-record vertex reference: `position[/texcoord][/normal]`,
/// indices as written (1-based, negative = from the end).
#[derive(Debug, Clone, Copy)]
struct FaceRef {
    position: i64,
    texcoord: Option<i64>,
    normal: Option<i64>,
}

pub fn load(path: &Path) -> Result<Mesh, ObjError> {
    let text = fs::read_to_string(path).map_err(|source| ObjError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    parse(&text)
}

pub fn parse(input: &str) -> Result<Mesh, ObjError> {
    let mut positions: Vec<Vec3> = Vec::new();
    let mut texcoords: Vec<Vec2> = Vec::new();
    let mut normal_count = 0usize;

    // Welded output attributes, keyed by (position, texcoord) indices.
    let mut welded: HashMap<(usize, Option<usize>), u32> = HashMap::new();
    let mut out_positions: Vec<Vec3> = Vec::new();
    let mut out_texcoords: Vec<Vec2> = Vec::new();
    let mut indices: Vec<u32> = Vec::new();

    for (i, raw) in input.lines().enumerate() {
        let line = i + 1;
        let text = raw.trim();
        if text.is_empty() || text.starts_with('#') {
            continue;
        }

        if let Some(rest) = text.strip_prefix("vt") {
            if rest.starts_with(char::is_whitespace) {
                texcoords.push(finish(line, vec2(rest))?);
                continue;
            }
        }
        if let Some(rest) = text.strip_prefix("vn") {
            if rest.starts_with(char::is_whitespace) {
                finish(line, vec3(rest))?;
                normal_count += 1;
                continue;
            }
        }
        if let Some(rest) = text.strip_prefix('v') {
            if rest.starts_with(char::is_whitespace) {
                positions.push(finish(line, vec3(rest))?);
                continue;
            }
        }
        if let Some(rest) = text.strip_prefix('f') {
            if rest.starts_with(char::is_whitespace) {
                let refs = finish(line, face(rest))?;
                if refs.len() < 3 {
                    warn!("line {line}: face with {} vertices skipped", refs.len());
                    continue;
                }

                let mut face_indices = Vec::with_capacity(refs.len());
                for r in &refs {
                    let pi = resolve(line, r.position, positions.len())?;
                    let ti = r
                        .texcoord
                        .map(|t| resolve(line, t, texcoords.len()))
                        .transpose()?;
                    if let Some(n) = r.normal {
                        // Normals are recomputed, but a dangling reference
                        // is still a malformed file.
                        resolve(line, n, normal_count)?;
                    }

                    let next = out_positions.len() as u32;
                    let id = *welded.entry((pi, ti)).or_insert_with(|| {
                        out_positions.push(positions[pi]);
                        out_texcoords.push(ti.map_or(Vec2::ZERO, |t| texcoords[t]));
                        next
                    });
                    face_indices.push(id);
                }

                // Fan triangulation around the first reference.
                for pair in 1..refs.len() - 1 {
                    indices.push(face_indices[0]);
                    indices.push(face_indices[pair]);
                    indices.push(face_indices[pair + 1]);
                }
                continue;
            }
        }
        // Unknown record types (o, g, s, mtllib, ...) are ignored.
        debug!("line {line}: ignoring record {:?}", text.split_whitespace().next());
    }

    let out_normals = vec![Vec3::UP; out_positions.len()];
    let mesh = Mesh::with_attributes(out_positions, out_texcoords, out_normals, indices)?;
    debug!(
        "imported {} vertices, {} triangles",
        mesh.vertex_count(),
        mesh.triangle_count()
    );
    Ok(mesh.recalculate_normals())
}

/// Writes the mesh's positions and triangles as `v`/`f` records (the
/// same subset the importer reads). Texcoords and normals are not
/// written; normals are recomputed on import anyway.
pub fn save(mesh: &Mesh, path: &Path) -> Result<(), ObjError> {
    let file = fs::File::create(path)?;
    let mut out = BufWriter::new(file);
    write(mesh, &mut out)
}

pub fn write<W: Write>(mesh: &Mesh, out: &mut W) -> Result<(), ObjError> {
    for p in mesh.positions() {
        writeln!(out, "v {:.9} {:.9} {:.9}", p.x, p.y, p.z)?;
    }
    for tri in mesh.indices().chunks_exact(3) {
        writeln!(out, "f {} {} {}", tri[0] + 1, tri[1] + 1, tri[2] + 1)?;
    }
    out.flush()?;
    Ok(())
}

/// 1-based (or negative, end-relative) index into a list of `count`
/// elements parsed so far. Zero is never valid in the source format.
fn resolve(line: usize, value: i64, count: usize) -> Result<usize, ObjError> {
    let out_of_range = ObjError::IndexOutOfRange { line, value, count };
    if value > 0 {
        let i = (value - 1) as usize;
        if i < count {
            Ok(i)
        } else {
            Err(out_of_range)
        }
    } else if value < 0 {
        let i = count as i64 + value;
        if i >= 0 {
            Ok(i as usize)
        } else {
            Err(out_of_range)
        }
    } else {
        Err(out_of_range)
    }
}

/// Runs a record-payload parser and requires it to consume the whole
/// line (trailing whitespace aside).
fn finish<T>(line: usize, parsed: IResult<&str, T>) -> Result<T, ObjError> {
    match parsed {
        Ok((rest, value)) if rest.trim().is_empty() => Ok(value),
        Ok((rest, _)) => Err(ObjError::Parse {
            line,
            message: format!("trailing garbage {rest:?}"),
        }),
        Err(e) => Err(ObjError::Parse {
            line,
            message: format!("{e}"),
        }),
    }
}

fn vec3(input: &str) -> IResult<&str, Vec3> {
    let (input, x) = preceded(multispace0, double)(input)?;
    let (input, y) = preceded(multispace1, double)(input)?;
    let (input, z) = preceded(multispace1, double)(input)?;
    Ok((input, Vec3::new(x, y, z)))
}

fn vec2(input: &str) -> IResult<&str, Vec2> {
    let (input, u) = preceded(multispace0, double)(input)?;
    let (input, v) = preceded(multispace1, double)(input)?;
    // Some exporters write a third (w) texcoord component; ignore it.
    let (input, _) = opt(preceded(multispace1, double))(input)?;
    Ok((input, Vec2::new(u, v)))
}

fn face(input: &str) -> IResult<&str, Vec<FaceRef>> {
    preceded(multispace0, separated_list1(multispace1, face_ref))(input)
}

/// `p`, `p/t`, `p//n` or `p/t/n`.
fn face_ref(input: &str) -> IResult<&str, FaceRef> {
    let (input, position) = index(input)?;
    let (input, texcoord) = match opt(char('/'))(input)? {
        (input, Some(_)) => opt(index)(input)?,
        (input, None) => return Ok((input, FaceRef { position, texcoord: None, normal: None })),
    };
    let (input, normal) = match opt(char('/'))(input)? {
        (input, Some(_)) => {
            let (input, n) = index(input)?;
            (input, Some(n))
        }
        (input, None) => (input, None),
    };
    Ok((
        input,
        FaceRef {
            position,
            texcoord,
            normal,
        },
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quad_fan_triangulates_into_two_triangles() {
        let src = "v 0 0 0\nv 1 0 0\nv 1 1 0\nv 0 1 0\nf 1 2 3 4\n";
        let mesh = parse(src).unwrap();
        assert_eq!(mesh.vertex_count(), 4);
        assert_eq!(mesh.indices(), &[0, 1, 2, 0, 2, 3]);
    }

    #[test]
    fn welding_ignores_the_normal_index() {
        // Same position/texcoord pair referenced with two different
        // normals must collapse to one output vertex.
        let src = "\
v 0 0 0
v 1 0 0
v 0 1 0
vt 0 0
vn 0 0 1
vn 0 0 -1
f 1/1/1 2/1/1 3/1/2
f 1/1/2 3/1/1 2/1/2
";
        let mesh = parse(src).unwrap();
        assert_eq!(mesh.vertex_count(), 3);
        assert_eq!(mesh.triangle_count(), 2);
    }

    #[test]
    fn distinct_texcoords_split_the_vertex() {
        let src = "\
v 0 0 0
v 1 0 0
v 0 1 0
vt 0 0
vt 1 1
f 1/1 2/1 3/1
f 1/2 2/1 3/1
";
        let mesh = parse(src).unwrap();
        assert_eq!(mesh.vertex_count(), 4);
    }

    #[test]
    fn negative_indices_count_from_the_end() {
        let src = "v 0 0 0\nv 1 0 0\nv 0 1 0\nf -3 -2 -1\n";
        let mesh = parse(src).unwrap();
        assert_eq!(mesh.indices(), &[0, 1, 2]);
    }

    #[test]
    fn index_zero_is_rejected() {
        let src = "v 0 0 0\nv 1 0 0\nv 0 1 0\nf 0 1 2\n";
        assert!(matches!(
            parse(src),
            Err(ObjError::IndexOutOfRange { value: 0, .. })
        ));
    }

    #[test]
    fn out_of_range_index_is_rejected() {
        let src = "v 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 4\n";
        assert!(matches!(
            parse(src),
            Err(ObjError::IndexOutOfRange { value: 4, .. })
        ));
    }

    #[test]
    fn malformed_number_is_a_parse_error() {
        let src = "v 0 zero 0\n";
        assert!(matches!(parse(src), Err(ObjError::Parse { line: 1, .. })));
    }

    #[test]
    fn comments_and_unknown_records_are_ignored() {
        let src = "\
# a comment
o cube
s off
v 0 0 0
v 1 0 0
v 0 1 0
f 1 2 3
";
        let mesh = parse(src).unwrap();
        assert_eq!(mesh.triangle_count(), 1);
    }

    #[test]
    fn degenerate_face_is_skipped() {
        let src = "v 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2\nf 1 2 3\n";
        let mesh = parse(src).unwrap();
        assert_eq!(mesh.triangle_count(), 1);
    }

    #[test]
    fn file_normals_are_discarded_and_recomputed() {
        // The vn record points along +x; the face lies in the xy plane,
        // so the recomputed normal must be +-z.
        let src = "\
v 0 0 0
v 1 0 0
v 0 1 0
vn 1 0 0
f 1//1 2//1 3//1
";
        let mesh = parse(src).unwrap();
        for n in mesh.normals() {
            assert!(n.x.abs() < 1e-9);
            assert!(n.y.abs() < 1e-9);
            assert!((n.z.abs() - 1.0).abs() < 1e-9);
        }
    }

    #[test]
    fn export_writes_the_record_subset() {
        let src = "v 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 3\n";
        let mesh = parse(src).unwrap();
        let mut out = Vec::new();
        write(&mesh, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.starts_with("v 0.000000000 0.000000000 0.000000000\n"));
        assert!(text.ends_with("f 1 2 3\n"));
    }

    #[test]
    fn exported_geometry_reimports_identically() {
        let mesh = Mesh::cube(2.0);
        let mut out = Vec::new();
        write(&mesh, &mut out).unwrap();
        let back = parse(&String::from_utf8(out).unwrap()).unwrap();
        assert_eq!(back.vertex_count(), mesh.vertex_count());
        assert_eq!(back.triangle_count(), mesh.triangle_count());
        // Welding renumbers vertices in face order, so compare the
        // positions each triangle corner refers to.
        for (a, b) in back.indices().iter().zip(mesh.indices()) {
            let pa = back.positions()[*a as usize];
            let pb = mesh.positions()[*b as usize];
            assert!(pa.eps_eq(pb, 1e-6));
        }
    }
}
