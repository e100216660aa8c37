use std::collections::BTreeMap;
use std::fs;
use std::io::{BufWriter, Write};
use std::path::Path;

use sm_core::{Contour, Dims, Model, Point2f};

use crate::{FormatError, IoError, contour_slice, read_model, write_model};

/// Writes one `object contour x y z` line per point, numbering objects and
/// contours from 1.
pub fn write_point_list<W: Write>(mut w: W, model: &Model) -> std::io::Result<()> {
    for id in 0..model.num_objects() {
        for (j, c) in model.object_contours(id).enumerate() {
            for p in &c.points {
                writeln!(w, "{} {} {} {} {}", id + 1, j + 1, p.x, p.y, c.z)?;
            }
        }
    }
    Ok(())
}

/// Parses a point listing. Blank lines and `#` comments are skipped.
///
/// Object numbers that never appear become empty objects as long as the
/// highest number does not exceed the count of point lines; otherwise the
/// objects are numbered consecutively in ascending order.
pub fn parse_point_list(text: &str, dims: Dims) -> Result<Model, FormatError> {
    let mut objects: BTreeMap<usize, BTreeMap<usize, Vec<[f32; 3]>>> = BTreeMap::new();
    let mut point_lines = 0usize;

    for (idx, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let lineno = Some(idx + 1);
        let fields: Vec<&str> = line.split_whitespace().collect();
        if fields.len() != 5 {
            let msg = format!("expected 5 fields, found {}", fields.len());
            return Err(FormatError::new(lineno, msg));
        }

        let index = |s: &str| match s.parse::<usize>() {
            Ok(v) if v >= 1 => Ok(v - 1),
            _ => Err(FormatError::new(lineno, format!("'{s}' is not a 1-based index"))),
        };
        let coord = |s: &str| {
            s.parse::<f32>()
                .map_err(|_| FormatError::new(lineno, format!("'{s}' is not a number")))
        };

        let (o, c) = (index(fields[0])?, index(fields[1])?);
        let p = [coord(fields[2])?, coord(fields[3])?, coord(fields[4])?];
        objects.entry(o).or_default().entry(c).or_default().push(p);
        point_lines += 1;
    }

    let keep_gaps = objects
        .last_key_value()
        .is_some_and(|(&last, _)| last < point_lines);
    if !keep_gaps && let Some((&last, _)) = objects.last_key_value() {
        log::warn!(
            "object number {} exceeds {point_lines} point line(s), renumbering objects",
            last + 1
        );
    }

    let mut model = Model::new(dims);
    for (o, contours) in objects {
        while keep_gaps && model.num_objects() < o {
            model.add_object(None, None, Vec::<Contour>::new());
        }
        let mut out = Vec::with_capacity(contours.len());
        for points in contours.into_values() {
            out.push(Contour::closed(
                contour_slice(&points)?,
                points.iter().map(|p| Point2f::new(p[0], p[1])).collect(),
            ));
        }
        model.add_object(None, None, out);
    }
    Ok(model)
}

pub fn read_point_list(path: &Path, dims: Dims) -> Result<Model, IoError> {
    let text = fs::read_to_string(path).map_err(|e| IoError::io(path, e))?;
    parse_point_list(&text, dims).map_err(|source| IoError::Format {
        path: path.to_path_buf(),
        source,
    })
}

pub fn save_point_list(path: &Path, model: &Model) -> Result<(), IoError> {
    let file = fs::File::create(path).map_err(|e| IoError::io(path, e))?;
    let mut w = BufWriter::new(file);
    write_point_list(&mut w, model).map_err(|e| IoError::io(path, e))?;
    w.flush().map_err(|e| IoError::io(path, e))
}

/// Paths ending in `.txt` are point listings; anything else is JSON.
pub fn is_point_list(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("txt"))
}

/// Reads a model in the format chosen by [`is_point_list`]. A listing
/// carries no stack size, so `dims` is required for it.
pub fn read_any_model(path: &Path, dims: Option<Dims>) -> Result<Model, IoError> {
    if !is_point_list(path) {
        return read_model(path);
    }
    match dims {
        Some(dims) => read_point_list(path, dims),
        None => Err(IoError::MissingDims(path.to_path_buf())),
    }
}

pub fn write_any_model(path: &Path, model: &Model) -> Result<(), IoError> {
    if is_point_list(path) {
        save_point_list(path, model)
    } else {
        write_model(path, model)
    }
}

#[cfg(test)]
mod tests {
    use sm_core::{Contour, Dims, Model, Point2f};

    use super::{is_point_list, parse_point_list, read_any_model, write_any_model, write_point_list};
    use crate::IoError;

    #[test]
    fn listing_numbers_from_one() {
        let mut model = Model::new(Dims::new(8, 8, 4));
        model.add_object(
            None,
            None,
            [Contour::closed(
                2,
                vec![Point2f::new(1.5, 2.0), Point2f::new(3.0, 2.0), Point2f::new(3.0, 4.0)],
            )],
        );

        let mut buf = Vec::new();
        write_point_list(&mut buf, &model).expect("write to memory");
        let text = String::from_utf8(buf).expect("utf8");
        assert_eq!(text.lines().next(), Some("1 1 1.5 2 2"));
        assert_eq!(text.lines().count(), 3);

        let back = parse_point_list(&text, model.dims()).expect("parse");
        assert_eq!(back, model);
    }

    #[test]
    fn sparse_object_numbers_leave_empty_objects() {
        let text = "# obj cont x y z\n3 1 0 0 1\n3 1 4 0 1\n3 1 4 4 1\n\n";
        let model = parse_point_list(text, Dims::new(8, 8, 2)).expect("parse");
        assert_eq!(model.num_objects(), 3);
        assert_eq!(model.contour_count(0), 0);
        assert_eq!(model.contour(0).z, 1);
    }

    #[test]
    fn malformed_line_reports_its_number() {
        let text = "1 1 0 0 0\n1 x 0 0 0\n";
        let err = parse_point_list(text, Dims::new(1, 1, 1)).expect_err("bad index");
        assert_eq!(err.line, Some(2));
        assert!(err.to_string().starts_with("line 2:"));
    }

    #[test]
    fn huge_object_numbers_are_renumbered() {
        let text = "2000000 1 0 0 0\n2000000 1 2 0 0\n4000000000 7 1 1 1\n";
        let model = parse_point_list(text, Dims::new(4, 4, 2)).expect("parse");
        assert_eq!(model.num_objects(), 2);
        assert_eq!(model.contour_count(0), 1);
        assert_eq!(model.contour(1).z, 1);
        assert_eq!(model.contour(1).points, vec![Point2f::new(1.0, 1.0)]);
    }

    #[test]
    fn format_follows_the_extension() {
        let dir = std::env::temp_dir().join(format!("sm-io-any-{}", std::process::id()));
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(&dir).expect("create scratch dir");

        let mut model = Model::new(Dims::new(6, 6, 3));
        model.add_object(
            None,
            None,
            [Contour::closed(
                1,
                vec![Point2f::new(1.0, 1.0), Point2f::new(4.0, 1.0), Point2f::new(4.0, 4.0)],
            )],
        );

        let listing = dir.join("boundary.TXT");
        assert!(is_point_list(&listing));
        assert!(!is_point_list(&dir.join("boundary.json")));
        write_any_model(&listing, &model).expect("write listing");

        assert!(matches!(
            read_any_model(&listing, None),
            Err(IoError::MissingDims(_))
        ));
        let back = read_any_model(&listing, Some(model.dims())).expect("read listing");
        assert_eq!(back, model);

        let json = dir.join("boundary.json");
        write_any_model(&json, &model).expect("write json");
        assert_eq!(read_any_model(&json, None).expect("read json"), model);

        let _ = std::fs::remove_dir_all(&dir);
    }
}
