use std::fs;
use std::path::{Path, PathBuf};

use image::{DynamicImage, ImageBuffer, Luma};
use sm_core::{Image, SegmentationStack};

use crate::IoError;

const EXTENSIONS: [&str; 3] = ["png", "tif", "tiff"];

/// Loads every image in `dir` as one plane, ordered by file name.
///
/// 8- and 16-bit grayscale values are kept as labels; anything else is
/// converted to 16-bit luma first.
pub fn load_stack(dir: &Path) -> Result<SegmentationStack, IoError> {
    let mut files: Vec<PathBuf> = fs::read_dir(dir)
        .map_err(|e| IoError::io(dir, e))?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|p| {
            p.extension()
                .and_then(|e| e.to_str())
                .is_some_and(|e| EXTENSIONS.contains(&e.to_ascii_lowercase().as_str()))
        })
        .collect();
    files.sort();

    if files.is_empty() {
        return Err(IoError::EmptyStack(dir.to_path_buf()));
    }

    let mut planes = Vec::with_capacity(files.len());
    let mut size = None;
    for path in &files {
        let plane = load_plane(path)?;
        let dims = plane.dims();
        match size {
            None => size = Some(dims),
            Some(expected) if expected != dims => {
                return Err(IoError::PlaneSize {
                    path: path.clone(),
                    expected,
                    actual: dims,
                });
            }
            Some(_) => {}
        }
        planes.push(plane);
    }

    let (w, h) = size.unwrap_or((0, 0));
    log::info!("loaded {} plane(s) of {w}x{h} from {}", planes.len(), dir.display());
    Ok(SegmentationStack::from_planes(w, h, planes)?)
}

fn load_plane(path: &Path) -> Result<Image<u16>, IoError> {
    let dynamic = image::open(path).map_err(|source| IoError::Image {
        path: path.to_path_buf(),
        source,
    })?;
    let (w, h) = (dynamic.width() as usize, dynamic.height() as usize);

    let data: Vec<u16> = match dynamic {
        DynamicImage::ImageLuma8(g) => g.into_raw().into_iter().map(u16::from).collect(),
        DynamicImage::ImageLuma16(g) => g.into_raw(),
        other => {
            log::warn!("{}: not single-channel, converting to 16-bit luma", path.display());
            other.to_luma16().into_raw()
        }
    };
    Ok(Image::from_vec(w, h, data)?)
}

/// Writes each plane as a 16-bit PNG named `plane_NNNN.png`.
pub fn save_stack(dir: &Path, stack: &SegmentationStack) -> Result<(), IoError> {
    fs::create_dir_all(dir).map_err(|e| IoError::io(dir, e))?;
    for (z, plane) in stack.planes().iter().enumerate() {
        let path = dir.join(format!("plane_{z:04}.png"));
        let (w, h) = (plane.width() as u32, plane.height() as u32);
        let buf: ImageBuffer<Luma<u16>, Vec<u16>> =
            ImageBuffer::from_raw(w, h, plane.data().to_vec()).ok_or_else(|| {
                IoError::PlaneSize {
                    path: path.clone(),
                    expected: plane.dims(),
                    actual: (plane.data().len(), 1),
                }
            })?;
        buf.save(&path).map_err(|source| IoError::Image {
            path: path.clone(),
            source,
        })?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::path::PathBuf;

    use image::{GrayImage, RgbImage};
    use sm_core::{Image, SegmentationStack};

    use super::{load_stack, save_stack};
    use crate::IoError;

    fn scratch(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("sm-io-{name}-{}", std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).expect("create scratch dir");
        dir
    }

    #[test]
    fn sixteen_bit_planes_round_trip() {
        let dir = scratch("roundtrip");
        let planes = vec![
            Image::from_vec(3, 2, vec![0u16, 1, 2, 300, 0, 65535]).expect("plane"),
            Image::from_vec(3, 2, vec![7u16; 6]).expect("plane"),
        ];
        let stack = SegmentationStack::from_planes(3, 2, planes).expect("stack");

        save_stack(&dir, &stack).expect("save");
        let back = load_stack(&dir).expect("load");
        assert_eq!(back.depth(), 2);
        assert_eq!(back.planes()[0].data(), stack.planes()[0].data());
        assert_eq!(back.planes()[1].data(), stack.planes()[1].data());

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn eight_bit_labels_pass_through_sorted_by_name() {
        let dir = scratch("gray8");
        GrayImage::from_raw(2, 1, vec![5, 0])
            .expect("raw")
            .save(dir.join("b.png"))
            .expect("save");
        GrayImage::from_raw(2, 1, vec![0, 9])
            .expect("raw")
            .save(dir.join("a.png"))
            .expect("save");
        fs::write(dir.join("notes.txt"), "ignored").expect("write");

        let stack = load_stack(&dir).expect("load");
        assert_eq!(stack.planes()[0].data(), &[0, 9]);
        assert_eq!(stack.planes()[1].data(), &[5, 0]);

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn mismatched_plane_sizes_fail() {
        let dir = scratch("sizes");
        GrayImage::new(2, 2).save(dir.join("a.png")).expect("save");
        RgbImage::new(3, 2).save(dir.join("b.png")).expect("save");

        let err = load_stack(&dir).expect_err("size mismatch");
        assert!(matches!(err, IoError::PlaneSize { expected: (2, 2), actual: (3, 2), .. }));

        let empty = scratch("empty");
        assert!(matches!(load_stack(&empty), Err(IoError::EmptyStack(_))));

        let _ = fs::remove_dir_all(&dir);
        let _ = fs::remove_dir_all(&empty);
    }
}
