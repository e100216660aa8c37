use sm_core::Image;

use crate::conv::convolve_f32;
use crate::kernels::GaussianKernel1D;
use crate::label::RegionMask;

/// Blurs a region indicator with a separable Gaussian and thresholds it back
/// at one half. Pixels that fall outside `plane` (width, height) are cleared
/// so smoothed outlines never leave the image.
pub fn smooth_region_mask(
    region: &RegionMask,
    sigma: f32,
    plane: (usize, usize),
) -> RegionMask {
    let kernel = GaussianKernel1D::new(sigma);
    let (w, h) = region.mask.dims();

    let mut buf: Vec<f32> = region
        .mask
        .data()
        .iter()
        .map(|&v| if v != 0 { 1.0 } else { 0.0 })
        .collect();

    let mut row_out = vec![0.0f32; w];
    for y in 0..h {
        let row = &mut buf[y * w..(y + 1) * w];
        convolve_f32(row, &kernel.g, kernel.radius, 0.0, &mut row_out);
        row.copy_from_slice(&row_out);
    }

    let mut col_in = vec![0.0f32; h];
    let mut col_out = vec![0.0f32; h];
    for x in 0..w {
        for y in 0..h {
            col_in[y] = buf[y * w + x];
        }
        convolve_f32(&col_in, &kernel.g, kernel.radius, 0.0, &mut col_out);
        for y in 0..h {
            buf[y * w + x] = col_out[y];
        }
    }

    let mut mask = Image::new_fill(w, h, 0u8);
    {
        let mut view = mask.as_view_mut();
        for y in 0..h {
            for x in 0..w {
                let (px, py) = region.to_plane((x, y));
                let on_plane =
                    px >= 0 && py >= 0 && (px as usize) < plane.0 && (py as usize) < plane.1;
                if on_plane
                    && buf[y * w + x] >= 0.5
                    && let Some(v) = view.get_mut(x, y)
                {
                    *v = 255;
                }
            }
        }
    }

    RegionMask {
        origin: region.origin,
        mask,
    }
}

#[cfg(test)]
mod tests {
    use sm_core::Image;

    use super::smooth_region_mask;
    use crate::label::RegionMask;

    #[test]
    fn smoothing_removes_isolated_speck_and_keeps_block() {
        let mut mask = Image::new_fill(20, 20, 0u8);
        {
            let mut v = mask.as_view_mut();
            for y in 5..15 {
                for x in 5..15 {
                    *v.get_mut(x, y).expect("in bounds") = 255;
                }
            }
            *v.get_mut(1, 1).expect("in bounds") = 255;
        }
        let region = RegionMask {
            origin: (0, 0),
            mask,
        };

        let out = smooth_region_mask(&region, 1.0, (20, 20));
        assert_eq!(out.mask.get(1, 1), Some(&0));
        assert_eq!(out.mask.get(10, 10), Some(&255));
        let n = out.mask.count_set();
        assert!(n > 80 && n <= 100, "unexpected smoothed area {n}");
    }

    #[test]
    fn smoothing_is_clipped_to_plane() {
        let region = RegionMask {
            origin: (-3, -3),
            mask: Image::new_fill(10, 10, 255u8),
        };
        let out = smooth_region_mask(&region, 0.8, (100, 100));

        assert_eq!(out.mask.get(0, 0), Some(&0));
        assert_eq!(out.mask.get(2, 5), Some(&0));
        assert_eq!(out.mask.get(3, 5), Some(&255));
    }
}
