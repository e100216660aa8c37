use sm_core::{Error, Image, ImageView, ImageViewMut};

/// Zeroes labels wherever `mask` is 0; every other label passes through.
pub fn apply_mask_u16(
    labels: &ImageView<'_, u16>,
    mask: &ImageView<'_, u8>,
) -> Result<Image<u16>, Error> {
    if labels.dims() != mask.dims() {
        return Err(Error::DimensionMismatch {
            expected: labels.dims(),
            actual: mask.dims(),
        });
    }

    let mut out = Vec::with_capacity(labels.width() * labels.height());
    for y in 0..labels.height() {
        let lrow = labels.row(y);
        let mrow = mask.row(y);
        out.extend(
            lrow.iter()
                .zip(mrow)
                .map(|(&l, &m)| if m == 0 { 0 } else { l }),
        );
    }

    Image::from_vec(labels.width(), labels.height(), out)
}

/// ORs `src` into `dst`, producing 255 wherever either is set.
pub fn union_mask_into(
    dst: &mut ImageViewMut<'_, u8>,
    src: &ImageView<'_, u8>,
) -> Result<(), Error> {
    if (dst.width(), dst.height()) != src.dims() {
        return Err(Error::DimensionMismatch {
            expected: (dst.width(), dst.height()),
            actual: src.dims(),
        });
    }

    for y in 0..src.height() {
        let srow = src.row(y);
        for (d, &s) in dst.row_mut(y).iter_mut().zip(srow) {
            if s != 0 {
                *d = 255;
            }
        }
    }
    Ok(())
}
