use crate::Error;

/// Owned, row-major raster.
#[derive(Debug, Clone, PartialEq)]
pub struct Image<T> {
    width: usize,
    height: usize,
    data: Vec<T>,
}

impl<T> Image<T> {
    pub fn from_vec(width: usize, height: usize, data: Vec<T>) -> Result<Self, Error> {
        let expected = width.checked_mul(height).ok_or(Error::SizeMismatch {
            expected: usize::MAX,
            actual: data.len(),
        })?;
        if data.len() != expected {
            return Err(Error::SizeMismatch {
                expected,
                actual: data.len(),
            });
        }

        Ok(Self {
            width,
            height,
            data,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn dims(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    pub fn data(&self) -> &[T] {
        &self.data
    }

    pub fn get(&self, x: usize, y: usize) -> Option<&T> {
        (x < self.width && y < self.height).then(|| &self.data[y * self.width + x])
    }

    pub fn as_view(&self) -> ImageView<'_, T> {
        ImageView {
            width: self.width,
            height: self.height,
            data: &self.data,
        }
    }

    pub fn as_view_mut(&mut self) -> ImageViewMut<'_, T> {
        ImageViewMut {
            width: self.width,
            height: self.height,
            data: &mut self.data,
        }
    }
}

impl<T: Clone> Image<T> {
    pub fn new_fill(width: usize, height: usize, value: T) -> Self {
        let len = width.checked_mul(height).expect("image size overflow");
        Self {
            width,
            height,
            data: vec![value; len],
        }
    }
}

impl<T: Default + PartialEq> Image<T> {
    /// Number of pixels that are not background.
    pub fn count_set(&self) -> usize {
        let bg = T::default();
        self.data.iter().filter(|v| **v != bg).count()
    }
}

/// Borrowed read-only raster.
#[derive(Debug, Clone, Copy)]
pub struct ImageView<'a, T> {
    width: usize,
    height: usize,
    data: &'a [T],
}

impl<'a, T> ImageView<'a, T> {
    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn dims(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    pub fn row(&self, y: usize) -> &'a [T] {
        assert!(y < self.height, "row {y} out of {} rows", self.height);
        &self.data[y * self.width..(y + 1) * self.width]
    }

    pub fn get(&self, x: usize, y: usize) -> Option<&'a T> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.data.get(y * self.width + x)
    }
}

/// Borrowed writable raster.
#[derive(Debug)]
pub struct ImageViewMut<'a, T> {
    width: usize,
    height: usize,
    data: &'a mut [T],
}

impl<T> ImageViewMut<'_, T> {
    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn row_mut(&mut self, y: usize) -> &mut [T] {
        assert!(y < self.height, "row {y} out of {} rows", self.height);
        &mut self.data[y * self.width..(y + 1) * self.width]
    }

    pub fn get_mut(&mut self, x: usize, y: usize) -> Option<&mut T> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(&mut self.data[y * self.width + x])
    }

    pub fn as_view(&self) -> ImageView<'_, T> {
        ImageView {
            width: self.width,
            height: self.height,
            data: &*self.data,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Image;
    use crate::Error;

    #[test]
    fn rows_and_pixels_of_a_label_plane() {
        let img = Image::from_vec(3, 2, vec![0u16, 4, 4, 0, 0, 9]).expect("valid plane");
        let view = img.as_view();

        assert_eq!(view.row(0), &[0, 4, 4]);
        assert_eq!(view.row(1), &[0, 0, 9]);
        assert_eq!(view.get(2, 1), Some(&9));
        assert_eq!(view.get(3, 1), None);
        assert_eq!(img.get(0, 2), None);
        assert_eq!(img.count_set(), 3);
    }

    #[test]
    fn from_vec_rejects_wrong_length_and_mut_view_writes() {
        assert_eq!(
            Image::from_vec(2, 2, vec![0u8; 3]).err(),
            Some(Error::SizeMismatch {
                expected: 4,
                actual: 3
            })
        );

        let mut mask = Image::new_fill(3, 2, 0u8);
        {
            let mut view = mask.as_view_mut();
            *view.get_mut(1, 1).expect("in bounds") = 255;
            view.row_mut(0)[2] = 255;
            assert!(view.get_mut(3, 0).is_none());
            assert_eq!(view.as_view().get(2, 0), Some(&255));
        }
        assert_eq!(mask.data(), &[0, 0, 255, 0, 255, 0]);
        assert_eq!(mask.count_set(), 2);
    }
}
