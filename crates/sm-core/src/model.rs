use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{Dims, Point2f};

pub type ObjectId = usize;
pub type ContourId = usize;

/// Object color with channels in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Color {
    pub fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    pub fn to_array(self) -> [f32; 3] {
        [self.r, self.g, self.b]
    }
}

impl FromStr for Color {
    type Err = String;

    /// Parses `"r,g,b"` with every channel in `[0, 1]`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split(',').map(str::trim).collect();
        if parts.len() != 3 {
            return Err(format!("expected R,G,B, got '{s}'"));
        }

        let mut c = [0.0f32; 3];
        for (dst, part) in c.iter_mut().zip(&parts) {
            let v: f32 = part
                .parse()
                .map_err(|_| format!("'{part}' is not a number"))?;
            if !(0.0..=1.0).contains(&v) {
                return Err(format!("color channel {v} is outside [0, 1]"));
            }
            *dst = v;
        }
        Ok(Self::new(c[0], c[1], c[2]))
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{},{}", self.r, self.g, self.b)
    }
}

/// Polygon lying on a single slice of the stack.
#[derive(Debug, Clone, PartialEq)]
pub struct Contour {
    pub z: usize,
    pub points: Vec<Point2f>,
    pub closed: bool,
}

impl Contour {
    pub fn closed(z: usize, points: Vec<Point2f>) -> Self {
        Self {
            z,
            points,
            closed: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ModelObject {
    pub name: Option<String>,
    pub color: Option<Color>,
    pub contours: Vec<ContourId>,
}

/// Arena-backed vector model: objects index into a flat contour store.
#[derive(Debug, Clone, PartialEq)]
pub struct Model {
    dims: Dims,
    objects: Vec<ModelObject>,
    contours: Vec<Contour>,
}

impl Model {
    pub fn new(dims: Dims) -> Self {
        Self {
            dims,
            objects: Vec::new(),
            contours: Vec::new(),
        }
    }

    pub fn dims(&self) -> Dims {
        self.dims
    }

    pub fn num_objects(&self) -> usize {
        self.objects.len()
    }

    pub fn num_contours(&self) -> usize {
        self.contours.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn objects(&self) -> &[ModelObject] {
        &self.objects
    }

    pub fn object(&self, id: ObjectId) -> &ModelObject {
        &self.objects[id]
    }

    pub fn contour(&self, id: ContourId) -> &Contour {
        &self.contours[id]
    }

    pub fn object_contours(&self, id: ObjectId) -> impl Iterator<Item = &Contour> + '_ {
        self.objects[id].contours.iter().map(|&c| &self.contours[c])
    }

    /// Appends an object built from owned contours and returns its handle.
    pub fn add_object<I>(
        &mut self,
        name: Option<String>,
        color: Option<Color>,
        contours: I,
    ) -> ObjectId
    where
        I: IntoIterator<Item = Contour>,
    {
        let mut ids = Vec::new();
        for c in contours {
            ids.push(self.contours.len());
            self.contours.push(c);
        }

        let id = self.objects.len();
        self.objects.push(ModelObject {
            name,
            color,
            contours: ids,
        });
        id
    }

    /// Copies object `id` of `src`, including its contours, into `self`.
    pub fn copy_object_from(&mut self, src: &Model, id: ObjectId) -> ObjectId {
        let obj = src.object(id);
        self.add_object(
            obj.name.clone(),
            obj.color,
            src.object_contours(id).cloned(),
        )
    }

    /// Number of distinct slices on which the object has a contour.
    pub fn contour_count(&self, id: ObjectId) -> usize {
        let mut zs: Vec<usize> = self.object_contours(id).map(|c| c.z).collect();
        zs.sort_unstable();
        zs.dedup();
        zs.len()
    }

    /// Inclusive slice range covered by the object, `None` when it is empty.
    pub fn z_range(&self, id: ObjectId) -> Option<(usize, usize)> {
        let mut it = self.object_contours(id).map(|c| c.z);
        let first = it.next()?;
        Some(it.fold((first, first), |(lo, hi), z| (lo.min(z), hi.max(z))))
    }

    /// New model holding only the objects for which `keep` returns true.
    pub fn retain_objects<F>(&self, mut keep: F) -> Model
    where
        F: FnMut(&Model, ObjectId) -> bool,
    {
        let mut out = Model::new(self.dims);
        for id in 0..self.objects.len() {
            if keep(self, id) {
                out.copy_object_from(self, id);
            }
        }
        out
    }
}
