use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use sm_core::{Color, Contour, Dims, Model, Point2f};

use crate::{FormatError, IoError, contour_slice};

/// On-disk layout of a vector model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelFile {
    pub dims: [usize; 3],
    pub objects: Vec<ObjectRecord>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObjectRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<[f32; 3]>,
    #[serde(default)]
    pub contours: Vec<ContourRecord>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContourRecord {
    pub points: Vec<[f32; 3]>,
    #[serde(default = "default_closed")]
    pub closed: bool,
}

fn default_closed() -> bool {
    true
}

impl From<&Model> for ModelFile {
    fn from(model: &Model) -> Self {
        let d = model.dims();
        let objects = (0..model.num_objects())
            .map(|id| {
                let obj = model.object(id);
                ObjectRecord {
                    name: obj.name.clone(),
                    color: obj.color.map(Color::to_array),
                    contours: model
                        .object_contours(id)
                        .map(|c| ContourRecord {
                            points: c.points.iter().map(|p| [p.x, p.y, c.z as f32]).collect(),
                            closed: c.closed,
                        })
                        .collect(),
                }
            })
            .collect();

        Self {
            dims: [d.x, d.y, d.z],
            objects,
        }
    }
}

impl ModelFile {
    pub fn into_model(self) -> Result<Model, FormatError> {
        let [x, y, z] = self.dims;
        let mut model = Model::new(Dims::new(x, y, z));

        for (i, obj) in self.objects.into_iter().enumerate() {
            let mut contours = Vec::with_capacity(obj.contours.len());
            for (j, c) in obj.contours.into_iter().enumerate() {
                let slice = contour_slice(&c.points).map_err(|e| {
                    FormatError::new(None, format!("object {} contour {}: {}", i + 1, j + 1, e.msg))
                })?;
                contours.push(Contour {
                    z: slice,
                    points: c.points.iter().map(|p| Point2f::new(p[0], p[1])).collect(),
                    closed: c.closed,
                });
            }
            let color = obj.color.map(|[r, g, b]| Color::new(r, g, b));
            model.add_object(obj.name, color, contours);
        }
        Ok(model)
    }
}

pub fn read_model(path: &Path) -> Result<Model, IoError> {
    let text = fs::read_to_string(path).map_err(|e| IoError::io(path, e))?;
    let file: ModelFile = serde_json::from_str(&text).map_err(|source| IoError::Json {
        path: path.to_path_buf(),
        source,
    })?;
    let model = file.into_model().map_err(|source| IoError::Format {
        path: path.to_path_buf(),
        source,
    })?;

    log::debug!(
        "read {}: {} object(s), {} contour(s)",
        path.display(),
        model.num_objects(),
        model.num_contours()
    );
    Ok(model)
}

pub fn write_model(path: &Path, model: &Model) -> Result<(), IoError> {
    let json =
        serde_json::to_string_pretty(&ModelFile::from(model)).map_err(|source| IoError::Json {
            path: path.to_path_buf(),
            source,
        })?;
    fs::write(path, json).map_err(|e| IoError::io(path, e))
}
