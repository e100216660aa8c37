use sm_core::{Color, Model};

/// Folds every object into a single object, keeping contour order and the
/// first object's name and color.
pub fn merge_all(model: &Model) -> Model {
    let mut out = Model::new(model.dims());
    if model.is_empty() {
        return out;
    }

    let first = model.object(0);
    let contours = (0..model.num_objects()).flat_map(|id| model.object_contours(id).cloned());
    out.add_object(first.name.clone(), first.color, contours);
    out
}

/// Sets name and color on every object. `None` leaves that field as is.
pub fn apply_style(model: &Model, name: Option<&str>, color: Option<Color>) -> Model {
    let mut out = Model::new(model.dims());
    for id in 0..model.num_objects() {
        let obj = model.object(id);
        out.add_object(
            name.map(str::to_owned).or_else(|| obj.name.clone()),
            color.or(obj.color),
            model.object_contours(id).cloned(),
        );
    }
    out
}

/// Drops objects with `threshold` or fewer contours. `0` disables the filter.
pub fn filter_by_contour_count(model: &Model, threshold: usize) -> Model {
    if threshold == 0 {
        return model.clone();
    }
    model.retain_objects(|m, id| {
        let n = m.contour_count(id);
        if n <= threshold {
            log::debug!("dropping object {} with {n} contour(s)", id + 1);
        }
        n > threshold
    })
}
