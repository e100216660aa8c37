use sm_core::{Model, ObjectId};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BoundaryReport {
    pub dropped_contours: usize,
    pub missing_slices: usize,
}

/// Drops contours with fewer than three points and sorts each object's
/// contours by slice. Objects left without contours are kept, empty.
pub fn prepare_boundary(model: &Model) -> (Model, BoundaryReport) {
    let mut out = Model::new(model.dims());
    let mut report = BoundaryReport::default();

    for id in 0..model.num_objects() {
        let obj = model.object(id);
        let before = obj.contours.len();

        let mut kept: Vec<_> = model
            .object_contours(id)
            .filter(|c| c.points.len() >= 3)
            .cloned()
            .collect();
        kept.sort_by_key(|c| c.z);

        let dropped = before - kept.len();
        if dropped > 0 {
            log::info!(
                "boundary object {}: removed {dropped} small contour(s), {} left",
                id + 1,
                kept.len()
            );
        }
        report.dropped_contours += dropped;

        let new_id = out.add_object(obj.name.clone(), obj.color, kept);
        if let Some((lo, hi)) = out.z_range(new_id) {
            log::info!("boundary object {}: z min {lo}, z max {hi}", id + 1);
        }
        let missing = missing_slices(&out, new_id);
        for z in &missing {
            log::warn!("boundary object {}: missing contour on slice {z}", id + 1);
        }
        report.missing_slices += missing.len();
    }

    (out, report)
}

/// Slices strictly between the object's lowest and highest contour that hold
/// no contour.
pub fn missing_slices(model: &Model, id: ObjectId) -> Vec<usize> {
    let mut zs: Vec<usize> = model.object_contours(id).map(|c| c.z).collect();
    zs.sort_unstable();
    zs.dedup();

    let mut missing = Vec::new();
    for w in zs.windows(2) {
        missing.extend(w[0] + 1..w[1]);
    }
    missing
}
