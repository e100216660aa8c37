use std::path::Path;

use serde::Serialize;
use sm_assemble::{assemble, filter_by_contour_count};
use sm_core::{Dims, Image, Model, SegmentationStack};
use sm_interp::{fill_gaps, prepare_boundary};
use sm_mesh::{SurfaceMesh, split_by_connectivity};
use sm_raster::{apply_mask_u16, rasterize_object, union_mask_into};
use sm_trace::{PlaneTrace, trace_plane};

use crate::{MaskError, MaskJobConfig, MaskPolicy};

/// Counters collected over one job.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct JobSummary {
    pub planes: usize,
    pub boundary_contours_dropped: usize,
    pub boundary_missing_slices: usize,
    pub interpolated_contours: usize,
    pub unfilled_gaps: usize,
    pub interpolation_failures: usize,
    pub contours_traced: usize,
    pub trace_failures: usize,
    pub objects_grouped: usize,
    pub objects_before_filter: usize,
    pub objects_after_filter: usize,
    pub mesh_components: Option<usize>,
    pub objects_after_split_filter: Option<usize>,
}

#[derive(Debug, Clone)]
pub struct MaskJobOutput {
    pub model: Model,
    pub summary: JobSummary,
    /// Surface used for splitting, when post-processing ran.
    pub mesh: Option<SurfaceMesh>,
}

/// Reads a directory of label images and the boundary model, JSON or a
/// point listing sized to the stack.
pub fn load_inputs(
    model_path: &Path,
    stack_dir: &Path,
) -> Result<(Model, SegmentationStack), MaskError> {
    let stack = sm_io::load_stack(stack_dir)?;
    let boundary = sm_io::read_any_model(model_path, Some(stack.dims()))?;
    Ok((boundary, stack))
}

fn fmt_dims(d: Dims) -> String {
    format!("{}x{}x{}", d.x, d.y, d.z)
}

/// Checks the preconditions of a job; nothing runs when this fails.
pub fn validate_inputs(boundary: &Model, stack: &SegmentationStack) -> Result<(), MaskError> {
    if boundary.dims() != stack.dims() {
        return Err(MaskError::InputMismatch {
            what: "dimensions",
            expected: fmt_dims(boundary.dims()),
            actual: fmt_dims(stack.dims()),
        });
    }
    if boundary.is_empty() {
        return Err(MaskError::EmptyBoundary);
    }

    let depth = stack.depth();
    for id in 0..boundary.num_objects() {
        for (j, c) in boundary.object_contours(id).enumerate() {
            if c.z >= depth {
                return Err(MaskError::ContourOutOfRange {
                    object: id + 1,
                    contour: j + 1,
                    z: c.z,
                    depth,
                });
            }
        }
    }
    Ok(())
}

/// Masks `stack` with `boundary` and vectorizes what survives.
///
/// An empty result is a valid output, not an error.
pub fn run_mask_job(
    boundary: &Model,
    stack: &SegmentationStack,
    cfg: &MaskJobConfig,
) -> Result<MaskJobOutput, MaskError> {
    validate_inputs(boundary, stack)?;
    cfg.validate(stack.dims())?;
    let mut summary = JobSummary::default();

    let (prepared, prep) = prepare_boundary(boundary);
    summary.boundary_contours_dropped = prep.dropped_contours;
    summary.boundary_missing_slices = prep.missing_slices;

    let prepared = if cfg.run_interpolation {
        let (filled, report) = fill_gaps(&prepared, &cfg.interpolate);
        log::info!(
            "interpolation added {} contour(s), {} gap(s) left open",
            report.added,
            report.unfilled_gaps
        );
        summary.interpolated_contours = report.added;
        summary.unfilled_gaps = report.unfilled_gaps;
        summary.interpolation_failures = report.failed;
        filled
    } else {
        prepared
    };

    let masks: Vec<Vec<Image<u8>>> = match cfg.mask_policy {
        MaskPolicy::Union => vec![union_masks(&prepared, cfg)?],
        MaskPolicy::PerObject => (0..prepared.num_objects())
            .map(|id| rasterize_object(&prepared, id, prepared.dims(), cfg.fill_rule))
            .collect(),
    };

    let mut model = Model::new(stack.dims());
    let mut mesh: Option<SurfaceMesh> = None;
    for (m, planes) in masks.iter().enumerate() {
        if masks.len() > 1 {
            log::info!("masking with boundary object {}", m + 1);
        }
        let traced = mask_and_trace(stack, planes, cfg, &mut summary)?;
        let part = finish_objects(stack.dims(), &traced, cfg, &mut summary, &mut mesh);
        for id in 0..part.num_objects() {
            model.copy_object_from(&part, id);
        }
    }

    log::info!(
        "{} plane(s), {} contour(s) traced, {} skipped, {} object(s) written",
        summary.planes,
        summary.contours_traced,
        summary.trace_failures,
        model.num_objects()
    );
    if model.is_empty() {
        log::warn!("no segmented objects survived masking and filtering");
    }

    Ok(MaskJobOutput {
        model,
        summary,
        mesh,
    })
}

fn union_masks(boundary: &Model, cfg: &MaskJobConfig) -> Result<Vec<Image<u8>>, MaskError> {
    let dims = boundary.dims();
    let mut union: Vec<Image<u8>> =
        (0..dims.z).map(|_| Image::new_fill(dims.x, dims.y, 0u8)).collect();
    for id in 0..boundary.num_objects() {
        let planes = rasterize_object(boundary, id, dims, cfg.fill_rule);
        for (dst, src) in union.iter_mut().zip(&planes) {
            union_mask_into(&mut dst.as_view_mut(), &src.as_view())?;
        }
    }
    Ok(union)
}

fn mask_and_trace(
    stack: &SegmentationStack,
    masks: &[Image<u8>],
    cfg: &MaskJobConfig,
    summary: &mut JobSummary,
) -> Result<Vec<PlaneTrace>, MaskError> {
    let mut traced = Vec::with_capacity(stack.depth());
    for (z, (plane, mask)) in stack.planes().iter().zip(masks).enumerate() {
        let masked = apply_mask_u16(&plane.as_view(), &mask.as_view())?;
        let t = trace_plane(&masked.as_view(), &cfg.trace);
        log::debug!(
            "slice {z}: {} contour(s), {} failure(s)",
            t.contours.len(),
            t.failures
        );

        summary.planes += 1;
        summary.contours_traced += t.contours.len();
        summary.trace_failures += t.failures;
        traced.push(t);
    }
    Ok(traced)
}

fn finish_objects(
    dims: Dims,
    traced: &[PlaneTrace],
    cfg: &MaskJobConfig,
    summary: &mut JobSummary,
    mesh: &mut Option<SurfaceMesh>,
) -> Model {
    let (assembled, report) = assemble(dims, traced, &cfg.assemble);
    summary.objects_grouped += report.grouped;
    summary.objects_before_filter += report.before_filter;
    summary.objects_after_filter += report.after_filter;

    if !cfg.run_postprocessing {
        return assembled;
    }

    let split = split_by_connectivity(&assembled, &cfg.mesh);
    let filtered = filter_by_contour_count(&split.model, cfg.assemble.filter_contours);
    log::info!(
        "mesh split into {} object(s), {} after contour filter",
        split.components,
        filtered.num_objects()
    );

    *summary.mesh_components.get_or_insert(0) += split.components;
    *summary.objects_after_split_filter.get_or_insert(0) += filtered.num_objects();
    mesh.get_or_insert_with(SurfaceMesh::default).append(&split.mesh);
    filtered
}
