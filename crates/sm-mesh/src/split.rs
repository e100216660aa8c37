use sm_core::{Contour, Model};

use crate::{MeshConfig, SurfaceMesh, build_mesh};

#[derive(Debug, Clone)]
pub struct MeshSplit {
    /// One object per connected surface piece.
    pub model: Model,
    /// Surfaces of all input objects, concatenated.
    pub mesh: SurfaceMesh,
    pub components: usize,
}

/// Meshes every object and emits one object per connected piece of its
/// surface. Pieces keep their source object's name and color, and their
/// contours in source order.
pub fn split_by_connectivity(model: &Model, cfg: &MeshConfig) -> MeshSplit {
    let mut out = Model::new(model.dims());
    let mut all = SurfaceMesh::default();
    let mut components = 0;

    for id in 0..model.num_objects() {
        let mesh = build_mesh(model, id, cfg);
        let (comp, count) = mesh.vertex_components();

        let mut pieces: Vec<Vec<Contour>> = vec![Vec::new(); count];
        let mut order: Vec<usize> = Vec::with_capacity(count);
        for (ring, c) in mesh.rings.iter().zip(model.object_contours(id)) {
            if ring.is_empty() {
                log::debug!("object {}: skipping empty contour on slice {}", id + 1, c.z);
                continue;
            }
            let k = comp[ring.start];
            if pieces[k].is_empty() {
                order.push(k);
            }
            pieces[k].push(c.clone());
        }

        let obj = model.object(id);
        log::info!("object {}: {} connected piece(s)", id + 1, order.len());
        for k in order {
            out.add_object(obj.name.clone(), obj.color, std::mem::take(&mut pieces[k]));
            components += 1;
        }
        all.append(&mesh);
    }

    MeshSplit {
        model: out,
        mesh: all,
        components,
    }
}
