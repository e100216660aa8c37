use std::collections::BTreeMap;
use std::ops::Range;

use sm_core::{Contour, Model, ObjectId, Point2f, polygon_centroid, signed_area};
use sm_raster::{FillRule, Footprint};

use crate::MeshConfig;

/// Indexed triangle mesh. `rings[i]` is the vertex range of the object's
/// `i`-th contour; cap centers follow after all rings.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SurfaceMesh {
    pub vertices: Vec<[f32; 3]>,
    pub triangles: Vec<[usize; 3]>,
    pub rings: Vec<Range<usize>>,
}

impl SurfaceMesh {
    /// Appends `other`, shifting its indices past the current vertices.
    pub fn append(&mut self, other: &SurfaceMesh) {
        let base = self.vertices.len();
        self.vertices.extend_from_slice(&other.vertices);
        self.triangles
            .extend(other.triangles.iter().map(|t| [t[0] + base, t[1] + base, t[2] + base]));
        self.rings
            .extend(other.rings.iter().map(|r| r.start + base..r.end + base));
    }

    /// Vertex components under triangle and ring adjacency, as a component
    /// index per vertex plus the component count.
    pub fn vertex_components(&self) -> (Vec<usize>, usize) {
        let n = self.vertices.len();
        let mut adj: Vec<Vec<usize>> = vec![Vec::new(); n];
        let mut link = |a: usize, b: usize| {
            adj[a].push(b);
            adj[b].push(a);
        };
        for t in &self.triangles {
            link(t[0], t[1]);
            link(t[1], t[2]);
            link(t[2], t[0]);
        }
        for r in &self.rings {
            for v in r.start + 1..r.end {
                link(v - 1, v);
            }
        }

        let mut comp = vec![usize::MAX; n];
        let mut count = 0;
        let mut stack = Vec::new();
        for start in 0..n {
            if comp[start] != usize::MAX {
                continue;
            }
            comp[start] = count;
            stack.push(start);
            while let Some(v) = stack.pop() {
                for &u in &adj[v] {
                    if comp[u] == usize::MAX {
                        comp[u] = count;
                        stack.push(u);
                    }
                }
            }
            count += 1;
        }
        (comp, count)
    }
}

/// Skins the contours of object `id` into one surface.
pub fn build_mesh(model: &Model, id: ObjectId, cfg: &MeshConfig) -> SurfaceMesh {
    let contours: Vec<&Contour> = model.object_contours(id).collect();
    let mut mesh = SurfaceMesh::default();

    for c in &contours {
        let start = mesh.vertices.len();
        let z = c.z as f32;
        mesh.vertices.extend(c.points.iter().map(|p| [p.x, p.y, z]));
        mesh.rings.push(start..mesh.vertices.len());
    }

    let footprints: Vec<Footprint> = contours
        .iter()
        .map(|c| Footprint::of(&[&c.points], FillRule::EvenOdd))
        .collect();

    let mut by_z: BTreeMap<usize, Vec<usize>> = BTreeMap::new();
    for (i, c) in contours.iter().enumerate() {
        by_z.entry(c.z).or_default().push(i);
    }

    let mut has_up = vec![false; contours.len()];
    let mut has_down = vec![false; contours.len()];

    for (i, c) in contours.iter().enumerate() {
        for dz in 1..=cfg.skip_slices + 1 {
            let Some(above) = by_z.get(&(c.z + dz)) else {
                continue;
            };
            let partners: Vec<usize> = above
                .iter()
                .copied()
                .filter(|&j| footprints[i].overlap(&footprints[j]) > 0)
                .collect();
            if partners.is_empty() {
                continue;
            }

            for j in partners {
                skin(&mut mesh, i, &contours[i].points, j, &contours[j].points);
                has_down[j] = true;
            }
            has_up[i] = true;
            break;
        }
    }

    for (i, c) in contours.iter().enumerate() {
        if !has_up[i] {
            cap(&mut mesh, i, c, false);
        }
        if !has_down[i] {
            cap(&mut mesh, i, c, true);
        }
    }

    log::debug!(
        "object {}: mesh with {} vertices, {} triangles",
        id + 1,
        mesh.vertices.len(),
        mesh.triangles.len()
    );
    mesh
}

/// Ladder triangulation between two rings, always advancing along the
/// shorter diagonal.
fn skin(mesh: &mut SurfaceMesh, ia: usize, a: &[Point2f], ib: usize, b: &[Point2f]) {
    let (n, m) = (a.len(), b.len());
    if n == 0 || m == 0 {
        return;
    }
    let base_a = mesh.rings[ia].start;
    let base_b = mesh.rings[ib].start;

    let reversed = (signed_area(a) >= 0.0) != (signed_area(b) >= 0.0);
    let b_start = (0..m)
        .min_by(|&x, &y| a[0].distance(b[x]).total_cmp(&a[0].distance(b[y])))
        .unwrap_or(0);
    let b_at = |k: usize| {
        if reversed {
            (b_start + m - k % m) % m
        } else {
            (b_start + k) % m
        }
    };

    let (mut i, mut j) = (0, 0);
    while i < n || j < m {
        let va = base_a + i % n;
        let vb = base_b + b_at(j);
        let advance_a = if i == n {
            false
        } else if j == m {
            true
        } else {
            let da = a[(i + 1) % n].distance(b[b_at(j)]);
            let db = a[i % n].distance(b[b_at(j + 1)]);
            da <= db
        };

        if advance_a {
            mesh.triangles.push([va, base_a + (i + 1) % n, vb]);
            i += 1;
        } else {
            mesh.triangles.push([va, base_b + b_at(j + 1), vb]);
            j += 1;
        }
    }
}

/// Triangle fan from the contour centroid. `flip` reverses the winding.
fn cap(mesh: &mut SurfaceMesh, ring: usize, c: &Contour, flip: bool) {
    let n = c.points.len();
    if n < 3 {
        return;
    }
    let center = polygon_centroid(&c.points).unwrap_or(c.points[0]);
    let vc = mesh.vertices.len();
    mesh.vertices.push([center.x, center.y, c.z as f32]);

    let base = mesh.rings[ring].start;
    for k in 0..n {
        let (p, q) = (base + k, base + (k + 1) % n);
        mesh.triangles.push(if flip { [vc, q, p] } else { [vc, p, q] });
    }
}

#[cfg(test)]
mod tests {
    use sm_core::{Contour, Dims, Model, Point2f};

    use super::build_mesh;
    use crate::MeshConfig;

    fn square(z: usize, x0: f32) -> Contour {
        Contour::closed(
            z,
            vec![
                Point2f::new(x0 - 0.5, -0.5),
                Point2f::new(x0 + 3.5, -0.5),
                Point2f::new(x0 + 3.5, 3.5),
                Point2f::new(x0 - 0.5, 3.5),
            ],
        )
    }

    #[test]
    fn two_stacked_squares_form_a_closed_box() {
        let mut model = Model::new(Dims::new(8, 8, 2));
        model.add_object(None, None, [square(0, 0.0), square(1, 0.0)]);
        let mesh = build_mesh(&model, 0, &MeshConfig::default());

        assert_eq!(mesh.vertices.len(), 10);
        assert_eq!(mesh.triangles.len(), 16);

        let (_, count) = mesh.vertex_components();
        assert_eq!(count, 1);
    }

    #[test]
    fn distant_slices_stay_apart_beyond_skip() {
        let mut model = Model::new(Dims::new(8, 8, 8));
        model.add_object(None, None, [square(0, 0.0), square(3, 0.0)]);

        let near = build_mesh(&model, 0, &MeshConfig { skip_slices: 2 });
        assert_eq!(near.vertex_components().1, 1);

        let far = build_mesh(&model, 0, &MeshConfig { skip_slices: 1 });
        assert_eq!(far.vertex_components().1, 2);
    }

    #[test]
    fn append_shifts_indices() {
        let mut model = Model::new(Dims::new(8, 8, 1));
        model.add_object(None, None, [square(0, 0.0)]);
        let one = build_mesh(&model, 0, &MeshConfig::default());

        let mut both = one.clone();
        both.append(&one);
        assert_eq!(both.vertices.len(), 2 * one.vertices.len());
        assert_eq!(both.rings[1].start, one.vertices.len());
        assert_eq!(both.vertex_components().1, 2);
    }
}
