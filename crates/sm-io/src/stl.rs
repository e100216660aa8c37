use std::fs;
use std::path::Path;

use sm_mesh::SurfaceMesh;

use crate::IoError;

fn triangle_normal(a: [f32; 3], b: [f32; 3], c: [f32; 3]) -> [f32; 3] {
    let ab = [b[0] - a[0], b[1] - a[1], b[2] - a[2]];
    let ac = [c[0] - a[0], c[1] - a[1], c[2] - a[2]];
    let n = [
        ab[1] * ac[2] - ab[2] * ac[1],
        ab[2] * ac[0] - ab[0] * ac[2],
        ab[0] * ac[1] - ab[1] * ac[0],
    ];
    let len2 = n[0] * n[0] + n[1] * n[1] + n[2] * n[2];
    if len2 <= f32::EPSILON {
        return [0.0; 3];
    }
    let inv = 1.0 / len2.sqrt();
    [n[0] * inv, n[1] * inv, n[2] * inv]
}

/// Binary STL: 80-byte header, triangle count, then 50 bytes per triangle.
pub fn mesh_to_stl_bytes(mesh: &SurfaceMesh, header_name: &str) -> Vec<u8> {
    let mut out = Vec::with_capacity(84 + mesh.triangles.len() * 50);

    let mut header = [0u8; 80];
    let name = header_name.as_bytes();
    let n = name.len().min(header.len());
    header[..n].copy_from_slice(&name[..n]);
    out.extend_from_slice(&header);
    out.extend_from_slice(&(mesh.triangles.len() as u32).to_le_bytes());

    for t in &mesh.triangles {
        let [a, b, c] = t.map(|v| mesh.vertices[v]);
        for v in [triangle_normal(a, b, c), a, b, c] {
            for x in v {
                out.extend_from_slice(&x.to_le_bytes());
            }
        }
        out.extend_from_slice(&0u16.to_le_bytes());
    }
    out
}

pub fn write_stl(path: &Path, mesh: &SurfaceMesh, header_name: &str) -> Result<(), IoError> {
    fs::write(path, mesh_to_stl_bytes(mesh, header_name)).map_err(|e| IoError::io(path, e))
}

#[cfg(test)]
mod tests {
    use sm_mesh::SurfaceMesh;

    use super::mesh_to_stl_bytes;

    #[test]
    fn size_count_and_normal() {
        let mesh = SurfaceMesh {
            vertices: vec![[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]],
            triangles: vec![[0, 1, 2], [0, 2, 3]],
            rings: Vec::new(),
        };
        let bytes = mesh_to_stl_bytes(&mesh, "segmask");

        assert_eq!(bytes.len(), 84 + 2 * 50);
        assert_eq!(&bytes[..7], b"segmask");
        let count = u32::from_le_bytes(bytes[80..84].try_into().expect("4 bytes"));
        assert_eq!(count, 2);

        let nz = f32::from_le_bytes(bytes[92..96].try_into().expect("4 bytes"));
        assert_eq!(nz, 1.0);
    }
}
