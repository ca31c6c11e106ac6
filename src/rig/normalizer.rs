//! 网格归一化
//!
//! 展平片段的世界变换并合并为一个网格，然后平移到原点、缩放到目标高度。

use crate::core::config::NormalizeTuning;
use crate::core::error::{DistRigError, Result};
use crate::core::math::geometry::{normal_matrix, normalize_or_zero};
use crate::core::math::{to_array, to_vector, Matrix3, Point3, Vector3};
use crate::geometry::{Mesh, MeshFragment, Vertex};
use crate::{rig_debug, rig_info};

/// 归一化结果
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NormalizeReport {
    /// 施加在缩放之前的平移
    pub offset: Vector3,
    pub scale: f32,
    pub height_before: f32,
    pub height_after: f32,
}

impl NormalizeReport {
    /// 没有修改任何顶点
    pub fn is_identity(&self) -> bool {
        self.offset == Vector3::zeros() && self.scale == 1.0
    }
}

/// 合并片段：世界变换应用到位置和法线，索引和边按顶点偏移重映射
///
/// 片段列表为空是致命错误。
pub fn merge_fragments(fragments: Vec<MeshFragment>) -> Result<Mesh> {
    if fragments.is_empty() {
        return Err(DistRigError::NoMeshFragments);
    }

    let mut mesh = Mesh::new();
    mesh.name = fragments.iter().find_map(|f| f.name.clone());

    for fragment in fragments {
        let base = mesh.vertices.len() as u32;
        let edges = fragment.resolved_edges();
        let transform = fragment.transform;
        let linear: Matrix3 = transform.fixed_view::<3, 3>(0, 0).into_owned();
        let normal_mat = normal_matrix(&linear).unwrap_or(linear);

        rig_debug!(
            fragment = fragment.name.as_deref().unwrap_or("<unnamed>"),
            vertices = fragment.vertices.len(),
            "Merging fragment"
        );

        mesh.vertices.extend(fragment.vertices.iter().map(|v| {
            let position = transform.transform_point(&Point3::from(to_vector(v.position)));
            let normal = normalize_or_zero(&(normal_mat * to_vector(v.normal)));
            Vertex::new(to_array(&position.coords), to_array(&normal), v.texcoord)
        }));
        mesh.indices.extend(fragment.indices.iter().map(|i| i + base));
        mesh.edges.extend(edges.iter().map(|e| [e[0] + base, e[1] + base]));
    }

    Ok(mesh)
}

/// 网格归一化器
pub struct MeshNormalizer<'a> {
    tuning: &'a NormalizeTuning,
}

impl<'a> MeshNormalizer<'a> {
    pub fn new(tuning: &'a NormalizeTuning) -> Self {
        Self { tuning }
    }

    /// 合并片段并归一化
    pub fn run(&self, fragments: Vec<MeshFragment>) -> Result<(Mesh, NormalizeReport)> {
        let fragment_count = fragments.len();
        let mut mesh = merge_fragments(fragments)?;
        let report = self.normalize(&mut mesh);

        rig_info!(
            fragments = fragment_count,
            vertices = mesh.vertex_count(),
            edges = mesh.edge_count(),
            scale = report.scale,
            height = report.height_after,
            "Mesh normalized"
        );
        Ok((mesh, report))
    }

    /// 平移使 X/Y 中心位于原点、最低点 z = 0，再均匀缩放到目标高度
    ///
    /// 高度低于下限时缩放系数为 1。平移和缩放都已是单位变换（1e-6 内）时不写入顶点，
    /// 所以重复调用不会改变网格。
    pub fn normalize(&self, mesh: &mut Mesh) -> NormalizeReport {
        let Some(bounds) = mesh.bounds() else {
            return NormalizeReport {
                offset: Vector3::zeros(),
                scale: 1.0,
                height_before: 0.0,
                height_after: 0.0,
            };
        };

        let height = bounds.height();
        let offset = Vector3::new(
            -(bounds.min.x + bounds.max.x) * 0.5,
            -(bounds.min.y + bounds.max.y) * 0.5,
            -bounds.min.z,
        );
        let scale = if height < self.tuning.min_height {
            1.0
        } else {
            self.tuning.target_height / height
        };

        if offset.norm() < 1e-6 && (scale - 1.0).abs() < 1e-6 {
            return NormalizeReport {
                offset: Vector3::zeros(),
                scale: 1.0,
                height_before: height,
                height_after: height,
            };
        }

        for vertex in &mut mesh.vertices {
            let p = (to_vector(vertex.position) + offset) * scale;
            vertex.position = to_array(&p);
        }

        NormalizeReport {
            offset,
            scale,
            height_before: height,
            height_after: height * scale,
        }
    }
}
