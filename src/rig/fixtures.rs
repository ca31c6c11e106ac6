//! 测试用的人形骨骼与合成网格
//!
//! 网格由互不相连的竖直圆管组成：躯干、头部、两条下垂的手臂、两条腿。
//! 颈部高度带内没有顶点，因此颈部半宽取默认值。整体高度为 2.3，左右对称。
//! `humanoid_mesh_with_shoulders` 额外用边把手臂顶圈连到躯干顶圈。

use std::f32::consts::TAU;

use crate::geometry::{Mesh, MeshFragment, Vertex};
use crate::skeleton::{Bone, Skeleton};

/// 每个圆环的分段数
pub const SEGMENTS: usize = 8;

pub const ARM_RADIUS: f32 = 0.05;
pub const ARM_X: f32 = 0.32;

/// 23 根骨骼的 T-pose 人形骨骼
pub fn humanoid_skeleton() -> Skeleton {
    let mut bones = vec![
        Bone::new("root", [0.0, 0.0, 0.0], [0.0, 0.0, 0.1]),
        Bone::new("hips", [0.0, 0.0, 0.40], [0.0, 0.0, 0.55]),
        Bone::new("spine", [0.0, 0.0, 0.55], [0.0, 0.0, 0.80]),
        Bone::new("chest", [0.0, 0.0, 0.80], [0.0, 0.0, 1.10]),
        Bone::new("head", [0.0, 0.0, 1.20], [0.0, 0.0, 2.0]),
    ];

    for (suffix, s) in [("l", 1.0f32), ("r", -1.0f32)] {
        let arm = [
            ("upperarm", 0.32, 0.57),
            ("lowerarm", 0.57, 0.80),
            ("wrist", 0.80, 0.86),
            ("hand", 0.86, 0.96),
            ("handslot", 0.96, 1.01),
        ];
        for (part, from, to) in arm {
            bones.push(Bone::new(
                format!("{}.{}", part, suffix),
                [s * from, 0.0, 1.10],
                [s * to, 0.0, 1.10],
            ));
        }

        let x = s * 0.10;
        bones.push(Bone::new(format!("upperleg.{}", suffix), [x, 0.0, 0.40], [x, 0.0, 0.22]));
        bones.push(Bone::new(format!("lowerleg.{}", suffix), [x, 0.0, 0.22], [x, 0.0, 0.06]));
        bones.push(Bone::new(format!("foot.{}", suffix), [x, 0.0, 0.06], [x, -0.08, 0.0]));
        bones.push(Bone::new(format!("toes.{}", suffix), [x, -0.08, 0.0], [x, -0.14, 0.0]));
    }

    Skeleton::new("Rig_Medium", bones).unwrap()
}

/// 圆管的高度层
pub fn torso_rings() -> Vec<f32> {
    (0..12).map(|k| 0.40 + k as f32 * 0.06).collect()
}

pub fn head_rings() -> Vec<f32> {
    vec![1.30, 1.55, 1.80, 2.05, 2.30]
}

pub fn arm_rings() -> Vec<f32> {
    (0..7).map(|k| 1.10 - k as f32 * 0.10).collect()
}

pub fn leg_rings() -> Vec<f32> {
    vec![0.0, 0.05, 0.10, 0.15, 0.20, 0.25, 0.30, 0.35, 0.38]
}

/// 向网格追加一根竖直圆管，返回首个顶点的索引
///
/// 边只沿圆环和相邻圆环之间，不含三角形对角线。
pub fn add_tube(mesh: &mut Mesh, center_x: f32, radius: f32, rings: &[f32]) -> usize {
    let base = mesh.vertices.len();
    let at = |ring: usize, seg: usize| (base + ring * SEGMENTS + seg % SEGMENTS) as u32;

    for &z in rings {
        for seg in 0..SEGMENTS {
            let angle = seg as f32 * TAU / SEGMENTS as f32;
            let normal = [angle.cos(), angle.sin(), 0.0];
            mesh.vertices.push(Vertex::new(
                [center_x + radius * normal[0], radius * normal[1], z],
                normal,
                [seg as f32 / SEGMENTS as f32, z],
            ));
        }
    }

    for ring in 0..rings.len() {
        for seg in 0..SEGMENTS {
            mesh.edges.push([at(ring, seg), at(ring, seg + 1)]);
            if ring + 1 < rings.len() {
                mesh.edges.push([at(ring, seg), at(ring + 1, seg)]);

                let (a, b) = (at(ring, seg), at(ring, seg + 1));
                let (c, d) = (at(ring + 1, seg), at(ring + 1, seg + 1));
                mesh.indices.extend_from_slice(&[a, b, d, a, d, c]);
            }
        }
    }

    base
}

/// 双臂下垂的合成人形网格
pub fn humanoid_mesh() -> Mesh {
    build_humanoid(false)
}

/// 肩部相连的合成人形网格
///
/// 每条手臂顶圈（z = 1.10）的第 k 个顶点与躯干顶圈（z = 1.06）的第 k 个顶点相连。
pub fn humanoid_mesh_with_shoulders() -> Mesh {
    build_humanoid(true)
}

fn build_humanoid(shoulders: bool) -> Mesh {
    let mut mesh = Mesh::with_name("Synthetic");
    let torso = add_tube(&mut mesh, 0.0, 0.12, &torso_rings());
    add_tube(&mut mesh, 0.0, 0.25, &head_rings());
    let left = add_tube(&mut mesh, ARM_X, ARM_RADIUS, &arm_rings());
    let right = add_tube(&mut mesh, -ARM_X, ARM_RADIUS, &arm_rings());
    add_tube(&mut mesh, 0.10, 0.06, &leg_rings());
    add_tube(&mut mesh, -0.10, 0.06, &leg_rings());

    if shoulders {
        let torso_top = torso + (torso_rings().len() - 1) * SEGMENTS;
        for arm in [left, right] {
            for seg in 0..SEGMENTS {
                mesh.edges.push([(arm + seg) as u32, (torso_top + seg) as u32]);
            }
        }
    }
    mesh
}

/// 躯干圆管的顶点范围
pub fn torso_range() -> std::ops::Range<usize> {
    0..torso_rings().len() * SEGMENTS
}

/// 每条手臂的顶点数
pub fn arm_vertex_count() -> usize {
    arm_rings().len() * SEGMENTS
}

/// 把合成网格包装成单位变换的导入片段
pub fn humanoid_fragment() -> MeshFragment {
    let mesh = humanoid_mesh();
    MeshFragment::new(mesh.vertices, mesh.indices, mesh.edges).with_name("Synthetic")
}
