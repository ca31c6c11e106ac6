//! T-pose 重定向
//!
//! 把下垂的手臂绕肩关节转到水平方向，并缩放到目标骨骼的手臂长度。

use crate::core::config::RetargetTuning;
use crate::core::math::constants::HALF_PI;
use crate::core::math::geometry::rotate_scale_about;
use crate::core::math::{to_array, to_vector, Rotation, Vector3};
use crate::geometry::Mesh;
use crate::rig::classifier::LimbSet;
use crate::skeleton::{RigBones, Side, Skeleton};
use crate::{rig_debug, rig_info};

/// 单侧手臂的重定向结果
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArmRetarget {
    pub side: Side,
    pub vertices: usize,
    /// 肩关节（`upperarm` 头部）
    pub pivot: Vector3,
    /// 肩高到手臂最低点的距离
    pub extent: f32,
    pub scale: f32,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RetargetReport {
    /// 只包含非空的一侧
    pub arms: Vec<ArmRetarget>,
}

impl RetargetReport {
    pub fn arm(&self, side: Side) -> Option<&ArmRetarget> {
        self.arms.iter().find(|a| a.side == side)
    }
}

/// 手臂重定向器
pub struct PoseRetargeter<'a> {
    tuning: &'a RetargetTuning,
}

impl<'a> PoseRetargeter<'a> {
    pub fn new(tuning: &'a RetargetTuning) -> Self {
        Self { tuning }
    }

    /// 绕前后轴（Y）旋转 -π/2·side，缩放到参考手臂长度
    ///
    /// 只修改手臂顶点；法线只旋转。
    pub fn retarget(
        &self,
        mesh: &mut Mesh,
        limbs: &LimbSet,
        skeleton: &Skeleton,
        bones: &RigBones,
    ) -> RetargetReport {
        let mut report = RetargetReport::default();

        for side in Side::BOTH {
            let arm = limbs.vertices(side);
            if arm.is_empty() {
                rig_debug!(side = side.name(), "No arm vertices, skipping retarget");
                continue;
            }

            let pivot = skeleton.bones[bones.upper_arm(side)].head;
            let bottom = arm
                .iter()
                .map(|&i| mesh.vertices[i].position[2])
                .fold(f32::INFINITY, f32::min);
            let extent = pivot.z - bottom;
            let scale = (self.tuning.arm_length / extent.max(self.tuning.min_extent))
                .min(self.tuning.max_scale);
            let rotation = Rotation::from_axis_angle(&Vector3::y_axis(), -HALF_PI * side.sign());

            for &i in &arm {
                let vertex = &mut mesh.vertices[i];
                let moved = rotate_scale_about(&to_vector(vertex.position), &pivot, &rotation, scale);
                vertex.position = to_array(&moved);
                vertex.normal = to_array(&(rotation * to_vector(vertex.normal)));
            }

            rig_info!(
                side = side.name(),
                vertices = arm.len(),
                pivot_x = pivot.x,
                pivot_z = pivot.z,
                extent,
                scale,
                "Arm retargeted to T-pose"
            );

            report.arms.push(ArmRetarget {
                side,
                vertices: arm.len(),
                pivot,
                extent,
                scale,
            });
        }

        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::ClassifyTuning;
    use crate::rig::classifier::LimbClassifier;
    use crate::rig::fixtures;
    use crate::rig::params::BodyProfile;

    fn classified() -> (Mesh, LimbSet) {
        let tuning = ClassifyTuning::default();
        let mesh = fixtures::humanoid_mesh();
        let profile = BodyProfile::new(1.10, 0.19, &tuning);
        let limbs = LimbClassifier::new(&tuning).classify(&mesh, &mesh.adjacency(), &profile);
        (mesh, limbs)
    }

    #[test]
    fn test_arms_raised_to_t_pose() {
        let skeleton = fixtures::humanoid_skeleton();
        let bones = RigBones::resolve(&skeleton).unwrap();
        let tuning = RetargetTuning::default();
        let (mut mesh, limbs) = classified();
        let before = mesh.clone();

        let report = PoseRetargeter::new(&tuning).retarget(&mut mesh, &limbs, &skeleton, &bones);
        assert_eq!(report.arms.len(), 2);

        let left = report.arm(Side::Left).unwrap();
        assert!((left.extent - 0.60).abs() < 1e-4);
        assert!((left.scale - 0.69 / 0.60).abs() < 1e-3);

        // 手臂最远端到达挂点骨骼末端附近
        let reach = |side: Side| {
            limbs
                .vertices(side)
                .iter()
                .map(|&i| mesh.vertices[i].position[0] * side.sign())
                .fold(f32::MIN, f32::max)
        };
        assert!((reach(Side::Left) - 1.01).abs() < 0.01, "left reach {}", reach(Side::Left));
        assert!((reach(Side::Right) - 1.01).abs() < 0.01, "right reach {}", reach(Side::Right));

        // 手臂变成水平，高度都在肩高附近
        for &i in &limbs.left() {
            assert!((mesh.vertices[i].position[2] - 1.10).abs() < 0.06);
        }

        // 非手臂顶点不动
        for i in 0..mesh.vertex_count() {
            if !limbs.is_arm(i) {
                assert_eq!(mesh.vertices[i], before.vertices[i]);
            }
        }
    }

    #[test]
    fn test_short_arm_scale_is_clamped() {
        let skeleton = fixtures::humanoid_skeleton();
        let bones = RigBones::resolve(&skeleton).unwrap();
        let tuning = RetargetTuning::default();

        let mut mesh = Mesh::new();
        mesh.vertices.push(crate::geometry::Vertex::at([0.35, 0.0, 1.09]));
        let limbs = {
            let classify = ClassifyTuning::default();
            let profile = BodyProfile::new(1.10, 0.19, &classify);
            LimbClassifier::new(&classify).classify(&mesh, &mesh.adjacency(), &profile)
        };
        assert_eq!(limbs.count(Side::Left), 1);

        let report = PoseRetargeter::new(&tuning).retarget(&mut mesh, &limbs, &skeleton, &bones);
        let left = report.arm(Side::Left).unwrap();
        // 0.69 / max(0.01, 0.1) = 6.9，截断到 3.0
        assert_eq!(left.scale, 3.0);
        assert!(report.arm(Side::Right).is_none());
    }
}
