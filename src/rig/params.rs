//! 标准姿态参数
//!
//! 区域高度边界从骨骼端点读取一次，颈部半宽从归一化后的网格采样一次。
//! 之后分类和权重阶段都只读这些值。

use crate::core::config::{ClassifyTuning, RigTuning};
use crate::core::math::utils::saturate;
use crate::geometry::Mesh;
use crate::skeleton::{RigBones, Side, Skeleton};

/// 身体区域的 z 边界
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RegionBands {
    /// head 骨骼头部高度
    pub head_bottom: f32,
    /// chest 骨骼尾部高度
    pub chest_top: f32,
    /// chest 骨骼头部高度
    pub chest_bottom: f32,
    /// spine 骨骼头部高度
    pub spine_bottom: f32,
    /// hips 骨骼头部高度
    pub hips_bottom: f32,
}

/// 非手臂顶点所在的身体区域
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Region {
    Head,
    Chest,
    Spine,
    Hips,
    Leg,
}

impl RegionBands {
    pub fn from_skeleton(skeleton: &Skeleton, bones: &RigBones) -> Self {
        let b = &skeleton.bones;
        Self {
            head_bottom: b[bones.head].head.z,
            chest_top: b[bones.chest].tail.z,
            chest_bottom: b[bones.chest].head.z,
            spine_bottom: b[bones.spine].head.z,
            hips_bottom: b[bones.hips].head.z,
        }
    }

    /// 按高度选择区域，自上而下第一个满足的区域生效
    ///
    /// 头部区域从 `head_bottom - head_margin` 开始。
    pub fn classify(&self, z: f32, head_margin: f32) -> Region {
        if z > self.head_bottom - head_margin {
            Region::Head
        } else if z > self.chest_bottom {
            Region::Chest
        } else if z > self.spine_bottom {
            Region::Spine
        } else if z > self.hips_bottom {
            Region::Hips
        } else {
            Region::Leg
        }
    }
}

/// 区域内的混合系数 t，截断到 [0, 1]
///
/// 区间退化（上界不高于下界）时返回 1。
#[inline]
pub fn blend_fraction(z: f32, lo: f32, hi: f32) -> f32 {
    let span = hi - lo;
    if span <= f32::EPSILON {
        return 1.0;
    }
    saturate((z - lo) / span)
}

/// 流程各阶段共享的标准姿态参数
#[derive(Debug, Clone, PartialEq)]
pub struct CanonicalPoseParams {
    /// 归一化目标高度
    pub target_height: f32,
    /// 肩高（`upperarm.l` 头部）
    pub shoulder_z: f32,
    /// 颈部采样得到的身体半宽
    pub neck_half_width: f32,
    pub bands: RegionBands,
}

impl CanonicalPoseParams {
    /// 从骨骼和归一化后的网格推导
    pub fn derive(skeleton: &Skeleton, bones: &RigBones, mesh: &Mesh, tuning: &RigTuning) -> Self {
        let shoulder_z = skeleton.bones[bones.upper_arm(Side::Left)].head.z;
        Self {
            target_height: tuning.normalize.target_height,
            shoulder_z,
            neck_half_width: sample_neck_half_width(mesh, &tuning.classify),
            bands: RegionBands::from_skeleton(skeleton, bones),
        }
    }

    pub fn body_profile<'a>(&self, tuning: &'a ClassifyTuning) -> BodyProfile<'a> {
        BodyProfile {
            shoulder_z: self.shoulder_z,
            neck_half_width: self.neck_half_width,
            tuning,
        }
    }
}

/// 颈部高度带内顶点 |x| 的中位数（取排序后第 len/2 个）
///
/// 高度带内没有顶点时使用默认半宽。
pub fn sample_neck_half_width(mesh: &Mesh, tuning: &ClassifyTuning) -> f32 {
    let [lo, hi] = tuning.neck_band;
    let mut widths: Vec<f32> = mesh
        .vertices
        .iter()
        .filter(|v| v.position[2] >= lo && v.position[2] <= hi)
        .map(|v| v.position[0].abs())
        .collect();

    if widths.is_empty() {
        return tuning.default_neck_half_width;
    }

    widths.sort_by(|a, b| a.total_cmp(b));
    widths[widths.len() / 2]
}

/// 身体半宽随高度变化的剖面
#[derive(Debug, Clone, Copy)]
pub struct BodyProfile<'a> {
    pub shoulder_z: f32,
    pub neck_half_width: f32,
    tuning: &'a ClassifyTuning,
}

impl<'a> BodyProfile<'a> {
    pub fn new(shoulder_z: f32, neck_half_width: f32, tuning: &'a ClassifyTuning) -> Self {
        Self {
            shoulder_z,
            neck_half_width,
            tuning,
        }
    }

    /// 高度 z 处的身体半宽
    pub fn half_width(&self, z: f32) -> f32 {
        let t = self.tuning;
        let shoulder = self.neck_half_width * t.shoulder_factor;
        if z >= self.shoulder_z {
            shoulder
        } else if z >= t.waist_z {
            // 此分支内 shoulder_z > z >= waist_z，分母为正
            let frac = (self.shoulder_z - z) / (self.shoulder_z - t.waist_z);
            shoulder + frac * t.waist_taper
        } else if z >= t.hip_z {
            self.neck_half_width * t.hip_factor + t.hip_padding
        } else {
            t.leg_half_width
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Vertex;
    use crate::rig::fixtures;

    #[test]
    fn test_blend_fraction_is_clamped() {
        for z in [-1.0, 0.0, 0.3, 0.55, 0.8, 1.0, 7.0] {
            let t = blend_fraction(z, 0.2, 0.8);
            assert!((0.0..=1.0).contains(&t), "t = {} for z = {}", t, z);
        }
        assert!((blend_fraction(0.5, 0.2, 0.8) - 0.5).abs() < 1e-6);
        assert_eq!(blend_fraction(0.5, 0.4, 0.4), 1.0);
    }

    #[test]
    fn test_bands_from_skeleton() {
        let skeleton = fixtures::humanoid_skeleton();
        let bones = RigBones::resolve(&skeleton).unwrap();
        let bands = RegionBands::from_skeleton(&skeleton, &bones);

        assert!((bands.head_bottom - 1.20).abs() < 1e-6);
        assert!((bands.chest_top - 1.10).abs() < 1e-6);
        assert!((bands.chest_bottom - 0.80).abs() < 1e-6);
        assert!((bands.spine_bottom - 0.55).abs() < 1e-6);
        assert!((bands.hips_bottom - 0.40).abs() < 1e-6);

        assert_eq!(bands.classify(1.5, 0.08), Region::Head);
        assert_eq!(bands.classify(1.13, 0.08), Region::Head);
        assert_eq!(bands.classify(0.9, 0.08), Region::Chest);
        assert_eq!(bands.classify(0.6, 0.08), Region::Spine);
        assert_eq!(bands.classify(0.45, 0.08), Region::Hips);
        assert_eq!(bands.classify(0.40, 0.08), Region::Leg);
    }

    #[test]
    fn test_neck_sampling() {
        let tuning = ClassifyTuning::default();
        let mut mesh = Mesh::new();
        assert_eq!(sample_neck_half_width(&mesh, &tuning), 0.19);

        for x in [0.05, -0.15, 0.10, 0.30] {
            mesh.vertices.push(Vertex::at([x, 0.0, 1.15]));
        }
        // 不在颈部高度带内
        mesh.vertices.push(Vertex::at([0.9, 0.0, 0.5]));
        // 排序后 [0.05, 0.10, 0.15, 0.30]，取下标 2
        assert!((sample_neck_half_width(&mesh, &tuning) - 0.15).abs() < 1e-6);
    }

    #[test]
    fn test_body_profile_bands() {
        let tuning = ClassifyTuning::default();
        let profile = BodyProfile::new(1.10, 0.2, &tuning);

        assert!((profile.half_width(1.5) - 0.15).abs() < 1e-6);
        assert!((profile.half_width(1.10) - 0.15).abs() < 1e-6);
        // 腰部：t = 1 时加满 0.10
        assert!((profile.half_width(0.7) - 0.25).abs() < 1e-6);
        assert!((profile.half_width(0.9) - 0.20).abs() < 1e-5);
        assert!((profile.half_width(0.5) - 0.22).abs() < 1e-6);
        assert!((profile.half_width(0.1) - 0.20).abs() < 1e-6);
    }
}
