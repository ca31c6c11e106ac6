//! 权重分配
//!
//! 手臂顶点对手臂链做高斯核；其他顶点按高度区域套用固定的混合规则。
//!
//! | 区域 | 规则 |
//! |------|------|
//! | 手臂 | 手臂链五根骨骼各自的高斯核，外加 0.2 倍的 chest 核 |
//! | 头部 | head = t，chest/spine 分享 1 - t |
//! | 胸部 | chest 从 0.5 过渡到 1.0，spine 相反 |
//! | 脊柱 | spine 0.5 → 1.0，hips 淡出，chest 淡入 |
//! | 髋部 | hips 0.6 → 0.8，root 淡出；偏外侧时加上同侧大腿 |
//! | 腿部 | 同侧腿链；中线附近两侧按 x 混合；靠近髋部时加上 hips |

use crate::core::config::WeightTuning;
use crate::core::math::geometry::gaussian_falloff;
use crate::core::math::utils::{clamp, saturate};
use crate::core::math::Vector3;
use crate::geometry::Mesh;
use crate::rig::classifier::LimbSet;
use crate::rig::groups::VertexGroups;
use crate::rig::params::{blend_fraction, Region, RegionBands};
use crate::rig_info;
use crate::skeleton::table::TOES;
use crate::skeleton::{RigBones, Side, Skeleton};

/// 单个顶点的原始权重（骨骼索引, 权重）
pub type RawWeights = Vec<(usize, f32)>;

/// 权重分配器
pub struct WeightAssigner<'a> {
    skeleton: &'a Skeleton,
    bones: &'a RigBones,
    bands: RegionBands,
    tuning: &'a WeightTuning,
}

impl<'a> WeightAssigner<'a> {
    pub fn new(skeleton: &'a Skeleton, bones: &'a RigBones, bands: RegionBands, tuning: &'a WeightTuning) -> Self {
        Self {
            skeleton,
            bones,
            bands,
            tuning,
        }
    }

    /// 为每个顶点计算归一化的权重
    pub fn assign(&self, mesh: &Mesh, limbs: &LimbSet) -> VertexGroups {
        let mut groups = VertexGroups::new(self.skeleton.bone_count(), mesh.vertex_count());
        let mut fallbacks = 0;

        for (i, vertex) in mesh.vertices.iter().enumerate() {
            let raw = self.raw_weights(&vertex.pos(), limbs.side_of(i));
            let normalized = self.normalize(raw);
            if normalized.is_empty() {
                groups.set(self.bones.root, i, 1.0);
                fallbacks += 1;
                continue;
            }
            for (bone, weight) in normalized {
                groups.set(bone, i, weight);
            }
        }

        rig_info!(
            vertices = mesh.vertex_count(),
            entries = groups.entry_count(),
            root_fallbacks = fallbacks,
            "Weights assigned"
        );
        groups
    }

    /// 除以总和并丢弃过小的权重；总和为零时返回空
    pub fn normalize(&self, raw: RawWeights) -> RawWeights {
        let total: f32 = raw.iter().map(|&(_, w)| w).sum();
        if total <= 0.0 {
            return Vec::new();
        }
        raw.into_iter()
            .map(|(bone, w)| (bone, w / total))
            .filter(|&(_, w)| w > self.tuning.min_weight)
            .collect()
    }

    /// 未归一化的权重
    pub fn raw_weights(&self, p: &Vector3, arm: Option<Side>) -> RawWeights {
        if let Some(side) = arm {
            return self.arm_weights(p, side);
        }

        let t = self.tuning;
        let b = self.bones;
        let bands = &self.bands;
        let z = p.z;

        match bands.classify(z, t.head_margin) {
            Region::Head => {
                let lo = bands.head_bottom - t.head_margin;
                let f = blend_fraction(z, lo, lo + t.head_transition);
                vec![
                    (b.head, f),
                    (b.chest, (1.0 - f) * t.head_chest_share),
                    (b.spine, (1.0 - f) * (1.0 - t.head_chest_share)),
                ]
            }
            Region::Chest => {
                let f = blend_fraction(z, bands.chest_bottom, bands.chest_top);
                vec![(b.chest, 0.5 + 0.5 * f), (b.spine, 0.5 - 0.5 * f)]
            }
            Region::Spine => {
                let f = blend_fraction(z, bands.spine_bottom, bands.chest_bottom);
                vec![
                    (b.spine, 0.5 + 0.5 * f),
                    (b.hips, 0.3 * (1.0 - f)),
                    (b.chest, 0.2 * f),
                ]
            }
            Region::Hips => {
                let f = blend_fraction(z, bands.hips_bottom, bands.spine_bottom);
                let mut weights = vec![
                    (b.hips, 0.6 + 0.2 * f),
                    (b.spine, 0.2 * f),
                    (b.root, 0.2 * (1.0 - f)),
                ];
                if p.x.abs() > t.hip_leg_offset {
                    let leg = b.upper_leg(Side::from_x(p.x));
                    let d = self.skeleton.bones[leg].distance_to(p);
                    weights.push((leg, gaussian_falloff(d, t.hip_leg_sigma) * t.hip_leg_factor));
                }
                weights
            }
            Region::Leg => self.leg_weights(p),
        }
    }

    fn arm_weights(&self, p: &Vector3, side: Side) -> RawWeights {
        let t = self.tuning;
        let mut weights: RawWeights = self
            .bones
            .arm(side)
            .iter()
            .zip(t.arm_sigmas)
            .map(|(&bone, sigma)| (bone, self.kernel(bone, p, sigma)))
            .filter(|&(_, w)| w > t.kernel_cutoff)
            .collect();

        let chest = self.kernel(self.bones.chest, p, t.shoulder_sigma) * t.shoulder_chest_factor;
        if chest > t.kernel_cutoff {
            weights.push((self.bones.chest, chest));
        }
        weights
    }

    fn leg_weights(&self, p: &Vector3) -> RawWeights {
        let t = self.tuning;
        let mut weights = RawWeights::new();

        if p.x.abs() < t.leg_midline {
            for side in Side::BOTH {
                let blend = clamp(
                    0.5 + side.sign() * p.x / t.leg_blend_width,
                    t.leg_blend_clamp[0],
                    t.leg_blend_clamp[1],
                );
                self.push_leg_chain(&mut weights, p, side, blend);
            }
        } else {
            self.push_leg_chain(&mut weights, p, Side::from_x(p.x), 1.0);
        }

        let fade_start = self.bands.hips_bottom - t.hip_fade_margin;
        if p.z > fade_start {
            let fade = saturate((p.z - fade_start) / t.hip_fade_margin);
            weights.push((self.bones.hips, fade * t.hip_fade_factor));
        }
        weights
    }

    fn push_leg_chain(&self, weights: &mut RawWeights, p: &Vector3, side: Side, blend: f32) {
        let t = self.tuning;
        for (slot, &bone) in self.bones.leg(side).iter().enumerate() {
            let sigma = if slot == TOES { t.toes_sigma } else { t.leg_sigma };
            let w = self.kernel(bone, p, sigma) * blend;
            if w > t.kernel_cutoff {
                weights.push((bone, w));
            }
        }
    }

    #[inline]
    fn kernel(&self, bone: usize, p: &Vector3, sigma: f32) -> f32 {
        gaussian_falloff(self.skeleton.bones[bone].distance_to(p), sigma)
    }
}
