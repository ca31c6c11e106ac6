//! 权重精修
//!
//! 1. 手部挂点增强：每侧离挂点骨骼头部最近的若干手臂顶点额外加权，然后归一化
//! 2. 平滑：挂点骨骼锁定，其余骨骼的权重沿邻接图扩散若干次，然后再次归一化。
//!    默认次数等于非挂点骨骼的数量：每根非挂点骨骼各触发一次全组平滑。
//!
//! 归一化时总和为零的顶点回退到 root。

use crate::core::config::RefineTuning;
use crate::core::math::geometry::gaussian_falloff;
use crate::geometry::{Adjacency, Mesh};
use crate::rig::classifier::LimbSet;
use crate::rig::groups::VertexGroups;
use crate::skeleton::{RigBones, Side, Skeleton};
use crate::{rig_debug, rig_info};

/// 精修结果
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RefineReport {
    /// 每侧增强的顶点数，按 `Side::index()` 排列
    pub boosted: [usize; 2],
    /// 回退到 root 的顶点数（两次归一化合计）
    pub root_fallbacks: usize,
}

/// 权重精修器
pub struct WeightRefiner<'a> {
    skeleton: &'a Skeleton,
    bones: &'a RigBones,
    tuning: &'a RefineTuning,
}

impl<'a> WeightRefiner<'a> {
    pub fn new(skeleton: &'a Skeleton, bones: &'a RigBones, tuning: &'a RefineTuning) -> Self {
        Self {
            skeleton,
            bones,
            tuning,
        }
    }

    pub fn refine(
        &self,
        mesh: &Mesh,
        adjacency: &Adjacency,
        limbs: &LimbSet,
        groups: &mut VertexGroups,
    ) -> RefineReport {
        let mut report = RefineReport::default();

        for side in Side::BOTH {
            report.boosted[side.index()] = self.boost_attachment(mesh, limbs, groups, side);
        }
        report.root_fallbacks += groups.normalize_all(self.bones.root);

        let passes = self.smooth_passes();
        for _ in 0..passes {
            self.smooth(adjacency, groups);
        }
        report.root_fallbacks += groups.normalize_all(self.bones.root);

        rig_info!(
            boosted_left = report.boosted[Side::Left.index()],
            boosted_right = report.boosted[Side::Right.index()],
            passes,
            root_fallbacks = report.root_fallbacks,
            "Weights refined"
        );
        report
    }

    /// 平滑次数：配置值，或骨骼数减去挂点骨骼数
    pub fn smooth_passes(&self) -> u32 {
        self.tuning.smooth_passes.unwrap_or_else(|| {
            let locked = self.bones.attachment_bones().len();
            self.skeleton.bone_count().saturating_sub(locked) as u32
        })
    }

    /// 离挂点骨骼头部最近的 N 个手臂顶点加上 max(floor, gaussian(d))
    fn boost_attachment(&self, mesh: &Mesh, limbs: &LimbSet, groups: &mut VertexGroups, side: Side) -> usize {
        let slot = self.bones.hand_slot(side);
        let anchor = self.skeleton.bones[slot].head;

        let mut candidates: Vec<(usize, f32)> = limbs
            .vertices(side)
            .into_iter()
            .map(|i| (i, (mesh.position(i) - anchor).norm()))
            .collect();
        candidates.sort_by(|a, b| a.1.total_cmp(&b.1));
        candidates.truncate(self.tuning.attach_count);

        for &(i, d) in &candidates {
            let w = gaussian_falloff(d, self.tuning.attach_sigma).max(self.tuning.attach_floor);
            groups.add(slot, i, w);
        }

        rig_debug!(
            bone = self.skeleton.bones[slot].name.as_str(),
            vertices = candidates.len(),
            "Attachment weights boosted"
        );
        candidates.len()
    }

    /// 一次雅可比扩散：w' = (1 - f)·w + f·mean(neighbors)
    ///
    /// 挂点骨骼锁定不变；没有邻居的顶点保持原值。
    fn smooth(&self, adjacency: &Adjacency, groups: &mut VertexGroups) {
        let locked = self.bones.attachment_bones();
        let f = self.tuning.smooth_factor;

        for bone in 0..groups.group_count() {
            if locked.contains(&bone) || groups.group(bone).is_empty() {
                continue;
            }

            let current = groups.dense(bone);
            let smoothed: Vec<f32> = current
                .iter()
                .enumerate()
                .map(|(i, &w)| {
                    let neighbors = adjacency.neighbors(i);
                    if neighbors.is_empty() {
                        return w;
                    }
                    let mean = neighbors.iter().map(|&n| current[n]).sum::<f32>() / neighbors.len() as f32;
                    (1.0 - f) * w + f * mean
                })
                .collect();
            groups.replace_dense(bone, &smoothed);
        }
    }
}
