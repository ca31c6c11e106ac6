//! 绑定校验
//!
//! 所有检查都不致命：问题记录为警告，产物照常输出。

use crate::core::config::VerifyTuning;
use crate::export::BoundMesh;
use crate::{rig_info, rig_warn};

/// 标志骨骼上可见权重的顶点数
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LandmarkCount {
    pub bone: String,
    /// 骨骼不存在时为 `None`
    pub vertices: Option<usize>,
}

/// 导出再导入后的计数
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoundTripCheck {
    pub parent: String,
    pub bones: usize,
    pub groups: usize,
    pub vertices: usize,
}

/// 校验结果
#[derive(Debug, Clone, PartialEq)]
pub struct BindingReport {
    pub bones_total: usize,
    pub bones_weighted: usize,
    pub landmarks: Vec<LandmarkCount>,
    /// 回读失败时为 `None`
    pub round_trip: Option<RoundTripCheck>,
    pub warnings: Vec<String>,
}

impl BindingReport {
    /// 有非零权重的骨骼比例
    pub fn coverage(&self) -> f32 {
        if self.bones_total == 0 {
            return 0.0;
        }
        self.bones_weighted as f32 / self.bones_total as f32
    }

    pub fn is_clean(&self) -> bool {
        self.warnings.is_empty()
    }
}

/// 绑定校验器
pub struct BindingVerifier<'a> {
    tuning: &'a VerifyTuning,
}

impl<'a> BindingVerifier<'a> {
    pub fn new(tuning: &'a VerifyTuning) -> Self {
        Self { tuning }
    }

    pub fn verify(&self, bound: &BoundMesh) -> BindingReport {
        let mut warnings = Vec::new();

        let bones_total = bound.skeleton.bone_count();
        let bones_weighted = bound.groups.nonzero_groups();
        rig_info!(
            weighted = bones_weighted,
            total = bones_total,
            "Bone coverage"
        );

        let landmarks = self.count_landmarks(bound, &mut warnings);
        let round_trip = self.round_trip(bound, &mut warnings);

        for warning in &warnings {
            rig_warn!("{}", warning);
        }

        BindingReport {
            bones_total,
            bones_weighted,
            landmarks,
            round_trip,
            warnings,
        }
    }

    fn count_landmarks(&self, bound: &BoundMesh, warnings: &mut Vec<String>) -> Vec<LandmarkCount> {
        let threshold = self.tuning.visibility_threshold;

        self.tuning
            .landmarks
            .iter()
            .map(|name| {
                let vertices = bound
                    .skeleton
                    .index_of(name)
                    .filter(|&bone| bone < bound.groups.group_count())
                    .map(|bone| bound.groups.count_above(bone, threshold));

                match vertices {
                    Some(0) => warnings.push(format!("Landmark bone '{}' has no visible weights", name)),
                    None => warnings.push(format!("Landmark bone '{}' is not in the skeleton", name)),
                    Some(count) => rig_info!(bone = name.as_str(), vertices = count, "Landmark weights"),
                }

                LandmarkCount {
                    bone: name.clone(),
                    vertices,
                }
            })
            .collect()
    }

    /// 导出到文本再读回，比较父节点和各项计数
    fn round_trip(&self, bound: &BoundMesh, warnings: &mut Vec<String>) -> Option<RoundTripCheck> {
        let back = match bound.to_toml_string().and_then(|text| BoundMesh::from_toml_str(&text)) {
            Ok(back) => back,
            Err(e) => {
                warnings.push(format!("Round-trip export failed: {}", e));
                return None;
            }
        };

        let check = RoundTripCheck {
            parent: back.parent.clone(),
            bones: back.skeleton.bone_count(),
            groups: back.groups.group_count(),
            vertices: back.mesh.vertex_count(),
        };

        if check.parent != bound.skeleton.name {
            warnings.push(format!(
                "Mesh parent is '{}', expected skeleton '{}'",
                check.parent, bound.skeleton.name
            ));
        }
        if check.bones != bound.skeleton.bone_count() {
            warnings.push(format!(
                "Bone count changed: {} -> {}",
                bound.skeleton.bone_count(),
                check.bones
            ));
        }
        if check.groups != bound.skeleton.bone_count() {
            warnings.push(format!(
                "Vertex group count {} does not match {} bones",
                check.groups,
                bound.skeleton.bone_count()
            ));
        }
        if check.vertices != bound.mesh.vertex_count() {
            warnings.push(format!(
                "Vertex count changed: {} -> {}",
                bound.mesh.vertex_count(),
                check.vertices
            ));
        }

        Some(check)
    }
}
