//! 绑定流程
//!
//! 按顺序执行各阶段。网格的所有权从输入片段一路传到输出产物，流程本身不做文件 IO。

use crate::core::config::RigTuning;
use crate::core::error::Result;
use crate::export::BoundMesh;
use crate::geometry::MeshFragment;
use crate::rig::classifier::{LimbClassifier, LimbSet};
use crate::rig::normalizer::{MeshNormalizer, NormalizeReport};
use crate::rig::params::CanonicalPoseParams;
use crate::rig::refiner::{RefineReport, WeightRefiner};
use crate::rig::retarget::{PoseRetargeter, RetargetReport};
use crate::rig::verifier::{BindingReport, BindingVerifier};
use crate::rig::weights::WeightAssigner;
use crate::skeleton::{RigBones, Side, Skeleton};
use crate::{rig_info, stage_span};

/// 一次绑定运行的输出
#[derive(Debug)]
pub struct RigOutput {
    pub bound: BoundMesh,
    pub params: CanonicalPoseParams,
    pub limbs: LimbSet,
    pub normalize: NormalizeReport,
    pub retarget: RetargetReport,
    pub refine: RefineReport,
    pub verify: BindingReport,
}

/// 绑定流程
pub struct RigPipeline {
    tuning: RigTuning,
}

impl RigPipeline {
    pub fn new(tuning: RigTuning) -> Self {
        Self { tuning }
    }

    pub fn tuning(&self) -> &RigTuning {
        &self.tuning
    }

    /// 把片段绑定到骨骼
    ///
    /// 骨骼缺少区域表需要的骨骼、或者没有任何片段时返回错误；其余问题只产生警告。
    pub fn run(&self, fragments: Vec<MeshFragment>, skeleton: Skeleton, name: &str) -> Result<RigOutput> {
        let tuning = &self.tuning;
        let bones = RigBones::resolve(&skeleton)?;
        rig_info!(
            skeleton = skeleton.name.as_str(),
            bones = skeleton.bone_count(),
            height = skeleton.height(),
            "Skeleton resolved"
        );

        let (mut mesh, normalize) = {
            let _span = stage_span!("normalize").entered();
            MeshNormalizer::new(&tuning.normalize).run(fragments)?
        };
        mesh.name = Some(name.to_string());

        let params = CanonicalPoseParams::derive(&skeleton, &bones, &mesh, tuning);
        rig_info!(
            shoulder_z = params.shoulder_z,
            neck_half_width = params.neck_half_width,
            "Canonical pose parameters"
        );
        let adjacency = mesh.adjacency();

        let limbs = {
            let _span = stage_span!("classify").entered();
            let profile = params.body_profile(&tuning.classify);
            LimbClassifier::new(&tuning.classify).classify(&mesh, &adjacency, &profile)
        };

        let retarget = {
            let _span = stage_span!("retarget").entered();
            PoseRetargeter::new(&tuning.retarget).retarget(&mut mesh, &limbs, &skeleton, &bones)
        };

        let mut groups = {
            let _span = stage_span!("weights").entered();
            WeightAssigner::new(&skeleton, &bones, params.bands, &tuning.weights).assign(&mesh, &limbs)
        };

        let refine = {
            let _span = stage_span!("refine").entered();
            WeightRefiner::new(&skeleton, &bones, &tuning.refine).refine(&mesh, &adjacency, &limbs, &mut groups)
        };

        let bound = BoundMesh::new(mesh, skeleton, groups);
        let verify = {
            let _span = stage_span!("verify").entered();
            BindingVerifier::new(&tuning.verify).verify(&bound)
        };

        rig_info!(
            mesh = bound.name(),
            parent = bound.parent.as_str(),
            vertices = bound.mesh.vertex_count(),
            left_arm = limbs.count(Side::Left),
            right_arm = limbs.count(Side::Right),
            coverage = verify.coverage(),
            warnings = verify.warnings.len(),
            "Binding complete"
        );

        Ok(RigOutput {
            bound,
            params,
            limbs,
            normalize,
            retarget,
            refine,
            verify,
        })
    }
}

impl Default for RigPipeline {
    fn default() -> Self {
        Self::new(RigTuning::default())
    }
}
