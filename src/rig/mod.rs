//! 自动蒙皮绑定模块
//!
//! 把任意人形网格绑定到固定的目标骨骼。
//!
//! # 流程
//!
//! ```text
//! Vec<MeshFragment> + Skeleton
//!     ↓
//! MeshNormalizer   展平变换、合并、居中、缩放到目标高度
//!     ↓
//! LimbClassifier   区域生长分出左右手臂
//!     ↓
//! PoseRetargeter   手臂绕肩关节转到 T-pose
//!     ↓
//! WeightAssigner   按区域规则和距离核计算权重
//!     ↓
//! WeightRefiner    挂点增强、平滑、归一化
//!     ↓
//! BindingVerifier  覆盖率与回读校验（只产生警告）
//!     ↓
//! BoundMesh
//! ```
//!
//! 坐标约定：Z 轴向上，+X 为角色左侧。

pub mod params;
pub mod groups;
pub mod normalizer;
pub mod classifier;
pub mod retarget;
pub mod weights;
pub mod refiner;
pub mod verifier;
pub mod pipeline;

#[cfg(test)]
pub(crate) mod fixtures;

pub use classifier::{LimbClassifier, LimbSet};
pub use groups::VertexGroups;
pub use normalizer::{MeshNormalizer, NormalizeReport};
pub use params::{BodyProfile, CanonicalPoseParams, RegionBands};
pub use pipeline::{RigOutput, RigPipeline};
pub use refiner::WeightRefiner;
pub use retarget::PoseRetargeter;
pub use verifier::{BindingReport, BindingVerifier};
pub use weights::WeightAssigner;
