//! 导出模块
//!
//! 绑定流程的出口适配器：把 [`BoundMesh`] 写成 TOML 产物，也能读回用于校验。
//!
//! # 文件格式
//!
//! ```toml
//! name = "Character"
//! parent = "Rig_Medium"
//! positions = [[0.0, 0.0, 0.5], ...]
//! normals = [...]
//! texcoords = [...]
//! indices = [...]
//! edges = [[0, 1], ...]
//!
//! [skeleton]
//! name = "Rig_Medium"
//!
//! [[skeleton.bones]]
//! name = "root"
//! head = [0.0, 0.0, 0.0]
//! tail = [0.0, 0.0, 0.1]
//!
//! [[groups]]
//! bone = "root"
//! vertices = [12, 13]
//! weights = [0.2, 0.15]
//! ```

pub mod artifact;

pub use artifact::BoundMesh;
