//! DistRig - 人形网格自动蒙皮绑定
//!
//! 给定任意人形表面网格和一套固定的目标骨骼，计算每个顶点的骨骼权重，
//! 并把手臂重定向到标准 T-pose，使网格可以直接由该骨骼的动画驱动。
//!
//! # 模块结构
//!
//! - `core`: 核心功能模块（数学、日志、配置、错误处理）
//! - `geometry`: 网格数据结构与 OBJ 加载器
//! - `skeleton`: 目标骨骼与区域骨骼表
//! - `rig`: 绑定流程的各个阶段
//! - `export`: 绑定产物的导出与回读
//!
//! # 使用示例
//!
//! ```no_run
//! use dist_rig::geometry::loaders::load_fragments;
//! use dist_rig::rig::RigPipeline;
//! use dist_rig::skeleton::Skeleton;
//! use std::path::Path;
//!
//! let fragments = load_fragments(Path::new("character.obj"))?;
//! let skeleton = Skeleton::from_file("assets/skeletons/humanoid_medium.toml")?;
//!
//! let output = RigPipeline::default().run(fragments, skeleton, "Character")?;
//! output.bound.save_to_file("character_bound.toml")?;
//! # Ok::<(), dist_rig::core::DistRigError>(())
//! ```

pub mod core;
pub mod geometry;
pub mod skeleton;
pub mod rig;
pub mod export;
