//! 核心功能模块
//!
//! 本模块提供了绑定引擎的基础功能，包括数学库、日志系统、配置管理和错误处理。
//! 这些模块与具体的绑定阶段解耦，导入端、流程和导出端都依赖它们。
//!
//! # 模块组织
//!
//! - `math`：数学库，基于 nalgebra 的向量、矩阵类型和几何函数
//! - `log`：日志系统，提供结构化的日志记录功能
//! - `config`：引擎配置，包括日志设置和全部几何常量
//! - `scene`：场景配置，描述输入模型、骨骼和输出位置
//! - `error`：错误处理，定义统一的错误类型

pub mod math;
pub mod log;
pub mod config;
pub mod scene;
pub mod error;

// 重新导出常用类型，方便使用
pub use math::{Matrix3, Matrix4, Rotation, Vector3};
pub use error::{Result, DistRigError};
pub use config::{Config, RigTuning};
pub use scene::SceneConfig;
