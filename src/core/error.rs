//! 错误处理模块
//!
//! 定义了绑定流程中使用的统一错误类型，使用 `thiserror` 提供友好的错误消息。
//!
//! # 设计原则
//!
//! - 只有真正无法继续的情况才返回错误（缺失骨骼、没有网格）
//! - 可恢复的情况（高度过小、手臂过短、零权重）由默认值处理，不产生错误
//! - 校验失败只记录警告，不会阻止输出

use std::path::PathBuf;
use thiserror::Error;

/// 统一的 Result 类型
pub type Result<T> = std::result::Result<T, DistRigError>;

/// DistRig 的错误类型
#[derive(Debug, Error)]
pub enum DistRigError {
    /// 配置错误
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// 网格加载错误
    #[error("Mesh loading error: {0}")]
    MeshLoading(#[from] MeshLoadError),

    /// 骨骼错误
    #[error("Skeleton error: {0}")]
    Skeleton(#[from] SkeletonError),

    /// 导出错误
    #[error("Export error: {0}")]
    Export(#[from] ExportError),

    /// 导入后没有找到任何网格片段
    #[error("No mesh fragments to bind")]
    NoMeshFragments,

    /// IO 错误
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// 配置相关的错误
#[derive(Debug, Error)]
pub enum ConfigError {
    /// 配置文件未找到
    #[error("Config file not found: {0}")]
    FileNotFound(String),

    /// 配置文件解析失败
    #[error("Failed to parse config: {0}")]
    ParseError(String),

    /// 配置值无效
    #[error("Invalid value for '{field}': {reason}")]
    InvalidValue { field: String, reason: String },
}

/// 网格加载相关的错误
#[derive(Debug, Error)]
pub enum MeshLoadError {
    /// 文件不存在
    #[error("Mesh file not found: {}", .0.display())]
    FileNotFound(PathBuf),

    /// 不支持的文件格式
    #[error("Unsupported mesh format: {0}")]
    UnsupportedFormat(String),

    /// 解析失败
    #[error("Failed to parse mesh: {0}")]
    ParseError(String),

    /// 几何数据无效
    #[error("Invalid geometry data: {0}")]
    InvalidGeometry(String),
}

/// 骨骼相关的错误
#[derive(Debug, Error)]
pub enum SkeletonError {
    /// 骨骼文件未找到
    #[error("Skeleton file not found: {}", .0.display())]
    FileNotFound(PathBuf),

    /// 骨骼文件解析失败
    #[error("Failed to parse skeleton: {0}")]
    ParseError(String),

    /// 区域表要求的骨骼不存在
    #[error("Skeleton is missing required bone '{0}'")]
    MissingBone(String),

    /// 骨骼名称重复
    #[error("Duplicate bone name '{0}'")]
    DuplicateBone(String),
}

/// 导出/回读相关的错误
#[derive(Debug, Error)]
pub enum ExportError {
    /// 序列化失败
    #[error("Failed to serialize artifact: {0}")]
    Serialize(String),

    /// 反序列化失败
    #[error("Failed to read artifact back: {0}")]
    Deserialize(String),

    /// 产物内容不一致
    #[error("Inconsistent artifact: {0}")]
    Inconsistent(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_bone_message() {
        let err: DistRigError = SkeletonError::MissingBone("handslot.l".to_string()).into();
        assert_eq!(
            err.to_string(),
            "Skeleton error: Skeleton is missing required bone 'handslot.l'"
        );
    }

    #[test]
    fn test_io_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err: DistRigError = io.into();
        assert!(matches!(err, DistRigError::Io(_)));
    }
}
