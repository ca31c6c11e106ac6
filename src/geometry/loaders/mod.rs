/// 模型加载器模块
///
/// 导入端适配器：把外部文件转换成网格片段。绑定流程本身不做文件 IO。
///
/// # 支持的格式
///
/// - **OBJ**: Wavefront OBJ 格式（使用 tobj crate）
///
/// # 使用示例
///
/// ```rust,no_run
/// use dist_rig::geometry::loaders::{MeshLoader, ObjLoader};
/// use std::path::Path;
///
/// let fragments = ObjLoader::load_from_file(Path::new("model.obj"))?;
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
use crate::core::error::{MeshLoadError, Result};
use crate::geometry::mesh::MeshFragment;
use std::path::Path;

pub mod obj_loader;

pub use obj_loader::ObjLoader;

/// 网格加载器 trait
///
/// 加载器是无状态的，返回 CPU 侧的网格片段列表。
pub trait MeshLoader {
    /// 从文件路径加载网格片段
    ///
    /// # 错误
    ///
    /// - 文件不存在或无法读取
    /// - 文件格式错误或损坏
    fn load_from_file(path: &Path) -> Result<Vec<MeshFragment>>;

    /// 从内存数据加载网格片段
    fn load_from_memory(data: &[u8]) -> Result<Vec<MeshFragment>>;

    /// 支持的文件扩展名列表（小写，不含点号）
    fn supported_extensions() -> &'static [&'static str];
}

/// 根据文件扩展名选择合适的加载器
pub fn load_fragments(path: &Path) -> Result<Vec<MeshFragment>> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
        .ok_or_else(|| MeshLoadError::UnsupportedFormat("无法确定文件扩展名".to_string()))?;

    if ObjLoader::supported_extensions().contains(&extension.as_str()) {
        ObjLoader::load_from_file(path)
    } else {
        Err(MeshLoadError::UnsupportedFormat(format!("不支持的文件格式: .{}", extension)).into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::DistRigError;

    #[test]
    fn test_supported_extensions() {
        assert!(ObjLoader::supported_extensions().contains(&"obj"));
    }

    #[test]
    fn test_unsupported_extension() {
        let result = load_fragments(Path::new("model.fbx"));
        assert!(matches!(
            result,
            Err(DistRigError::MeshLoading(MeshLoadError::UnsupportedFormat(_)))
        ));
    }
}
