/// 几何体模块
///
/// 提供网格数据结构、邻接图以及导入端的模型加载器。
///
/// # 模块结构
///
/// - `vertex`: 顶点数据结构定义
/// - `mesh`: 网格片段、合并后的网格、包围盒
/// - `adjacency`: 顶点邻接图
/// - `loaders`: 各种格式的模型加载器
///
/// # 架构设计
///
/// ```text
/// 文件 (OBJ)
///     ↓
/// Loader (ObjLoader)
///     ↓
/// Vec<MeshFragment> (带世界变换)
///     ↓
/// MeshNormalizer (展平、合并)
///     ↓
/// Mesh
/// ```

pub mod vertex;
pub mod mesh;
pub mod adjacency;
pub mod loaders;

// 重新导出常用类型
pub use vertex::Vertex;
pub use mesh::{Aabb, Mesh, MeshFragment};
pub use adjacency::Adjacency;
