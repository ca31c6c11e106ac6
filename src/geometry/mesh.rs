/// 网格数据结构模块
///
/// 定义导入端交来的网格片段和流程内部使用的单一索引网格。
/// 顶点和边都是扁平的索引数组。

use super::adjacency::Adjacency;
use super::vertex::Vertex;
use crate::core::math::{to_vector, Matrix4, Vector3};

/// 导入的网格片段
///
/// 一个模型文件可能包含多个片段，每个片段有自己的世界变换。
/// 在流程开始前由归一化阶段展平变换并合并。
#[derive(Debug, Clone)]
pub struct MeshFragment {
    /// 片段名称（可选）
    pub name: Option<String>,

    /// 局部空间顶点
    pub vertices: Vec<Vertex>,

    /// 三角形索引（透传给导出端）
    pub indices: Vec<u32>,

    /// 边（无序顶点对）
    ///
    /// 为空时由三角形推导。
    pub edges: Vec<[u32; 2]>,

    /// 世界变换
    pub transform: Matrix4,
}

impl MeshFragment {
    pub fn new(vertices: Vec<Vertex>, indices: Vec<u32>, edges: Vec<[u32; 2]>) -> Self {
        Self {
            name: None,
            vertices,
            indices,
            edges,
            transform: Matrix4::identity(),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_transform(mut self, transform: Matrix4) -> Self {
        self.transform = transform;
        self
    }

    /// 片段的边；没有显式边时从三角形推导
    pub fn resolved_edges(&self) -> Vec<[u32; 2]> {
        if self.edges.is_empty() {
            edges_from_triangles(&self.indices)
        } else {
            self.edges.clone()
        }
    }
}

/// 轴对齐包围盒
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vector3,
    pub max: Vector3,
}

impl Aabb {
    /// 包围一组点，点集为空时返回 `None`
    pub fn from_points<I>(points: I) -> Option<Self>
    where
        I: IntoIterator<Item = Vector3>,
    {
        let mut iter = points.into_iter();
        let first = iter.next()?;
        let (min, max) = iter.fold((first, first), |(lo, hi), p| (lo.inf(&p), hi.sup(&p)));
        Some(Self { min, max })
    }

    #[inline]
    pub fn height(&self) -> f32 {
        self.max.z - self.min.z
    }
}

/// 单一索引网格
///
/// 世界变换已经展平，所有片段已经合并。
#[derive(Debug, Clone, Default)]
pub struct Mesh {
    /// 网格名称（可选）
    pub name: Option<String>,

    /// 顶点数组
    pub vertices: Vec<Vertex>,

    /// 三角形索引
    pub indices: Vec<u32>,

    /// 边（无序顶点对）
    pub edges: Vec<[u32; 2]>,
}

impl Mesh {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_name(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Default::default()
        }
    }

    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    #[inline]
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    #[inline]
    pub fn position(&self, index: usize) -> Vector3 {
        to_vector(self.vertices[index].position)
    }

    pub fn positions(&self) -> impl Iterator<Item = Vector3> + '_ {
        self.vertices.iter().map(|v| to_vector(v.position))
    }

    /// 包围盒，空网格返回 `None`
    pub fn bounds(&self) -> Option<Aabb> {
        Aabb::from_points(self.positions())
    }

    /// 顶点邻接图
    pub fn adjacency(&self) -> Adjacency {
        Adjacency::from_edges(self.vertex_count(), &self.edges)
    }

    /// 验证网格数据的有效性
    ///
    /// 检查：
    /// - 索引数量是3的倍数
    /// - 所有索引和边端点都在有效范围内
    pub fn validate(&self) -> Result<(), String> {
        if self.indices.len() % 3 != 0 {
            return Err(format!(
                "索引数量必须是3的倍数，当前为: {}",
                self.indices.len()
            ));
        }

        let vertex_count = self.vertices.len() as u32;
        if let Some((i, &index)) = self.indices.iter().enumerate().find(|&(_, &idx)| idx >= vertex_count) {
            return Err(format!(
                "索引 {} 处的值 {} 超出顶点范围 (共 {} 个顶点)",
                i, index, vertex_count
            ));
        }

        if let Some((i, edge)) = self.edges.iter().enumerate().find(|(_, e)| e[0] >= vertex_count || e[1] >= vertex_count) {
            return Err(format!(
                "边 {} ({}, {}) 超出顶点范围 (共 {} 个顶点)",
                i, edge[0], edge[1], vertex_count
            ));
        }

        Ok(())
    }
}

/// 从三角形索引推导唯一的无向边
///
/// 每条边以 `[小, 大]` 形式出现一次，按顺序排列。
pub fn edges_from_triangles(indices: &[u32]) -> Vec<[u32; 2]> {
    let mut edges: Vec<[u32; 2]> = indices
        .chunks_exact(3)
        .flat_map(|t| [[t[0], t[1]], [t[1], t[2]], [t[2], t[0]]])
        .filter(|e| e[0] != e[1])
        .map(|e| [e[0].min(e[1]), e[0].max(e[1])])
        .collect();
    edges.sort_unstable();
    edges.dedup();
    edges
}
