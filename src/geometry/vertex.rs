/// 顶点定义模块
///
/// 绑定流程只读写位置；法线和UV原样透传给导出端。

use crate::core::math::{to_vector, Vector3};

/// 网格顶点
///
/// # 示例
///
/// ```rust
/// use dist_rig::geometry::vertex::Vertex;
///
/// let vertex = Vertex::new([0.0, 1.0, 0.0], [0.0, 1.0, 0.0], [0.5, 0.5]);
/// ```
#[derive(Default, Clone, Copy, Debug, PartialEq)]
pub struct Vertex {
    /// 顶点位置 (x, y, z)
    pub position: [f32; 3],

    /// 法线向量 (nx, ny, nz)
    pub normal: [f32; 3],

    /// 纹理坐标 (u, v)
    pub texcoord: [f32; 2],
}

impl Vertex {
    /// 创建一个新的顶点
    #[inline]
    pub fn new(position: [f32; 3], normal: [f32; 3], texcoord: [f32; 2]) -> Self {
        Self {
            position,
            normal,
            texcoord,
        }
    }

    /// 只有位置的顶点
    #[inline]
    pub fn at(position: [f32; 3]) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }

    #[inline]
    pub fn pos(&self) -> Vector3 {
        to_vector(self.position)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vertex_creation() {
        let vertex = Vertex::new([1.0, 2.0, 3.0], [0.0, 1.0, 0.0], [0.5, 0.5]);

        assert_eq!(vertex.position, [1.0, 2.0, 3.0]);
        assert_eq!(vertex.normal, [0.0, 1.0, 0.0]);
        assert_eq!(vertex.texcoord, [0.5, 0.5]);
        assert_eq!(vertex.pos(), Vector3::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn test_vertex_at() {
        let vertex = Vertex::at([0.1, 0.2, 0.3]);
        assert_eq!(vertex.normal, [0.0, 0.0, 0.0]);
        assert_eq!(vertex.texcoord, [0.0, 0.0]);
    }
}
