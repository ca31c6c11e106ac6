/// 顶点邻接图
///
/// 从无向边构建，每个顶点的邻居去重并排序。区域生长和权重平滑都在这张图上进行。

/// 顶点邻接表
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Adjacency {
    neighbors: Vec<Vec<usize>>,
}

impl Adjacency {
    /// 从边列表构建
    ///
    /// 自环和越界的边被忽略。
    pub fn from_edges(vertex_count: usize, edges: &[[u32; 2]]) -> Self {
        let mut neighbors = vec![Vec::new(); vertex_count];
        for &[a, b] in edges {
            let (a, b) = (a as usize, b as usize);
            if a == b || a >= vertex_count || b >= vertex_count {
                continue;
            }
            neighbors[a].push(b);
            neighbors[b].push(a);
        }
        for list in &mut neighbors {
            list.sort_unstable();
            list.dedup();
        }
        Self { neighbors }
    }

    #[inline]
    pub fn neighbors(&self, vertex: usize) -> &[usize] {
        &self.neighbors[vertex]
    }

    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.neighbors.len()
    }

    #[inline]
    pub fn degree(&self, vertex: usize) -> usize {
        self.neighbors[vertex].len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_edges_dedups() {
        let adjacency = Adjacency::from_edges(4, &[[0, 1], [1, 0], [1, 2], [2, 2], [3, 9]]);
        assert_eq!(adjacency.neighbors(0), &[1]);
        assert_eq!(adjacency.neighbors(1), &[0, 2]);
        assert_eq!(adjacency.degree(2), 1);
        assert!(adjacency.neighbors(3).is_empty());
    }
}
