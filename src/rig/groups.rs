//! 顶点组（蒙皮权重）
//!
//! 每根骨骼一个稀疏映射：顶点索引 → 权重。组的顺序与骨骼顺序一致。

use std::collections::BTreeMap;

/// 按骨骼索引排列的顶点组
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VertexGroups {
    vertex_count: usize,
    groups: Vec<BTreeMap<u32, f32>>,
}

impl VertexGroups {
    /// 为 `group_count` 根骨骼创建空的顶点组
    pub fn new(group_count: usize, vertex_count: usize) -> Self {
        Self {
            vertex_count,
            groups: vec![BTreeMap::new(); group_count],
        }
    }

    #[inline]
    pub fn group_count(&self) -> usize {
        self.groups.len()
    }

    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.vertex_count
    }

    /// 单根骨骼的顶点组
    #[inline]
    pub fn group(&self, bone: usize) -> &BTreeMap<u32, f32> {
        &self.groups[bone]
    }

    /// 覆盖写入权重
    pub fn set(&mut self, bone: usize, vertex: usize, weight: f32) {
        self.groups[bone].insert(vertex as u32, weight);
    }

    /// 累加权重
    pub fn add(&mut self, bone: usize, vertex: usize, weight: f32) {
        *self.groups[bone].entry(vertex as u32).or_insert(0.0) += weight;
    }

    #[inline]
    pub fn get(&self, bone: usize, vertex: usize) -> f32 {
        self.groups[bone].get(&(vertex as u32)).copied().unwrap_or(0.0)
    }

    /// 单个顶点的全部非零权重 (骨骼, 权重)
    pub fn vertex_weights(&self, vertex: usize) -> Vec<(usize, f32)> {
        let key = vertex as u32;
        self.groups
            .iter()
            .enumerate()
            .filter_map(|(bone, group)| group.get(&key).map(|&w| (bone, w)))
            .filter(|&(_, w)| w > 0.0)
            .collect()
    }

    pub fn vertex_sum(&self, vertex: usize) -> f32 {
        self.vertex_weights(vertex).iter().map(|&(_, w)| w).sum()
    }

    /// 所有顶点的权重和
    pub fn vertex_sums(&self) -> Vec<f32> {
        let mut sums = vec![0.0f32; self.vertex_count];
        for group in &self.groups {
            for (&vertex, &weight) in group {
                if let Some(sum) = sums.get_mut(vertex as usize) {
                    *sum += weight;
                }
            }
        }
        sums
    }

    /// 每个顶点的权重除以其总和，零权重被移除
    ///
    /// 总和为零的顶点回退为 `fallback` 骨骼权重 1.0。返回回退的顶点数。
    pub fn normalize_all(&mut self, fallback: usize) -> usize {
        let sums = self.vertex_sums();

        for group in &mut self.groups {
            group.retain(|&vertex, weight| {
                let sum = sums.get(vertex as usize).copied().unwrap_or(0.0);
                if sum > 0.0 {
                    *weight /= sum;
                }
                *weight > 0.0
            });
        }

        let mut fallbacks = 0;
        for (vertex, &sum) in sums.iter().enumerate() {
            if sum <= 0.0 {
                self.set(fallback, vertex, 1.0);
                fallbacks += 1;
            }
        }
        fallbacks
    }

    /// 单根骨骼的稠密权重数组
    pub fn dense(&self, bone: usize) -> Vec<f32> {
        let mut weights = vec![0.0; self.vertex_count];
        for (&vertex, &weight) in &self.groups[bone] {
            weights[vertex as usize] = weight;
        }
        weights
    }

    /// 用稠密数组替换单根骨骼的权重，只保留正值
    pub fn replace_dense(&mut self, bone: usize, weights: &[f32]) {
        self.groups[bone] = weights
            .iter()
            .enumerate()
            .filter(|&(_, &w)| w > 0.0)
            .map(|(vertex, &w)| (vertex as u32, w))
            .collect();
    }

    /// 至少有一个非零权重的骨骼数
    pub fn nonzero_groups(&self) -> usize {
        self.groups
            .iter()
            .filter(|group| group.values().any(|&w| w > 0.0))
            .count()
    }

    /// 单根骨骼上权重高于阈值的顶点数
    pub fn count_above(&self, bone: usize, threshold: f32) -> usize {
        self.groups[bone].values().filter(|&&w| w > threshold).count()
    }

    /// 所有条目的数量
    pub fn entry_count(&self) -> usize {
        self.groups.iter().map(|g| g.len()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_add_get() {
        let mut groups = VertexGroups::new(3, 4);
        groups.set(1, 2, 0.25);
        groups.add(1, 2, 0.5);
        groups.add(2, 2, 0.25);

        assert!((groups.get(1, 2) - 0.75).abs() < 1e-6);
        assert_eq!(groups.get(0, 2), 0.0);
        assert_eq!(groups.vertex_weights(2), vec![(1, 0.75), (2, 0.25)]);
        assert!((groups.vertex_sum(2) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_normalize_all_with_fallback() {
        let mut groups = VertexGroups::new(3, 3);
        groups.set(1, 0, 2.0);
        groups.set(2, 0, 6.0);
        groups.set(2, 1, 0.0);

        let fallbacks = groups.normalize_all(0);
        assert_eq!(fallbacks, 2);
        assert!((groups.get(1, 0) - 0.25).abs() < 1e-6);
        assert!((groups.get(2, 0) - 0.75).abs() < 1e-6);
        // 零权重顶点只剩 root
        assert_eq!(groups.vertex_weights(1), vec![(0, 1.0)]);
        assert_eq!(groups.vertex_weights(2), vec![(0, 1.0)]);
    }

    #[test]
    fn test_dense_round_trip() {
        let mut groups = VertexGroups::new(2, 4);
        groups.replace_dense(1, &[0.0, 0.5, 0.0, 1.0]);
        assert_eq!(groups.group(1).len(), 2);
        assert_eq!(groups.dense(1), vec![0.0, 0.5, 0.0, 1.0]);
        assert_eq!(groups.nonzero_groups(), 1);
        assert_eq!(groups.count_above(1, 0.6), 1);
        assert_eq!(groups.entry_count(), 2);
    }
}
