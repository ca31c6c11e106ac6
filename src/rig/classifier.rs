//! 手臂分类
//!
//! 身体半宽剖面之外的顶点作为种子，再沿邻接图做广度优先的区域生长。
//! 其余顶点（躯干、头、腿）留给权重阶段按高度分区。

use std::collections::VecDeque;

use crate::core::config::ClassifyTuning;
use crate::geometry::{Adjacency, Mesh};
use crate::rig::params::BodyProfile;
use crate::rig_info;
use crate::skeleton::Side;

/// 左右手臂的顶点集合
///
/// 每个顶点最多一个侧标签，两侧天然不相交。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LimbSet {
    labels: Vec<Option<Side>>,
}

impl LimbSet {
    pub fn new(vertex_count: usize) -> Self {
        Self {
            labels: vec![None; vertex_count],
        }
    }

    #[inline]
    pub fn side_of(&self, vertex: usize) -> Option<Side> {
        self.labels.get(vertex).copied().flatten()
    }

    #[inline]
    pub fn is_arm(&self, vertex: usize) -> bool {
        self.side_of(vertex).is_some()
    }

    /// 一侧手臂的顶点索引（升序）
    pub fn vertices(&self, side: Side) -> Vec<usize> {
        self.labels
            .iter()
            .enumerate()
            .filter(|&(_, &label)| label == Some(side))
            .map(|(i, _)| i)
            .collect()
    }

    pub fn left(&self) -> Vec<usize> {
        self.vertices(Side::Left)
    }

    pub fn right(&self) -> Vec<usize> {
        self.vertices(Side::Right)
    }

    pub fn count(&self, side: Side) -> usize {
        self.labels.iter().filter(|&&label| label == Some(side)).count()
    }

    /// 标记顶点；已有标签的顶点不会被改写
    fn claim(&mut self, vertex: usize, side: Side) -> bool {
        match self.labels[vertex] {
            None => {
                self.labels[vertex] = Some(side);
                true
            }
            Some(_) => false,
        }
    }
}

/// 手臂分类器
pub struct LimbClassifier<'a> {
    tuning: &'a ClassifyTuning,
}

impl<'a> LimbClassifier<'a> {
    pub fn new(tuning: &'a ClassifyTuning) -> Self {
        Self { tuning }
    }

    pub fn classify(&self, mesh: &Mesh, adjacency: &Adjacency, profile: &BodyProfile) -> LimbSet {
        let mut limbs = LimbSet::new(mesh.vertex_count());
        let seeds = self.seed(mesh, profile, &mut limbs);

        for side in Side::BOTH {
            let grown = self.grow(mesh, adjacency, profile, &mut limbs, &seeds[side.index()], side);
            rig_info!(
                side = side.name(),
                seeds = seeds[side.index()].len(),
                grown,
                total = limbs.count(side),
                "Arm region classified"
            );
        }

        limbs
    }

    /// 种子：高度在种子带内且 |x| 超出身体半宽的顶点，侧别取 x 的符号
    fn seed(&self, mesh: &Mesh, profile: &BodyProfile, limbs: &mut LimbSet) -> [Vec<usize>; 2] {
        let [lo, hi] = self.tuning.seed_band;
        let mut seeds = [Vec::new(), Vec::new()];

        for (i, vertex) in mesh.vertices.iter().enumerate() {
            let [x, _, z] = vertex.position;
            if z < lo || z > hi {
                continue;
            }
            if x.abs() > profile.half_width(z) {
                let side = Side::from_x(x);
                if limbs.claim(i, side) {
                    seeds[side.index()].push(i);
                }
            }
        }

        seeds
    }

    /// 从种子出发的广度优先生长，返回新加入的顶点数
    ///
    /// 邻居在检查准入条件之前就标记为已访问，每个顶点最多入队一次。
    fn grow(
        &self,
        mesh: &Mesh,
        adjacency: &Adjacency,
        profile: &BodyProfile,
        limbs: &mut LimbSet,
        seeds: &[usize],
        side: Side,
    ) -> usize {
        let [lo, hi] = self.tuning.grow_band;
        let mut visited = vec![false; mesh.vertex_count()];
        let mut queue: VecDeque<usize> = seeds.iter().copied().collect();
        for &seed in seeds {
            visited[seed] = true;
        }

        let mut grown = 0;
        while let Some(current) = queue.pop_front() {
            for &neighbor in adjacency.neighbors(current) {
                if visited[neighbor] {
                    continue;
                }
                visited[neighbor] = true;

                let [x, _, z] = mesh.vertices[neighbor].position;
                if z > hi || z < lo {
                    continue;
                }
                if x * side.sign() < self.tuning.side_deadband {
                    continue;
                }
                if x.abs() < profile.half_width(z) * self.tuning.grow_width_factor {
                    continue;
                }
                if limbs.claim(neighbor, side) {
                    grown += 1;
                    queue.push_back(neighbor);
                }
            }
        }

        grown
    }
}
