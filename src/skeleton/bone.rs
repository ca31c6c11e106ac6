//! 骨骼定义
//!
//! 静止姿态下的单根骨骼：名称加上世界空间中的头尾端点。

use serde::{Deserialize, Serialize};

use crate::core::math::{to_array, to_vector, Vector3};

/// 静止姿态骨骼
///
/// 左右侧与部位编码在名称中，例如 `upperarm.l`。
#[derive(Debug, Clone, PartialEq)]
pub struct Bone {
    pub name: String,
    pub head: Vector3,
    pub tail: Vector3,
}

impl Bone {
    pub fn new(name: impl Into<String>, head: [f32; 3], tail: [f32; 3]) -> Self {
        Self {
            name: name.into(),
            head: to_vector(head),
            tail: to_vector(tail),
        }
    }

    /// 骨骼长度
    #[inline]
    pub fn length(&self) -> f32 {
        (self.tail - self.head).norm()
    }

    /// 点到骨骼线段的距离
    #[inline]
    pub fn distance_to(&self, point: &Vector3) -> f32 {
        crate::core::math::geometry::point_segment_distance(point, &self.head, &self.tail)
    }
}

/// 骨骼的文件表示
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoneDef {
    pub name: String,
    pub head: [f32; 3],
    pub tail: [f32; 3],
}

impl From<&Bone> for BoneDef {
    fn from(bone: &Bone) -> Self {
        Self {
            name: bone.name.clone(),
            head: to_array(&bone.head),
            tail: to_array(&bone.tail),
        }
    }
}

impl From<BoneDef> for Bone {
    fn from(def: BoneDef) -> Self {
        Bone::new(def.name, def.head, def.tail)
    }
}
