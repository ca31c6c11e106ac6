//! 目标骨骼模块
//!
//! 骨骼是只读的参考数据：每次运行加载一次，之后不再修改。
//!
//! # 文件格式
//!
//! ```toml
//! name = "Rig_Medium"
//!
//! [[bones]]
//! name = "root"
//! head = [0.0, 0.0, 0.0]
//! tail = [0.0, 0.0, 0.1]
//! ```

pub mod bone;
pub mod table;

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

use crate::core::error::{Result, SkeletonError};

pub use bone::{Bone, BoneDef};
pub use table::{RigBones, Side};

/// 静止姿态骨骼
#[derive(Debug, Clone)]
pub struct Skeleton {
    /// 骨架名称（导出后网格的父节点）
    pub name: String,
    /// 有序骨骼列表
    pub bones: Vec<Bone>,
    index: HashMap<String, usize>,
}

/// 骨骼文件表示
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkeletonDef {
    pub name: String,
    #[serde(default)]
    pub bones: Vec<BoneDef>,
}

impl Skeleton {
    /// 创建骨骼，名称重复时返回错误
    pub fn new(name: impl Into<String>, bones: Vec<Bone>) -> Result<Self> {
        let mut index = HashMap::with_capacity(bones.len());
        for (i, bone) in bones.iter().enumerate() {
            if index.insert(bone.name.clone(), i).is_some() {
                return Err(SkeletonError::DuplicateBone(bone.name.clone()).into());
            }
        }
        Ok(Self {
            name: name.into(),
            bones,
            index,
        })
    }

    /// 从 TOML 文本解析
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let def: SkeletonDef = toml::from_str(contents)
            .map_err(|e| SkeletonError::ParseError(e.to_string()))?;
        Self::from_def(def)
    }

    /// 从骨骼文件加载
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .map_err(|_| SkeletonError::FileNotFound(path.to_path_buf()))?;

        let skeleton = Self::from_toml_str(&contents)?;
        tracing::info!(
            bones = skeleton.bone_count(),
            "Loaded skeleton '{}' from {}",
            skeleton.name,
            path.display()
        );
        Ok(skeleton)
    }

    pub fn from_def(def: SkeletonDef) -> Result<Self> {
        Self::new(def.name, def.bones.into_iter().map(Bone::from).collect())
    }

    pub fn to_def(&self) -> SkeletonDef {
        SkeletonDef {
            name: self.name.clone(),
            bones: self.bones.iter().map(BoneDef::from).collect(),
        }
    }

    #[inline]
    pub fn bone_count(&self) -> usize {
        self.bones.len()
    }

    /// 按名称查找骨骼索引
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    /// 按名称查找骨骼
    pub fn bone(&self, name: &str) -> Option<&Bone> {
        self.index_of(name).map(|i| &self.bones[i])
    }

    /// 骨骼名称列表（按顺序）
    pub fn bone_names(&self) -> Vec<String> {
        self.bones.iter().map(|b| b.name.clone()).collect()
    }

    /// 所有端点的高度范围
    pub fn height(&self) -> f32 {
        let zs = self.bones.iter().flat_map(|b| [b.head.z, b.tail.z]);
        let (min, max) = zs.fold((f32::MAX, f32::MIN), |(lo, hi), z| (lo.min(z), hi.max(z)));
        if min > max { 0.0 } else { max - min }
    }
}
