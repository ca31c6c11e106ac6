//! 固定区域表
//!
//! 目标骨骼的骨骼集合是固定的。左右肢体链以声明式表格描述，
//! 解析后得到各区域使用的骨骼索引。

use super::Skeleton;
use crate::core::error::{Result, SkeletonError};

/// 身体侧
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    /// 角色左侧（+X）
    Left,
    /// 角色右侧（-X）
    Right,
}

impl Side {
    pub const BOTH: [Side; 2] = [Side::Left, Side::Right];

    /// 骨骼名称后缀
    pub fn suffix(self) -> &'static str {
        match self {
            Side::Left => "l",
            Side::Right => "r",
        }
    }

    /// x 方向符号
    pub fn sign(self) -> f32 {
        match self {
            Side::Left => 1.0,
            Side::Right => -1.0,
        }
    }

    /// 根据 x 坐标判断侧（x > 0 为左）
    pub fn from_x(x: f32) -> Side {
        if x > 0.0 {
            Side::Left
        } else {
            Side::Right
        }
    }

    #[inline]
    pub fn index(self) -> usize {
        match self {
            Side::Left => 0,
            Side::Right => 1,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Side::Left => "Left",
            Side::Right => "Right",
        }
    }
}

/// 躯干骨骼
pub const TORSO_BONES: [&str; 5] = ["root", "hips", "spine", "chest", "head"];

/// 手臂链（从肩到手部挂点）
pub const ARM_CHAIN: [&str; 5] = ["upperarm", "lowerarm", "wrist", "hand", "handslot"];

/// 腿部链（从髋到脚趾）
pub const LEG_CHAIN: [&str; 4] = ["upperleg", "lowerleg", "foot", "toes"];

/// 手臂链中的手部挂点位置
pub const HAND_SLOT: usize = 4;

/// 腿部链中的脚趾位置
pub const TOES: usize = 3;

/// 带侧后缀的骨骼名称
pub fn sided(part: &str, side: Side) -> String {
    format!("{}.{}", part, side.suffix())
}

/// 解析后的区域骨骼索引
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RigBones {
    pub root: usize,
    pub hips: usize,
    pub spine: usize,
    pub chest: usize,
    pub head: usize,
    /// 按 `Side::index()` 排列
    pub arms: [[usize; 5]; 2],
    pub legs: [[usize; 4]; 2],
}

impl RigBones {
    /// 从骨骼中解析区域表
    ///
    /// 缺少任何一根必需骨骼都是致命错误。
    pub fn resolve(skeleton: &Skeleton) -> Result<Self> {
        let find = |name: &str| -> Result<usize> {
            skeleton
                .index_of(name)
                .ok_or_else(|| SkeletonError::MissingBone(name.to_string()).into())
        };

        let mut torso = [0usize; 5];
        for (slot, name) in TORSO_BONES.iter().enumerate() {
            torso[slot] = find(name)?;
        }
        let [root, hips, spine, chest, head] = torso;

        let mut arms = [[0usize; 5]; 2];
        let mut legs = [[0usize; 4]; 2];
        for side in Side::BOTH {
            for (slot, part) in ARM_CHAIN.iter().enumerate() {
                arms[side.index()][slot] = find(&sided(part, side))?;
            }
            for (slot, part) in LEG_CHAIN.iter().enumerate() {
                legs[side.index()][slot] = find(&sided(part, side))?;
            }
        }

        Ok(Self {
            root,
            hips,
            spine,
            chest,
            head,
            arms,
            legs,
        })
    }

    #[inline]
    pub fn arm(&self, side: Side) -> &[usize; 5] {
        &self.arms[side.index()]
    }

    #[inline]
    pub fn leg(&self, side: Side) -> &[usize; 4] {
        &self.legs[side.index()]
    }

    /// 手部挂点骨骼
    #[inline]
    pub fn hand_slot(&self, side: Side) -> usize {
        self.arms[side.index()][HAND_SLOT]
    }

    /// 上臂骨骼（其头部是肩关节）
    #[inline]
    pub fn upper_arm(&self, side: Side) -> usize {
        self.arms[side.index()][0]
    }

    /// 上腿骨骼
    #[inline]
    pub fn upper_leg(&self, side: Side) -> usize {
        self.legs[side.index()][0]
    }

    /// 平滑时锁定的挂点骨骼
    pub fn attachment_bones(&self) -> [usize; 2] {
        [self.hand_slot(Side::Left), self.hand_slot(Side::Right)]
    }
}
