//! 统一的数学库模块
//!
//! 基于 `nalgebra`，提供绑定流程用到的向量、矩阵类型和工具函数。
//!
//! # 模块组织
//!
//! - **基础类型**：Vector3, Matrix3, Matrix4, Rotation
//! - **工具函数**：clamp, saturate
//! - **几何处理**：点到线段距离、高斯衰减、绕枢轴变换（见 geometry 子模块）
//!
//! 坐标约定：Z 轴向上，X 轴为左右方向（+X 为角色左侧），Y 轴为前后方向。

pub use nalgebra::{
    Matrix3 as Mat3, Matrix4 as Mat4, Point3, Rotation3,
    Vector3 as Vec3,
};

pub type Vector3 = Vec3<f32>;
pub type Matrix3 = Mat3<f32>;
pub type Matrix4 = Mat4<f32>;
pub type Rotation = Rotation3<f32>;

/// 数学常量
pub mod constants {
    /// π/2
    pub const HALF_PI: f32 = std::f32::consts::FRAC_PI_2;

    /// 角度转弧度的系数
    pub const DEG_TO_RAD: f32 = std::f32::consts::PI / 180.0;
}

/// 数学工具函数
pub mod utils {
    /// 限制值在范围内
    pub fn clamp<T: PartialOrd>(value: T, min: T, max: T) -> T {
        if value < min {
            min
        } else if value > max {
            max
        } else {
            value
        }
    }

    /// 饱和函数（限制在 0.0-1.0）
    pub fn saturate(value: f32) -> f32 {
        clamp(value, 0.0, 1.0)
    }
}

/// `[f32; 3]` 与 `Vector3` 之间的转换
///
/// 顶点结构使用原始数组，计算时转换为 nalgebra 向量。
pub fn to_vector(v: [f32; 3]) -> Vector3 {
    Vector3::new(v[0], v[1], v[2])
}

pub fn to_array(v: &Vector3) -> [f32; 3] {
    [v.x, v.y, v.z]
}

pub mod geometry;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_saturate() {
        assert_eq!(utils::saturate(-0.5), 0.0);
        assert_eq!(utils::saturate(0.25), 0.25);
        assert_eq!(utils::saturate(1.5), 1.0);
    }

    #[test]
    fn test_array_round_trip() {
        let v = to_vector([1.0, 2.0, 3.0]);
        assert_eq!(to_array(&v), [1.0, 2.0, 3.0]);
    }
}
