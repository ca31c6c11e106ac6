//! 几何数学工具模块
//!
//! 提供绑定流程用到的几何函数：
//! - 点到线段距离（骨骼影响范围）
//! - 高斯衰减核
//! - 绕枢轴的旋转与缩放（手臂重定向）
//! - 从三角形面重建顶点法线

use super::{Matrix3, Rotation, Vector3};

/// 计算点到线段的最短距离
///
/// 线段退化（长度平方小于 1e-10）时返回到端点 `a` 的距离。
///
/// # 算法
///
/// 1. 将 `p - a` 投影到 `ab` 上，得到参数 t
/// 2. t 截断到 [0, 1]
/// 3. 返回 `p` 到 `a + ab * t` 的距离
pub fn point_segment_distance(p: &Vector3, a: &Vector3, b: &Vector3) -> f32 {
    let ab = b - a;
    let sq = ab.norm_squared();
    if sq < 1e-10 {
        return (p - a).norm();
    }
    let t = ((p - a).dot(&ab) / sq).clamp(0.0, 1.0);
    (p - (a + ab * t)).norm()
}

/// 高斯衰减核：exp(-d² / (2σ²))
#[inline]
pub fn gaussian_falloff(distance: f32, sigma: f32) -> f32 {
    (-(distance * distance) / (2.0 * sigma * sigma)).exp()
}

/// 绕枢轴先缩放再旋转
///
/// 在以 `pivot` 为原点的局部坐标中缩放、旋转，然后变换回世界坐标。
/// 缩放是均匀的，因此与旋转的顺序无关。
pub fn rotate_scale_about(point: &Vector3, pivot: &Vector3, rotation: &Rotation, scale: f32) -> Vector3 {
    pivot + rotation * ((point - pivot) * scale)
}

/// 法线变换矩阵（线性部分的逆转置）
///
/// 矩阵不可逆时返回 `None`。
pub fn normal_matrix(linear: &Matrix3) -> Option<Matrix3> {
    linear.try_inverse().map(|inv| inv.transpose())
}

/// 归一化向量，长度接近零时返回零向量
#[inline]
pub fn normalize_or_zero(v: &Vector3) -> Vector3 {
    let length = v.norm();
    if length < 1e-6 {
        Vector3::zeros()
    } else {
        v / length
    }
}

/// 从三角形面重建顶点法线
///
/// 遍历所有三角形，将面法线（未归一化，按面积加权）累加到三个顶点，最后归一化。
///
/// # 参数
///
/// - `positions`: 顶点位置
/// - `indices`: 索引数组（每3个索引定义一个三角形）
pub fn reconstruct_normals(positions: &[[f32; 3]], indices: &[u32]) -> Vec<[f32; 3]> {
    let mut normals = vec![Vector3::zeros(); positions.len()];

    for triangle in indices.chunks_exact(3) {
        let i0 = triangle[0] as usize;
        let i1 = triangle[1] as usize;
        let i2 = triangle[2] as usize;
        if i0 >= positions.len() || i1 >= positions.len() || i2 >= positions.len() {
            continue;
        }

        let p0 = super::to_vector(positions[i0]);
        let edge1 = super::to_vector(positions[i1]) - p0;
        let edge2 = super::to_vector(positions[i2]) - p0;
        let face_normal = edge1.cross(&edge2);

        normals[i0] += face_normal;
        normals[i1] += face_normal;
        normals[i2] += face_normal;
    }

    normals
        .iter()
        .map(|n| super::to_array(&normalize_or_zero(n)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::math::constants::HALF_PI;

    #[test]
    fn test_distance_projects_inside_segment() {
        let a = Vector3::new(0.0, 0.0, 0.0);
        let b = Vector3::new(0.0, 0.0, 1.0);
        let p = Vector3::new(0.3, 0.0, 0.5);
        assert!((point_segment_distance(&p, &a, &b) - 0.3).abs() < 1e-6);
    }

    #[test]
    fn test_distance_clamps_to_endpoints() {
        let a = Vector3::new(0.0, 0.0, 0.0);
        let b = Vector3::new(1.0, 0.0, 0.0);

        let before = Vector3::new(-3.0, 4.0, 0.0);
        assert!((point_segment_distance(&before, &a, &b) - 5.0).abs() < 1e-5);

        let after = Vector3::new(2.0, 0.0, 0.0);
        assert!((point_segment_distance(&after, &a, &b) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_distance_degenerate_segment() {
        let a = Vector3::new(1.0, 1.0, 1.0);
        let p = Vector3::new(1.0, 1.0, 3.0);
        assert!((point_segment_distance(&p, &a, &a) - 2.0).abs() < 1e-6);
    }

    #[test]
    fn test_gaussian_falloff() {
        assert!((gaussian_falloff(0.0, 0.1) - 1.0).abs() < 1e-6);
        // d = σ 时为 exp(-1/2)
        assert!((gaussian_falloff(0.1, 0.1) - (-0.5f32).exp()).abs() < 1e-6);
        assert!(gaussian_falloff(3.0, 0.12) < 1e-9);
    }

    #[test]
    fn test_rotate_scale_about_pivot() {
        // 绕 Y 轴 -90°：向下的向量转到 +X
        let rotation = Rotation::from_axis_angle(&Vector3::y_axis(), -HALF_PI);
        let pivot = Vector3::new(0.2, 0.0, 1.0);
        let hanging = Vector3::new(0.2, 0.0, 0.5);

        let moved = rotate_scale_about(&hanging, &pivot, &rotation, 2.0);
        assert!((moved.x - 1.2).abs() < 1e-5);
        assert!((moved.z - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_pivot_is_fixed_point() {
        let rotation = Rotation::from_axis_angle(&Vector3::y_axis(), HALF_PI);
        let pivot = Vector3::new(-0.3, 0.1, 1.1);
        let moved = rotate_scale_about(&pivot, &pivot, &rotation, 3.0);
        assert!((moved - pivot).norm() < 1e-6);
    }

    #[test]
    fn test_reconstruct_normals_simple_triangle() {
        // XY 平面上的三角形，法线应指向 ±Z
        let positions = [[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]];
        let normals = reconstruct_normals(&positions, &[0, 1, 2]);

        for n in normals {
            assert!((n[2].abs() - 1.0).abs() < 1e-6, "法线应垂直于 XY 平面: {:?}", n);
        }
    }

    #[test]
    fn test_normal_matrix_singular() {
        assert!(normal_matrix(&Matrix3::zeros()).is_none());
        let m = normal_matrix(&Matrix3::identity()).unwrap();
        assert_eq!(m, Matrix3::identity());
    }
}
