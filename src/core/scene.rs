//! 场景配置模块
//!
//! 描述一次绑定运行的输入和输出：模型文件及其导入变换、目标骨骼文件、产物位置。

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::fs;
use crate::core::error::{Result, DistRigError, ConfigError};
use crate::core::math::{constants::DEG_TO_RAD, Vector3, Matrix4};

/// 3D 变换数据
///
/// 包含位置、旋转和缩放信息。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    /// 位置 (x, y, z)
    #[serde(default = "default_position")]
    pub position: [f32; 3],

    /// 旋转（欧拉角，度数）(x, y, z)
    #[serde(default = "default_rotation")]
    pub rotation: [f32; 3],

    /// 缩放 (x, y, z)
    #[serde(default = "default_scale")]
    pub scale: [f32; 3],
}

fn default_position() -> [f32; 3] {
    [0.0, 0.0, 0.0]
}

fn default_rotation() -> [f32; 3] {
    [0.0, 0.0, 0.0]
}

fn default_scale() -> [f32; 3] {
    [1.0, 1.0, 1.0]
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: default_position(),
            rotation: default_rotation(),
            scale: default_scale(),
        }
    }
}

impl Transform {
    /// 创建模型矩阵
    ///
    /// 将 Transform 转换为 4x4 模型矩阵。
    /// 变换顺序：缩放 -> 旋转 -> 平移
    pub fn to_matrix(&self) -> Matrix4 {
        let rx = self.rotation[0] * DEG_TO_RAD;
        let ry = self.rotation[1] * DEG_TO_RAD;
        let rz = self.rotation[2] * DEG_TO_RAD;

        // 平移矩阵
        let translation = Matrix4::new_translation(&Vector3::new(
            self.position[0],
            self.position[1],
            self.position[2],
        ));

        // 旋转矩阵（欧拉角）
        let rotation_x = Matrix4::from_axis_angle(&Vector3::x_axis(), rx);
        let rotation_y = Matrix4::from_axis_angle(&Vector3::y_axis(), ry);
        let rotation_z = Matrix4::from_axis_angle(&Vector3::z_axis(), rz);
        let rotation = rotation_z * rotation_y * rotation_x;

        // 缩放矩阵
        let scale = Matrix4::new_nonuniform_scaling(&Vector3::new(
            self.scale[0],
            self.scale[1],
            self.scale[2],
        ));

        // 组合：T * R * S
        translation * rotation * scale
    }
}

/// 模型配置
///
/// 定义模型的文件路径和导入变换。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    /// 模型文件路径
    pub path: String,

    /// 导入变换，作为每个片段的世界变换
    #[serde(default)]
    pub transform: Transform,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            path: "assets/models/character.obj".to_string(),
            transform: Transform::default(),
        }
    }
}

/// 目标骨骼配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkeletonConfig {
    /// 骨骼文件路径
    pub path: String,
}

impl Default for SkeletonConfig {
    fn default() -> Self {
        Self {
            path: "assets/skeletons/humanoid_medium.toml".to_string(),
        }
    }
}

/// 输出配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// 产物文件路径
    pub path: String,

    /// 绑定后网格的名称
    #[serde(default = "default_output_name")]
    pub name: String,
}

fn default_output_name() -> String {
    "Character".to_string()
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            path: "output/character_bound.toml".to_string(),
            name: default_output_name(),
        }
    }
}

/// 场景配置
///
/// 包含一次运行的全部输入输出配置。
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SceneConfig {
    /// 模型配置
    #[serde(default)]
    pub model: ModelConfig,

    /// 骨骼配置
    #[serde(default)]
    pub skeleton: SkeletonConfig,

    /// 输出配置
    #[serde(default)]
    pub output: OutputConfig,
}

impl SceneConfig {
    /// 从文件加载场景配置
    ///
    /// # 参数
    ///
    /// - `path`: 配置文件路径
    ///
    /// # 返回
    ///
    /// - `Ok(SceneConfig)`: 加载成功
    /// - `Err(DistRigError)`: 加载失败
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)
            .map_err(|e| DistRigError::Config(ConfigError::FileNotFound(format!(
                "Failed to read scene config file '{}': {}",
                path.display(),
                e
            ))))?;

        toml::from_str(&contents)
            .map_err(|e| DistRigError::Config(ConfigError::ParseError(format!(
                "Failed to parse scene config: {}",
                e
            ))))
    }

    /// 从文件加载，如果文件不存在则返回默认配置
    pub fn from_file_or_default<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();
        if path.exists() {
            match Self::from_file(path) {
                Ok(config) => {
                    tracing::info!("Loaded scene config from: {}", path.display());
                    config
                }
                Err(e) => {
                    tracing::warn!("Failed to load scene config: {}, using defaults", e);
                    Self::default()
                }
            }
        } else {
            tracing::info!("Scene config not found, using defaults");
            Self::default()
        }
    }

    /// 保存配置到文件
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let contents = toml::to_string_pretty(self)
            .map_err(|e| DistRigError::Config(ConfigError::ParseError(format!(
                "Failed to serialize scene config: {}",
                e
            ))))?;

        fs::write(path, contents)?;

        tracing::info!("Saved scene config to: {}", path.display());
        Ok(())
    }

    /// 从命令行参数覆盖路径
    ///
    /// 支持的参数：
    /// - `--mesh <path>`: 模型文件
    /// - `--skeleton <path>`: 骨骼文件
    /// - `--output <path>`: 产物文件
    pub fn apply_args<I>(&mut self, args: I)
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        let args: Vec<String> = args.into_iter().map(|s| s.as_ref().to_string()).collect();
        let value_of = |flag: &str| {
            args.iter()
                .position(|a| a == flag)
                .and_then(|idx| args.get(idx + 1))
                .cloned()
        };

        if let Some(path) = value_of("--mesh") {
            self.model.path = path;
        }
        if let Some(path) = value_of("--skeleton") {
            self.skeleton.path = path;
        }
        if let Some(path) = value_of("--output") {
            self.output.path = path;
        }
    }
}
