//! 配置管理模块
//!
//! 提供绑定流程配置的加载、解析和管理功能。
//! 支持从 TOML 配置文件加载，也支持命令行参数覆盖。
//!
//! 所有几何常量（高度阈值、衰减半径、参考长度、邻居数量）都针对一套固定的骨骼比例调校，
//! 属于骨骼定义的附属数据，默认值应保持原样。
//!
//! # 配置文件格式 (rig.toml)
//!
//! ```toml
//! [logging]
//! level = "info"      # trace, debug, info, warn, error
//! file_output = false
//!
//! [tuning.normalize]
//! target_height = 2.3
//!
//! [tuning.refine]
//! attach_count = 40
//! smooth_factor = 0.25
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;

use super::error::{ConfigError, DistRigError, Result};

/// 绑定配置
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// 日志配置
    #[serde(default)]
    pub logging: LoggingConfig,

    /// 几何常量
    #[serde(default)]
    pub tuning: RigTuning,
}

/// 日志配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// 日志级别
    #[serde(default = "default_log_level")]
    pub level: LogLevel,

    /// 是否输出到文件
    #[serde(default = "default_file_output")]
    pub file_output: bool,

    /// 日志文件路径
    #[serde(default = "default_log_file")]
    pub log_file: String,
}

/// 日志级别
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

fn default_log_level() -> LogLevel { LogLevel::Info }
fn default_file_output() -> bool { false }
fn default_log_file() -> String { "distrig.log".to_string() }

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file_output: default_file_output(),
            log_file: default_log_file(),
        }
    }
}

/// 各阶段使用的几何常量
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RigTuning {
    pub normalize: NormalizeTuning,
    pub classify: ClassifyTuning,
    pub retarget: RetargetTuning,
    pub weights: WeightTuning,
    pub refine: RefineTuning,
    pub verify: VerifyTuning,
}

/// 网格归一化常量
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NormalizeTuning {
    /// 归一化后的目标高度
    pub target_height: f32,
    /// 低于此高度时缩放系数退化为 1
    pub min_height: f32,
}

impl Default for NormalizeTuning {
    fn default() -> Self {
        Self {
            target_height: 2.3,
            min_height: 0.001,
        }
    }
}

/// 手臂分类常量
///
/// 身体半宽剖面：
///
/// ```text
/// z >= shoulder          neck_half * shoulder_factor
/// waist_z <= z < shoulder neck_half * shoulder_factor + t * waist_taper
/// hip_z <= z < waist_z    neck_half * hip_factor + hip_padding
/// z < hip_z               leg_half_width
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifyTuning {
    /// 采样颈部半宽的高度带 [min, max]
    pub neck_band: [f32; 2],
    /// 颈部带为空时使用的半宽
    pub default_neck_half_width: f32,
    pub shoulder_factor: f32,
    pub waist_z: f32,
    pub waist_taper: f32,
    pub hip_z: f32,
    pub hip_factor: f32,
    pub hip_padding: f32,
    pub leg_half_width: f32,
    /// 种子顶点的高度范围 [min, max]
    pub seed_band: [f32; 2],
    /// 区域生长允许的高度范围 [min, max]
    pub grow_band: [f32; 2],
    /// 区域生长时 x 的符号死区
    pub side_deadband: f32,
    /// 区域生长时对身体半宽的放宽系数
    pub grow_width_factor: f32,
}

impl Default for ClassifyTuning {
    fn default() -> Self {
        Self {
            neck_band: [1.12, 1.22],
            default_neck_half_width: 0.19,
            shoulder_factor: 0.75,
            waist_z: 0.7,
            waist_taper: 0.10,
            hip_z: 0.40,
            hip_factor: 0.85,
            hip_padding: 0.05,
            leg_half_width: 0.20,
            seed_band: [0.35, 1.22],
            grow_band: [0.30, 1.25],
            side_deadband: 0.02,
            grow_width_factor: 0.80,
        }
    }
}

/// T-pose 重定向常量
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetargetTuning {
    /// 目标骨骼的手臂长度（肩到手部挂点末端）
    pub arm_length: f32,
    /// 计算缩放时手臂长度的下限
    pub min_extent: f32,
    /// 缩放系数上限
    pub max_scale: f32,
}

impl Default for RetargetTuning {
    fn default() -> Self {
        Self {
            arm_length: 0.69,
            min_extent: 0.1,
            max_scale: 3.0,
        }
    }
}

/// 权重分配常量
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WeightTuning {
    /// 高斯核贡献低于此值时忽略
    pub kernel_cutoff: f32,
    /// 归一化后低于此值的权重被丢弃
    pub min_weight: f32,
    /// 手臂链各骨骼的衰减半径：upperarm, lowerarm, wrist, hand, handslot
    pub arm_sigmas: [f32; 5],
    pub shoulder_sigma: f32,
    /// 肩部顶点给 chest 的连续性权重系数
    pub shoulder_chest_factor: f32,
    /// 头部过渡带从 head 骨骼底部向下延伸的距离
    pub head_margin: f32,
    pub head_transition: f32,
    /// 头部过渡带中非头部权重分给 chest 的比例（其余给 spine）
    pub head_chest_share: f32,
    pub hip_leg_offset: f32,
    pub hip_leg_sigma: f32,
    pub hip_leg_factor: f32,
    /// |x| 小于此值的腿部顶点同时绑定两条腿
    pub leg_midline: f32,
    pub leg_blend_width: f32,
    pub leg_blend_clamp: [f32; 2],
    pub leg_sigma: f32,
    pub toes_sigma: f32,
    pub hip_fade_margin: f32,
    pub hip_fade_factor: f32,
}

impl Default for WeightTuning {
    fn default() -> Self {
        Self {
            kernel_cutoff: 0.001,
            min_weight: 0.003,
            arm_sigmas: [0.15, 0.13, 0.08, 0.07, 0.06],
            shoulder_sigma: 0.15,
            shoulder_chest_factor: 0.2,
            head_margin: 0.08,
            head_transition: 0.13,
            head_chest_share: 0.7,
            hip_leg_offset: 0.10,
            hip_leg_sigma: 0.12,
            hip_leg_factor: 0.4,
            leg_midline: 0.03,
            leg_blend_width: 0.06,
            leg_blend_clamp: [0.2, 0.8],
            leg_sigma: 0.12,
            toes_sigma: 0.10,
            hip_fade_margin: 0.08,
            hip_fade_factor: 0.3,
        }
    }
}

/// 权重精修常量
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RefineTuning {
    /// 每侧手部挂点增强的顶点数
    pub attach_count: usize,
    pub attach_sigma: f32,
    /// 增强权重的下限
    pub attach_floor: f32,
    /// 平滑混合系数
    pub smooth_factor: f32,
    /// 平滑迭代次数
    ///
    /// 省略时每根非挂点骨骼各做一次全组平滑，humanoid_medium 上为 21 次。
    #[serde(skip_serializing_if = "Option::is_none")]
    pub smooth_passes: Option<u32>,
}

impl Default for RefineTuning {
    fn default() -> Self {
        Self {
            attach_count: 40,
            attach_sigma: 0.05,
            attach_floor: 0.05,
            smooth_factor: 0.25,
            smooth_passes: None,
        }
    }
}

/// 绑定校验常量
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VerifyTuning {
    /// 权重高于此值才算“可见”
    pub visibility_threshold: f32,
    /// 需要单独统计的标志性骨骼
    pub landmarks: Vec<String>,
}

impl Default for VerifyTuning {
    fn default() -> Self {
        Self {
            visibility_threshold: 0.005,
            landmarks: ["hips", "chest", "head", "hand.r", "handslot.r"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

impl Config {
    /// 从配置文件加载
    ///
    /// # 参数
    ///
    /// * `path` - 配置文件路径
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path_str = path.as_ref().to_string_lossy().to_string();

        let contents = std::fs::read_to_string(path)
            .map_err(|_| ConfigError::FileNotFound(path_str.clone()))?;

        toml::from_str(&contents)
            .map_err(|e| ConfigError::ParseError(e.to_string()).into())
    }

    /// 从配置文件加载，失败时使用默认配置
    ///
    /// 文件不存在时静默回退；文件存在但解析失败时，错误随默认配置一起返回，
    /// 由调用方在日志系统初始化之后报告。
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> (Self, Option<DistRigError>) {
        match Self::from_file(path) {
            Ok(config) => (config, None),
            Err(DistRigError::Config(ConfigError::FileNotFound(_))) => (Self::default(), None),
            Err(e) => (Self::default(), Some(e)),
        }
    }

    /// 保存配置到文件
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let contents = toml::to_string_pretty(self)
            .map_err(|e| ConfigError::ParseError(e.to_string()))?;

        std::fs::write(path, contents)?;
        Ok(())
    }

    /// 从命令行参数覆盖配置
    ///
    /// 支持的参数：
    /// - `--height <value>`: 目标高度
    /// - `--verbose`: 使用 debug 日志级别
    pub fn apply_args<I>(&mut self, args: I)
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        let args: Vec<String> = args.into_iter().map(|s| s.as_ref().to_string()).collect();

        if args.iter().any(|a| a == "--verbose") {
            self.logging.level = LogLevel::Debug;
        }

        if let Some(idx) = args.iter().position(|a| a == "--height") {
            if let Some(height_str) = args.get(idx + 1) {
                if let Ok(height) = height_str.parse() {
                    self.tuning.normalize.target_height = height;
                }
            }
        }
    }

    /// 验证配置的有效性
    pub fn validate(&self) -> Result<()> {
        let t = &self.tuning;

        if t.normalize.target_height <= 0.0 {
            return Err(invalid("tuning.normalize.target_height", "Target height must be greater than 0"));
        }

        for (field, band) in [
            ("tuning.classify.neck_band", t.classify.neck_band),
            ("tuning.classify.seed_band", t.classify.seed_band),
            ("tuning.classify.grow_band", t.classify.grow_band),
            ("tuning.weights.leg_blend_clamp", t.weights.leg_blend_clamp),
        ] {
            if band[0] > band[1] {
                return Err(invalid(field, "Lower bound must not exceed upper bound"));
            }
        }

        let sigmas = t.weights.arm_sigmas.iter().copied().chain([
            t.weights.shoulder_sigma,
            t.weights.hip_leg_sigma,
            t.weights.leg_sigma,
            t.weights.toes_sigma,
            t.refine.attach_sigma,
        ]);
        if sigmas.into_iter().any(|s| s <= 0.0) {
            return Err(invalid("tuning.weights", "Falloff radii must be greater than 0"));
        }

        if t.weights.head_transition <= 0.0 || t.weights.leg_blend_width <= 0.0 {
            return Err(invalid("tuning.weights", "Transition widths must be greater than 0"));
        }

        if t.refine.attach_count == 0 {
            return Err(invalid("tuning.refine.attach_count", "Attachment boost needs at least one vertex"));
        }

        if !(0.0..=1.0).contains(&t.refine.smooth_factor) {
            return Err(invalid("tuning.refine.smooth_factor", "Smooth factor must be within [0, 1]"));
        }

        Ok(())
    }
}

fn invalid(field: &str, reason: &str) -> super::error::DistRigError {
    ConfigError::InvalidValue {
        field: field.to_string(),
        reason: reason.to_string(),
    }
    .into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.tuning.normalize.target_height, 2.3);
        assert_eq!(config.tuning.refine.attach_count, 40);
        assert_eq!(config.logging.level, LogLevel::Info);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation() {
        let mut config = Config::default();
        config.tuning.normalize.target_height = 0.0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.tuning.classify.seed_band = [1.3, 0.3];
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.tuning.weights.arm_sigmas[2] = 0.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config: Config = toml::from_str(
            r#"
            [logging]
            level = "debug"

            [tuning.refine]
            attach_count = 12
            "#,
        )
        .unwrap();

        assert_eq!(config.logging.level, LogLevel::Debug);
        assert_eq!(config.tuning.refine.attach_count, 12);
        assert_eq!(config.tuning.refine.smooth_factor, 0.25);
        assert_eq!(config.tuning.retarget.arm_length, 0.69);
    }

    #[test]
    fn test_apply_args() {
        let mut config = Config::default();
        config.apply_args(["dist_rig", "--height", "1.8", "--verbose"]);
        assert_eq!(config.tuning.normalize.target_height, 1.8);
        assert_eq!(config.logging.level, LogLevel::Debug);
    }

    #[test]
    fn test_save_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rig.toml");

        let mut config = Config::default();
        config.tuning.weights.min_weight = 0.01;
        config.save_to_file(&path).unwrap();

        let reloaded = Config::from_file(&path).unwrap();
        assert_eq!(reloaded.tuning, config.tuning);
    }

    #[test]
    fn test_load_or_default_reports_parse_errors() {
        let dir = tempfile::tempdir().unwrap();

        let (config, error) = Config::load_or_default(dir.path().join("missing.toml"));
        assert!(error.is_none());
        assert_eq!(config.tuning, RigTuning::default());

        let path = dir.path().join("rig.toml");
        std::fs::write(&path, "[tuning.refine]\nattach_count = \"many\"\n").unwrap();
        let (config, error) = Config::load_or_default(&path);
        assert!(matches!(error, Some(DistRigError::Config(ConfigError::ParseError(_)))));
        assert_eq!(config.tuning.refine.attach_count, 40);
    }

    #[test]
    fn test_smooth_passes_override() {
        assert_eq!(RefineTuning::default().smooth_passes, None);

        let config: Config = toml::from_str("[tuning.refine]\nsmooth_passes = 3\n").unwrap();
        assert_eq!(config.tuning.refine.smooth_passes, Some(3));

        let text = toml::to_string_pretty(&Config::default()).unwrap();
        assert!(!text.contains("smooth_passes"));
    }

    #[test]
    fn test_shoulder_factors_are_separate() {
        let config: Config = toml::from_str(
            r#"
            [tuning.classify]
            shoulder_factor = 0.7

            [tuning.weights]
            shoulder_chest_factor = 0.3
            "#,
        )
        .unwrap();

        assert_eq!(config.tuning.classify.shoulder_factor, 0.7);
        assert_eq!(config.tuning.weights.shoulder_chest_factor, 0.3);
        assert_eq!(WeightTuning::default().shoulder_chest_factor, 0.2);
    }
}
