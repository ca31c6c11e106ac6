//! DistRig - 自动蒙皮绑定工具
//!
//! 读取人形网格和目标骨骼，输出绑定到骨骼的网格产物。
//!
//! # 使用方法
//!
//! ```bash
//! # 使用配置文件（rig.toml + scene.toml）
//! cargo run
//!
//! # 命令行覆盖输入输出
//! cargo run -- --mesh character.obj --skeleton assets/skeletons/humanoid_medium.toml --output out.toml
//! ```
//!
//! # 架构概览
//!
//! ```text
//! ┌─────────────┐
//! │   main.rs   │  应用程序入口
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │  Loaders    │  OBJ 片段 + TOML 骨骼
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │ RigPipeline │  归一化 → 分类 → 重定向 → 权重 → 精修 → 校验
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │   Export    │  BoundMesh (TOML)
//! └─────────────┘
//! ```

use anyhow::Context;
use std::path::Path;

use dist_rig::core::{log, Config, SceneConfig};
use dist_rig::export::BoundMesh;
use dist_rig::geometry::loaders::load_fragments;
use dist_rig::rig::RigPipeline;
use dist_rig::skeleton::Skeleton;
use dist_rig::{app_error, app_info, app_warn};

/// 应用程序入口点
///
/// # 初始化流程
///
/// 1. 加载引擎配置文件（rig.toml）
/// 2. 应用命令行参数覆盖并验证
/// 3. 初始化日志系统
/// 4. 加载场景配置文件（scene.toml）
/// 5. 运行绑定流程并保存产物
///
/// # 命令行参数
///
/// - `--mesh <path>`: 模型文件
/// - `--skeleton <path>`: 骨骼文件
/// - `--output <path>`: 产物文件
/// - `--height <value>`: 目标高度
/// - `--verbose`: debug 日志
fn main() {
    // 1. 加载配置（在初始化日志之前）
    let (mut config, config_error) = Config::load_or_default("rig.toml");

    // 2. 应用命令行参数
    let args: Vec<String> = std::env::args().collect();
    config.apply_args(&args);

    // 3. 验证配置
    if let Err(e) = config.validate() {
        eprintln!("Invalid configuration: {}", e);
        std::process::exit(1);
    }

    // 4. 初始化日志系统（使用配置中的设置）
    let log_file = if config.logging.file_output {
        Some(config.logging.log_file.as_str())
    } else {
        None
    };
    log::init_logger(config.logging.level, config.logging.file_output, log_file);
    app_info!(version = env!("CARGO_PKG_VERSION"), "DistRig starting...");
    if let Some(e) = config_error {
        app_warn!(error = %e, "Failed to load rig.toml, using defaults");
    }

    // 5. 加载场景配置
    let mut scene = SceneConfig::from_file_or_default("scene.toml");
    scene.apply_args(&args);

    if let Err(e) = run(config, &scene) {
        app_error!("Binding failed: {:#}", e);
        eprintln!("Binding failed: {:#}", e);
        std::process::exit(1);
    }
}

fn run(config: Config, scene: &SceneConfig) -> anyhow::Result<()> {
    app_info!(
        mesh = %scene.model.path,
        skeleton = %scene.skeleton.path,
        output = %scene.output.path,
        target_height = config.tuning.normalize.target_height,
        "Scene configuration"
    );

    let transform = scene.model.transform.to_matrix();
    let fragments: Vec<_> = load_fragments(Path::new(&scene.model.path))
        .with_context(|| format!("failed to load mesh '{}'", scene.model.path))?
        .into_iter()
        .map(|fragment| fragment.with_transform(transform))
        .collect();

    let skeleton = Skeleton::from_file(&scene.skeleton.path)
        .with_context(|| format!("failed to load skeleton '{}'", scene.skeleton.path))?;

    let output = RigPipeline::new(config.tuning).run(fragments, skeleton, &scene.output.name)?;
    if !output.verify.is_clean() {
        app_warn!(
            warnings = output.verify.warnings.len(),
            "Binding finished with verification warnings"
        );
    }

    save(&output.bound, &scene.output.path)?;
    app_info!("Done");
    Ok(())
}

fn save(bound: &BoundMesh, path: &str) -> anyhow::Result<()> {
    bound
        .save_to_file(path)
        .with_context(|| format!("failed to write artifact '{}'", path))
}
