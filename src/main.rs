// 融合图鉴生成器主程序入口
// 读取配置、应用命令行覆盖、执行构建或单对合成

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use log::{error, info};
use std::path::PathBuf;

use fusiondex::core::ErrorSeverity;
use fusiondex::utils::init_logging;
use fusiondex::{App, DexConfig, DexError};

/// 融合图鉴数据生成器
#[derive(Debug, Parser)]
#[command(name = "fusiondex")]
#[command(about = "从基础宝可梦数据生成全部融合条目与进化谱系", long_about = None)]
#[command(version)]
struct Cli {
    /// 配置文件路径
    #[arg(short, long, default_value = "fusiondex.toml")]
    config: PathBuf,

    /// 种族数据 JSON
    #[arg(long)]
    species: Option<PathBuf>,

    /// SplitNames.rb 名称表
    #[arg(long)]
    split_names: Option<PathBuf>,

    /// JSON 输出路径
    #[arg(long)]
    json: Option<PathBuf>,

    /// SQLite 输出路径
    #[arg(long)]
    sqlite: Option<PathBuf>,

    /// 不导出图鉴 JSON
    #[arg(long)]
    no_json: bool,

    /// Sprite Credits.csv 署名表
    #[arg(long)]
    credits: Option<PathBuf>,

    /// 不生成 头 == 身体 的自融合
    #[arg(long)]
    no_self_fusions: bool,

    /// 输出调试日志
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// 构建完整图鉴并导出（默认）
    Build,
    /// 合成一对 (头, 身体) 并以 JSON 输出
    Fuse { head: String, body: String },
}

impl Cli {
    // 命令行参数覆盖配置文件
    fn apply(&self, config: &mut DexConfig) {
        if let Some(path) = &self.species {
            config.input.species_path = path.clone();
        }
        if let Some(path) = &self.split_names {
            config.input.split_names_path = path.clone();
        }
        if let Some(path) = &self.json {
            config.output.json_path = Some(path.clone());
        }
        if let Some(path) = &self.sqlite {
            config.output.sqlite_path = Some(path.clone());
        }
        if self.no_json {
            config.output.json_enabled = false;
        }
        if let Some(path) = &self.credits {
            config.sprites.credits_path = Some(path.clone());
        }
        if self.no_self_fusions {
            config.synthesis.include_self_fusions = false;
        }
    }
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        error!("运行失败: {:#}", e);
        eprintln!("错误: {:#}", e);
        std::process::exit(exit_code(&e));
    }
}

// 源数据损坏与环境问题使用不同的退出码
fn exit_code(error: &anyhow::Error) -> i32 {
    match error.downcast_ref::<DexError>().map(DexError::severity) {
        Some(ErrorSeverity::DataCorruption) => 2,
        _ => 1,
    }
}

fn run(cli: Cli) -> Result<()> {
    let mut config =
        DexConfig::load(&cli.config).with_context(|| format!("无法加载配置文件 {:?}", cli.config))?;
    cli.apply(&mut config);

    init_logging(&config.logging.level, cli.verbose).context("日志系统初始化失败")?;
    info!("启动 {} v{}", fusiondex::NAME, fusiondex::VERSION);

    let app = App::new(config).context("配置无效")?;
    match cli.command.unwrap_or(Command::Build) {
        Command::Build => {
            let summary = app.run().context("图鉴构建失败")?;
            println!(
                "基础 {} / 融合 {} / 三体 {} / 进化链 {}",
                summary.base, summary.fusions, summary.triples, summary.chains
            );
            if let Some(credits) = summary.sprite_credits {
                println!("精灵图署名 {}", credits);
            }
        }
        Command::Fuse { head, body } => {
            let record = app
                .fuse_one(&head, &body)
                .with_context(|| format!("无法合成 {head}.{body}"))?;
            println!("{}", serde_json::to_string_pretty(&record)?);
        }
    }
    Ok(())
}
