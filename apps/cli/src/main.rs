//! # Motor Power CLI
//!
//! 从 candump 输出中提取电机功率应答，以 JSON Lines 发布。
//!
//! ## 实时监控
//!
//! ```bash
//! # 启动 candump can0，读数写到 stdout
//! motor-power-cli monitor
//!
//! # 指定采集命令和标记
//! motor-power-cli monitor --command "candump can1" --marker 9A
//! ```
//!
//! ## 日志回放
//!
//! ```bash
//! candump -L can0 > bus.log
//! motor-power-cli decode bus.log
//! cat bus.log | motor-power-cli decode -
//! ```
//!
//! 日志输出到 stderr，由 `RUST_LOG` 控制。

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod commands;
mod config;
mod output;
mod utils;

use commands::{ConfigCommand, DecodeCommand, MonitorCommand};

/// Motor Power CLI - 电机功率监控工具
#[derive(Parser, Debug)]
#[command(name = "motor-power-cli")]
#[command(about = "Republish motor power readings decoded from candump output", long_about = None)]
#[command(version)]
struct Cli {
    /// 配置文件路径（默认：<config_dir>/motor-power/config.toml）
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// 启动采集进程并实时发布读数
    Monitor {
        #[command(flatten)]
        args: MonitorCommand,
    },

    /// 解码 candump 日志（文件或 stdin）
    Decode {
        #[command(flatten)]
        args: DecodeCommand,
    },

    /// 配置管理
    #[command(subcommand)]
    Config(ConfigCommand),
}

fn main() -> Result<()> {
    // 初始化日志（stderr，stdout 只输出数据）
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("motor_power_cli=info".parse()?)
                .add_directive("motor_power_driver=info".parse()?),
        )
        .init();

    let cli = Cli::parse();
    let config_path = cli.config.as_deref();

    match cli.command {
        Commands::Monitor { args } => args.execute(config_path),

        Commands::Decode { args } => args.execute(config_path),

        Commands::Config(cmd) => cmd.execute(config_path),
    }
}
