//! CLIモジュール

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use sitelog::backend::TracingBackends;
use sitelog::config::CliArgs;
use sitelog::{logging, Config, Emit, Entry, ErrorTypeRegistry, Level, LogContext, Marker};
use std::fmt::Display;
use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use std::thread;
use thiserror::Error;
use tracing::debug;

/// sitelog - 呼び出し位置を扱うロギングファサードの動作確認ツール
#[derive(Parser, Debug)]
#[command(name = "sitelog")]
#[command(about = "呼び出し位置を扱うロギングファサードの動作確認ツール", long_about = None)]
pub struct Cli {
    /// 設定ファイルのパス
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// フィルタ指定（例: info, sitelog=debug）
    #[arg(long, global = true)]
    pub filter: Option<String>,

    /// メッセージ中の改行を空白に置き換える
    #[arg(long, global = true)]
    pub remove_line_breaks: bool,

    /// INFOへ降格するエラー型の登録名
    #[arg(long, global = true)]
    pub suppressible_error: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

/// サブコマンド
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// ファサード経由で1件出力
    Emit {
        /// ログレベル
        #[arg(short, long, default_value = "info")]
        level: Level,

        /// マーカー名
        #[arg(short, long)]
        marker: Option<String>,

        /// 指定した名前のスレッドから出力
        #[arg(short, long)]
        thread: Option<String>,

        /// メッセージ（`{}` は後続の引数で置き換え）
        message: String,

        /// 位置引数
        args: Vec<String>,
    },
    /// サンプルのエラーを報告
    Report {
        /// 報告するエラーの種類
        #[arg(short, long, value_enum, default_value_t = ErrorKind::Validation)]
        kind: ErrorKind,

        /// 添えるメッセージ
        message: Option<String>,
    },
    /// 有効な設定を表示
    Config,
}

/// サンプルエラーの種類
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ErrorKind {
    /// 入力検証エラー（`ValidationError` として登録済み）
    Validation,
    /// IOエラー（`IoError` として登録済み）
    Io,
}

/// 入力検証エラー
#[derive(Error, Debug)]
#[error("入力が不正です: {field}")]
pub struct ValidationError {
    pub field: String,
}

/// デモで利用できる抑制対象のエラー型
fn registry() -> ErrorTypeRegistry {
    ErrorTypeRegistry::new()
        .register::<ValidationError>("ValidationError")
        .register::<io::Error>("IoError")
}

/// CLIエントリポイント
pub fn run() -> Result<()> {
    let cli = Cli::parse();

    let cli_args = CliArgs {
        config: cli.config.clone(),
        filter: cli.filter.clone(),
        remove_line_breaks: cli.remove_line_breaks,
        suppressible_error: cli.suppressible_error.clone(),
    };
    let config = Config::load(&cli_args).context("設定の読み込みに失敗しました")?;
    logging::init(&config.filter);
    debug!(?config, "設定を読み込みました");

    let backends = TracingBackends::new().location_aware(config.location_aware);
    let ctx = LogContext::new(&config, Arc::new(backends), Arc::new(registry()));

    match cli.command {
        Commands::Emit {
            level,
            marker,
            thread: thread_name,
            message,
            args,
        } => {
            let marker = marker.map(Marker::new);
            let emit = || emit_one(&ctx, level, marker.as_ref(), &message, &args);
            match thread_name {
                Some(name) => thread::scope(|scope| -> Result<()> {
                    thread::Builder::new()
                        .name(name)
                        .spawn_scoped(scope, emit)
                        .context("スレッドの起動に失敗しました")?
                        .join()
                        .map_err(|_| anyhow::anyhow!("出力スレッドが異常終了しました"))
                })?,
                None => emit(),
            }
        }
        Commands::Report { kind, message } => {
            let err: Box<dyn std::error::Error + Send + Sync> = match kind {
                ErrorKind::Validation => Box::new(ValidationError {
                    field: "email".to_string(),
                }),
                ErrorKind::Io => Box::new(io::Error::new(
                    io::ErrorKind::PermissionDenied,
                    "書き込み権限がありません",
                )),
            };
            match message {
                Some(message) => sitelog::report!(ctx, &*err, &message),
                None => sitelog::report!(ctx, &*err),
            }
            println!("{:?}", ctx.reporter().resolution());
        }
        Commands::Config => {
            println!("{:#?}", config);
        }
    }

    Ok(())
}

fn emit_one(
    ctx: &LogContext,
    level: Level,
    marker: Option<&Marker>,
    message: &str,
    args: &[String],
) {
    let args: Vec<&dyn Display> = args.iter().map(|arg| arg as &dyn Display).collect();
    let mut entry = Entry::new(level, message).args(&args);
    if let Some(marker) = marker {
        entry = entry.marker(marker);
    }
    ctx.emit(&sitelog::callsite!(), entry);
}

#[cfg(test)]
mod tests {
    use super::*;
    use sitelog::report::TypeResolver;

    #[test]
    fn test_emit_command_defaults() {
        let cli = Cli::try_parse_from(["sitelog", "emit", "hello {}", "world"]).unwrap();

        if let Commands::Emit {
            level,
            marker,
            thread,
            message,
            args,
        } = cli.command
        {
            assert_eq!(level, Level::Info);
            assert!(marker.is_none());
            assert!(thread.is_none());
            assert_eq!(message, "hello {}");
            assert_eq!(args, vec!["world".to_string()]);
        } else {
            panic!("Expected Emit command");
        }
    }

    #[test]
    fn test_emit_command_with_options() {
        let cli = Cli::try_parse_from([
            "sitelog", "emit", "--level", "warn", "--marker", "AUDIT", "--thread", "worker", "msg",
        ])
        .unwrap();

        if let Commands::Emit {
            level,
            marker,
            thread,
            ..
        } = cli.command
        {
            assert_eq!(level, Level::Warn);
            assert_eq!(marker.as_deref(), Some("AUDIT"));
            assert_eq!(thread.as_deref(), Some("worker"));
        } else {
            panic!("Expected Emit command");
        }
    }

    #[test]
    fn test_emit_command_rejects_unknown_level() {
        assert!(Cli::try_parse_from(["sitelog", "emit", "--level", "loud", "msg"]).is_err());
    }

    #[test]
    fn test_report_command() {
        let cli = Cli::try_parse_from(["sitelog", "report", "--kind", "io", "failed op"]).unwrap();
        if let Commands::Report { kind, message } = cli.command {
            assert_eq!(kind, ErrorKind::Io);
            assert_eq!(message.as_deref(), Some("failed op"));
        } else {
            panic!("Expected Report command");
        }
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "sitelog",
            "config",
            "--filter",
            "debug",
            "--remove-line-breaks",
            "--suppressible-error",
            "ValidationError",
        ])
        .unwrap();
        assert!(matches!(cli.command, Commands::Config));
        assert_eq!(cli.filter.as_deref(), Some("debug"));
        assert!(cli.remove_line_breaks);
        assert_eq!(cli.suppressible_error.as_deref(), Some("ValidationError"));
    }

    #[test]
    fn test_registry_contains_demo_types() {
        let registry = registry();
        let validation = registry.resolve("ValidationError").unwrap();
        assert!(validation.matches(&ValidationError {
            field: "name".to_string()
        }));
        assert!(registry.resolve("IoError").is_some());
        assert!(registry.resolve("Unknown").is_none());
    }
}
