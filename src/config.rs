//! 設定モジュール

use crate::decorate::Decorator;
use crate::error::ConfigError;
use crate::factory::DEFAULT_LOGGER_NAME;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// ロギング設定
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// `tracing` のフィルタ指定（`RUST_LOG` が無い場合に使用）
    pub filter: String,
    /// メッセージ中の改行を空白に置き換えるか
    pub remove_line_breaks: bool,
    /// INFOへ降格するエラー型の登録名
    pub suppressible_error: Option<String>,
    /// 呼び出し元を推定できない場合のロガー名
    pub default_logger_name: String,
    /// バックエンドに位置情報を渡すか（偽の場合はメッセージを装飾する）
    pub location_aware: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            filter: "info".to_string(),
            remove_line_breaks: false,
            suppressible_error: None,
            default_logger_name: DEFAULT_LOGGER_NAME.to_string(),
            location_aware: false,
        }
    }
}

/// TOML設定ファイル用構造体
#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
struct FileConfig {
    filter: Option<String>,
    remove_line_breaks: Option<bool>,
    suppressible_error: Option<String>,
    default_logger_name: Option<String>,
    location_aware: Option<bool>,
}

/// CLI引数
#[derive(Debug, Default)]
pub struct CliArgs {
    /// 設定ファイルのパス（未指定なら `~/.sitelog/config.toml`）
    pub config: Option<PathBuf>,
    pub filter: Option<String>,
    /// 指定された場合のみ有効化する
    pub remove_line_breaks: bool,
    pub suppressible_error: Option<String>,
}

impl Config {
    /// 設定を読み込む
    ///
    /// 優先順位: CLI引数 > 設定ファイル > デフォルト値
    pub fn load(cli_args: &CliArgs) -> Result<Self, ConfigError> {
        let mut config = Config::default();

        let config_path = cli_args.config.clone().or_else(default_config_path);
        if let Some(path) = config_path {
            // 明示されたパスは存在しなければエラー、既定のパスは任意
            if cli_args.config.is_some() || path.exists() {
                config.merge_file_config(&read_file_config(&path)?);
            }
        }

        config.merge_cli_args(cli_args);
        config.validate()?;

        Ok(config)
    }

    /// ファイル設定をマージ
    fn merge_file_config(&mut self, file_config: &FileConfig) {
        if let Some(ref filter) = file_config.filter {
            self.filter = filter.clone();
        }
        if let Some(remove) = file_config.remove_line_breaks {
            self.remove_line_breaks = remove;
        }
        if let Some(ref name) = file_config.suppressible_error {
            self.suppressible_error = Some(name.clone());
        }
        if let Some(ref name) = file_config.default_logger_name {
            self.default_logger_name = name.clone();
        }
        if let Some(aware) = file_config.location_aware {
            self.location_aware = aware;
        }
    }

    /// CLI引数をマージ
    fn merge_cli_args(&mut self, cli_args: &CliArgs) {
        if let Some(ref filter) = cli_args.filter {
            self.filter = filter.clone();
        }
        if cli_args.remove_line_breaks {
            self.remove_line_breaks = true;
        }
        if let Some(ref name) = cli_args.suppressible_error {
            self.suppressible_error = Some(name.clone());
        }
    }

    /// 設定値をバリデート
    fn validate(&self) -> Result<(), ConfigError> {
        EnvFilter::try_new(&self.filter)
            .map_err(|e| ConfigError::InvalidFilter(format!("{}: {}", self.filter, e)))?;
        if self.default_logger_name.trim().is_empty() {
            return Err(ConfigError::InvalidValue(
                "default_logger_name must not be empty".to_string(),
            ));
        }
        if self
            .suppressible_error
            .as_deref()
            .is_some_and(|name| name.trim().is_empty())
        {
            return Err(ConfigError::InvalidValue(
                "suppressible_error must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    /// この設定に対応するメッセージ装飾
    pub fn decorator(&self) -> Decorator {
        Decorator::new(self.remove_line_breaks)
    }
}

/// 既定の設定ファイルパス
pub fn default_config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".sitelog").join("config.toml"))
}

fn read_file_config(path: &Path) -> Result<FileConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    Ok(toml::from_str(&content)?)
}
