//! エラー型定義モジュール
//!
//! ログ出力そのものはエラーを返さない。ここに並ぶのは設定読み込みなど
//! ログ経路の外側で発生するエラーのみ。

use std::io;
use thiserror::Error;

/// 設定エラー
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IOエラー: {0}")]
    IoError(#[from] io::Error),

    #[error("TOML解析エラー: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("無効なフィルタ指定: {0}")]
    InvalidFilter(String),

    #[error("無効な設定値: {0}")]
    InvalidValue(String),
}

/// ログレベル解析エラー
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("不明なログレベル: {0}")]
pub struct ParseLevelError(pub String);
