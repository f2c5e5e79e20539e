//! ログレベルとマーカー

use crate::error::ParseLevelError;
use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

/// ログレベル
///
/// 重要度の低い順に並ぶ: `Trace` < `Debug` < `Info` < `Warn` < `Error`。
/// バックエンドはこの順序でしきい値判定を行う。
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Level {
    /// 非常に詳細なデバッグ情報
    Trace,
    /// デバッグ情報
    Debug,
    /// 一般的な情報
    Info,
    /// 警告
    Warn,
    /// エラー
    Error,
}

impl Level {
    /// すべてのレベル（重要度の低い順）
    pub const ALL: [Level; 5] = [
        Level::Trace,
        Level::Debug,
        Level::Info,
        Level::Warn,
        Level::Error,
    ];

    /// 大文字の表記を返す
    pub const fn as_str(self) -> &'static str {
        match self {
            Level::Trace => "TRACE",
            Level::Debug => "DEBUG",
            Level::Info => "INFO",
            Level::Warn => "WARN",
            Level::Error => "ERROR",
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Level {
    type Err = ParseLevelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Level::ALL
            .into_iter()
            .find(|level| level.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ParseLevelError(s.to_string()))
    }
}

/// マーカー
///
/// レベルとは独立した分類タグ。バックエンドにそのまま渡される。
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Marker {
    name: Cow<'static, str>,
}

impl Marker {
    /// 新しいMarkerを作成
    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        Self { name: name.into() }
    }

    /// 静的な名前からMarkerを作成（`static`での宣言用）
    pub const fn from_static(name: &'static str) -> Self {
        Self {
            name: Cow::Borrowed(name),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for Marker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}
