//! バックエンド抽象化モジュール
//!
//! ファサードが委譲する先のロギング実装を表す。
//!
//! - `Backend`: 名前付きロガー1つ分。レベル判定と出力を担う
//! - `BackendFactory`: ロガー名からバックエンドを解決する
//! - `TracingBackends`: `tracing` クレートへ委譲する本番用実装
//! - `MemoryBackends`: 出力をメモリに保持する実装（テスト・診断用）

mod memory;
mod tracing_adapter;

pub use memory::{CapturedRecord, MemoryBackend, MemoryBackends};
pub use tracing_adapter::{TracingBackend, TracingBackends};

use crate::callsite::CallSite;
use crate::format;
use crate::level::{Level, Marker};
use std::error::Error;
use std::fmt::Display;
use std::sync::Arc;

/// バックエンドに渡される1件分のログ
pub struct Record<'a> {
    pub level: Level,
    pub marker: Option<&'a Marker>,
    /// 装飾済みのメッセージ（またはフォーマット文字列）
    pub message: &'a str,
    /// `message` 中の `{}` に埋め込む位置引数
    pub args: &'a [&'a dyn Display],
    pub error: Option<&'a (dyn Error + 'static)>,
    /// 呼び出し元の識別名（位置情報対応バックエンドのみ）
    pub caller: Option<&'a str>,
    /// 呼び出し位置（位置情報対応バックエンドのみ）
    pub location: Option<&'a CallSite>,
}

impl Record<'_> {
    /// 位置引数を埋め込んだメッセージ
    pub fn render(&self) -> String {
        format::interpolate(self.message, self.args)
    }
}

/// 名前付きロガーのバックエンド
///
/// 実装はスレッド間で共有されるため `Send + Sync` が必要。
pub trait Backend: Send + Sync {
    /// ロガー名
    fn name(&self) -> &str;

    /// 指定レベル（とマーカー）が有効か
    fn is_enabled(&self, level: Level, marker: Option<&Marker>) -> bool;

    /// 1件出力する
    fn log(&self, record: &Record<'_>);

    /// 呼び出し位置を自前で扱えるか
    ///
    /// 真の場合、ファサードはメッセージを装飾せず、代わりに
    /// `Record::caller` と `Record::location` を渡す。
    fn location_aware(&self) -> bool {
        false
    }
}

/// ロガー名からバックエンドを解決する
pub trait BackendFactory: Send + Sync {
    fn backend(&self, name: &str) -> Arc<dyn Backend>;
}
