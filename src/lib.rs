//! sitelog - 呼び出し位置を扱うロギングファサード
//!
//! 既存のロギング実装（バックエンド）を包み、次の3点を担う。
//!
//! - 呼び出し元モジュールごとにロガーをキャッシュする
//! - バックエンドが位置情報を扱えない場合、メッセージ先頭に
//!   スレッドと呼び出し位置を付与する
//! - 設定されたエラー型をERRORからINFOへ降格して報告する
//!
//! 呼び出し位置はスタックを辿らず、マクロ展開時（`callsite!`）か
//! `#[track_caller]` で確定させる。

pub mod backend;
pub mod cache;
pub mod callsite;
pub mod config;
pub mod context;
pub mod decorate;
pub mod error;
pub mod factory;
pub mod format;
pub mod level;
pub mod logger;
pub mod logging;
mod macros;
pub mod report;

pub use callsite::CallSite;
pub use config::Config;
pub use context::LogContext;
pub use decorate::Decorator;
pub use error::{ConfigError, ParseLevelError};
pub use factory::LoggerFactory;
pub use level::{Level, Marker};
pub use logger::{Emit, Entry, Logger};
pub use report::{ErrorReporter, ErrorTypeRegistry, SuppressibleType, TypeResolver};

#[doc(hidden)]
pub mod __private {
    pub use crate::callsite::function_name;
}
