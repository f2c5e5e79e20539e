//! ロガーハンドルモジュール
//!
//! すべての出力は `Logger::log(&CallSite, Entry)` の1経路に集約される。
//! レベル別の便利メソッドとマクロはこの経路を呼ぶだけ。

use crate::backend::{Backend, Record};
use crate::callsite::CallSite;
use crate::decorate::Decorator;
use crate::level::{Level, Marker};
use std::error::Error;
use std::fmt::{self, Display};
use std::sync::Arc;

/// 呼び出し元が出力を依頼する1件分の内容
#[derive(Clone, Copy)]
pub struct Entry<'a> {
    pub level: Level,
    pub marker: Option<&'a Marker>,
    pub format: &'a str,
    pub args: &'a [&'a dyn Display],
    pub error: Option<&'a (dyn Error + 'static)>,
}

impl<'a> Entry<'a> {
    /// 新しいEntryを作成
    pub const fn new(level: Level, format: &'a str) -> Self {
        Self {
            level,
            marker: None,
            format,
            args: &[],
            error: None,
        }
    }

    pub fn level(mut self, level: Level) -> Self {
        self.level = level;
        self
    }

    pub fn marker(mut self, marker: &'a Marker) -> Self {
        self.marker = Some(marker);
        self
    }

    pub fn args(mut self, args: &'a [&'a dyn Display]) -> Self {
        self.args = args;
        self
    }

    pub fn error(mut self, error: &'a (dyn Error + 'static)) -> Self {
        self.error = Some(error);
        self
    }
}

impl fmt::Debug for Entry<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Entry")
            .field("level", &self.level)
            .field("marker", &self.marker)
            .field("format", &self.format)
            .field("args", &self.args.len())
            .field("error", &self.error.map(ToString::to_string))
            .finish()
    }
}

/// マクロの出力先
///
/// `Logger` と `LogContext` が実装する。
pub trait Emit {
    fn emit(&self, site: &CallSite, entry: Entry<'_>);
}

/// 呼び出し元の識別名が未指定の場合に使われる名前
pub fn default_caller() -> &'static str {
    std::any::type_name::<Logger>()
}

/// ロガーハンドル
///
/// バックエンド1つを包み、構築後は変更されない。
pub struct Logger {
    backend: Arc<dyn Backend>,
    caller: Option<String>,
    decorator: Decorator,
}

impl Logger {
    /// 新しいLoggerを作成
    ///
    /// `caller` は位置情報対応バックエンドに渡す呼び出し元の識別名。
    pub fn new(backend: Arc<dyn Backend>, caller: Option<String>, decorator: Decorator) -> Self {
        Self {
            backend,
            caller,
            decorator,
        }
    }

    /// ロガー名（バックエンドの名前）
    pub fn name(&self) -> &str {
        self.backend.name()
    }

    /// 呼び出し元の識別名
    pub fn caller(&self) -> &str {
        self.caller.as_deref().unwrap_or(default_caller())
    }

    pub fn is_enabled(&self, level: Level) -> bool {
        self.backend.is_enabled(level, None)
    }

    pub fn is_enabled_for(&self, level: Level, marker: &Marker) -> bool {
        self.backend.is_enabled(level, Some(marker))
    }

    /// 1件出力する
    ///
    /// 無効なレベルの場合は装飾も行わずに戻る。
    pub fn log(&self, site: &CallSite, entry: Entry<'_>) {
        if !self.backend.is_enabled(entry.level, entry.marker) {
            return;
        }

        let location_aware = self.backend.location_aware();
        let message = self.decorator.decorate(entry.format, site, location_aware);

        self.backend.log(&Record {
            level: entry.level,
            marker: entry.marker,
            message: &message,
            args: entry.args,
            error: entry.error,
            caller: location_aware.then(|| self.caller()),
            location: location_aware.then_some(site),
        });
    }
}

macro_rules! level_methods {
    ($($level:ident => $is_enabled:ident, $plain:ident, $with_args:ident, $with_error:ident;)+) => {
        impl Logger {
            $(
                #[doc = concat!("`", stringify!($level), "` レベルが有効か")]
                pub fn $is_enabled(&self) -> bool {
                    self.is_enabled(Level::$level)
                }

                #[doc = concat!("`", stringify!($level), "` レベルで出力する")]
                #[track_caller]
                pub fn $plain(&self, message: &str) {
                    self.log(&CallSite::caller(), Entry::new(Level::$level, message));
                }

                #[doc = concat!("`", stringify!($level), "` レベルで位置引数付きで出力する")]
                #[track_caller]
                pub fn $with_args(&self, format: &str, args: &[&dyn Display]) {
                    self.log(&CallSite::caller(), Entry::new(Level::$level, format).args(args));
                }

                #[doc = concat!("`", stringify!($level), "` レベルでエラー付きで出力する")]
                #[track_caller]
                pub fn $with_error(&self, message: &str, error: &(dyn Error + 'static)) {
                    self.log(&CallSite::caller(), Entry::new(Level::$level, message).error(error));
                }
            )+
        }
    };
}

level_methods! {
    Trace => is_trace_enabled, trace, trace_args, trace_err;
    Debug => is_debug_enabled, debug, debug_args, debug_err;
    Info => is_info_enabled, info, info_args, info_err;
    Warn => is_warn_enabled, warn, warn_args, warn_err;
    Error => is_error_enabled, error, error_args, error_err;
}

impl Emit for Logger {
    fn emit(&self, site: &CallSite, entry: Entry<'_>) {
        self.log(site, entry);
    }
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logger")
            .field("name", &self.name())
            .field("caller", &self.caller)
            .field("location_aware", &self.backend.location_aware())
            .field("decorator", &self.decorator)
            .finish()
    }
}
