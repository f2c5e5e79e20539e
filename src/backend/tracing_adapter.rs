//! tracingライブラリへのアダプター
//!
//! `tracing` のイベントはターゲットがコンパイル時に固定されるため、
//! ロガー名をターゲットとして扱えない。そこで `log` クレート経由で
//! ロガー名をターゲットに出力し、`tracing-log` のブリッジで
//! サブスクライバーへ渡す。`EnvFilter` の `app::orders=debug` のような
//! 指定はロガー名単位で効く。

use super::{Backend, BackendFactory, Record};
use crate::format::ErrorChain;
use crate::level::{Level, Marker};
use std::fmt;
use std::sync::Arc;

impl Level {
    /// 対応する `log::Level`
    pub(crate) const fn to_log_level(self) -> log::Level {
        match self {
            Level::Trace => log::Level::Trace,
            Level::Debug => log::Level::Debug,
            Level::Info => log::Level::Info,
            Level::Warn => log::Level::Warn,
            Level::Error => log::Level::Error,
        }
    }
}

/// `tracing` クレートへ委譲するバックエンドのファクトリ
///
/// サブスクライバーとブリッジは事前に初期化されている前提（`logging::init` 参照）。
///
/// # Example
///
/// ```
/// use sitelog::backend::{BackendFactory, TracingBackends};
///
/// let backends = TracingBackends::new();
/// let backend = backends.backend("app::orders");
/// assert_eq!(backend.name(), "app::orders");
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingBackends {
    location_aware: bool,
}

impl TracingBackends {
    /// 新しいTracingBackendsを作成
    pub fn new() -> Self {
        Self::default()
    }

    /// 位置情報を `location` / `caller` として出力するか
    ///
    /// 有効にするとメッセージ本文への装飾は行われない。
    pub fn location_aware(mut self, enabled: bool) -> Self {
        self.location_aware = enabled;
        self
    }
}

impl BackendFactory for TracingBackends {
    fn backend(&self, name: &str) -> Arc<dyn Backend> {
        Arc::new(TracingBackend {
            name: name.to_string(),
            location_aware: self.location_aware,
        })
    }
}

/// ロガー名をターゲットとして出力するバックエンド
///
/// マーカー・呼び出し元・位置・エラーはメッセージ末尾に `key=value` で付く。
#[derive(Debug, Clone)]
pub struct TracingBackend {
    name: String,
    location_aware: bool,
}

/// メッセージ末尾に付ける付加情報
struct Fields<'a> {
    marker: Option<&'a Marker>,
    caller: Option<&'a str>,
    location: Option<String>,
    error: Option<String>,
}

impl fmt::Display for Fields<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(marker) = self.marker {
            write!(f, " marker={}", marker)?;
        }
        if let Some(caller) = self.caller {
            write!(f, " caller={}", caller)?;
        }
        if let Some(ref location) = self.location {
            write!(f, " location={}", location)?;
        }
        if let Some(ref error) = self.error {
            write!(f, " error={}", error)?;
        }
        Ok(())
    }
}

impl Backend for TracingBackend {
    fn name(&self) -> &str {
        &self.name
    }

    fn is_enabled(&self, level: Level, _marker: Option<&Marker>) -> bool {
        let level = level.to_log_level();
        if level > log::max_level() {
            return false;
        }
        let metadata = log::Metadata::builder()
            .target(&self.name)
            .level(level)
            .build();
        log::logger().enabled(&metadata)
    }

    fn log(&self, record: &Record<'_>) {
        let fields = Fields {
            marker: record.marker,
            caller: record.caller,
            location: record.location.map(ToString::to_string),
            error: record.error.map(|err| ErrorChain(err).to_string()),
        };

        log::log!(
            target: self.name.as_str(),
            record.level.to_log_level(),
            "{}{}",
            record.render(),
            fields
        );
    }

    fn location_aware(&self) -> bool {
        self.location_aware
    }
}
