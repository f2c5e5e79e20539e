//! ロギングコンテキスト
//!
//! ファクトリ・キャッシュ・エラー報告をひとまとめにした、マクロの出力先。
//! 起動時に1度だけ構築し、参照で引き回す。

use crate::backend::BackendFactory;
use crate::cache::LoggerCache;
use crate::callsite::CallSite;
use crate::config::Config;
use crate::factory::LoggerFactory;
use crate::level::Level;
use crate::logger::{Emit, Entry, Logger};
use crate::report::{ErrorReporter, TypeResolver};
use std::any::type_name;
use std::error::Error;
use std::sync::Arc;
use tracing::debug;

/// ロギングコンテキスト
#[derive(Debug)]
pub struct LogContext {
    factory: LoggerFactory,
    cache: LoggerCache,
    reporter: ErrorReporter,
}

impl LogContext {
    /// 設定からLogContextを構築
    pub fn new(
        config: &Config,
        backends: Arc<dyn BackendFactory>,
        resolver: Arc<dyn TypeResolver>,
    ) -> Self {
        debug!(
            remove_line_breaks = config.remove_line_breaks,
            suppressible_error = config.suppressible_error.as_deref(),
            "ロギングコンテキストを構築します"
        );
        let factory = LoggerFactory::new(backends, config.decorator())
            .with_default_name(config.default_logger_name.clone());
        Self {
            factory,
            cache: LoggerCache::new(),
            reporter: ErrorReporter::new(config.suppressible_error.clone(), resolver),
        }
    }

    /// 呼び出し位置のモジュールに対応するロガー
    ///
    /// 初回は生成してキャッシュし、以降は同じハンドルを返す。
    pub fn logger(&self, site: &CallSite) -> Arc<Logger> {
        let key = if site.module.is_empty() {
            self.factory.default_name()
        } else {
            site.module
        };
        self.cache.get_or_create(key, || {
            self.factory.preserved(type_name::<LogContext>(), key)
        })
    }

    pub fn factory(&self) -> &LoggerFactory {
        &self.factory
    }

    pub fn cache(&self) -> &LoggerCache {
        &self.cache
    }

    pub fn reporter(&self) -> &ErrorReporter {
        &self.reporter
    }

    /// メッセージ付きでエラーを報告する
    pub fn report_error(&self, site: &CallSite, message: &str, error: &(dyn Error + 'static)) {
        let logger = self.logger(site);
        self.reporter.report(
            &logger,
            site,
            error,
            Some(Entry::new(Level::Error, message)),
        );
    }

    /// エラーのみを報告する
    pub fn report(&self, site: &CallSite, error: &(dyn Error + 'static)) {
        let logger = self.logger(site);
        self.reporter.report(&logger, site, error, None);
    }
}

impl Emit for LogContext {
    fn emit(&self, site: &CallSite, entry: Entry<'_>) {
        let logger = self.logger(site);
        match (entry.level, entry.error) {
            (Level::Error, Some(error)) => self.reporter.report(&logger, site, error, Some(entry)),
            _ => logger.log(site, entry),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::MemoryBackends;
    use crate::report::{ErrorTypeRegistry, Resolution};
    use std::io;
    use std::sync::Barrier;
    use std::thread;
    use thiserror::Error;

    #[derive(Error, Debug)]
    #[error("入力が不正です")]
    struct ValidationError;

    fn context(config: &Config, backends: &MemoryBackends) -> LogContext {
        let registry = ErrorTypeRegistry::new().register::<ValidationError>("ValidationError");
        LogContext::new(config, Arc::new(backends.clone()), Arc::new(registry))
    }

    fn suppressing() -> Config {
        Config {
            suppressible_error: Some("ValidationError".to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_logger_is_cached_per_module() {
        let backends = MemoryBackends::new();
        let ctx = context(&Config::default(), &backends);

        let site = CallSite::new("app::orders", "submit", "src/orders.rs", 1);
        let other_line = CallSite::new("app::orders", "cancel", "src/orders.rs", 90);
        let first = ctx.logger(&site);
        let second = ctx.logger(&other_line);

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(first.name(), "app::orders");
        assert_eq!(first.caller(), "sitelog::context::LogContext");
        assert_eq!(backends.created(), 1);
        assert_eq!(ctx.cache().stats().hits, 1);
    }

    #[test]
    fn test_empty_module_uses_default_name() {
        let backends = MemoryBackends::new();
        let config = Config {
            default_logger_name: "fallback".to_string(),
            ..Default::default()
        };
        let ctx = context(&config, &backends);

        let logger = ctx.logger(&CallSite::new("", "", "", 0));
        assert_eq!(logger.name(), "fallback");
        assert!(ctx.cache().get("fallback").is_some());
    }

    #[test]
    fn test_report_error_demotes_suppressible() {
        let backends = MemoryBackends::new();
        let ctx = context(&suppressing(), &backends);
        let site = CallSite::new("app::signup", "submit", "src/signup.rs", 12);

        ctx.report_error(&site, "failed op", &ValidationError);

        assert!(backends.records_at(Level::Error).is_empty());
        let infos = backends.records_at(Level::Info);
        assert_eq!(infos.len(), 1);
        assert!(infos[0]
            .message
            .ends_with("]-failed op : sitelog::context::tests::ValidationError: 入力が不正です"));
        assert_eq!(
            ctx.reporter().resolution(),
            Resolution::Found("sitelog::context::tests::ValidationError".to_string())
        );
    }

    #[test]
    fn test_report_error_io_without_suppressible_type() {
        let backends = MemoryBackends::new();
        let ctx = context(&Config::default(), &backends);
        let site = CallSite::new("app::files", "save", "src/files.rs", 30);
        let err = io::Error::new(io::ErrorKind::PermissionDenied, "read-only");

        ctx.report_error(&site, "failed op", &err);

        let errors = backends.records_at(Level::Error);
        assert_eq!(errors.len(), 1);
        assert!(errors[0].message.ends_with("]-failed op"));
        assert_eq!(errors[0].error.as_deref(), Some("read-only"));
        assert_eq!(ctx.reporter().resolution(), Resolution::Absent);
    }

    #[test]
    fn test_report_without_message() {
        let backends = MemoryBackends::new();
        let ctx = context(&Config::default(), &backends);
        let err = io::Error::new(io::ErrorKind::NotFound, "no such file");

        ctx.report(&CallSite::new("app", "run", "src/main.rs", 3), &err);

        let errors = backends.records_at(Level::Error);
        assert_eq!(errors.len(), 1);
        assert!(errors[0].message.ends_with("]-no such file"));
    }

    #[test]
    fn test_emit_routes_error_with_cause_through_reporter() {
        let backends = MemoryBackends::new();
        let ctx = context(&suppressing(), &backends);
        let site = CallSite::new("app::signup", "submit", "src/signup.rs", 40);

        ctx.emit(&site, Entry::new(Level::Error, "rejected").error(&ValidationError));
        ctx.emit(&site, Entry::new(Level::Warn, "warned").error(&ValidationError));
        ctx.emit(&site, Entry::new(Level::Error, "no cause"));

        let records = backends.records();
        assert_eq!(records.len(), 3);
        assert_eq!(records[0].level, Level::Info);
        assert!(records[0].error.is_none());
        assert_eq!(records[1].level, Level::Warn);
        assert!(records[1].error.is_some());
        assert_eq!(records[2].level, Level::Error);
    }

    #[test]
    fn test_location_aware_backend_receives_context_identity() {
        let backends = MemoryBackends::new().location_aware(true);
        let ctx = context(&Config::default(), &backends);
        let site = CallSite::new("app::orders", "submit", "src/orders.rs", 8);

        ctx.emit(&site, Entry::new(Level::Info, "plain"));

        let records = backends.records();
        assert_eq!(records[0].message, "plain");
        assert_eq!(
            records[0].caller.as_deref(),
            Some("sitelog::context::LogContext")
        );
        assert_eq!(records[0].location, Some(site));
    }

    #[test]
    fn test_two_threads_race_on_same_module() {
        let backends = MemoryBackends::new();
        let ctx = context(&Config::default(), &backends);
        let barrier = Barrier::new(2);
        let site = CallSite::new("pkg.Foo", "run", "src/foo.rs", 5);

        let loggers: Vec<Arc<Logger>> = thread::scope(|scope| {
            let (ctx, barrier, site) = (&ctx, &barrier, &site);
            let handles: Vec<_> = (0..2)
                .map(|_| {
                    scope.spawn(move || {
                        barrier.wait();
                        ctx.logger(site)
                    })
                })
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });

        for logger in &loggers {
            assert_eq!(logger.name(), "pkg.Foo");
            logger.log(&site, Entry::new(Level::Info, "ready"));
        }
        assert_eq!(ctx.cache().len(), 1);
        assert_eq!(backends.records_at(Level::Info).len(), 2);

        let later = ctx.logger(&site);
        assert!(Arc::ptr_eq(&later, &ctx.cache().get("pkg.Foo").unwrap()));
    }
}
