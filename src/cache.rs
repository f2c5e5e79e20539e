//! 呼び出し元ごとのロガーキャッシュ
//!
//! 呼び出し元モジュール名から `Logger` を引く並行マップ。`DashMap` により
//! 複数スレッドから同時に初回登録されても壊れない。同じキーで同時に
//! 生成が走った場合は後勝ちとなるが、生成されるハンドルは同等なので問題ない。
//! エントリは破棄されない（呼び出し元モジュールの数はプログラム読み込み後に固定）。

use crate::logger::Logger;
use dashmap::DashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::trace;

/// キャッシュの統計情報
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CacheStats {
    /// 登録済みのロガー数
    pub entries: usize,
    /// キャッシュから返した回数
    pub hits: u64,
    /// 新たに生成した回数（競合による重複生成を含む）
    pub misses: u64,
}

/// 呼び出し元ごとのロガーキャッシュ
#[derive(Debug, Default)]
pub struct LoggerCache {
    loggers: DashMap<String, Arc<Logger>>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl LoggerCache {
    /// 新しいLoggerCacheを作成
    pub fn new() -> Self {
        Self::default()
    }

    /// キーに対応するロガーを返す。無ければ `create` で生成して登録する
    ///
    /// 生成はマップのロックの外で行う。
    pub fn get_or_create(&self, key: &str, create: impl FnOnce() -> Logger) -> Arc<Logger> {
        if let Some(logger) = self.loggers.get(key) {
            self.hits.fetch_add(1, Ordering::Relaxed);
            return Arc::clone(logger.value());
        }

        self.misses.fetch_add(1, Ordering::Relaxed);
        let logger = Arc::new(create());
        self.loggers.insert(key.to_string(), Arc::clone(&logger));
        trace!(caller = key, logger = logger.name(), "ロガーを登録しました");
        logger
    }

    /// 登録済みのロガーを取得（生成はしない）
    pub fn get(&self, key: &str) -> Option<Arc<Logger>> {
        self.loggers.get(key).map(|logger| Arc::clone(logger.value()))
    }

    pub fn len(&self) -> usize {
        self.loggers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.loggers.is_empty()
    }

    /// 統計情報を取得
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            entries: self.loggers.len(),
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
        }
    }
}
