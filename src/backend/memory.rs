//! メモリ保持バックエンド

use super::{Backend, BackendFactory, Record};
use crate::callsite::CallSite;
use crate::format;
use crate::level::{Level, Marker};
use chrono::{DateTime, Local};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

/// 保持されたログ1件
#[derive(Debug, Clone)]
pub struct CapturedRecord {
    pub logger: String,
    pub level: Level,
    pub marker: Option<String>,
    /// 位置引数を埋め込んだ後のメッセージ
    pub message: String,
    /// 原因チェーン付きのエラー表示
    pub error: Option<String>,
    pub caller: Option<String>,
    pub location: Option<CallSite>,
    pub logged_at: DateTime<Local>,
}

/// メモリ保持バックエンドのファクトリ
///
/// クローンはすべて同じ保存領域を共有する。
///
/// # Example
///
/// ```
/// use sitelog::backend::{BackendFactory, MemoryBackends};
/// use sitelog::Level;
///
/// let backends = MemoryBackends::new()
///     .with_threshold(Level::Info)
///     .with_level("app::db", Level::Debug);
/// assert!(backends.backend("app::db").is_enabled(Level::Debug, None));
/// assert!(!backends.backend("app::web").is_enabled(Level::Debug, None));
/// ```
#[derive(Debug, Clone)]
pub struct MemoryBackends {
    threshold: Level,
    levels: Arc<HashMap<String, Level>>,
    location_aware: bool,
    records: Arc<Mutex<Vec<CapturedRecord>>>,
    created: Arc<AtomicUsize>,
}

impl Default for MemoryBackends {
    fn default() -> Self {
        Self {
            threshold: Level::Trace,
            levels: Arc::new(HashMap::new()),
            location_aware: false,
            records: Arc::new(Mutex::new(Vec::new())),
            created: Arc::new(AtomicUsize::new(0)),
        }
    }
}

impl MemoryBackends {
    /// 新しいMemoryBackendsを作成（全レベル有効）
    pub fn new() -> Self {
        Self::default()
    }

    /// 全ロガー共通のしきい値
    pub fn with_threshold(mut self, level: Level) -> Self {
        self.threshold = level;
        self
    }

    /// ロガー名ごとのしきい値
    pub fn with_level(mut self, name: impl Into<String>, level: Level) -> Self {
        Arc::make_mut(&mut self.levels).insert(name.into(), level);
        self
    }

    /// 位置情報対応として振る舞うか
    pub fn location_aware(mut self, enabled: bool) -> Self {
        self.location_aware = enabled;
        self
    }

    /// 保持しているログをすべて取得
    pub fn records(&self) -> Vec<CapturedRecord> {
        self.lock().clone()
    }

    /// 指定レベルのログのみ取得
    pub fn records_at(&self, level: Level) -> Vec<CapturedRecord> {
        self.lock()
            .iter()
            .filter(|record| record.level == level)
            .cloned()
            .collect()
    }

    pub fn clear(&self) {
        self.lock().clear();
    }

    /// これまでに生成したバックエンドの数
    pub fn created(&self) -> usize {
        self.created.load(Ordering::SeqCst)
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<CapturedRecord>> {
        // 書き込み中のパニックでログを失わないよう、ポイズンは無視する
        self.records.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn effective_level(&self, name: &str) -> Level {
        self.levels.get(name).copied().unwrap_or(self.threshold)
    }
}

impl BackendFactory for MemoryBackends {
    fn backend(&self, name: &str) -> Arc<dyn Backend> {
        self.created.fetch_add(1, Ordering::SeqCst);
        Arc::new(MemoryBackend {
            name: name.to_string(),
            level: self.effective_level(name),
            store: self.clone(),
        })
    }
}

/// 名前付きのメモリ保持バックエンド
#[derive(Debug)]
pub struct MemoryBackend {
    name: String,
    level: Level,
    store: MemoryBackends,
}

impl Backend for MemoryBackend {
    fn name(&self) -> &str {
        &self.name
    }

    fn is_enabled(&self, level: Level, _marker: Option<&Marker>) -> bool {
        level >= self.level
    }

    fn log(&self, record: &Record<'_>) {
        let captured = CapturedRecord {
            logger: self.name.clone(),
            level: record.level,
            marker: record.marker.map(|marker| marker.name().to_string()),
            message: record.render(),
            error: record.error.map(format::render_error_chain),
            caller: record.caller.map(str::to_string),
            location: record.location.copied(),
            logged_at: Local::now(),
        };
        self.store.lock().push(captured);
    }

    fn location_aware(&self) -> bool {
        self.store.location_aware
    }
}
