//! ロガーファクトリモジュール
//!
//! 型・名前・呼び出し元からロガーハンドルを生成する。呼び出し元の推定は
//! `#[track_caller]` で行い、ファクトリの外側で最初に現れた呼び出し位置を採用する。

use crate::backend::BackendFactory;
use crate::callsite::CallSite;
use crate::decorate::Decorator;
use crate::logger::Logger;
use std::any::type_name;
use std::fmt;
use std::panic::Location;
use std::path::{Component, Path};
use std::sync::Arc;

/// 呼び出し元を推定できない場合のロガー名
pub const DEFAULT_LOGGER_NAME: &str = "sitelog";

/// ロガーファクトリ
#[derive(Clone)]
pub struct LoggerFactory {
    backends: Arc<dyn BackendFactory>,
    decorator: Decorator,
    default_name: String,
}

impl LoggerFactory {
    /// 新しいLoggerFactoryを作成
    pub fn new(backends: Arc<dyn BackendFactory>, decorator: Decorator) -> Self {
        Self {
            backends,
            decorator,
            default_name: DEFAULT_LOGGER_NAME.to_string(),
        }
    }

    /// 呼び出し元を推定できない場合のロガー名を変更する
    pub fn with_default_name(mut self, name: impl Into<String>) -> Self {
        self.default_name = name.into();
        self
    }

    pub fn default_name(&self) -> &str {
        &self.default_name
    }

    /// 型名をロガー名とするロガー
    pub fn for_type<T: ?Sized>(&self) -> Logger {
        self.named(type_name::<T>())
    }

    /// 指定した名前のロガー
    ///
    /// 空文字列の場合は呼び出し元から名前を推定する。
    #[track_caller]
    pub fn for_name(&self, name: &str) -> Logger {
        if name.is_empty() {
            return self.for_caller();
        }
        self.named(name)
    }

    /// 呼び出し元のソースパスから名前を推定したロガー
    #[track_caller]
    pub fn for_caller(&self) -> Logger {
        let name =
            caller_name(Location::caller().file()).unwrap_or_else(|| self.default_name.clone());
        self.named(&name)
    }

    /// 呼び出し位置のモジュール名をロガー名とするロガー
    pub fn for_call_site(&self, site: &CallSite) -> Logger {
        if site.module.is_empty() {
            return self.named(&self.default_name);
        }
        self.named(site.module)
    }

    /// 呼び出し元 `T` の識別名を保持したロガー（ロガー名も `T`）
    pub fn preserved_caller<T: ?Sized>(&self) -> Logger {
        self.preserved(type_name::<T>(), type_name::<T>())
    }

    /// 呼び出し元 `T` の識別名を保持し、バックエンドは `backend_name` で解決するロガー
    pub fn preserved_caller_named<T: ?Sized>(&self, backend_name: &str) -> Logger {
        self.preserved(type_name::<T>(), backend_name)
    }

    /// 識別名とロガー名を個別に指定して生成する
    pub fn preserved(&self, caller: &str, backend_name: &str) -> Logger {
        Logger::new(
            self.backends.backend(backend_name),
            Some(caller.to_string()),
            self.decorator,
        )
    }

    fn named(&self, name: &str) -> Logger {
        Logger::new(self.backends.backend(name), None, self.decorator)
    }
}

impl fmt::Debug for LoggerFactory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoggerFactory")
            .field("decorator", &self.decorator)
            .field("default_name", &self.default_name)
            .finish_non_exhaustive()
    }
}

/// ソースパスからモジュール風の名前を組み立てる
///
/// `src/net/conn.rs` → `net::conn`、`src/net/mod.rs` → `net`。
/// `src/lib.rs` や `src/main.rs` のようにクレート直下のファイルは
/// ファイル名（拡張子なし）を返す。名前が作れない場合は `None`。
fn caller_name(file: &str) -> Option<String> {
    let path = Path::new(file).with_extension("");
    let mut segments: Vec<String> = path
        .components()
        .filter_map(|component| match component {
            Component::Normal(part) => part.to_str().map(str::to_owned),
            _ => None,
        })
        .collect();

    if let Some(pos) = segments.iter().rposition(|part| part == "src") {
        segments.drain(..=pos);
    }
    if segments.len() > 1 && segments.last().is_some_and(|part| part == "mod") {
        segments.pop();
    }

    let name = segments.join("::");
    (!name.is_empty()).then_some(name)
}
