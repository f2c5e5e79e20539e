//! エラー報告モジュール
//!
//! ERRORレベルのエラー付き出力を受け取り、設定された「抑制対象」の
//! エラー型であればINFOレベルの1行要約に降格する。抑制対象の型は
//! 初回の報告時に一度だけ解決され、見つからなければ以後降格は行われない。

use crate::callsite::CallSite;
use crate::format;
use crate::level::Level;
use crate::logger::{Entry, Logger};
use std::any::type_name;
use std::collections::HashMap;
use std::error::Error;
use std::fmt;
use std::sync::{Arc, OnceLock};
use tracing::debug;

type Predicate = dyn Fn(&(dyn Error + 'static)) -> bool + Send + Sync;

/// 抑制対象のエラー型
///
/// 1つ以上の具体的なエラー型（メンバー）か、任意の判定関数で構成する。
/// 要約に使う型名は、一致したメンバーの型名。判定関数でのみ一致した
/// 場合は、判定関数からは具体的な型を知り得ないため登録名を使う。
#[derive(Clone)]
pub struct SuppressibleType {
    name: String,
    members: Vec<Member>,
    predicate: Option<Arc<Predicate>>,
}

#[derive(Clone, Copy)]
struct Member {
    name: &'static str,
    matches: fn(&(dyn Error + 'static)) -> bool,
}

fn is<E: Error + 'static>(error: &(dyn Error + 'static)) -> bool {
    error.is::<E>()
}

impl SuppressibleType {
    /// 判定関数で対象を決めるSuppressibleTypeを作成
    pub fn new<F>(name: impl Into<String>, matches: F) -> Self
    where
        F: Fn(&(dyn Error + 'static)) -> bool + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            members: Vec::new(),
            predicate: Some(Arc::new(matches)),
        }
    }

    /// メンバーを持たない型の集まりを作成（`or` で追加する）
    pub fn family(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            members: Vec::new(),
            predicate: None,
        }
    }

    /// 具体的なエラー型 `E` を対象とする
    pub fn of<E: Error + 'static>() -> Self {
        Self::family(type_name::<E>()).or::<E>()
    }

    /// エラー型 `E` をメンバーに加える
    pub fn or<E: Error + 'static>(mut self) -> Self {
        self.members.push(Member {
            name: type_name::<E>(),
            matches: is::<E>,
        });
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    fn member(&self, error: &(dyn Error + 'static)) -> Option<&Member> {
        self.members.iter().find(|member| (member.matches)(error))
    }

    pub fn matches(&self, error: &(dyn Error + 'static)) -> bool {
        self.member(error).is_some()
            || self
                .predicate
                .as_ref()
                .is_some_and(|predicate| predicate(error))
    }

    /// スタックトレースを含まない1行の要約（`<型名>: <メッセージ>`）
    pub fn summarize(&self, error: &(dyn Error + 'static)) -> String {
        let type_name = self
            .member(error)
            .map_or(self.name.as_str(), |member| member.name);
        let message = error.to_string();
        let summary = if message.is_empty() {
            type_name.to_string()
        } else {
            format!("{}: {}", type_name, message)
        };
        single_line(&summary)
    }
}

impl fmt::Debug for SuppressibleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SuppressibleType")
            .field("name", &self.name)
            .field("members", &self.members.iter().map(|m| m.name).collect::<Vec<_>>())
            .field("predicate", &self.predicate.is_some())
            .finish()
    }
}

/// 改行（`\r\n`・`\r`・`\n`）をすべて空白1つに置き換える
fn single_line(text: &str) -> String {
    text.replace("\r\n", " ")
        .replace(|c: char| c == '\r' || c == '\n', " ")
}

/// 名前から抑制対象の型を解決する
///
/// 見つからない場合は `None` を返し、エラーにはしない。
pub trait TypeResolver: Send + Sync {
    fn resolve(&self, name: &str) -> Option<SuppressibleType>;
}

/// アプリケーションが登録したエラー型の一覧
///
/// # Example
///
/// ```
/// use sitelog::report::{ErrorTypeRegistry, TypeResolver};
/// use std::io;
///
/// let registry = ErrorTypeRegistry::new().register::<io::Error>("IoError");
/// assert!(registry.resolve("IoError").is_some());
/// assert!(registry.resolve("Missing").is_none());
/// ```
#[derive(Debug, Clone, Default)]
pub struct ErrorTypeRegistry {
    types: HashMap<String, SuppressibleType>,
}

impl ErrorTypeRegistry {
    /// 空のErrorTypeRegistryを作成
    pub fn new() -> Self {
        Self::default()
    }

    /// エラー型 `E` を `name` で登録する
    pub fn register<E: Error + 'static>(self, name: impl Into<String>) -> Self {
        self.register_type(name, SuppressibleType::of::<E>())
    }

    /// 任意の判定関数を `name` で登録する
    pub fn register_type(mut self, name: impl Into<String>, ty: SuppressibleType) -> Self {
        self.types.insert(name.into(), ty);
        self
    }
}

impl TypeResolver for ErrorTypeRegistry {
    fn resolve(&self, name: &str) -> Option<SuppressibleType> {
        self.types.get(name).cloned()
    }
}

/// 抑制対象の解決状態
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// まだ一度も報告されていない
    Unresolved,
    /// 解決済み（型名）
    Found(String),
    /// 解決済み（対象なし）
    Absent,
}

/// エラー報告
pub struct ErrorReporter {
    target: Option<String>,
    resolver: Arc<dyn TypeResolver>,
    resolved: OnceLock<Option<SuppressibleType>>,
}

impl ErrorReporter {
    /// 新しいErrorReporterを作成
    ///
    /// `target` は抑制対象の型名。`None` の場合は降格を行わない。
    pub fn new(target: Option<String>, resolver: Arc<dyn TypeResolver>) -> Self {
        Self {
            target,
            resolver,
            resolved: OnceLock::new(),
        }
    }

    /// 降格を行わないErrorReporter
    pub fn disabled() -> Self {
        Self::new(None, Arc::new(ErrorTypeRegistry::new()))
    }

    /// 現在の解決状態
    pub fn resolution(&self) -> Resolution {
        match self.resolved.get() {
            None => Resolution::Unresolved,
            Some(Some(ty)) => Resolution::Found(ty.name().to_string()),
            Some(None) => Resolution::Absent,
        }
    }

    fn suppressible(&self) -> Option<&SuppressibleType> {
        self.resolved
            .get_or_init(|| {
                let name = self.target.as_deref()?;
                let resolved = self.resolver.resolve(name);
                debug!(
                    target_type = name,
                    found = resolved.is_some(),
                    "抑制対象のエラー型を解決しました"
                );
                resolved
            })
            .as_ref()
    }

    /// INFOへ降格する場合はその要約を返す
    pub fn classify(&self, error: &(dyn Error + 'static)) -> Option<String> {
        self.suppressible()
            .filter(|ty| ty.matches(error))
            .map(|ty| ty.summarize(error))
    }

    /// エラーを報告する
    ///
    /// - 抑制対象: INFOで `<メッセージ> : <要約>`（メッセージなしなら要約のみ）、エラーは添付しない
    /// - それ以外: ERRORでメッセージ（なしならエラー自身の表示）とエラーを出力する
    pub fn report(
        &self,
        logger: &Logger,
        site: &CallSite,
        error: &(dyn Error + 'static),
        lead: Option<Entry<'_>>,
    ) {
        match (self.classify(error), lead) {
            (Some(summary), Some(entry)) => {
                let message = format!(
                    "{} : {}",
                    format::interpolate(entry.format, entry.args),
                    summary
                );
                let mut demoted = Entry::new(Level::Info, &message);
                if let Some(marker) = entry.marker {
                    demoted = demoted.marker(marker);
                }
                logger.log(site, demoted);
            }
            (Some(summary), None) => {
                logger.log(site, Entry::new(Level::Info, &summary));
            }
            (None, Some(entry)) => {
                logger.log(site, entry.level(Level::Error).error(error));
            }
            (None, None) => {
                let message = error.to_string();
                logger.log(site, Entry::new(Level::Error, &message).error(error));
            }
        }
    }
}

impl fmt::Debug for ErrorReporter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ErrorReporter")
            .field("target", &self.target)
            .field("resolution", &self.resolution())
            .finish()
    }
}
