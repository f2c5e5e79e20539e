//! 呼び出し元装飾モジュール
//!
//! バックエンドが位置情報を扱えない場合、メッセージの先頭に
//! `[<スレッド名> <スレッドID>]-[<モジュール>.<関数>(<行>)]-` を付与する。

use crate::callsite::CallSite;
use std::borrow::Cow;
use std::sync::atomic::{AtomicU64, Ordering};
use std::thread;

/// プラットフォームの改行コード
#[cfg(windows)]
pub const LINE_SEPARATOR: &str = "\r\n";
#[cfg(not(windows))]
pub const LINE_SEPARATOR: &str = "\n";

/// 名前のないスレッドの表示名
pub const UNNAMED_THREAD: &str = "<unnamed>";

static NEXT_THREAD_ID: AtomicU64 = AtomicU64::new(1);

thread_local! {
    static THREAD_ID: u64 = NEXT_THREAD_ID.fetch_add(1, Ordering::Relaxed);
}

/// 現在のスレッドの数値ID
///
/// 初回呼び出し時に採番され、スレッドの生存中は変わらない。
pub fn current_thread_id() -> u64 {
    THREAD_ID.with(|id| *id)
}

/// メッセージ装飾
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Decorator {
    remove_line_breaks: bool,
}

impl Decorator {
    /// 新しいDecoratorを作成
    pub const fn new(remove_line_breaks: bool) -> Self {
        Self { remove_line_breaks }
    }

    pub const fn removes_line_breaks(&self) -> bool {
        self.remove_line_breaks
    }

    /// メッセージ（またはフォーマット文字列）を装飾する
    ///
    /// `location_aware` が真の場合、位置情報はバックエンド側で付与されるため
    /// 改行除去のみ行う。
    pub fn decorate<'a>(
        &self,
        message: &'a str,
        site: &CallSite,
        location_aware: bool,
    ) -> Cow<'a, str> {
        let body = if self.remove_line_breaks {
            strip_line_breaks(message)
        } else {
            Cow::Borrowed(message)
        };

        if location_aware {
            return body;
        }

        let current = thread::current();
        let thread_name = current.name().unwrap_or(UNNAMED_THREAD);
        Cow::Owned(format!(
            "[{} {}]-[{}]-{}",
            thread_name,
            current_thread_id(),
            site,
            body
        ))
    }
}

/// 改行コードを空白1つに置き換える
pub fn strip_line_breaks(message: &str) -> Cow<'_, str> {
    if message.contains(LINE_SEPARATOR) {
        Cow::Owned(message.replace(LINE_SEPARATOR, " "))
    } else {
        Cow::Borrowed(message)
    }
}
