//! 公開マクロ
//!
//! 出力先（`LogContext` または `Logger`）を第1引数に取る。メッセージは
//! `{}` を位置引数で置き換える形式で、マーカーとエラーは任意の前置きで渡す。
//!
//! ```
//! use sitelog::backend::MemoryBackends;
//! use sitelog::report::ErrorTypeRegistry;
//! use sitelog::{info, Config, LogContext};
//! use std::sync::Arc;
//!
//! let backends = MemoryBackends::new();
//! let ctx = LogContext::new(
//!     &Config::default(),
//!     Arc::new(backends.clone()),
//!     Arc::new(ErrorTypeRegistry::new()),
//! );
//! info!(ctx, "{} 件処理しました", 3);
//! assert!(backends.records()[0].message.ends_with("-3 件処理しました"));
//! ```

/// 指定レベルで出力する
///
/// - `log!(target, level, "fmt {}", arg)`
/// - `log!(target, level, marker: &m, "fmt {}", arg)`
/// - `log!(target, level, err: &e, "fmt {}", arg)`
/// - `log!(target, level, marker: &m, err: &e, "fmt {}", arg)`
#[macro_export]
macro_rules! log {
    ($target:expr, $level:expr, marker: $marker:expr, err: $err:expr, $fmt:expr $(, $arg:expr)* $(,)?) => {
        $crate::__emit!(
            $target,
            $crate::Entry::new($level, $fmt).marker($marker).error($err)
            $(, $arg)*
        )
    };
    ($target:expr, $level:expr, marker: $marker:expr, $fmt:expr $(, $arg:expr)* $(,)?) => {
        $crate::__emit!($target, $crate::Entry::new($level, $fmt).marker($marker) $(, $arg)*)
    };
    ($target:expr, $level:expr, err: $err:expr, $fmt:expr $(, $arg:expr)* $(,)?) => {
        $crate::__emit!($target, $crate::Entry::new($level, $fmt).error($err) $(, $arg)*)
    };
    ($target:expr, $level:expr, $fmt:expr $(, $arg:expr)* $(,)?) => {
        $crate::__emit!($target, $crate::Entry::new($level, $fmt) $(, $arg)*)
    };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __emit {
    ($target:expr, $entry:expr $(, $arg:expr)*) => {{
        #[allow(unused_imports)]
        use $crate::Emit as _;
        ($target).emit(
            &$crate::callsite!(),
            ($entry).args(&[$(&$arg as &dyn ::core::fmt::Display),*]),
        )
    }};
}

/// 呼び出し位置のモジュールに対応するキャッシュ済みロガーを取得する
#[macro_export]
macro_rules! logger {
    ($ctx:expr) => {
        ($ctx).logger(&$crate::callsite!())
    };
}

/// エラーを報告する（抑制対象ならINFOへ降格）
///
/// - `report!(ctx, &err)`
/// - `report!(ctx, &err, "message")`
#[macro_export]
macro_rules! report {
    ($ctx:expr, $err:expr $(,)?) => {
        ($ctx).report(&$crate::callsite!(), $err)
    };
    ($ctx:expr, $err:expr, $message:expr $(,)?) => {
        ($ctx).report_error(&$crate::callsite!(), $message, $err)
    };
}

// 入れ子の macro_rules で `$` を使うための補助
macro_rules! with_dollar_sign {
    ($($body:tt)*) => {
        macro_rules! __with_dollar_sign { $($body)* }
        __with_dollar_sign!($);
    };
}

macro_rules! define_level_macro {
    ($name:ident, $level:ident) => {
        with_dollar_sign! {
            ($d:tt) => {
                #[doc = concat!("`", stringify!($level), "` レベルで出力する（`log!` と同じ引数）")]
                #[macro_export]
                macro_rules! $name {
                    ($d target:expr, $d($d rest:tt)+) => {
                        $crate::log!($d target, $crate::Level::$level, $d($d rest)+)
                    };
                }
            }
        }
    };
}

define_level_macro!(trace, Trace);
define_level_macro!(debug, Debug);
define_level_macro!(info, Info);
define_level_macro!(warn, Warn);
define_level_macro!(error, Error);
