//! 呼び出し元位置モジュール
//!
//! スタックを辿る代わりに、マクロ展開時（`callsite!`）または
//! `#[track_caller]` で呼び出し元を確定させる。

use std::fmt;
use std::panic::Location;

/// 呼び出し元の位置情報
///
/// `module` はロガーキャッシュのキー、および推論されたロガー名として使われる。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CallSite {
    /// モジュールパス（例: `app::net::conn`）
    pub module: &'static str,
    /// 関数名。取得できない場合は空文字列
    pub function: &'static str,
    /// ソースファイルパス
    pub file: &'static str,
    /// 行番号
    pub line: u32,
}

impl CallSite {
    /// 新しいCallSiteを作成
    pub const fn new(
        module: &'static str,
        function: &'static str,
        file: &'static str,
        line: u32,
    ) -> Self {
        Self {
            module,
            function,
            file,
            line,
        }
    }

    /// `#[track_caller]` の位置情報から作成
    ///
    /// モジュールパスは得られないため、ファイルパスをモジュール名として扱う。
    pub fn from_location(location: &'static Location<'static>) -> Self {
        Self {
            module: location.file(),
            function: "",
            file: location.file(),
            line: location.line(),
        }
    }

    /// この関数の呼び出し元
    #[track_caller]
    pub fn caller() -> Self {
        Self::from_location(Location::caller())
    }
}

impl fmt::Display for CallSite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.function.is_empty() {
            write!(f, "{}({})", self.module, self.line)
        } else {
            write!(f, "{}.{}({})", self.module, self.function, self.line)
        }
    }
}

/// `callsite!` が埋め込む内部関数の型名から、外側の関数名を取り出す
#[doc(hidden)]
pub fn function_name<T>(_: T) -> &'static str {
    let name = std::any::type_name::<T>();
    let mut name = name.strip_suffix("::__here").unwrap_or(name);
    while let Some(outer) = name.strip_suffix("::{{closure}}") {
        name = outer;
    }
    name.rsplit("::").next().unwrap_or(name)
}

/// 現在の呼び出し位置を `CallSite` として取得する
#[macro_export]
macro_rules! callsite {
    () => {{
        fn __here() {}
        $crate::CallSite::new(
            ::core::module_path!(),
            $crate::__private::function_name(__here),
            ::core::file!(),
            ::core::line!(),
        )
    }};
}

#[cfg(test)]
mod tests {
    use super::*;

    fn site_from_named_function() -> CallSite {
        crate::callsite!()
    }

    #[test]
    fn test_callsite_macro_captures_module_and_function() {
        let site = site_from_named_function();
        assert_eq!(site.module, "sitelog::callsite::tests");
        assert_eq!(site.function, "site_from_named_function");
        assert!(site.file.ends_with("callsite.rs"));
    }

    #[test]
    fn test_callsite_macro_captures_line() {
        let (site, line) = (crate::callsite!(), line!());
        assert_eq!(site.line, line);
    }

    #[test]
    fn test_callsite_inside_closure_reports_enclosing_function() {
        let capture = || crate::callsite!();
        let site = capture();
        assert_eq!(
            site.function,
            "test_callsite_inside_closure_reports_enclosing_function"
        );
    }

    #[test]
    fn test_callsite_display() {
        let site = CallSite::new("app::net", "connect", "src/net.rs", 42);
        assert_eq!(site.to_string(), "app::net.connect(42)");
    }

    #[test]
    fn test_callsite_display_without_function() {
        let site = CallSite::new("src/net.rs", "", "src/net.rs", 7);
        assert_eq!(site.to_string(), "src/net.rs(7)");
    }

    #[test]
    fn test_caller_uses_track_caller_location() {
        let (site, line) = (CallSite::caller(), line!());
        assert!(site.file.ends_with("callsite.rs"));
        assert_eq!(site.module, site.file);
        assert_eq!(site.line, line);
        assert!(site.function.is_empty());
    }

    #[test]
    fn test_function_name_strips_helper_suffix() {
        fn __here() {}
        assert_eq!(
            function_name(__here),
            "test_function_name_strips_helper_suffix"
        );
    }
}
