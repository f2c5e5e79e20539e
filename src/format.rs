//! メッセージ整形モジュール
//!
//! `{}` プレースホルダーへの位置引数の埋め込みと、エラーの原因チェーンの文字列化。

use std::error::Error;
use std::fmt::{self, Display, Write};

const DELIM: &str = "{}";
const ESCAPE: char = '\\';

/// `{}` を引数で順に置き換える
///
/// - `\{}` はプレースホルダーとして扱わず、`{}` をそのまま出力する
/// - `\\{}` は `\` を1つ残したうえで引数を埋め込む
/// - 引数が足りない場合、残りのプレースホルダーはそのまま残る
/// - 余った引数は無視される
/// - 引数が空ならパターンをそのまま返す
pub fn interpolate(pattern: &str, args: &[&dyn Display]) -> String {
    if args.is_empty() {
        return pattern.to_string();
    }

    let mut out = String::with_capacity(pattern.len() + args.len() * 8);
    let mut rest = pattern;
    let mut next = 0;

    while next < args.len() {
        let Some(pos) = rest.find(DELIM) else {
            break;
        };
        let before = &rest[..pos];

        if before.ends_with(ESCAPE) {
            let trimmed = &before[..before.len() - ESCAPE.len_utf8()];
            out.push_str(trimmed);
            if trimmed.ends_with(ESCAPE) {
                // \\{} -> \ + 引数
                push_arg(&mut out, args[next]);
                next += 1;
            } else {
                out.push_str(DELIM);
            }
        } else {
            out.push_str(before);
            push_arg(&mut out, args[next]);
            next += 1;
        }

        rest = &rest[pos + DELIM.len()..];
    }

    out.push_str(rest);
    out
}

fn push_arg(out: &mut String, arg: &dyn Display) {
    // Stringへの書き込みは失敗しない
    let _ = write!(out, "{}", arg);
}

/// エラーを原因チェーン付きで文字列化する
///
/// 1行目はエラー自身の表示、以降は `source()` を辿って `Caused by: ...` を続ける。
pub fn render_error_chain(error: &(dyn Error + 'static)) -> String {
    ErrorChain(error).to_string()
}

/// `render_error_chain` の遅延版（`Display` として渡す用）
pub struct ErrorChain<'a>(pub &'a (dyn Error + 'static));

impl Display for ErrorChain<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)?;
        let mut source = self.0.source();
        while let Some(cause) = source {
            write!(f, "\nCaused by: {}", cause)?;
            source = cause.source();
        }
        Ok(())
    }
}
