//! ログインフラモジュール

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// フィルタを組み立てる
///
/// RUST_LOG環境変数が設定されていればそちらを優先し、
/// 無ければ `default` （設定ファイルやCLIの指定）を使う。
pub fn env_filter(default: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default))
}

/// ログシステムを初期化
///
/// `log` クレートからのレコードも同じサブスクライバーへ流れる
/// （`TracingBackends` はロガー名をターゲットとして `log` 経由で出力する）。
///
/// プロセス中で1度だけ呼ぶこと。2回目以降は何もしない。
pub fn init(default: &str) {
    let _ = tracing_subscriber::registry()
        .with(env_filter(default))
        .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
        .try_init();
}
