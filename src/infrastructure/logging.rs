/// ログ基盤モジュール
///
/// CloudWatch Logs向けにJSON形式の構造化ログを出力する。
/// 各Lambdaバイナリはmainの先頭で`init_logging`を呼び出す。
use std::sync::Once;

use tracing::Subscriber;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

static INIT: Once = Once::new();

/// デフォルトのログレベル
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// `RUST_LOG`からフィルターを作成（未設定・不正なら`default_level`）
fn env_filter(default_level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level))
}

/// 1イベント1行のJSONレイヤー
///
/// フィールドはトップレベルに展開し、target・ファイル名・行番号を付与する。
fn json_layer<S, W>(writer: W) -> impl Layer<S>
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    tracing_subscriber::fmt::layer()
        .json()
        .with_target(true)
        .with_file(true)
        .with_line_number(true)
        .flatten_event(true)
        .with_current_span(false)
        .with_writer(writer)
}

/// JSON形式のログサブスクライバーを標準出力に初期化する
///
/// 2回目以降の呼び出しは何もしない。
pub fn init_logging() {
    INIT.call_once(|| {
        // 既に別のサブスクライバーが設定済みなら無視する
        let _ = tracing_subscriber::registry()
            .with(env_filter(DEFAULT_LOG_LEVEL))
            .with(json_layer(std::io::stdout))
            .try_init();
    });
}

/// テスト用のログサブスクライバーを初期化する（人間が読みやすい形式）
#[cfg(test)]
pub fn init_test_logging() {
    static TEST_INIT: Once = Once::new();

    TEST_INIT.call_once(|| {
        let fmt_layer = tracing_subscriber::fmt::layer()
            .with_test_writer()
            .with_target(true)
            .compact();

        let _ = tracing_subscriber::registry()
            .with(env_filter("debug"))
            .with(fmt_layer)
            .try_init();
    });
}
