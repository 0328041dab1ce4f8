use tracing_subscriber::EnvFilter;

/// stderr へログを出す。標準出力は画面表示に使う。
///
/// `RUST_LOG` が無ければ `warn`、`verbose` なら `debug`。
pub fn init(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    // テストなどで二重に初期化された場合は既存の設定を使う
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .try_init();
}
