//! 日志初始化

use tracing_subscriber::EnvFilter;

/// 以默认级别 (info) 初始化日志
pub fn init() {
    init_with_verbosity(false);
}

/// 初始化日志，`verbose` 为真时默认级别为 debug
///
/// 设置了 `RUST_LOG` 时以其为准。日志写到 stderr，stdout 留给交互内容。
pub fn init_with_verbosity(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    // 测试中可能被多次调用
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
