/// 日志工具模块
///
/// 提供会话日志文件和日志格式化的辅助函数
use std::fs::{self, OpenOptions};
use std::io::Write;

use tracing::info;

use crate::error::{AppError, AppResult};

/// 初始化会话日志文件
///
/// # 参数
/// - `log_file_path`: 日志文件路径
/// - `mode`: 会话类型（面试 / 测验）
pub fn init_log_file(log_file_path: &str, mode: &str) -> AppResult<()> {
    let log_header = format!(
        "{}\n{}日志 - {}\n{}\n\n",
        "=".repeat(60),
        mode,
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
        "=".repeat(60)
    );
    fs::write(log_file_path, log_header)
        .map_err(|e| AppError::file_write_failed(log_file_path, e))
}

/// 向会话日志追加一段记录
pub fn append_log(log_file_path: &str, label: &str, text: &str) -> AppResult<()> {
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_file_path)
        .map_err(|e| AppError::file_write_failed(log_file_path, e))?;

    let entry = format!(
        "[{}] {}:\n{}\n\n",
        chrono::Local::now().format("%H:%M:%S"),
        label,
        text.trim()
    );
    file.write_all(entry.as_bytes())
        .map_err(|e| AppError::file_write_failed(log_file_path, e))
}

/// 记录程序启动信息
pub fn log_startup(mode: &str, provider: &str, model: &str) {
    info!("{}", "=".repeat(60));
    info!("🚀 程序启动 - {}模式", mode);
    info!("🤖 模型: {} ({})", model, provider);
    info!("{}", "=".repeat(60));
}

/// 截断长文本用于日志显示
///
/// # 参数
/// - `text`: 原始文本
/// - `max_len`: 最大字符数
pub fn truncate_text(text: &str, max_len: usize) -> String {
    if text.chars().count() > max_len {
        text.chars().take(max_len).collect::<String>() + "..."
    } else {
        text.to_string()
    }
}
