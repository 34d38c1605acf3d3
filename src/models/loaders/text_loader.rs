use std::path::Path;

use tokio::fs;
use tracing::{debug, info};

use crate::error::{AppError, AppResult, SessionError};
use crate::models::profile::CandidateProfile;

/// 读取纯文本文件（简历 / 岗位描述）
pub async fn load_text_file(path: &Path) -> AppResult<String> {
    let content = fs::read_to_string(path)
        .await
        .map_err(|e| AppError::file_read_failed(path.display().to_string(), e))?;
    debug!("已读取 {}: {} 字符", path.display(), content.chars().count());
    Ok(content)
}

/// 从简历和岗位描述文件构建候选人资料
///
/// 两者都可省略，但至少要有一个非空
pub async fn load_candidate_profile(
    resume_path: Option<&Path>,
    job_description_path: Option<&Path>,
) -> AppResult<CandidateProfile> {
    let resume_text = match resume_path {
        Some(path) => load_text_file(path).await?,
        None => String::new(),
    };
    let job_description = match job_description_path {
        Some(path) => Some(load_text_file(path).await?),
        None => None,
    };

    let profile = CandidateProfile::new(resume_text, job_description);
    if profile.is_empty() {
        return Err(SessionError::EmptyProfile.into());
    }

    info!(
        "✓ 已加载候选人资料 (简历: {} 字符, 岗位描述: {})",
        profile.resume_text.chars().count(),
        if profile.job_description.is_some() { "有" } else { "无" }
    );
    Ok(profile)
}
