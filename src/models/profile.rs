use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::AppResult;

/// 候选人资料：简历文本与可选的岗位描述
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CandidateProfile {
    pub resume_text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job_description: Option<String>,
}

impl CandidateProfile {
    pub fn new(resume_text: impl Into<String>, job_description: Option<String>) -> Self {
        Self {
            resume_text: resume_text.into().trim().to_string(),
            job_description: job_description
                .map(|jd| jd.trim().to_string())
                .filter(|jd| !jd.is_empty()),
        }
    }

    /// 从简历 / 岗位描述文件加载，见 [`crate::models::load_candidate_profile`]
    pub async fn load(resume: Option<&Path>, job_description: Option<&Path>) -> AppResult<Self> {
        super::loaders::load_candidate_profile(resume, job_description).await
    }

    pub fn has_resume(&self) -> bool {
        !self.resume_text.is_empty()
    }

    /// 简历和岗位描述都为空
    pub fn is_empty(&self) -> bool {
        !self.has_resume() && self.job_description.is_none()
    }

    /// 拼接用于提示词的资料段落
    pub fn summary_for_prompt(&self) -> String {
        let mut sections = Vec::new();
        if self.has_resume() {
            sections.push(format!("Resume:\n{}", self.resume_text));
        }
        if let Some(jd) = &self.job_description {
            sections.push(format!("Job description:\n{}", jd));
        }
        sections.join("\n\n")
    }
}
