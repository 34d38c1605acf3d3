//! 提示词模板

use crate::models::{CandidateProfile, InterviewStage};

/// 测验题生成提示词
///
/// 要求每题 4 个选项 (a-d)，末尾以 `**Correct Answer: a)**` 给出答案，
/// 与 [`crate::services::quiz_parser`] 的解析格式对应
pub fn quiz_prompt(profile: &CandidateProfile, count: usize) -> String {
    format!(
        r#"Generate {count} multiple-choice questions (MCQs) to help a student practice technical concepts based on the following skill set, tools, technologies, and projects.

📌 Focus ONLY on:
- Programming languages (e.g., Python, JavaScript)
- Frameworks and libraries (e.g., React, Node.js)
- Databases or APIs (e.g., MongoDB, SQL, REST, Gemini API)
- Concepts used in the listed projects (e.g., CRUD, authentication, AI integration)
- Logic and syntax-based questions related to these technologies

❌ Do NOT mention anything about the candidate, resume, name, email, GitHub, or LinkedIn.

💡 Treat this as a **student's technical profile** and generate MCQs only for skill testing.

Each question should:
- Start on a new line with its number, like "1. "
- Be short and clear
- Include 4 options (a, b, c, d), one per line
- Add the correct option at the end of the list like this: **Correct Answer: a)**

Here is the technical profile:
{profile}"#,
        count = count,
        profile = profile.summary_for_prompt()
    )
}

/// 面试开场提示词
pub fn interview_opening_prompt(profile: &CandidateProfile) -> String {
    format!(
        r#"You are a friendly and professional AI interviewer.

Start the mock interview with a warm greeting and a general opening question like "Can you introduce yourself?".

Then, based on the following candidate profile:
{profile}

Follow this question pattern:
1. {intro}
2. {skills}
3. {projects}
4. {experience}
5. {behavioral}

Ask one question at a time. Do not base the next question on the user's answer."#,
        profile = profile.summary_for_prompt(),
        intro = InterviewStage::Introduction,
        skills = InterviewStage::SkillsAndTools,
        projects = InterviewStage::Projects,
        experience = InterviewStage::Experience,
        behavioral = InterviewStage::Behavioral,
    )
}

/// 点评回答并给出下一题
pub fn feedback_prompt(
    profile: &CandidateProfile,
    question: &str,
    answer: &str,
    next_stage: InterviewStage,
) -> String {
    format!(
        r#"Interview question: "{question}"
Candidate's answer: "{answer}"

Give a short feedback (1-2 lines), then ask the next interview question. The next question belongs to the "{stage}" part of the interview and should be based on this candidate profile:
{profile}"#,
        question = question.trim(),
        answer = answer.trim(),
        stage = next_stage,
        profile = profile.summary_for_prompt()
    )
}

/// 最后一题：只点评并结束面试
pub fn closing_prompt(question: &str, answer: &str) -> String {
    format!(
        r#"Interview question: "{question}"
Candidate's answer: "{answer}"

This was the last question. Give a short feedback (1-2 lines) on the answer, then close the interview with one encouraging sentence and a brief overall suggestion for improvement. Do not ask another question."#,
        question = question.trim(),
        answer = answer.trim()
    )
}
