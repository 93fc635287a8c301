//! Caller-facing operations. Each one assembles a field bag from typed inputs
//! and hands it to the Prompt Router.

use serde::{Deserialize, Serialize};

use crate::chat::ChatHistory;
use crate::errors::AppError;
use crate::generation::kinds::RequestKind;
use crate::generation::render::FieldBag;
use crate::generation::router::PromptRouter;

/// Resume sections supplied for best-ATS resume generation.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ResumeSections {
    #[serde(default)]
    pub introduction: String,
    #[serde(default)]
    pub education: String,
    #[serde(default)]
    pub skills: String,
    #[serde(default)]
    pub experience: String,
    #[serde(default)]
    pub projects: String,
}

/// Applicant details for a cover letter. Study fields are optional.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CoverLetterDetails {
    #[serde(default)]
    pub full_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone_number: String,
    pub higher_study: Option<String>,
    pub university: Option<String>,
    pub course: Option<String>,
}

/// Work arrangement filter for opportunity search. Lowercase labels are accepted too.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WorkType {
    #[serde(alias = "onsite")]
    Onsite,
    #[serde(alias = "hybrid")]
    Hybrid,
    #[serde(alias = "remote")]
    Remote,
}

impl WorkType {
    pub fn as_str(&self) -> &'static str {
        match self {
            WorkType::Onsite => "Onsite",
            WorkType::Hybrid => "Hybrid",
            WorkType::Remote => "Remote",
        }
    }
}

pub async fn analyze_resume(
    router: &PromptRouter,
    job_description: &str,
    resume_text: &str,
) -> Result<String, AppError> {
    let fields = resume_fields(job_description, resume_text);
    router.generate(RequestKind::ResumeAnalysis, &fields).await
}

pub async fn match_score(
    router: &PromptRouter,
    job_description: &str,
    resume_text: &str,
) -> Result<String, AppError> {
    let fields = resume_fields(job_description, resume_text);
    router.generate(RequestKind::MatchScore, &fields).await
}

fn resume_fields(job_description: &str, resume_text: &str) -> FieldBag {
    let mut fields = FieldBag::new();
    fields
        .insert("job_description", job_description)
        .insert("resume_text", resume_text);
    fields
}

pub async fn generate_best_ats_resume(
    router: &PromptRouter,
    job_details: &str,
    sections: &ResumeSections,
) -> Result<String, AppError> {
    let mut fields = FieldBag::new();
    fields
        .insert("job_details", job_details)
        .insert("introduction", sections.introduction.as_str())
        .insert("education", sections.education.as_str())
        .insert("skills", sections.skills.as_str())
        .insert("experience", sections.experience.as_str())
        .insert("projects", sections.projects.as_str());
    router.generate(RequestKind::BestAtsResume, &fields).await
}

/// Checks run in form order: job details, name and email must be present before the
/// email format is checked, and the format is checked before the phone number.
pub async fn generate_cover_letter(
    router: &PromptRouter,
    job_details: &str,
    details: &CoverLetterDetails,
) -> Result<String, AppError> {
    let mut fields = FieldBag::new();
    fields
        .insert("job_details", job_details)
        .insert("full_name", details.full_name.as_str())
        .insert("email", details.email.as_str())
        .insert("phone_number", details.phone_number.as_str())
        .insert_opt("higher_study", details.higher_study.as_deref())
        .insert_opt("university", details.university.as_deref())
        .insert_opt("course", details.course.as_deref());

    let email_reached = [job_details, details.full_name.as_str(), details.email.as_str()]
        .iter()
        .all(|value| !value.trim().is_empty());
    if email_reached && !looks_like_email(&details.email) {
        return Err(AppError::Validation(
            "Please enter a valid email address.".to_string(),
        ));
    }

    router.generate(RequestKind::CoverLetter, &fields).await
}

fn looks_like_email(email: &str) -> bool {
    email.contains('@') && email.contains('.')
}

/// Job/internship search. Blank or absent filters mean "any".
pub async fn find_opportunities(
    router: &PromptRouter,
    job_title: &str,
    country: Option<&str>,
    work_type: Option<WorkType>,
) -> Result<String, AppError> {
    let mut fields = FieldBag::new();
    fields
        .insert("job_title", job_title)
        .insert_opt("country", country)
        .insert_opt("work_type", work_type.map(|w| w.as_str()));
    router.generate(RequestKind::Opportunities, &fields).await
}

pub async fn chat(
    router: &PromptRouter,
    message: &str,
    history: &ChatHistory,
) -> Result<String, AppError> {
    router.chat(message, history).await
}
