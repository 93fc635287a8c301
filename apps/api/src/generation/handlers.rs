//! Axum route handlers for the Generation API.

use axum::{
    extract::{FromRequest, Multipart, Path, State},
    Json,
};
use bytes::Bytes;
use serde::{Deserialize, Serialize};

use crate::chat::ChatHistory;
use crate::errors::AppError;
use crate::extraction::extract_document_text;
use crate::generation::kinds::{FieldSpec, RequestKind};
use crate::generation::operations::{self, CoverLetterDetails, ResumeSections, WorkType};
use crate::generation::render::FieldBag;
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct GenerationResponse {
    pub kind: RequestKind,
    pub text: String,
}

impl GenerationResponse {
    fn new(kind: RequestKind, text: String) -> Json<Self> {
        Json(Self { kind, text })
    }
}

#[derive(Debug, Serialize)]
pub struct KindSchema {
    pub kind: RequestKind,
    pub fields: &'static [FieldSpec],
}

#[derive(Debug, Deserialize)]
pub struct BestAtsResumeRequest {
    #[serde(default)]
    pub job_details: String,
    #[serde(flatten)]
    pub sections: ResumeSections,
}

#[derive(Debug, Deserialize)]
pub struct CoverLetterRequest {
    #[serde(default)]
    pub job_details: String,
    #[serde(flatten)]
    pub details: CoverLetterDetails,
}

#[derive(Debug, Deserialize)]
pub struct OpportunitiesRequest {
    #[serde(default)]
    pub job_title: String,
    pub country: Option<String>,
    pub work_type: Option<WorkType>,
}

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub history: ChatHistory,
}

#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub reply: String,
    pub history: ChatHistory,
}

/// JSON body extractor whose rejections use the `AppError` envelope.
#[derive(FromRequest)]
#[from_request(via(Json), rejection(AppError))]
pub struct ApiJson<T>(pub T);

/// Text fields plus the uploaded resume from a multipart resume form.
struct ResumeUpload {
    job_description: String,
    resume: Option<Bytes>,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// GET /api/v1/kinds
///
/// Lists every request kind with its field schema.
pub async fn handle_list_kinds() -> Json<Vec<KindSchema>> {
    Json(
        RequestKind::ALL
            .into_iter()
            .map(|kind| KindSchema {
                kind,
                fields: kind.fields(),
            })
            .collect(),
    )
}

/// POST /api/v1/generate/:kind
///
/// Generic entry point: the body is a JSON object of field name → text.
pub async fn handle_generate(
    State(state): State<AppState>,
    Path(tag): Path<String>,
    ApiJson(fields): ApiJson<FieldBag>,
) -> Result<Json<GenerationResponse>, AppError> {
    let (kind, text) = state.router.generate_tagged(&tag, &fields).await?;
    Ok(GenerationResponse::new(kind, text))
}

/// POST /api/v1/resume/analyze
///
/// Multipart: `job_description` text + `resume` PDF.
pub async fn handle_analyze_resume(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<GenerationResponse>, AppError> {
    let (job_description, resume_text) = read_resume_upload(&state, RequestKind::ResumeAnalysis, multipart).await?;
    let text = operations::analyze_resume(&state.router, &job_description, &resume_text).await?;
    Ok(GenerationResponse::new(RequestKind::ResumeAnalysis, text))
}

/// POST /api/v1/resume/match-score
///
/// Multipart: `job_description` text + `resume` PDF.
pub async fn handle_match_score(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<GenerationResponse>, AppError> {
    let (job_description, resume_text) = read_resume_upload(&state, RequestKind::MatchScore, multipart).await?;
    let text = operations::match_score(&state.router, &job_description, &resume_text).await?;
    Ok(GenerationResponse::new(RequestKind::MatchScore, text))
}

/// POST /api/v1/resume/generate
pub async fn handle_best_ats_resume(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<BestAtsResumeRequest>,
) -> Result<Json<GenerationResponse>, AppError> {
    let text =
        operations::generate_best_ats_resume(&state.router, &request.job_details, &request.sections)
            .await?;
    Ok(GenerationResponse::new(RequestKind::BestAtsResume, text))
}

/// POST /api/v1/cover-letter
pub async fn handle_cover_letter(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<CoverLetterRequest>,
) -> Result<Json<GenerationResponse>, AppError> {
    let text =
        operations::generate_cover_letter(&state.router, &request.job_details, &request.details)
            .await?;
    Ok(GenerationResponse::new(RequestKind::CoverLetter, text))
}

/// POST /api/v1/opportunities
pub async fn handle_opportunities(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<OpportunitiesRequest>,
) -> Result<Json<GenerationResponse>, AppError> {
    let text = operations::find_opportunities(
        &state.router,
        &request.job_title,
        request.country.as_deref(),
        request.work_type,
    )
    .await?;
    Ok(GenerationResponse::new(RequestKind::Opportunities, text))
}

/// POST /api/v1/chat
///
/// Returns the reply and the caller's history with both new turns appended.
pub async fn handle_chat(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<ChatRequest>,
) -> Result<Json<ChatResponse>, AppError> {
    let ChatRequest {
        message,
        mut history,
    } = request;

    let reply = operations::chat(&state.router, &message, &history).await?;

    history.push_user(message);
    history.push_assistant(reply.clone());
    Ok(Json(ChatResponse { reply, history }))
}

// ────────────────────────────────────────────────────────────────────────────
// Multipart helpers
// ────────────────────────────────────────────────────────────────────────────

/// Reads the resume form and extracts the PDF text.
/// Fails before any parsing or generation when the upload or job description is
/// missing, and before generation when the PDF is unreadable.
async fn read_resume_upload(
    state: &AppState,
    kind: RequestKind,
    multipart: Multipart,
) -> Result<(String, String), AppError> {
    let upload = collect_resume_upload(multipart).await?;
    let pdf = upload
        .resume
        .ok_or_else(|| AppError::Validation("Please upload your resume to proceed.".to_string()))?;
    if upload.job_description.trim().is_empty() {
        return Err(AppError::MissingFields {
            kind,
            missing_keys: vec!["job_description".to_string()],
        });
    }
    let resume_text = extract_document_text(state.extractor.clone(), pdf).await?;
    Ok((upload.job_description, resume_text))
}

async fn collect_resume_upload(mut multipart: Multipart) -> Result<ResumeUpload, AppError> {
    let mut upload = ResumeUpload {
        job_description: String::new(),
        resume: None,
    };

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Malformed multipart body: {e}")))?
    {
        let name = field.name().map(str::to_owned);
        match name.as_deref() {
            Some("job_description") => {
                upload.job_description = field
                    .text()
                    .await
                    .map_err(|e| AppError::Validation(format!("Unreadable job_description: {e}")))?;
            }
            Some("resume") => {
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::Validation(format!("Unreadable resume upload: {e}")))?;
                if !data.is_empty() {
                    upload.resume = Some(data);
                }
            }
            _ => {}
        }
    }

    Ok(upload)
}
