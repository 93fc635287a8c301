//! Template Table — the closed set of request kinds, each with its instruction
//! template and the schema of fields it accepts.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::generation::prompts::{
    BEST_ATS_RESUME_TEMPLATE, CHAT_TEMPLATE, COVER_LETTER_TEMPLATE, MATCH_SCORE_TEMPLATE,
    OPPORTUNITIES_TEMPLATE, RESUME_ANALYSIS_TEMPLATE,
};

/// A generation intent. Dispatch is exhaustive over this enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestKind {
    Chat,
    ResumeAnalysis,
    MatchScore,
    BestAtsResume,
    CoverLetter,
    Opportunities,
}

/// Whether a field must be supplied, and what an absent optional field becomes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "presence", rename_all = "snake_case")]
pub enum Presence {
    Required,
    Optional { default: &'static str },
}

/// Where a field's value ends up in the generation request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Placement {
    /// Substituted for `{name}` inside the instruction text.
    Interpolated,
    /// Sent verbatim as its own content part after the instruction.
    Attached,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FieldSpec {
    pub name: &'static str,
    #[serde(flatten)]
    pub presence: Presence,
    pub placement: Placement,
}

impl FieldSpec {
    const fn required(name: &'static str) -> Self {
        Self {
            name,
            presence: Presence::Required,
            placement: Placement::Interpolated,
        }
    }

    const fn optional(name: &'static str, default: &'static str) -> Self {
        Self {
            name,
            presence: Presence::Optional { default },
            placement: Placement::Interpolated,
        }
    }

    const fn attached(self) -> Self {
        Self {
            placement: Placement::Attached,
            ..self
        }
    }

    pub fn is_required(&self) -> bool {
        matches!(self.presence, Presence::Required)
    }
}

const CHAT_FIELDS: &[FieldSpec] = &[FieldSpec::optional("message", "").attached()];

const RESUME_ANALYSIS_FIELDS: &[FieldSpec] = &[
    FieldSpec::required("job_description"),
    FieldSpec::required("resume_text").attached(),
];

const MATCH_SCORE_FIELDS: &[FieldSpec] = &[
    FieldSpec::required("job_description"),
    FieldSpec::required("resume_text"),
];

const BEST_ATS_RESUME_FIELDS: &[FieldSpec] = &[
    FieldSpec::required("job_details"),
    FieldSpec::required("introduction"),
    FieldSpec::required("education"),
    FieldSpec::required("skills"),
    FieldSpec::required("experience"),
    FieldSpec::required("projects"),
];

const COVER_LETTER_FIELDS: &[FieldSpec] = &[
    FieldSpec::required("job_details"),
    FieldSpec::required("full_name"),
    FieldSpec::required("email"),
    FieldSpec::required("phone_number"),
    FieldSpec::optional("higher_study", ""),
    FieldSpec::optional("university", ""),
    FieldSpec::optional("course", ""),
];

const OPPORTUNITIES_FIELDS: &[FieldSpec] = &[
    FieldSpec::required("job_title"),
    FieldSpec::optional("country", "any"),
    FieldSpec::optional("work_type", "any (onsite, hybrid, remote)"),
];

impl RequestKind {
    pub const ALL: [RequestKind; 6] = [
        RequestKind::Chat,
        RequestKind::ResumeAnalysis,
        RequestKind::MatchScore,
        RequestKind::BestAtsResume,
        RequestKind::CoverLetter,
        RequestKind::Opportunities,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RequestKind::Chat => "chat",
            RequestKind::ResumeAnalysis => "resume_analysis",
            RequestKind::MatchScore => "match_score",
            RequestKind::BestAtsResume => "best_ats_resume",
            RequestKind::CoverLetter => "cover_letter",
            RequestKind::Opportunities => "opportunities",
        }
    }

    pub fn template(&self) -> &'static str {
        match self {
            RequestKind::Chat => CHAT_TEMPLATE,
            RequestKind::ResumeAnalysis => RESUME_ANALYSIS_TEMPLATE,
            RequestKind::MatchScore => MATCH_SCORE_TEMPLATE,
            RequestKind::BestAtsResume => BEST_ATS_RESUME_TEMPLATE,
            RequestKind::CoverLetter => COVER_LETTER_TEMPLATE,
            RequestKind::Opportunities => OPPORTUNITIES_TEMPLATE,
        }
    }

    /// Field schema in the order fields are checked and attachments are emitted.
    pub fn fields(&self) -> &'static [FieldSpec] {
        match self {
            RequestKind::Chat => CHAT_FIELDS,
            RequestKind::ResumeAnalysis => RESUME_ANALYSIS_FIELDS,
            RequestKind::MatchScore => MATCH_SCORE_FIELDS,
            RequestKind::BestAtsResume => BEST_ATS_RESUME_FIELDS,
            RequestKind::CoverLetter => COVER_LETTER_FIELDS,
            RequestKind::Opportunities => OPPORTUNITIES_FIELDS,
        }
    }

    pub fn field(&self, name: &str) -> Option<&'static FieldSpec> {
        self.fields().iter().find(|f| f.name == name)
    }

    pub fn required_keys(&self) -> impl Iterator<Item = &'static str> {
        self.fields()
            .iter()
            .filter(|f| f.is_required())
            .map(|f| f.name)
    }
}

impl fmt::Display for RequestKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RequestKind {
    type Err = AppError;

    fn from_str(tag: &str) -> Result<Self, Self::Err> {
        RequestKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == tag)
            .ok_or_else(|| AppError::UnknownRequestKind(tag.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Every `{name}` token in a template, in order of appearance.
    fn placeholders(template: &str) -> Vec<&str> {
        let mut found = Vec::new();
        let mut rest = template;
        while let Some(open) = rest.find('{') {
            let after = &rest[open + 1..];
            match after.find('}') {
                Some(close) => {
                    found.push(&after[..close]);
                    rest = &after[close + 1..];
                }
                None => break,
            }
        }
        found
    }

    #[test]
    fn test_tags_round_trip_through_from_str() {
        for kind in RequestKind::ALL {
            assert_eq!(kind.as_str().parse::<RequestKind>().unwrap(), kind);
        }
    }

    #[test]
    fn test_unknown_tag_is_rejected() {
        match "salary_negotiation".parse::<RequestKind>() {
            Err(AppError::UnknownRequestKind(tag)) => assert_eq!(tag, "salary_negotiation"),
            other => panic!("expected UnknownRequestKind, got {other:?}"),
        }
    }

    #[test]
    fn test_serde_tag_matches_as_str() {
        for kind in RequestKind::ALL {
            let json = serde_json::to_string(&kind).unwrap();
            assert_eq!(json, format!("\"{}\"", kind.as_str()));
        }
    }

    #[test]
    fn test_every_placeholder_is_an_interpolated_field() {
        for kind in RequestKind::ALL {
            for name in placeholders(kind.template()) {
                let spec = kind
                    .field(name)
                    .unwrap_or_else(|| panic!("{kind}: placeholder {{{name}}} has no field"));
                assert_eq!(spec.placement, Placement::Interpolated, "{kind}: {name}");
            }
        }
    }

    #[test]
    fn test_every_interpolated_field_has_a_placeholder() {
        for kind in RequestKind::ALL {
            let tokens = placeholders(kind.template());
            for spec in kind.fields() {
                let in_template = tokens.contains(&spec.name);
                match spec.placement {
                    Placement::Interpolated => assert!(in_template, "{kind}: {}", spec.name),
                    Placement::Attached => assert!(!in_template, "{kind}: {}", spec.name),
                }
            }
        }
    }

    #[test]
    fn test_required_keys_per_kind() {
        let required = |kind: RequestKind| kind.required_keys().collect::<Vec<_>>();

        assert!(required(RequestKind::Chat).is_empty());
        assert_eq!(
            required(RequestKind::ResumeAnalysis),
            ["job_description", "resume_text"]
        );
        assert_eq!(
            required(RequestKind::MatchScore),
            ["job_description", "resume_text"]
        );
        assert_eq!(
            required(RequestKind::BestAtsResume),
            [
                "job_details",
                "introduction",
                "education",
                "skills",
                "experience",
                "projects"
            ]
        );
        assert_eq!(
            required(RequestKind::CoverLetter),
            ["job_details", "full_name", "email", "phone_number"]
        );
        assert_eq!(required(RequestKind::Opportunities), ["job_title"]);
    }

    #[test]
    fn test_field_spec_serializes_flat() {
        let json = serde_json::to_value(RequestKind::Opportunities.fields()).unwrap();
        assert_eq!(
            json[1],
            serde_json::json!({
                "name": "country",
                "presence": "optional",
                "default": "any",
                "placement": "interpolated"
            })
        );
        assert_eq!(json[0]["presence"], "required");
    }
}
