//! Field bags and request rendering.
//!
//! `render` is a pure function of (kind, fields): it validates the bag against the
//! kind's schema, fills the template in one pass, and appends attachments.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::generation::kinds::{FieldSpec, Placement, Presence, RequestKind};
use crate::llm_client::ContentPart;

/// Named text inputs collected from the user for one request.
/// Keys the kind does not declare are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldBag(BTreeMap<String, String>);

impl FieldBag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.0.insert(key.into(), value.into());
        self
    }

    /// Inserts only when a value is present.
    pub fn insert_opt(&mut self, key: impl Into<String>, value: Option<impl Into<String>>) -> &mut Self {
        if let Some(value) = value {
            self.0.insert(key.into(), value.into());
        }
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    /// A value counts as present only when it has non-whitespace content.
    fn filled(&self, key: &str) -> Option<&str> {
        self.get(key).filter(|v| !v.trim().is_empty())
    }

    /// The value used for `spec`: the supplied text, or the optional default.
    fn resolve(&self, spec: &FieldSpec) -> Option<&str> {
        match (self.filled(spec.name), spec.presence) {
            (Some(value), _) => Some(value),
            (None, Presence::Optional { default }) => Some(default),
            (None, Presence::Required) => None,
        }
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for FieldBag {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

/// Ordered content submitted to the generation client: the rendered instruction
/// first, then any attachments. Never mutated after construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRequest {
    kind: RequestKind,
    parts: Vec<ContentPart>,
}

impl GenerationRequest {
    pub fn kind(&self) -> RequestKind {
        self.kind
    }

    pub fn instruction(&self) -> &str {
        &self.parts[0].text
    }

    pub fn attachments(&self) -> &[ContentPart] {
        &self.parts[1..]
    }

    pub fn parts(&self) -> &[ContentPart] {
        &self.parts
    }

    /// Returns a request with `part` placed directly after the instruction.
    pub(crate) fn with_context_part(mut self, part: ContentPart) -> Self {
        self.parts.insert(1, part);
        self
    }
}

/// Builds the generation request for `kind` from `fields`.
///
/// Fails with `MissingFields` naming every required key that is absent or blank,
/// in schema order.
pub fn render(kind: RequestKind, fields: &FieldBag) -> Result<GenerationRequest, AppError> {
    let schema = kind.fields();

    let missing_keys: Vec<String> = kind
        .required_keys()
        .filter(|name| fields.filled(name).is_none())
        .map(String::from)
        .collect();
    if !missing_keys.is_empty() {
        return Err(AppError::MissingFields { kind, missing_keys });
    }

    let instruction = fill_template(kind.template(), |name| {
        kind.field(name)
            .filter(|spec| spec.placement == Placement::Interpolated)
            .and_then(|spec| fields.resolve(spec))
    });

    let mut parts = vec![ContentPart::text(instruction)];
    parts.extend(
        schema
            .iter()
            .filter(|spec| spec.placement == Placement::Attached)
            .filter_map(|spec| fields.filled(spec.name))
            .map(ContentPart::text),
    );

    Ok(GenerationRequest { kind, parts })
}

/// Replaces each `{name}` token for which `lookup` returns a value, scanning the
/// template exactly once. Substituted text is never rescanned, and tokens with no
/// value are kept as written.
fn fill_template<'a>(template: &str, lookup: impl Fn(&str) -> Option<&'a str>) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];

        let token = after
            .find(|c: char| c == '}' || c == '{')
            .filter(|&end| after[end..].starts_with('}'))
            .map(|end| &after[..end]);

        match token.and_then(|name| lookup(name).map(|value| (name, value))) {
            Some((name, value)) => {
                out.push_str(value);
                rest = &after[name.len() + 1..];
            }
            None => {
                out.push('{');
                rest = after;
            }
        }
    }

    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn complete_bag(kind: RequestKind) -> FieldBag {
        kind.fields()
            .iter()
            .map(|spec| (spec.name, format!("value of {}", spec.name)))
            .collect()
    }

    fn missing(result: Result<GenerationRequest, AppError>) -> Vec<String> {
        match result {
            Err(AppError::MissingFields { missing_keys, .. }) => missing_keys,
            other => panic!("expected MissingFields, got {other:?}"),
        }
    }

    #[test]
    fn test_fill_template_single_pass() {
        let out = fill_template("A={a} B={b}", |name| match name {
            "a" => Some("{b}"),
            "b" => Some("bee"),
            _ => None,
        });
        assert_eq!(out, "A={b} B=bee");
    }

    #[test]
    fn test_fill_template_keeps_unknown_and_unbalanced_braces() {
        let out = fill_template("{x} {{a}} {open {a}", |name| (name == "a").then_some("1"));
        assert_eq!(out, "{x} {1} {open 1");
    }

    #[test]
    fn test_missing_required_keys_are_named_exactly() {
        for kind in RequestKind::ALL {
            let required: Vec<&str> = kind.required_keys().collect();
            for (i, dropped) in required.iter().enumerate() {
                let mut bag = complete_bag(kind);
                bag.0.remove(*dropped);
                assert_eq!(missing(render(kind, &bag)), [*dropped], "{kind}");

                // Dropping a second key names both, in schema order.
                if let Some(other) = required.get(i + 1) {
                    bag.0.remove(*other);
                    assert_eq!(missing(render(kind, &bag)), [*dropped, *other], "{kind}");
                }
            }
        }
    }

    #[test]
    fn test_blank_required_value_counts_as_missing() {
        let bag: FieldBag = [
            ("job_description", "Backend engineer"),
            ("resume_text", "   \n"),
        ]
        .into_iter()
        .collect();
        assert_eq!(missing(render(RequestKind::MatchScore, &bag)), ["resume_text"]);
    }

    #[test]
    fn test_complete_bag_renders_every_value() {
        for kind in RequestKind::ALL {
            let bag = complete_bag(kind);
            let request = render(kind, &bag).unwrap();
            assert_eq!(request.kind(), kind);

            for spec in kind.fields() {
                let value = bag.get(spec.name).unwrap();
                match spec.placement {
                    Placement::Interpolated => {
                        assert!(request.instruction().contains(value), "{kind}: {}", spec.name);
                        assert!(
                            !request.instruction().contains(&format!("{{{}}}", spec.name)),
                            "{kind}: placeholder {} left in instruction",
                            spec.name
                        );
                    }
                    Placement::Attached => {
                        assert!(!request.instruction().contains(value));
                        assert!(request.attachments().contains(&ContentPart::text(value)));
                    }
                }
            }
        }
    }

    #[test]
    fn test_render_is_idempotent() {
        for kind in RequestKind::ALL {
            let bag = complete_bag(kind);
            assert_eq!(render(kind, &bag).unwrap(), render(kind, &bag).unwrap());
        }
    }

    #[test]
    fn test_extra_keys_are_ignored() {
        let mut bag = complete_bag(RequestKind::MatchScore);
        bag.insert("favourite_colour", "teal");
        let request = render(RequestKind::MatchScore, &bag).unwrap();
        assert!(!request.instruction().contains("teal"));
        assert!(request.attachments().is_empty());
    }

    #[test]
    fn test_match_score_scenario() {
        let bag: FieldBag = [
            ("job_description", "Backend engineer, Go, 3 yrs"),
            ("resume_text", "5 yrs Go backend"),
        ]
        .into_iter()
        .collect();
        let request = render(RequestKind::MatchScore, &bag).unwrap();
        assert!(request.instruction().contains("Backend engineer, Go, 3 yrs"));
        assert!(request.instruction().contains("5 yrs Go backend"));
        assert_eq!(request.parts().len(), 1);
    }

    #[test]
    fn test_resume_analysis_without_resume_text() {
        let bag: FieldBag = [("job_description", "...")].into_iter().collect();
        assert_eq!(
            missing(render(RequestKind::ResumeAnalysis, &bag)),
            ["resume_text"]
        );
    }

    #[test]
    fn test_resume_analysis_attaches_resume_after_instruction() {
        let resume = "Jane Doe\nSenior Rust Engineer\n".repeat(200);
        let bag: FieldBag = [
            ("job_description", "Rust engineer"),
            ("resume_text", resume.as_str()),
        ]
        .into_iter()
        .collect();
        let request = render(RequestKind::ResumeAnalysis, &bag).unwrap();

        assert_eq!(request.parts().len(), 2);
        assert!(request.instruction().contains("Rust engineer"));
        assert_eq!(request.attachments()[0].text, resume);

        // Instruction length does not depend on the resume.
        let short: FieldBag = [("job_description", "Rust engineer"), ("resume_text", "x")]
            .into_iter()
            .collect();
        assert_eq!(
            render(RequestKind::ResumeAnalysis, &short).unwrap().instruction(),
            request.instruction()
        );
    }

    #[test]
    fn test_cover_letter_without_optional_fields() {
        let bag: FieldBag = [
            ("job_details", "Data analyst at Acme"),
            ("full_name", "Ada Lovelace"),
            ("email", "ada@example.com"),
            ("phone_number", "+44 20 0000 0000"),
        ]
        .into_iter()
        .collect();
        let request = render(RequestKind::CoverLetter, &bag).unwrap();
        let text = request.instruction();

        assert!(text.contains("Higher Study:\n\n"));
        assert!(text.contains("University:\n\n"));
        assert!(text.ends_with("using input details.") && text.contains("Course:\n\n"));
        for name in ["higher_study", "university", "course"] {
            assert!(!text.contains(&format!("{{{name}}}")));
        }
    }

    #[test]
    fn test_opportunities_defaults_to_any() {
        let bag: FieldBag = [("job_title", "Data Engineer"), ("country", "")]
            .into_iter()
            .collect();
        let text = render(RequestKind::Opportunities, &bag)
            .unwrap()
            .instruction()
            .to_string();
        assert!(text.contains("Job Title: Data Engineer"));
        assert!(text.contains("Country: any\n"));
        assert!(text.contains("Work Type: any (onsite, hybrid, remote)"));
    }

    #[test]
    fn test_placeholder_syntax_in_value_is_verbatim() {
        let bag: FieldBag = [
            ("job_description", "Needs {resume_text} and {unknown}"),
            ("resume_text", "REAL RESUME"),
        ]
        .into_iter()
        .collect();
        let text = render(RequestKind::MatchScore, &bag)
            .unwrap()
            .instruction()
            .to_string();
        assert!(text.contains("Needs {resume_text} and {unknown}"));
        assert_eq!(text.matches("REAL RESUME").count(), 1);
    }

    #[test]
    fn test_chat_without_message_is_instruction_only() {
        let request = render(RequestKind::Chat, &FieldBag::new()).unwrap();
        assert_eq!(request.parts().len(), 1);

        let mut bag = FieldBag::new();
        bag.insert("message", "How do I prepare for a system design interview?");
        let request = render(RequestKind::Chat, &bag).unwrap();
        assert_eq!(
            request.attachments(),
            [ContentPart::text("How do I prepare for a system design interview?")]
        );
    }

    #[test]
    fn test_field_bag_deserializes_from_json_object() {
        let bag: FieldBag =
            serde_json::from_str(r#"{"job_title": "QA Engineer", "work_type": "Remote"}"#).unwrap();
        assert_eq!(bag.get("job_title"), Some("QA Engineer"));
        assert_eq!(bag.get("country"), None);
    }
}
