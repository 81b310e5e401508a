//! Turns a `FormState` into the prompt sent to the model.
//!
//! Pure and deterministic: the same form always yields the same prompt.
//! Every placeholder is filled on every call; blank fields become empty strings.

use crate::generation::prompts::RESUME_PROMPT_TEMPLATE;
use crate::llm_client::prompts::RESUME_LANGUAGE;
use crate::models::form::{FormState, Project};

/// Builds the resume prompt for `form`.
pub fn assemble_prompt(form: &FormState) -> String {
    let info = &form.personal_info;
    let data = &form.user_data;
    let config = &form.config;

    let projects = format_projects(&data.projects);
    let priority_skills = join_non_empty(&config.priority_skills);
    let keywords = join_non_empty(&config.keywords);

    fill_template(RESUME_PROMPT_TEMPLATE, |placeholder| {
        let value = match placeholder {
            "name" => info.name.as_str(),
            "email" => info.email.as_str(),
            "phone" => info.phone.as_str(),
            "city" => info.location.city.as_str(),
            "state" => info.location.state.as_str(),
            "job_description" => form.job_description.as_str(),
            "skills" => data.skills.as_str(),
            "experience" => data.experience.as_str(),
            "achievements" => data.achievements.as_str(),
            "projects" => projects.as_str(),
            "priority_skills" => priority_skills.as_str(),
            "format" => config.format.as_str(),
            "keywords" => keywords.as_str(),
            "differentiator" => config.differentiator.as_str(),
            "language" => RESUME_LANGUAGE,
            _ => return None,
        };
        Some(value)
    })
}

/// One bullet per project, newline-joined.
pub fn format_projects(projects: &[Project]) -> String {
    projects
        .iter()
        .map(|p| {
            format!(
                "- {} ({})\n  Technologies: {}\n  {}",
                p.name, p.github_url, p.technologies, p.description
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Comma-joins the entries that are not blank.
pub fn join_non_empty(items: &[String]) -> String {
    items
        .iter()
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Single-pass `{placeholder}` substitution.
///
/// Substituted values are never scanned again, so user text containing braces
/// is inserted literally. Unknown placeholders are left untouched.
fn fill_template<'a>(template: &str, lookup: impl Fn(&str) -> Option<&'a str>) -> String {
    let mut out = String::with_capacity(template.len() * 2);
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        match after.find('}') {
            Some(close) => match lookup(&after[..close]) {
                Some(value) => {
                    out.push_str(value);
                    rest = &after[close + 1..];
                }
                None => {
                    out.push('{');
                    rest = after;
                }
            },
            None => {
                out.push_str(&rest[open..]);
                rest = "";
            }
        }
    }
    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::form::{FieldUpdate, ProjectField, ResumeFormat};

    fn sample_form() -> FormState {
        let mut form = FormState::default();
        form.apply(FieldUpdate::Name("Ana Silva".to_string()));
        form.apply(FieldUpdate::JobDescription(
            "Backend Engineer, Go, 3+ years".to_string(),
        ));
        form.apply(FieldUpdate::Skills("Go, PostgreSQL".to_string()));
        form.apply(FieldUpdate::Format(ResumeFormat::Ats));
        form
    }

    #[test]
    fn test_sample_fields_land_in_their_template_positions() {
        let prompt = assemble_prompt(&sample_form());
        assert!(prompt.contains("Name: Ana Silva\n"));
        assert!(prompt.contains("JOB ANALYSIS:\nBackend Engineer, Go, 3+ years\n"));
        assert!(prompt.contains("- Technical Skills: Go, PostgreSQL\n"));
        assert!(prompt.contains("2. Requested format: ATS\n"));
    }

    #[test]
    fn test_assembly_is_deterministic() {
        let mut form = sample_form();
        let i = form.add_project();
        form.update_project(i, ProjectField::Name, "ledger".to_string());
        assert_eq!(assemble_prompt(&form), assemble_prompt(&form));
    }

    #[test]
    fn test_empty_list_entries_are_filtered_before_joining() {
        let mut form = FormState::default();
        form.config.priority_skills = vec![];
        form.config.keywords = vec![String::new(), "cloud".to_string(), String::new()];
        let prompt = assemble_prompt(&form);
        assert!(prompt.contains("1. Prioritize these skills from the job: \n"));
        assert!(prompt.contains("3. Required keywords: cloud\n"));
    }

    #[test]
    fn test_default_form_fills_every_placeholder() {
        let prompt = assemble_prompt(&FormState::default());
        for placeholder in [
            "{name}",
            "{email}",
            "{job_description}",
            "{projects}",
            "{keywords}",
            "{differentiator}",
            "{language}",
        ] {
            assert!(!prompt.contains(placeholder), "{placeholder} left unfilled");
        }
        assert!(prompt.contains("Location: , \n"));
        assert!(prompt.contains("2. Requested format: ATS\n"));
    }

    #[test]
    fn test_projects_are_one_bullet_each_in_order() {
        let mut form = FormState::default();
        for (name, url) in [("alpha", "https://github.com/a/alpha"), ("beta", "")] {
            let i = form.add_project();
            form.update_project(i, ProjectField::Name, name.to_string());
            form.update_project(i, ProjectField::GithubUrl, url.to_string());
            form.update_project(i, ProjectField::Technologies, "Rust".to_string());
            form.update_project(i, ProjectField::Description, format!("{name} desc"));
        }
        let text = format_projects(&form.user_data.projects);
        assert_eq!(
            text,
            "- alpha (https://github.com/a/alpha)\n  Technologies: Rust\n  alpha desc\n\
             - beta ()\n  Technologies: Rust\n  beta desc"
        );
    }

    #[test]
    fn test_user_text_with_braces_is_not_reexpanded() {
        let mut form = FormState::default();
        form.apply(FieldUpdate::Name("{email}".to_string()));
        form.apply(FieldUpdate::Email("ana@example.com".to_string()));
        let prompt = assemble_prompt(&form);
        assert!(prompt.contains("Name: {email}\n"));
        assert!(prompt.contains("Email: ana@example.com\n"));
    }

    #[test]
    fn test_resume_is_requested_in_the_translation_source_language() {
        use crate::llm_client::prompts::TRANSLATE_SYSTEM;

        let prompt = assemble_prompt(&sample_form());
        assert!(prompt.contains("4. Write the entire resume in Brazilian Portuguese\n"));
        assert!(prompt.trim_end().ends_with("Output (in markdown, in Brazilian Portuguese):"));
        assert!(TRANSLATE_SYSTEM.starts_with(&format!("Translate the following from {RESUME_LANGUAGE} ")));
    }

    #[test]
    fn test_fill_template_keeps_unknown_and_unclosed_braces() {
        let out = fill_template("a {x} {unknown} {x", |p| (p == "x").then_some("1"));
        assert_eq!(out, "a 1 {unknown} {x");
    }
}
