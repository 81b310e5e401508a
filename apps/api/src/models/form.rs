use serde::{Deserialize, Serialize};

/// The complete set of user-entered resume and job-targeting data.
///
/// Every field carries an empty default, so a stored blob that is missing
/// fields still deserializes into a fully defined state.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FormState {
    pub personal_info: PersonalInfo,
    pub job_description: String,
    pub user_data: UserData,
    pub config: ResumeConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PersonalInfo {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub location: Location,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Location {
    pub city: String,
    pub state: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UserData {
    pub skills: String,
    pub experience: String,
    pub achievements: String,
    /// Display order is insertion order; a project is addressed by its index.
    pub projects: Vec<Project>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Project {
    pub name: String,
    pub github_url: String,
    pub description: String,
    pub technologies: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ResumeConfig {
    pub priority_skills: Vec<String>,
    pub format: ResumeFormat,
    pub keywords: Vec<String>,
    pub differentiator: String,
}

/// Output style requested from the model.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResumeFormat {
    #[default]
    #[serde(rename = "ATS")]
    Ats,
    #[serde(alias = "Criativo")]
    Creative,
    #[serde(alias = "Técnico")]
    Technical,
}

impl ResumeFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResumeFormat::Ats => "ATS",
            ResumeFormat::Creative => "Creative",
            ResumeFormat::Technical => "Technical",
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// User edits
// ────────────────────────────────────────────────────────────────────────────

/// A single field edit coming from the form.
///
/// The list-valued fields take the raw text of their input box; see
/// [`parse_comma_list`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "field", content = "value", rename_all = "snake_case")]
pub enum FieldUpdate {
    Name(String),
    Email(String),
    Phone(String),
    City(String),
    State(String),
    JobDescription(String),
    Skills(String),
    Experience(String),
    Achievements(String),
    PrioritySkills(String),
    Format(ResumeFormat),
    Keywords(String),
    Differentiator(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectField {
    Name,
    GithubUrl,
    Description,
    Technologies,
}

impl FormState {
    pub fn apply(&mut self, update: FieldUpdate) {
        match update {
            FieldUpdate::Name(v) => self.personal_info.name = v,
            FieldUpdate::Email(v) => self.personal_info.email = v,
            FieldUpdate::Phone(v) => self.personal_info.phone = v,
            FieldUpdate::City(v) => self.personal_info.location.city = v,
            FieldUpdate::State(v) => self.personal_info.location.state = v,
            FieldUpdate::JobDescription(v) => self.job_description = v,
            FieldUpdate::Skills(v) => self.user_data.skills = v,
            FieldUpdate::Experience(v) => self.user_data.experience = v,
            FieldUpdate::Achievements(v) => self.user_data.achievements = v,
            FieldUpdate::PrioritySkills(v) => self.config.priority_skills = parse_comma_list(&v),
            FieldUpdate::Format(v) => self.config.format = v,
            FieldUpdate::Keywords(v) => self.config.keywords = parse_comma_list(&v),
            FieldUpdate::Differentiator(v) => self.config.differentiator = v,
        }
    }

    /// Appends an empty project and returns its index.
    pub fn add_project(&mut self) -> usize {
        self.user_data.projects.push(Project::default());
        self.user_data.projects.len() - 1
    }

    /// Returns `false` (and changes nothing) when `index` is out of range.
    pub fn update_project(&mut self, index: usize, field: ProjectField, value: String) -> bool {
        let Some(project) = self.user_data.projects.get_mut(index) else {
            return false;
        };
        match field {
            ProjectField::Name => project.name = value,
            ProjectField::GithubUrl => project.github_url = value,
            ProjectField::Description => project.description = value,
            ProjectField::Technologies => project.technologies = value,
        }
        true
    }

    /// Removes and returns the project at `index`, shifting later projects down.
    pub fn remove_project(&mut self, index: usize) -> Option<Project> {
        if index < self.user_data.projects.len() {
            Some(self.user_data.projects.remove(index))
        } else {
            None
        }
    }
}

/// Splits comma-separated input into trimmed entries.
///
/// Empty input yields an empty list. Empty pieces (e.g. from a trailing comma)
/// are kept so the input box round-trips while the user is typing; the prompt
/// assembler drops them.
pub fn parse_comma_list(raw: &str) -> Vec<String> {
    if raw.is_empty() {
        return Vec::new();
    }
    raw.split(',').map(|s| s.trim().to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_form_serializes_with_camel_case_shape() {
        let value = serde_json::to_value(FormState::default()).unwrap();
        assert_eq!(value["personalInfo"]["location"]["city"], "");
        assert_eq!(value["jobDescription"], "");
        assert_eq!(value["userData"]["projects"], serde_json::json!([]));
        assert_eq!(value["config"]["prioritySkills"], serde_json::json!([]));
        assert_eq!(value["config"]["format"], "ATS");
    }

    #[test]
    fn test_partial_blob_fills_missing_fields_with_defaults() {
        let json = r#"{"personalInfo":{"name":"Ana Silva"},"config":{"keywords":["cloud"]}}"#;
        let form: FormState = serde_json::from_str(json).unwrap();
        assert_eq!(form.personal_info.name, "Ana Silva");
        assert_eq!(form.personal_info.location, Location::default());
        assert_eq!(form.config.keywords, vec!["cloud".to_string()]);
        assert_eq!(form.config.format, ResumeFormat::Ats);
        assert!(form.user_data.projects.is_empty());
    }

    #[test]
    fn test_legacy_format_names_are_accepted() {
        let creative: ResumeFormat = serde_json::from_str("\"Criativo\"").unwrap();
        let technical: ResumeFormat = serde_json::from_str("\"Técnico\"").unwrap();
        assert_eq!(creative, ResumeFormat::Creative);
        assert_eq!(technical, ResumeFormat::Technical);
        assert_eq!(serde_json::to_string(&technical).unwrap(), "\"Technical\"");
    }

    #[test]
    fn test_field_update_deserializes_from_tagged_json() {
        let update: FieldUpdate =
            serde_json::from_str(r#"{"field":"job_description","value":"Backend Engineer"}"#)
                .unwrap();
        assert_eq!(update, FieldUpdate::JobDescription("Backend Engineer".to_string()));

        let update: FieldUpdate =
            serde_json::from_str(r#"{"field":"format","value":"Creative"}"#).unwrap();
        assert_eq!(update, FieldUpdate::Format(ResumeFormat::Creative));
    }

    #[test]
    fn test_apply_list_fields_splits_and_trims() {
        let mut form = FormState::default();
        form.apply(FieldUpdate::PrioritySkills("Go,  PostgreSQL ,".to_string()));
        assert_eq!(form.config.priority_skills, vec!["Go", "PostgreSQL", ""]);

        form.apply(FieldUpdate::PrioritySkills(String::new()));
        assert!(form.config.priority_skills.is_empty());
    }

    #[test]
    fn test_add_then_remove_restores_other_projects() {
        let mut form = FormState::default();
        for name in ["alpha", "beta", "gamma"] {
            let i = form.add_project();
            form.update_project(i, ProjectField::Name, name.to_string());
        }
        let before = form.user_data.projects.clone();

        let i = form.add_project();
        assert_eq!(i, 3);
        let removed = form.remove_project(i).unwrap();
        assert_eq!(removed, Project::default());
        assert_eq!(form.user_data.projects, before);
    }

    #[test]
    fn test_remove_middle_project_keeps_order() {
        let mut form = FormState::default();
        for name in ["alpha", "beta", "gamma"] {
            let i = form.add_project();
            form.update_project(i, ProjectField::Name, name.to_string());
        }
        form.remove_project(1);
        let names: Vec<_> = form.user_data.projects.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["alpha", "gamma"]);
    }

    #[test]
    fn test_out_of_range_project_ops_change_nothing() {
        let mut form = FormState::default();
        form.add_project();
        let before = form.clone();
        assert!(!form.update_project(5, ProjectField::Description, "x".to_string()));
        assert!(form.remove_project(5).is_none());
        assert_eq!(form, before);
    }
}
