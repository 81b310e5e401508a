use serde::Serialize;

/// One page of the form. Static for the lifetime of the process.
#[derive(Debug, Clone, Serialize)]
pub struct StepDescriptor {
    pub title: &'static str,
    pub description: &'static str,
    pub content: StepContent,
}

/// What a step renders: the fields it edits plus a help hint.
#[derive(Debug, Clone, Serialize)]
pub struct StepContent {
    pub fields: &'static [&'static str],
    pub hint: &'static str,
}

pub const STEP_COUNT: usize = 5;

pub static STEPS: [StepDescriptor; STEP_COUNT] = [
    StepDescriptor {
        title: "Personal Information",
        description: "Your basic details",
        content: StepContent {
            fields: &["name", "email", "phone", "city", "state"],
            hint: "Contact details exactly as they should appear on the resume.",
        },
    },
    StepDescriptor {
        title: "Job",
        description: "Position details",
        content: StepContent {
            fields: &["job_description"],
            hint: "Paste the full job posting, including requirements, responsibilities \
                   and nice-to-haves. The more detail, the better the tailoring.",
        },
    },
    StepDescriptor {
        title: "Experience",
        description: "Your qualifications",
        content: StepContent {
            fields: &["skills", "experience", "achievements"],
            hint: "List relevant technical skills, describe your most relevant experience \
                   (scope, team size, impact) and measurable achievements such as \
                   \"cut load time by 30%\".",
        },
    },
    StepDescriptor {
        title: "Projects",
        description: "Relevant work",
        content: StepContent {
            fields: &["projects"],
            hint: "Add professional, open source, academic or hackathon projects that \
                   show your skills. Each project has a name, repository link, \
                   technologies and a short description.",
        },
    },
    StepDescriptor {
        title: "Settings",
        description: "Personalization",
        content: StepContent {
            fields: &["priority_skills", "format", "keywords", "differentiator"],
            hint: "Priority skills and keywords are comma-separated. Format: ATS (optimized \
                   for applicant tracking systems), Creative (more visual) or Technical \
                   (focus on technical detail and projects).",
        },
    },
];
