// Prompt template for resume generation.
// Placeholders are filled by `generation::assembler::assemble_prompt`.

/// Resume generation prompt template.
/// Replace: {name}, {email}, {phone}, {city}, {state}, {job_description},
///          {skills}, {experience}, {achievements}, {projects},
///          {priority_skills}, {format}, {keywords}, {differentiator},
///          {language}
pub const RESUME_PROMPT_TEMPLATE: &str = r#"
PERSONAL INFORMATION:
Name: {name}
Email: {email}
Phone: {phone}
Location: {city}, {state}

JOB ANALYSIS:
{job_description}

CANDIDATE DATA:
- Technical Skills: {skills}
- Relevant Experience: {experience}
- Key Achievements: {achievements}

RELEVANT PROJECTS:
{projects}

GENERATION INSTRUCTIONS:
1. Prioritize these skills from the job: {priority_skills}
2. Requested format: {format}
3. Required keywords: {keywords}
4. Write the entire resume in {language}

Generate a resume that:
- Aligns experience with the job requirements
- Uses concrete metrics (e.g. "35% faster")
- Uses ATS-friendly formatting
- Highlights {differentiator}

Output (in markdown, in {language}):
"#;
