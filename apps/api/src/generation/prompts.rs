// LLM prompt constants for resume / cover-letter generation.
// Reuses cross-cutting fragments from llm_client::prompts.

/// System prompt for generation. The JSON-only rules are appended from `JSON_ONLY_SYSTEM`.
pub const GENERATION_SYSTEM: &str = "You are an expert resume writer and career advisor. \
    You tailor resumes to job descriptions and write compelling, professional cover letters.";

/// Generation prompt template.
/// Replace: {factuality_instruction}, {parts_instruction}, {output_schema},
///          {photo_instruction}, {sample_instruction}, {repair_instruction}
/// The user-supplied resume and job description are appended after substitution.
pub const GENERATION_PROMPT_TEMPLATE: &str = r#"{factuality_instruction}

TASK:
{parts_instruction}

If a job description is provided, customise the resume to it: lead with the most relevant
experience, align the summary with the role, and keep only skills that matter for it.
The cover letter should be addressed to the hiring team, reference the role, and draw only
on the candidate's real experience.
{sample_instruction}
{photo_instruction}
{repair_instruction}

Return a JSON object with this EXACT shape (use null for any part you are not asked to produce):
{output_schema}"#;

/// Shape of the resume object the model must emit.
pub const RESUME_SCHEMA_EXAMPLE: &str = r#"{
  "resume": {
    "name": "Full Name",
    "professionalTitle": "Senior Software Engineer",
    "location": "City, Country",
    "website": "https://example.com",
    "email": "name@example.com",
    "phone": "+1 555 0100",
    "linkedin": "https://linkedin.com/in/handle",
    "summary": "Two to four sentences tailored to the role.",
    "experience": [
      {"title": "Job title", "company": "Company", "dates": "2020 - Present", "description": "Responsibilities and achievements, optimised for the job description."}
    ],
    "education": [
      {"degree": "BSc Computer Science", "school": "University", "year": "2019", "gpaOrPercentage": "3.8 GPA"}
    ],
    "skills": ["Skill one", "Skill two"]
  },
  "coverLetter": "The full cover letter text, with paragraphs separated by blank lines."
}"#;

pub const SAMPLE_PERSONA_INSTRUCTION: &str = "\
The user supplied neither a resume nor a job description. Produce a high-quality, complete \
SAMPLE for a fictional person named \"Alex Doe\" applying for a \"Senior Software Engineer\" \
position at a top tech company. Invented details are expected for this sample only.";

pub const PHOTO_PRESENT_INSTRUCTION: &str = "\
The user attached a profile photo. Do NOT emit any photo field; it is attached separately.";

/// Repair prompt fragment. Replace: {produced_summary}, {missing_parts}
pub const REPAIR_INSTRUCTION_TEMPLATE: &str = r#"
A PREVIOUS ATTEMPT already produced the following. Do NOT regenerate these parts; return null for them:
{produced_summary}

STILL MISSING (produce ONLY these): {missing_parts}"#;
