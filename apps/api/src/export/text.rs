//! Plain-text renderings for download and copy.

use crate::models::resume::ResumeDocument;

/// Renders a resume as plain text. Empty sections are left out.
pub fn render_resume_text(resume: &ResumeDocument) -> String {
    let mut out = Vec::new();

    out.push(resume.name.to_uppercase());
    if let Some(title) = &resume.professional_title {
        out.push(title.clone());
    }
    let contact = resume.contact_fields();
    if !contact.is_empty() {
        out.push(contact.join(" | "));
    }

    if !resume.summary.trim().is_empty() {
        out.push(String::new());
        out.push("SUMMARY".to_string());
        out.push(resume.summary.trim().to_string());
    }

    if !resume.experience.is_empty() {
        out.push(String::new());
        out.push("EXPERIENCE".to_string());
        for exp in &resume.experience {
            out.push(format!("{} at {} | {}", exp.title, exp.company, exp.dates));
            if !exp.description.trim().is_empty() {
                out.push(exp.description.trim().to_string());
            }
        }
    }

    if !resume.education.is_empty() {
        out.push(String::new());
        out.push("EDUCATION".to_string());
        for edu in &resume.education {
            let mut line = format!("{}, {} ({})", edu.degree, edu.school, edu.year);
            if let Some(score) = &edu.gpa_or_percentage {
                line.push_str(&format!(" | {score}"));
            }
            out.push(line);
        }
    }

    if !resume.skills.is_empty() {
        out.push(String::new());
        out.push("SKILLS".to_string());
        out.push(resume.skills.join(", "));
    }

    let mut text = out.join("\n");
    text.push('\n');
    text
}

/// Normalises line endings and trailing whitespace; the letter text is otherwise kept as is.
pub fn render_cover_letter_text(letter: &str) -> String {
    let mut text = letter
        .replace("\r\n", "\n")
        .lines()
        .map(str::trim_end)
        .collect::<Vec<_>>()
        .join("\n")
        .trim()
        .to_string();
    text.push('\n');
    text
}
