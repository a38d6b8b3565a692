use crate::models::profile::ProfileForm;

/// Checks the saved form. Returns every problem found, empty when the form is acceptable.
pub fn validate_profile(form: &ProfileForm) -> Vec<String> {
    let mut problems = Vec::new();

    if let Some(email) = form.email.as_deref().map(str::trim) {
        if !email.is_empty() && !is_plausible_email(email) {
            problems.push("Invalid email address.".to_string());
        }
    }

    for (i, exp) in form.experiences.iter().enumerate() {
        if exp.title.trim().is_empty() && exp.company.trim().is_empty() {
            problems.push(format!("Experience #{} needs a title or a company.", i + 1));
        }
    }

    for (i, edu) in form.educations.iter().enumerate() {
        if edu.degree.trim().is_empty() && edu.school.trim().is_empty() {
            problems.push(format!("Education #{} needs a degree or a school.", i + 1));
        }
    }

    problems
}

/// One `@`, something on both sides, and a dot in the domain that is not at either end.
fn is_plausible_email(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.contains('@')
        && !email.contains(char::is_whitespace)
        && domain
            .split_once('.')
            .is_some_and(|(host, rest)| !host.is_empty() && !rest.is_empty())
        && !domain.ends_with('.')
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::resume::{EducationEntry, ExperienceEntry};

    #[test]
    fn test_empty_form_is_valid() {
        assert!(validate_profile(&ProfileForm::default()).is_empty());
    }

    #[test]
    fn test_plausible_emails() {
        assert!(is_plausible_email("ana@example.com"));
        assert!(is_plausible_email("a.b+tag@mail.example.co.uk"));
    }

    #[test]
    fn test_implausible_emails() {
        assert!(!is_plausible_email("ana.example.com"));
        assert!(!is_plausible_email("@example.com"));
        assert!(!is_plausible_email("ana@example"));
        assert!(!is_plausible_email("ana@example."));
        assert!(!is_plausible_email("ana@@example.com"));
        assert!(!is_plausible_email("ana @example.com"));
    }

    #[test]
    fn test_blank_email_is_ignored() {
        let form = ProfileForm {
            email: Some("  ".to_string()),
            ..Default::default()
        };
        assert!(validate_profile(&form).is_empty());
    }

    #[test]
    fn test_bad_email_reported() {
        let form = ProfileForm {
            email: Some("nope".to_string()),
            ..Default::default()
        };
        assert_eq!(validate_profile(&form), vec!["Invalid email address.".to_string()]);
    }

    #[test]
    fn test_hollow_entries_reported_with_position() {
        let form = ProfileForm {
            experiences: vec![
                ExperienceEntry {
                    title: "Chef".to_string(),
                    ..Default::default()
                },
                ExperienceEntry::default(),
            ],
            educations: vec![EducationEntry::default()],
            ..Default::default()
        };
        let problems = validate_profile(&form);
        assert_eq!(problems.len(), 2);
        assert!(problems[0].contains("Experience #2"));
        assert!(problems[1].contains("Education #1"));
    }
}
