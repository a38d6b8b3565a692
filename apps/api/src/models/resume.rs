use serde::{Deserialize, Deserializer, Serialize};

/// A single position in the experience section.
///
/// The model is told to omit fields it does not know, so every field tolerates
/// being absent or `null`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExperienceEntry {
    #[serde(deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(deserialize_with = "null_as_default")]
    pub company: String,
    #[serde(deserialize_with = "null_as_default")]
    pub dates: String,
    #[serde(deserialize_with = "null_as_default")]
    pub description: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EducationEntry {
    #[serde(deserialize_with = "null_as_default")]
    pub degree: String,
    #[serde(deserialize_with = "null_as_default")]
    pub school: String,
    #[serde(deserialize_with = "null_as_default")]
    pub year: String,
    /// GPA or percentage, free-form. Older clients send it as `percentage`.
    #[serde(alias = "percentage", skip_serializing_if = "Option::is_none")]
    pub gpa_or_percentage: Option<String>,
}

/// The structured resume produced by generation and consumed by rendering/persistence.
///
/// `name` and `summary` are required. The section lists may be empty, and an omitted
/// or `null` list reads as empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResumeDocument {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub professional_title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub linkedin: Option<String>,
    /// Passthrough of the request photo. Never produced by this service.
    #[serde(
        default,
        rename = "photoDataUri",
        skip_serializing_if = "Option::is_none"
    )]
    pub photo_reference: Option<String>,
    pub summary: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub experience: Vec<ExperienceEntry>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub education: Vec<EducationEntry>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub skills: Vec<String>,
}

impl ResumeDocument {
    /// A resume counts as produced only when both required text fields carry content.
    pub fn is_substantive(&self) -> bool {
        !self.name.trim().is_empty() && !self.summary.trim().is_empty()
    }

    /// Returns a cleaned copy: trimmed text, blank optionals dropped, skills de-duplicated
    /// case-insensitively in first-seen order.
    pub fn normalized(&self) -> ResumeDocument {
        let mut seen = std::collections::HashSet::new();
        let skills = self
            .skills
            .iter()
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .filter(|s| seen.insert(s.to_lowercase()))
            .map(str::to_string)
            .collect();

        ResumeDocument {
            name: self.name.trim().to_string(),
            professional_title: non_blank(&self.professional_title),
            location: non_blank(&self.location),
            website: non_blank(&self.website),
            email: non_blank(&self.email),
            phone: non_blank(&self.phone),
            linkedin: non_blank(&self.linkedin),
            photo_reference: self.photo_reference.clone(),
            summary: self.summary.trim().to_string(),
            experience: self.experience.clone(),
            education: self.education.clone(),
            skills,
        }
    }

    /// Contact fields in display order, skipping the absent ones.
    pub fn contact_fields(&self) -> Vec<&str> {
        [
            &self.location,
            &self.email,
            &self.phone,
            &self.website,
            &self.linkedin,
        ]
        .into_iter()
        .filter_map(|f| f.as_deref())
        .collect()
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn non_blank(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}
