use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::path::Path;
use tracing::info;

/// A single speaking exercise.
///
/// `required_words` and `allowed_variants` keep the stored JSON text form;
/// use [`Exercise::required_words`] and [`Exercise::allowed_variants`] to
/// decode them. Decoding fails on unreadable JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Exercise {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub prompt: String,
    pub expected_phrase: String,
    #[serde(rename = "requiredWords")]
    pub required_words_json: String,
    #[serde(rename = "allowedVariants")]
    pub allowed_variants_json: String,
    pub order: u32,
}

impl Exercise {
    pub fn required_words(&self) -> Result<Vec<String>> {
        super::parse_required_words(&self.required_words_json)
    }

    pub fn allowed_variants(&self) -> Result<Vec<String>> {
        super::parse_allowed_variants(&self.allowed_variants_json)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Lesson {
    pub id: String,
    pub title: String,
    pub description: String,
    pub order: u32,
    pub exercises: Vec<Exercise>,
}

/// Read-only set of lessons, ordered by `order`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Catalog {
    lessons: Vec<Lesson>,
}

impl Catalog {
    pub fn new(mut lessons: Vec<Lesson>) -> Self {
        lessons.sort_by_key(|lesson| lesson.order);
        for lesson in &mut lessons {
            lesson.exercises.sort_by_key(|exercise| exercise.order);
        }
        Self { lessons }
    }

    /// Load lessons from a JSON file containing an array of lessons.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read lessons file {:?}", path))?;
        let lessons: Vec<Lesson> =
            serde_json::from_str(&content).context("Failed to parse lessons file")?;

        info!("Loaded {} lesson(s) from {:?}", lessons.len(), path);
        Ok(Self::new(lessons))
    }

    pub fn lessons(&self) -> &[Lesson] {
        &self.lessons
    }

    pub fn lesson(&self, id: &str) -> Option<&Lesson> {
        self.lessons.iter().find(|lesson| lesson.id == id)
    }

    pub fn exercise(&self, id: &str) -> Option<&Exercise> {
        self.lessons
            .iter()
            .flat_map(|lesson| lesson.exercises.iter())
            .find(|exercise| exercise.id == id)
    }
}

/// The catalog at `path`, or the built-in lessons when no path is configured.
pub fn load_catalog(path: Option<&str>) -> Result<Catalog> {
    match path {
        Some(path) => Catalog::from_json_file(Path::new(path)),
        None => Ok(builtin_catalog()),
    }
}

fn speaking(
    id: &str,
    prompt: &str,
    expected_phrase: &str,
    required_words: serde_json::Value,
    allowed_variants: serde_json::Value,
    order: u32,
) -> Exercise {
    Exercise {
        id: id.to_string(),
        kind: "speaking".to_string(),
        prompt: prompt.to_string(),
        expected_phrase: expected_phrase.to_string(),
        required_words_json: required_words.to_string(),
        allowed_variants_json: allowed_variants.to_string(),
        order,
    }
}

/// The lessons shipped with the service.
pub fn builtin_catalog() -> Catalog {
    Catalog::new(vec![Lesson {
        id: "greetings".to_string(),
        title: "Greetings & Introductions".to_string(),
        description: "Learn basic Greek greetings and how to introduce yourself.".to_string(),
        order: 1,
        exercises: vec![
            speaking(
                "greetings-1",
                "Say \"Hello, my name is Maria\" in Greek.",
                "Γεια σου, με λένε Μαρία",
                json!(["Γεια", "λένε"]),
                json!(["Γεια σου με λένε Μαρία", "Γεια, με λένε Μαρία"]),
                1,
            ),
            speaking(
                "greetings-2",
                "Say \"How are you?\" in Greek.",
                "Τι κάνεις;",
                json!(["Τι", "κάνεις"]),
                json!(["Τι κάνεις", "Πώς είσαι"]),
                2,
            ),
            speaking(
                "greetings-3",
                "Say \"I am fine, thank you\" in Greek.",
                "Είμαι καλά, ευχαριστώ",
                json!(["καλά", "ευχαριστώ"]),
                json!(["Είμαι καλά ευχαριστώ", "Καλά ευχαριστώ", "Καλά, ευχαριστώ"]),
                3,
            ),
        ],
    }])
}
