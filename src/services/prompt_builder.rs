use once_cell::sync::Lazy;

use crate::{
    constants::question_prompt::{
        GENERAL_MODE_INSTRUCTION, MIXED_MODE_INSTRUCTION, PROJECT_MODE_INSTRUCTION,
    },
    models::domain::{GeneratedQuestion, GenerationMode, ProjectProfile},
};

pub const MAX_KEY_FILES: usize = 8;
pub const MAX_KEY_FILE_CHARS: usize = 1500;
const MAX_LISTED_EXTENSIONS: usize = 10;

static QUESTION_SCHEMA: Lazy<String> = Lazy::new(|| {
    let schema = schemars::schema_for!(GeneratedQuestion);
    serde_json::to_string_pretty(&schema).unwrap_or_default()
});

/// Builds the user message for one generation run.
pub fn build_question_prompt(profile: &ProjectProfile, count: u32, mode: GenerationMode) -> String {
    let mut prompt = format!(
        "Project: {}\nFiles scanned: {}\nTechnologies: {}\nConcepts: {}\n",
        profile.project_name,
        profile.file_count,
        list_or_none(&profile.tech),
        list_or_none(&profile.concepts)
    );

    if !profile.top_extensions.is_empty() {
        let extensions: Vec<String> = profile
            .top_extensions
            .iter()
            .take(MAX_LISTED_EXTENSIONS)
            .map(|e| format!("{} ({})", e.ext, e.count))
            .collect();
        prompt.push_str(&format!("File types: {}\n", extensions.join(", ")));
    }

    if mode != GenerationMode::General && !profile.key_files.is_empty() {
        prompt.push_str("\n### KEY FILES\n");
        for file in profile.key_files.iter().take(MAX_KEY_FILES) {
            prompt.push_str(&format!(
                "\n--- {} ---\n{}\n",
                file.path,
                truncate_chars(&file.content, MAX_KEY_FILE_CHARS)
            ));
        }
    }

    prompt.push_str(&format!(
        "\n### TASK\nWrite exactly {} questions.\n{}\nEach question object must match this JSON schema:\n{}\n",
        count,
        mode_instruction(mode),
        QUESTION_SCHEMA.as_str()
    ));

    prompt
}

fn mode_instruction(mode: GenerationMode) -> &'static str {
    match mode {
        GenerationMode::Mixed => MIXED_MODE_INSTRUCTION,
        GenerationMode::Project => PROJECT_MODE_INSTRUCTION,
        GenerationMode::General => GENERAL_MODE_INSTRUCTION,
    }
}

fn list_or_none(items: &[String]) -> String {
    if items.is_empty() {
        "none detected".to_string()
    } else {
        items.join(", ")
    }
}

fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((byte_index, _)) => &text[..byte_index],
        None => text,
    }
}
