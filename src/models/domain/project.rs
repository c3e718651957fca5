use async_graphql::SimpleObject;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize, SimpleObject)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: String,
    pub name: String,
    pub path: String, // Folder the profile was scanned from
    pub profile: ProjectProfile,
    pub created_at: DateTime<Utc>,
}

/// Scanner output for one project folder.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize, SimpleObject)]
#[serde(rename_all = "camelCase")]
pub struct ProjectProfile {
    pub project_name: String,
    #[serde(default)]
    pub tech: Vec<String>,
    #[serde(default)]
    pub concepts: Vec<String>,
    #[serde(default)]
    pub top_extensions: Vec<ExtensionCount>,
    #[serde(default)]
    pub file_count: u32,
    #[serde(default)]
    pub key_files: Vec<KeyFile>,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize, SimpleObject)]
pub struct ExtensionCount {
    pub ext: String,
    pub count: u32,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize, SimpleObject)]
pub struct KeyFile {
    pub path: String,
    pub content: String,
}

impl Project {
    pub fn new(name: &str, path: &str, profile: ProjectProfile) -> Self {
        Project {
            id: Uuid::new_v4().to_string(),
            name: name.to_string(),
            path: path.to_string(),
            profile,
            created_at: Utc::now(),
        }
    }
}
