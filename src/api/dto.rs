use serde::{Deserialize, Serialize};

/// Partial lesson update, `PUT /api/v1/lessons/{id}`. Unset fields are
/// left out of the body entirely, e.g. `{"published": true}` or
/// `{"lessonOrder": 3}`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LessonPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub published: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lesson_order: Option<i32>,
}

impl LessonPatch {
    pub fn published(published: bool) -> Self {
        Self {
            published: Some(published),
            ..Self::default()
        }
    }

    pub fn lesson_order(lesson_order: i32) -> Self {
        Self {
            lesson_order: Some(lesson_order),
            ..Self::default()
        }
    }
}

/// Partial module update, `PUT /api/v1/modules/{id}`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModulePatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub module_order: Option<i32>,
}

impl ModulePatch {
    pub fn module_order(module_order: i32) -> Self {
        Self {
            module_order: Some(module_order),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadResponse {
    pub url: String,
}
