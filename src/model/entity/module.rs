use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::model::{ValidationError, ValidationResult};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseModule {
    id: Uuid,
    title: String,
    module_order: i32,
    updated_at: DateTime<Utc>,
}

impl CourseModule {
    pub fn new(id: Uuid, title: String, module_order: i32) -> Self {
        Self {
            id,
            title,
            module_order,
            updated_at: Utc::now(),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn module_order(&self) -> i32 {
        self.module_order
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    pub(crate) fn set_module_order(&mut self, module_order: i32) {
        self.module_order = module_order;
    }
}

/// Create/update payload for a module, as submitted by the module form.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModuleDraft {
    course_id: Uuid,
    title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    module_order: Option<i32>,
}

impl ModuleDraft {
    pub fn new(course_id: Uuid, title: impl Into<String>) -> Self {
        Self {
            course_id,
            title: title.into(),
            module_order: None,
        }
    }

    pub fn with_order(mut self, module_order: i32) -> Self {
        self.module_order = Some(module_order);
        self
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn validate(&self) -> ValidationResult<()> {
        if self.title.trim().is_empty() {
            return Err(ValidationError::EmptyModuleTitle);
        }
        Ok(())
    }
}
