use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// A registered teacher record. `employee_id` is unique across the store.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Teacher {
    pub id: String,
    pub name: String,
    pub department: String,
    pub employee_id: String,
    pub designation: Option<String>,
    pub phone: Option<String>,
    pub institution: Option<String>,
    pub photo_url: Option<String>,
    pub template: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct InsertTeacher {
    pub name: String,
    pub department: String,
    pub employee_id: String,
    #[serde(default)]
    pub designation: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub institution: Option<String>,
    #[serde(default)]
    pub photo_url: Option<String>,
    #[serde(default)]
    pub template: Option<String>,
}

/// PATCH body: every field optional.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTeacher {
    pub name: Option<String>,
    pub department: Option<String>,
    pub employee_id: Option<String>,
    pub designation: Option<String>,
    pub phone: Option<String>,
    pub institution: Option<String>,
    pub photo_url: Option<String>,
    pub template: Option<String>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct FieldError {
    pub field: &'static str,
    pub message: &'static str,
}

impl InsertTeacher {
    /// Mandatory fields must be non-empty. Errors are reported per field,
    /// all at once, so the form can surface them together.
    pub fn validate(&self) -> Result<(), Vec<FieldError>> {
        let mut errors = Vec::new();
        if self.name.trim().is_empty() {
            errors.push(FieldError { field: "name", message: "name is required" });
        }
        if self.department.trim().is_empty() {
            errors.push(FieldError { field: "department", message: "department is required" });
        }
        if self.employee_id.trim().is_empty() {
            errors.push(FieldError { field: "employeeId", message: "employeeId is required" });
        }
        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}
