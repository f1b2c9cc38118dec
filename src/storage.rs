use std::collections::HashMap;

use chrono::Utc;
use parking_lot::RwLock;
use thiserror::Error;
use uuid::Uuid;

use crate::model::{InsertTeacher, Teacher, UpdateTeacher};

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Employee ID already exists")]
    DuplicateEmployeeId,
    #[error("Teacher not found")]
    NotFound,
}

/// In-memory teacher store. The registry of records the card engine reads
/// snapshots from; renders never hold the lock.
#[derive(Default)]
pub struct TeacherStore {
    teachers: RwLock<HashMap<String, Teacher>>,
}

impl TeacherStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: &str) -> Option<Teacher> {
        self.teachers.read().get(id).cloned()
    }

    pub fn get_by_employee_id(&self, employee_id: &str) -> Option<Teacher> {
        self.teachers
            .read()
            .values()
            .find(|t| t.employee_id == employee_id)
            .cloned()
    }

    pub fn create(&self, insert: InsertTeacher) -> Result<Teacher, StorageError> {
        let mut teachers = self.teachers.write();
        if teachers.values().any(|t| t.employee_id == insert.employee_id) {
            return Err(StorageError::DuplicateEmployeeId);
        }
        let teacher = Teacher {
            id: Uuid::new_v4().to_string(),
            name: insert.name,
            department: insert.department,
            employee_id: insert.employee_id,
            designation: insert.designation,
            phone: insert.phone,
            institution: insert.institution,
            photo_url: insert.photo_url,
            template: insert.template.unwrap_or_else(|| "classic-blue".to_string()),
            created_at: Utc::now(),
        };
        teachers.insert(teacher.id.clone(), teacher.clone());
        Ok(teacher)
    }

    pub fn update(&self, id: &str, updates: UpdateTeacher) -> Result<Teacher, StorageError> {
        let mut teachers = self.teachers.write();
        if let Some(new_emp) = updates.employee_id.as_deref() {
            if teachers.values().any(|t| t.employee_id == new_emp && t.id != id) {
                return Err(StorageError::DuplicateEmployeeId);
            }
        }
        let teacher = teachers.get_mut(id).ok_or(StorageError::NotFound)?;
        if let Some(v) = updates.name {
            teacher.name = v;
        }
        if let Some(v) = updates.department {
            teacher.department = v;
        }
        if let Some(v) = updates.employee_id {
            teacher.employee_id = v;
        }
        if let Some(v) = updates.designation {
            teacher.designation = Some(v);
        }
        if let Some(v) = updates.phone {
            teacher.phone = Some(v);
        }
        if let Some(v) = updates.institution {
            teacher.institution = Some(v);
        }
        if let Some(v) = updates.photo_url {
            teacher.photo_url = Some(v);
        }
        if let Some(v) = updates.template {
            teacher.template = v;
        }
        Ok(teacher.clone())
    }

    pub fn delete(&self, id: &str) -> bool {
        self.teachers.write().remove(id).is_some()
    }

    /// All records, newest first.
    pub fn all(&self) -> Vec<Teacher> {
        let mut list: Vec<Teacher> = self.teachers.read().values().cloned().collect();
        list.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        list
    }

    pub fn recent(&self, limit: usize) -> Vec<Teacher> {
        let mut list = self.all();
        list.truncate(limit);
        list
    }

    pub fn len(&self) -> usize {
        self.teachers.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.teachers.read().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn insert(name: &str, emp: &str) -> InsertTeacher {
        InsertTeacher {
            name: name.into(),
            department: "Math".into(),
            employee_id: emp.into(),
            designation: None,
            phone: None,
            institution: None,
            photo_url: None,
            template: None,
        }
    }

    #[test]
    fn create_assigns_id_and_default_template() {
        let store = TeacherStore::new();
        let t = store.create(insert("Karim", "EMP001")).unwrap();
        assert!(!t.id.is_empty());
        assert_eq!(t.template, "classic-blue");
        assert_eq!(store.get(&t.id).unwrap().name, "Karim");
    }

    #[test]
    fn duplicate_employee_id_is_rejected() {
        let store = TeacherStore::new();
        store.create(insert("Karim", "EMP001")).unwrap();
        let err = store.create(insert("Rahim", "EMP001")).unwrap_err();
        assert!(matches!(err, StorageError::DuplicateEmployeeId));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn update_checks_uniqueness_against_other_records() {
        let store = TeacherStore::new();
        let a = store.create(insert("Karim", "EMP001")).unwrap();
        let b = store.create(insert("Rahim", "EMP002")).unwrap();

        // changing b to a's employee id must fail
        let updates = UpdateTeacher { employee_id: Some("EMP001".into()), ..Default::default() };
        assert!(matches!(store.update(&b.id, updates), Err(StorageError::DuplicateEmployeeId)));

        // keeping your own employee id is fine
        let updates = UpdateTeacher {
            employee_id: Some("EMP001".into()),
            phone: Some("017".into()),
            ..Default::default()
        };
        let updated = store.update(&a.id, updates).unwrap();
        assert_eq!(updated.phone.as_deref(), Some("017"));
    }

    #[test]
    fn update_missing_record_is_not_found() {
        let store = TeacherStore::new();
        let err = store.update("nope", UpdateTeacher::default()).unwrap_err();
        assert!(matches!(err, StorageError::NotFound));
    }

    #[test]
    fn all_is_newest_first_and_recent_truncates() {
        let store = TeacherStore::new();
        for (i, emp) in ["EMP001", "EMP002", "EMP003"].iter().enumerate() {
            store.create(insert(&format!("t{i}"), emp)).unwrap();
            std::thread::sleep(std::time::Duration::from_millis(5));
        }
        let all = store.all();
        assert_eq!(all.len(), 3);
        assert_eq!(all[0].employee_id, "EMP003");
        assert_eq!(all[2].employee_id, "EMP001");
        assert_eq!(store.recent(2).len(), 2);
        assert_eq!(store.recent(2)[0].employee_id, "EMP003");
    }

    #[test]
    fn delete_reports_presence() {
        let store = TeacherStore::new();
        let t = store.create(insert("Karim", "EMP001")).unwrap();
        assert!(store.delete(&t.id));
        assert!(!store.delete(&t.id));
        assert!(store.get(&t.id).is_none());
    }

    #[test]
    fn lookup_by_employee_id() {
        let store = TeacherStore::new();
        store.create(insert("Karim", "EMP001")).unwrap();
        assert_eq!(store.get_by_employee_id("EMP001").unwrap().name, "Karim");
        assert!(store.get_by_employee_id("EMP999").is_none());
    }
}
