use chrono::{DateTime, Datelike, NaiveDate, Utc};

use crate::model::Teacher;

pub const DEFAULT_INSTITUTION: &str = "ঢাকা উচ্চ বিদ্যালয়";
pub const DEFAULT_DESIGNATION: &str = "সহকারী শিক্ষক";
pub const CARD_SUBTITLE: &str = "শিক্ষক পরিচয়পত্র";
pub const NO_TEACHER_PROMPT: &str = "কোনো শিক্ষক নির্বাচিত নয়";
pub const JOINING_DATE_PLACEHOLDER: &str = "০১/০১/২০২৪";

pub const LABEL_DEPARTMENT: &str = "বিভাগ:";
pub const LABEL_EMPLOYEE_ID: &str = "আইডি:";
pub const LABEL_PHONE: &str = "মোবাইল:";
pub const LABEL_INSTITUTION: &str = "প্রতিষ্ঠান:";
pub const LABEL_EMAIL: &str = "ইমেইল:";
pub const LABEL_JOINED: &str = "যোগদান:";
pub const LABEL_ISSUED: &str = "জারি তারিখ:";
pub const LABEL_EXPIRY: &str = "মেয়াদ:";

/// A teacher record with every optional field resolved to its placeholder,
/// plus the pre-rendered date strings. Layouts consume this uniformly so no
/// default logic is repeated per layout.
#[derive(Debug, Clone)]
pub struct DisplayTeacher {
    pub name: String,
    pub designation: String,
    pub department: String,
    pub employee_id: String,
    pub phone: String,
    pub institution: String,
    pub email: String,
    pub issued_at: DateTime<Utc>,
    /// Issue date, dd/mm/yyyy in Bengali numerals.
    pub issued: String,
    /// 31/12 of the issuance year.
    pub expiry: String,
    /// 31/12 of the year after issuance (minimal layout).
    pub expiry_extended: String,
}

impl DisplayTeacher {
    pub fn new(teacher: &Teacher) -> Self {
        let issued_at = teacher.created_at;
        let issued_date = issued_at.date_naive();
        Self {
            name: teacher.name.clone(),
            designation: teacher
                .designation
                .clone()
                .filter(|s| !s.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_DESIGNATION.to_string()),
            department: teacher.department.clone(),
            employee_id: teacher.employee_id.clone(),
            phone: teacher
                .phone
                .clone()
                .filter(|s| !s.trim().is_empty())
                .unwrap_or_else(|| "N/A".to_string()),
            institution: teacher
                .institution
                .clone()
                .filter(|s| !s.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_INSTITUTION.to_string()),
            email: "N/A".to_string(),
            issued_at,
            issued: format_date_bn(issued_date),
            expiry: format_date_bn(year_end(issued_date.year())),
            expiry_extended: format_date_bn(year_end(issued_date.year() + 1)),
        }
    }
}

fn year_end(year: i32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, 12, 31).expect("dec 31 exists")
}

/// Replace ASCII digits with Bengali numerals.
pub fn to_bengali_digits(s: &str) -> String {
    s.chars()
        .map(|c| match c {
            '0'..='9' => {
                let d = c as u32 - '0' as u32;
                char::from_u32('০' as u32 + d).unwrap_or(c)
            }
            _ => c,
        })
        .collect()
}

pub fn format_date_bn(d: NaiveDate) -> String {
    to_bengali_digits(&format!("{:02}/{:02}/{:04}", d.day(), d.month(), d.year()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn teacher() -> Teacher {
        Teacher {
            id: "t1".into(),
            name: "Karim".into(),
            department: "Math".into(),
            employee_id: "EMP001234".into(),
            designation: None,
            phone: None,
            institution: None,
            photo_url: None,
            template: "classic-blue".into(),
            created_at: Utc.with_ymd_and_hms(2024, 1, 1, 9, 30, 0).unwrap(),
        }
    }

    #[test]
    fn bengali_digits() {
        assert_eq!(to_bengali_digits("0123456789"), "০১২৩৪৫৬৭৮৯");
        assert_eq!(to_bengali_digits("EMP001234"), "EMP০০১২৩৪");
    }

    #[test]
    fn date_formatting() {
        let d = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        assert_eq!(format_date_bn(d), "০১/০১/২০২৪");
    }

    #[test]
    fn defaults_are_substituted_once() {
        let dt = DisplayTeacher::new(&teacher());
        assert_eq!(dt.institution, DEFAULT_INSTITUTION);
        assert_eq!(dt.designation, DEFAULT_DESIGNATION);
        assert_eq!(dt.phone, "N/A");
        assert_eq!(dt.email, "N/A");
    }

    #[test]
    fn empty_strings_count_as_absent() {
        let mut t = teacher();
        t.phone = Some("   ".into());
        t.designation = Some(String::new());
        let dt = DisplayTeacher::new(&t);
        assert_eq!(dt.phone, "N/A");
        assert_eq!(dt.designation, DEFAULT_DESIGNATION);
    }

    #[test]
    fn expiry_is_dec_31_of_issue_year() {
        let dt = DisplayTeacher::new(&teacher());
        assert_eq!(dt.issued, "০১/০১/২০২৪");
        assert_eq!(dt.expiry, "৩১/১২/২০২৪");
        assert_eq!(dt.expiry_extended, "৩১/১২/২০২৫");
    }

    #[test]
    fn present_fields_pass_through() {
        let mut t = teacher();
        t.phone = Some("01712345678".into());
        t.institution = Some("Rajshahi College".into());
        let dt = DisplayTeacher::new(&t);
        assert_eq!(dt.phone, "01712345678");
        assert_eq!(dt.institution, "Rajshahi College");
    }
}
