//! Dashboard records shown in activity lists, review queues and user lists.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::{FieldValue, Record};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActivityStatus {
    Pending,
    Approved,
    Rejected,
}

impl ActivityStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActivityStatus::Pending => "pending",
            ActivityStatus::Approved => "approved",
            ActivityStatus::Rejected => "rejected",
        }
    }
}

/// An academic activity submitted by a student.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Activity {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    /// Workshop, Competition, Internship, ...
    #[serde(rename = "type")]
    pub kind: String,
    pub status: ActivityStatus,
    pub student: String,
    pub department: String,
    pub date: NaiveDate,
    #[serde(default)]
    pub credits: f64,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub verified: bool,
}

impl Record for Activity {
    fn field(&self, name: &str) -> Option<FieldValue<'_>> {
        Some(match name {
            "id" => FieldValue::Text(&self.id),
            "title" => FieldValue::Text(&self.title),
            "description" => FieldValue::Text(&self.description),
            "type" => FieldValue::Text(&self.kind),
            "status" => FieldValue::Text(self.status.as_str()),
            "student" => FieldValue::Text(&self.student),
            "department" => FieldValue::Text(&self.department),
            "date" => FieldValue::Date(self.date),
            "credits" => FieldValue::Number(self.credits),
            "tags" => FieldValue::List(self.tags.iter().map(String::as_str).collect()),
            "verified" => FieldValue::Bool(self.verified),
            _ => return None,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Student,
    Faculty,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Student => "student",
            Role::Faculty => "faculty",
            Role::Admin => "admin",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: Role,
    #[serde(default)]
    pub department: String,
    #[serde(default = "default_active")]
    pub active: bool,
}

fn default_active() -> bool { true }

impl Record for User {
    fn field(&self, name: &str) -> Option<FieldValue<'_>> {
        Some(match name {
            "id" => FieldValue::Text(&self.id),
            "name" => FieldValue::Text(&self.name),
            "email" => FieldValue::Text(&self.email),
            "role" => FieldValue::Text(self.role.as_str()),
            "department" => FieldValue::Text(&self.department),
            "active" => FieldValue::Bool(self.active),
            _ => return None,
        })
    }
}
