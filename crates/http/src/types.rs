//! Wire types shared by the clients, the session layer and the views

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Maximum length of a to-do title
pub const MAX_TITLE_LEN: usize = 255;

/// Largest page size the API accepts
pub const MAX_PAGE_SIZE: u32 = 100;

/// User record, embedded in the access token claims
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub name: String,
    /// Only present on the register response
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}

/// Token response returned by login and refresh
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthResponse {
    pub access_token: String,
    #[serde(default = "default_token_type")]
    pub token_type: String,
}

fn default_token_type() -> String {
    "bearer".to_string()
}

/// Login form (sent form-encoded)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Account registration request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub name: String,
    pub password: String,
}

/// To-do lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TodoStatus {
    #[default]
    Pending,
    InProgress,
    Completed,
}

impl TodoStatus {
    pub const ALL: [TodoStatus; 3] = [Self::Pending, Self::InProgress, Self::Completed];

    /// Value used on the wire and in query strings
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::InProgress => "in_progress",
            Self::Completed => "completed",
        }
    }

    /// Human readable label
    pub fn label(&self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::InProgress => "In Progress",
            Self::Completed => "Completed",
        }
    }
}

impl fmt::Display for TodoStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TodoStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| format!("unknown status '{s}'"))
    }
}

/// A to-do item with its subtasks (one level deep)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Todo {
    pub id: i64,
    pub title: String,
    pub status: TodoStatus,
    #[serde(default)]
    pub is_bookmarked: bool,
    #[serde(default)]
    pub order: i32,
    pub parent_id: Option<i64>,
    pub user_id: i64,
    pub created_at: DateTime<Utc>,
    #[serde(alias = "modified_at")]
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub subtasks: Vec<Todo>,
}

/// Payload for creating a to-do
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TodoCreate {
    pub title: String,
    pub status: TodoStatus,
    #[serde(default)]
    pub is_bookmarked: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<i64>,
}

impl TodoCreate {
    pub fn validate(&self) -> Result<(), String> {
        validate_title(&self.title)
    }
}

/// Partial update of a to-do; unset fields are left untouched
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TodoUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<TodoStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_bookmarked: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<i64>,
}

impl TodoUpdate {
    pub fn validate(&self) -> Result<(), String> {
        match &self.title {
            Some(title) => validate_title(title),
            None => Ok(()),
        }
    }
}

fn validate_title(title: &str) -> Result<(), String> {
    if title.trim().is_empty() {
        return Err("title: cannot be empty".to_string());
    }
    if title.chars().count() > MAX_TITLE_LEN {
        return Err(format!(
            "title: must be less than {MAX_TITLE_LEN} characters"
        ));
    }
    Ok(())
}

/// List filters for `GET /todos`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TodoFilter {
    pub status: Option<TodoStatus>,
    pub is_bookmarked: Option<bool>,
    pub parent_id: Option<i64>,
    pub search: Option<String>,
}

impl TodoFilter {
    /// Query pairs, skipping unset filters
    pub fn to_query(&self) -> Vec<(String, String)> {
        let mut query = Vec::new();
        if let Some(status) = self.status {
            query.push(("status".to_string(), status.to_string()));
        }
        if let Some(bookmarked) = self.is_bookmarked {
            query.push(("is_bookmarked".to_string(), bookmarked.to_string()));
        }
        if let Some(parent_id) = self.parent_id {
            query.push(("parent_id".to_string(), parent_id.to_string()));
        }
        if let Some(search) = self.search.as_deref().filter(|s| !s.is_empty()) {
            query.push(("search".to_string(), search.to_string()));
        }
        query
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderDirection {
    Asc,
    Desc,
}

impl OrderDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }
}

impl FromStr for OrderDirection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "asc" => Ok(Self::Asc),
            "desc" => Ok(Self::Desc),
            other => Err(format!("unknown order direction '{other}'")),
        }
    }
}

/// Pagination and ordering for list requests
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaginationParams {
    pub page: u32,
    pub page_size: u32,
    pub order_by: Option<String>,
    pub order_direction: Option<OrderDirection>,
}

impl Default for PaginationParams {
    fn default() -> Self {
        Self {
            page: 1,
            page_size: 10,
            order_by: None,
            order_direction: None,
        }
    }
}

impl PaginationParams {
    pub fn validate(&self) -> Result<(), String> {
        if self.page < 1 {
            return Err("page: must be at least 1".to_string());
        }
        if self.page_size < 1 || self.page_size > MAX_PAGE_SIZE {
            return Err(format!("page_size: must be between 1 and {MAX_PAGE_SIZE}"));
        }
        Ok(())
    }

    pub fn to_query(&self) -> Vec<(String, String)> {
        let mut query = vec![
            ("page".to_string(), self.page.to_string()),
            ("page_size".to_string(), self.page_size.to_string()),
        ];
        if let Some(order_by) = &self.order_by {
            query.push(("order_by".to_string(), order_by.clone()));
        }
        if let Some(direction) = self.order_direction {
            query.push(("order_direction".to_string(), direction.as_str().to_string()));
        }
        query
    }
}

/// One page of results
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaginatedResponse<T> {
    pub items: Vec<T>,
    pub total_count: u64,
    pub page: u32,
    pub page_size: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TodoReorder {
    pub todo_id: i64,
    pub new_order: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TodoReorderRequest {
    pub reorders: Vec<TodoReorder>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<i64>,
}
