//! User domain models.

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use validator::Validate;

use crate::resource::{
    matches_eq, matches_search, matches_text_eq, normalize_field, parse_value, text_value,
    FilterError, Resource, ResourceFilter, ResourceSummary,
};

/// Platform role of a user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    Admin,
    Agent,
    SubAgent,
    Student,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Admin => "admin",
            UserRole::Agent => "agent",
            UserRole::SubAgent => "sub_agent",
            UserRole::Student => "student",
        }
    }

    /// Three-letter prefix of the display code, e.g. `AGT-2024-007`.
    pub fn code_prefix(&self) -> &'static str {
        match self {
            UserRole::Admin => "ADM",
            UserRole::Agent => "AGT",
            UserRole::SubAgent => "SUB",
            UserRole::Student => "STU",
        }
    }
}

impl FromStr for UserRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "admin" => Ok(UserRole::Admin),
            "agent" => Ok(UserRole::Agent),
            "sub_agent" | "sub-agent" => Ok(UserRole::SubAgent),
            "student" => Ok(UserRole::Student),
            _ => Err(format!("Unknown user role: {}", s)),
        }
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Account status, shared by users and universities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountStatus {
    Active,
    Inactive,
    #[default]
    Pending,
}

impl FromStr for AccountStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "active" => Ok(AccountStatus::Active),
            "inactive" => Ok(AccountStatus::Inactive),
            "pending" => Ok(AccountStatus::Pending),
            _ => Err(format!("Unknown status: {}", s)),
        }
    }
}

impl std::fmt::Display for AccountStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AccountStatus::Active => write!(f, "active"),
            AccountStatus::Inactive => write!(f, "inactive"),
            AccountStatus::Pending => write!(f, "pending"),
        }
    }
}

/// User domain model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: i64,
    pub uuid: String,
    pub name: String,
    pub email: String,
    pub role: UserRole,
    pub status: AccountStatus,
    pub country: String,
    pub phone: Option<String>,
    pub created_at: NaiveDate,
    pub last_login: Option<DateTime<Utc>>,
}

/// Request to create a new user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserRequest {
    #[validate(length(min = 2, max = 100, message = "Name must be 2-100 characters"))]
    pub name: String,
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
    pub role: UserRole,
    #[serde(default)]
    pub status: AccountStatus,
    #[validate(custom(function = "shared::validation::validate_not_blank"))]
    pub country: String,
    pub phone: Option<String>,
}

/// Request to update a user. Role is fixed at creation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserRequest {
    #[validate(length(min = 2, max = 100, message = "Name must be 2-100 characters"))]
    pub name: Option<String>,
    #[validate(email(message = "Invalid email format"))]
    pub email: Option<String>,
    pub status: Option<AccountStatus>,
    pub country: Option<String>,
    pub phone: Option<String>,
    pub last_login: Option<DateTime<Utc>>,
}

/// Filter criteria for the user list.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserFilter {
    pub search: Option<String>,
    pub role: Option<UserRole>,
    pub status: Option<AccountStatus>,
    pub country: Option<String>,
}

/// Summary strip for the user list.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSummary {
    pub total: usize,
    pub admins: usize,
    pub agents: usize,
    pub sub_agents: usize,
    pub students: usize,
    pub active: usize,
}

impl UserSummary {
    fn role_counter(&mut self, role: UserRole) -> &mut usize {
        match role {
            UserRole::Admin => &mut self.admins,
            UserRole::Agent => &mut self.agents,
            UserRole::SubAgent => &mut self.sub_agents,
            UserRole::Student => &mut self.students,
        }
    }
}

impl Resource for User {
    type Draft = CreateUserRequest;
    type Patch = UpdateUserRequest;
    type Filter = UserFilter;
    type Summary = UserSummary;

    const NAME: &'static str = "user";

    fn id(&self) -> i64 {
        self.id
    }

    fn from_draft(id: i64, draft: CreateUserRequest, today: NaiveDate) -> Self {
        Self {
            id,
            uuid: format!("{}-{}-{:03}", draft.role.code_prefix(), today.year(), id),
            name: draft.name,
            email: draft.email,
            role: draft.role,
            status: draft.status,
            country: draft.country,
            phone: draft.phone,
            created_at: today,
            last_login: None,
        }
    }

    fn apply_patch(&mut self, patch: UpdateUserRequest, _today: NaiveDate) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(email) = patch.email {
            self.email = email;
        }
        if let Some(status) = patch.status {
            self.status = status;
        }
        if let Some(country) = patch.country {
            self.country = country;
        }
        if let Some(phone) = patch.phone {
            self.phone = Some(phone);
        }
        if let Some(last_login) = patch.last_login {
            self.last_login = Some(last_login);
        }
    }
}

impl ResourceFilter<User> for UserFilter {
    fn matches(&self, user: &User) -> bool {
        matches_search(
            self.search.as_deref(),
            &[user.name.as_str(), user.email.as_str(), user.uuid.as_str()],
        ) && matches_eq(self.role.as_ref(), &user.role)
            && matches_eq(self.status.as_ref(), &user.status)
            && matches_text_eq(self.country.as_deref(), &user.country)
    }

    fn set_field(&mut self, field: &str, value: &str) -> Result<(), FilterError> {
        match normalize_field(field).as_str() {
            "search" | "searchterm" => self.search = text_value(value),
            "role" => self.role = parse_value(field, value)?,
            "status" => self.status = parse_value(field, value)?,
            "country" => self.country = text_value(value),
            _ => {
                return Err(FilterError::UnknownField {
                    resource: User::NAME,
                    field: field.to_string(),
                })
            }
        }
        Ok(())
    }
}

impl ResourceSummary<User> for UserSummary {
    fn record(&mut self, user: &User) {
        self.total += 1;
        *self.role_counter(user.role) += 1;
        if user.status == AccountStatus::Active {
            self.active += 1;
        }
    }

    fn unrecord(&mut self, user: &User) {
        self.total = self.total.saturating_sub(1);
        let counter = self.role_counter(user.role);
        *counter = counter.saturating_sub(1);
        if user.status == AccountStatus::Active {
            self.active = self.active.saturating_sub(1);
        }
    }
}
