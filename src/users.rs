//! User directory and demo sign-in.
//!
//! Resolves a username/password pair into the [`Actor`] that every workflow
//! call takes. This is role-label gating for a demo deployment, not a
//! credential store: all users share one configured password.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use ts_rs::TS;
use utoipa::ToSchema;

use crate::types::{Actor, Role};

/// A dashboard user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS, JsonSchema, ToSchema)]
#[ts(export)]
pub struct User {
    pub id: String,
    pub username: String,
    pub name: String,
    pub role: Role,
    pub email: String,
    pub active: bool,
}

impl User {
    pub fn actor(&self) -> Actor {
        Actor::new(self.id.clone(), self.role)
    }
}

/// Fields for creating a user
#[derive(Debug, Clone, Serialize, Deserialize, TS, JsonSchema, ToSchema)]
#[ts(export)]
pub struct NewUser {
    pub username: String,
    pub name: String,
    #[serde(default)]
    pub email: String,
    pub role: Role,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UserError {
    #[error("invalid username or password")]
    InvalidCredentials,
    #[error("only ADMIN can manage users, not {0}")]
    Forbidden(Role),
    #[error("user '{0}' not found")]
    NotFound(String),
    #[error("username '{0}' is already taken")]
    Duplicate(String),
    #[error("invalid user: {0}")]
    Invalid(String),
}

/// In-memory user directory
#[derive(Debug, Clone)]
pub struct UserDirectory {
    users: Vec<User>,
    password: String,
    next_id: u32,
}

impl UserDirectory {
    /// Empty directory with the shared sign-in password
    pub fn new(password: impl Into<String>) -> Self {
        Self {
            users: Vec::new(),
            password: password.into(),
            next_id: 1,
        }
    }

    /// Directory seeded with one demo user per role
    pub fn with_demo_users(password: impl Into<String>) -> Self {
        let mut directory = Self::new(password);
        let demo = [
            ("ppc", "PPC User", Role::Ppc),
            ("admin", "Admin User", Role::Admin),
            ("npd", "NPD Engineer", Role::NpdEngineer),
            ("toolcrib", "Tool Crib Person", Role::ToolCrib),
            ("qa", "QA Engineer", Role::QaEngineer),
            ("store", "Store Executive", Role::StoreExecutive),
            ("production", "Production Supervisor", Role::ProductionSupervisor),
            ("manager", "Assistant Manager", Role::AssistantManager),
        ];
        for (username, name, role) in demo {
            directory.insert(NewUser {
                username: username.to_string(),
                name: name.to_string(),
                email: format!("{}@company.com", username),
                role,
            });
        }
        directory
    }

    fn insert(&mut self, new_user: NewUser) -> &User {
        let id = self.next_id.to_string();
        self.next_id += 1;
        self.users.push(User {
            id,
            username: new_user.username,
            name: new_user.name,
            role: new_user.role,
            email: new_user.email,
            active: true,
        });
        &self.users[self.users.len() - 1]
    }

    pub fn all(&self) -> &[User] {
        &self.users
    }

    pub fn get(&self, id: &str) -> Option<&User> {
        self.users.iter().find(|u| u.id == id)
    }

    pub fn by_username(&self, username: &str) -> Option<&User> {
        self.users
            .iter()
            .find(|u| u.username.eq_ignore_ascii_case(username))
    }

    /// Resolve credentials to an active user
    pub fn authenticate(&self, username: &str, password: &str) -> Result<&User, UserError> {
        let user = self
            .by_username(username.trim())
            .filter(|u| u.active && password == self.password)
            .ok_or(UserError::InvalidCredentials)?;
        tracing::info!(username = %user.username, role = %user.role, "User signed in");
        Ok(user)
    }

    /// Create a user (ADMIN only)
    pub fn create(&mut self, actor: &Actor, new_user: NewUser) -> Result<&User, UserError> {
        require_admin(actor)?;

        let username = new_user.username.trim().to_string();
        if username.is_empty() {
            return Err(UserError::Invalid("username is required".to_string()));
        }
        if new_user.name.trim().is_empty() {
            return Err(UserError::Invalid("name is required".to_string()));
        }
        if self.by_username(&username).is_some() {
            return Err(UserError::Duplicate(username));
        }

        tracing::info!(%username, role = %new_user.role, by = %actor.id, "User created");
        Ok(self.insert(NewUser {
            username,
            ..new_user
        }))
    }

    /// Flip a user's active flag (ADMIN only)
    pub fn toggle_active(&mut self, actor: &Actor, id: &str) -> Result<&User, UserError> {
        require_admin(actor)?;

        let user = self
            .users
            .iter_mut()
            .find(|u| u.id == id)
            .ok_or_else(|| UserError::NotFound(id.to_string()))?;
        user.active = !user.active;
        tracing::info!(username = %user.username, active = user.active, "User status changed");
        Ok(&*user)
    }
}

fn require_admin(actor: &Actor) -> Result<(), UserError> {
    if actor.role == Role::Admin {
        Ok(())
    } else {
        Err(UserError::Forbidden(actor.role))
    }
}
