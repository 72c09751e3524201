use std::collections::HashMap;
use std::sync::Arc;

use tracing::debug;

use crate::error::RegistryError;
use crate::service::clock::Clock;
use crate::service::diary::UserDiary;

pub struct User {
    username: String,
    diary: UserDiary,
}

impl User {
    fn new(username: &str, clock: Arc<dyn Clock>) -> Self {
        Self {
            username: username.to_string(),
            diary: UserDiary::new(clock),
        }
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn diary(&self) -> &UserDiary {
        &self.diary
    }

    pub fn diary_mut(&mut self) -> &mut UserDiary {
        &mut self.diary
    }
}

/// Owns every user of the session. Each new diary shares the registry's clock.
pub struct UserRegistry {
    users: HashMap<String, User>,
    clock: Arc<dyn Clock>,
}

impl UserRegistry {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            users: HashMap::new(),
            clock,
        }
    }

    pub fn add(&mut self, username: &str) -> Result<(), RegistryError> {
        if username.trim().is_empty() {
            return Err(RegistryError::InvalidUsername);
        }
        if self.users.contains_key(username) {
            return Err(RegistryError::DuplicateUser(username.to_string()));
        }
        self.users
            .insert(username.to_string(), User::new(username, self.clock.clone()));
        debug!(username, "user added");
        Ok(())
    }

    /// Drops the user together with their diary.
    pub fn delete(&mut self, username: &str) -> Result<(), RegistryError> {
        if self.users.remove(username).is_none() {
            return Err(RegistryError::UserNotFound(username.to_string()));
        }
        debug!(username, "user deleted");
        Ok(())
    }

    pub fn get(&self, username: &str) -> Option<&User> {
        self.users.get(username)
    }

    pub fn get_mut(&mut self, username: &str) -> Option<&mut User> {
        self.users.get_mut(username)
    }

    pub fn exists(&self, username: &str) -> bool {
        self.users.contains_key(username)
    }

    pub fn list_usernames(&self) -> Vec<String> {
        let mut names: Vec<String> = self.users.keys().cloned().collect();
        names.sort();
        names
    }

    pub fn count(&self) -> usize {
        self.users.len()
    }

    pub fn has_users(&self) -> bool {
        !self.users.is_empty()
    }
}
