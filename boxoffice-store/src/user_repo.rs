use async_trait::async_trait;
use boxoffice_core::identity::User;
use boxoffice_core::repository::UserRepository;
use boxoffice_core::{CoreError, CoreResult};
use std::collections::HashMap;
use std::sync::RwLock;
use uuid::Uuid;

#[derive(Default)]
pub struct MemoryUserRepository {
    users: RwLock<HashMap<Uuid, User>>,
}

impl MemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

fn poisoned() -> CoreError {
    CoreError::InternalError("User store lock poisoned".into())
}

#[async_trait]
impl UserRepository for MemoryUserRepository {
    async fn insert(&self, user: User) -> CoreResult<()> {
        let mut users = self.users.write().map_err(|_| poisoned())?;
        if users.contains_key(&user.id) {
            return Err(CoreError::ConflictError("User id already exists".into()));
        }
        if users.values().any(|u| u.email.eq_ignore_ascii_case(&user.email)) {
            return Err(CoreError::ConflictError("Email already registered".into()));
        }
        users.insert(user.id, user);
        Ok(())
    }

    async fn get(&self, id: Uuid) -> CoreResult<User> {
        let users = self.users.read().map_err(|_| poisoned())?;
        users
            .get(&id)
            .cloned()
            .ok_or_else(|| CoreError::NotFoundError(format!("User {id} not found")))
    }

    async fn find_by_email(&self, email: &str) -> CoreResult<Option<User>> {
        let users = self.users.read().map_err(|_| poisoned())?;
        Ok(users
            .values()
            .find(|u| u.email.eq_ignore_ascii_case(email))
            .cloned())
    }

    async fn list(&self) -> CoreResult<Vec<User>> {
        let users = self.users.read().map_err(|_| poisoned())?;
        Ok(users.values().cloned().collect())
    }
}
