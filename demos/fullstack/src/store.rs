//! In-memory storage, one lock per collection.

use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::model::{Article, User};

/// Seconds since the Unix epoch, `0` if the clock is before it.
#[must_use]
pub fn now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |elapsed| elapsed.as_secs())
}

#[derive(Debug)]
struct Users {
    by_id: BTreeMap<i64, User>,
    next_id: i64,
}

/// Users and articles kept in memory.
///
/// Built explicitly and handed to the service; nothing is global.
#[derive(Debug)]
pub struct MemoryStore {
    users: Mutex<Users>,
    articles: Mutex<BTreeMap<i64, Article>>,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

// A poisoned map is still consistent: every write is a single insert or remove.
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl MemoryStore {
    /// An empty store.
    #[must_use]
    pub fn new() -> Self {
        Self {
            users: Mutex::new(Users {
                by_id: BTreeMap::new(),
                next_id: 1,
            }),
            articles: Mutex::new(BTreeMap::new()),
        }
    }

    /// A store holding Alice (1) and Bob (2).
    #[must_use]
    pub fn with_sample_data() -> Self {
        let store = Self::new();
        store.create_user("Alice", "alice@example.com");
        store.create_user("Bob", "bob@example.com");
        store
    }

    /// Insert a user with the next identifier.
    pub fn create_user(&self, name: &str, email: &str) -> User {
        let mut users = lock(&self.users);
        let user = User {
            id: users.next_id,
            name: name.to_string(),
            email: email.to_string(),
            created_at: now(),
        };
        users.by_id.insert(user.id, user.clone());
        users.next_id += 1;
        user
    }

    #[must_use]
    pub fn get_user(&self, id: i64) -> Option<User> {
        lock(&self.users).by_id.get(&id).cloned()
    }

    /// Users ordered by identifier.
    #[must_use]
    pub fn list_users(&self) -> Vec<User> {
        lock(&self.users).by_id.values().cloned().collect()
    }

    /// Remove a user; `None` if there was none.
    pub fn delete_user(&self, id: i64) -> Option<User> {
        lock(&self.users).by_id.remove(&id)
    }

    /// Overwrite title and content, creating the article if needed.
    pub fn update_article(&self, id: i64, title: &str, content: &str) -> Article {
        let mut articles = lock(&self.articles);
        let article = articles.entry(id).or_insert_with(|| Article {
            id,
            title: String::new(),
            content: String::new(),
            author: "unknown".to_string(),
        });
        article.title = title.to_string();
        article.content = content.to_string();
        article.clone()
    }
}
