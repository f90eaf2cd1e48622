//! In-memory persistence gateway.
//!
//! One shared store implementing every repository port, used by tests and
//! local development. Cascade behavior mirrors the relational schema:
//! deleting an objective removes its key results and their history, and
//! deleting a session removes its messages.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::domain::chat::{ChatMessage, ChatSession, SessionKind};
use crate::domain::foundation::{
    ChatSessionId, KeyResultId, ObjectiveId, Timestamp, UserId,
};
use crate::domain::goal::{KeyResult, Objective, ProgressHistoryEntry};
use crate::ports::{
    ChatMessageRepository, ChatSessionRepository, KeyResultRepository, ObjectiveRepository,
    ProgressHistoryRepository, StoreError,
};

#[derive(Default)]
struct StoreInner {
    objectives: Mutex<Vec<Objective>>,
    key_results: Mutex<Vec<KeyResult>>,
    history: Mutex<Vec<ProgressHistoryEntry>>,
    sessions: Mutex<Vec<ChatSession>>,
    messages: Mutex<Vec<ChatMessage>>,
}

/// In-memory implementation of the persistence gateway.
///
/// Clones share the same underlying collections.
#[derive(Clone, Default)]
pub struct InMemoryStore {
    inner: Arc<StoreInner>,
}

impl InMemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    fn lock<'a, T>(&self, mutex: &'a Mutex<Vec<T>>) -> Result<std::sync::MutexGuard<'a, Vec<T>>, StoreError> {
        mutex
            .lock()
            .map_err(|_| StoreError::database("store lock poisoned"))
    }
}

#[async_trait]
impl ObjectiveRepository for InMemoryStore {
    async fn insert(&self, objective: &Objective) -> Result<(), StoreError> {
        self.lock(&self.inner.objectives)?.push(objective.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: &ObjectiveId) -> Result<Option<Objective>, StoreError> {
        let objectives = self.lock(&self.inner.objectives)?;
        Ok(objectives.iter().find(|o| o.id() == id).cloned())
    }

    async fn find_by_owner(&self, owner: &UserId) -> Result<Vec<Objective>, StoreError> {
        let objectives = self.lock(&self.inner.objectives)?;
        let mut owned: Vec<Objective> = objectives
            .iter()
            .filter(|o| o.owner() == owner)
            .cloned()
            .collect();
        owned.sort_by(|a, b| b.updated_at().cmp(a.updated_at()));
        Ok(owned)
    }

    async fn update(&self, objective: &Objective) -> Result<bool, StoreError> {
        let mut objectives = self.lock(&self.inner.objectives)?;
        match objectives.iter_mut().find(|o| o.id() == objective.id()) {
            Some(row) => {
                *row = objective.clone();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete(&self, id: &ObjectiveId) -> Result<bool, StoreError> {
        let mut objectives = self.lock(&self.inner.objectives)?;
        let before = objectives.len();
        objectives.retain(|o| o.id() != id);
        if objectives.len() == before {
            return Ok(false);
        }
        drop(objectives);

        // Cascade: key results, then their history
        let mut key_results = self.lock(&self.inner.key_results)?;
        let removed: Vec<KeyResultId> = key_results
            .iter()
            .filter(|kr| kr.objective_id() == id)
            .map(|kr| *kr.id())
            .collect();
        key_results.retain(|kr| kr.objective_id() != id);
        drop(key_results);

        let mut history = self.lock(&self.inner.history)?;
        history.retain(|entry| !removed.contains(entry.key_result_id()));
        Ok(true)
    }
}

#[async_trait]
impl KeyResultRepository for InMemoryStore {
    async fn insert(&self, key_result: &KeyResult) -> Result<(), StoreError> {
        self.lock(&self.inner.key_results)?.push(key_result.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: &KeyResultId) -> Result<Option<KeyResult>, StoreError> {
        let key_results = self.lock(&self.inner.key_results)?;
        Ok(key_results.iter().find(|kr| kr.id() == id).cloned())
    }

    async fn find_by_objective(
        &self,
        objective_id: &ObjectiveId,
    ) -> Result<Vec<KeyResult>, StoreError> {
        let key_results = self.lock(&self.inner.key_results)?;
        Ok(key_results
            .iter()
            .filter(|kr| kr.objective_id() == objective_id)
            .cloned()
            .collect())
    }

    async fn update(&self, key_result: &KeyResult) -> Result<bool, StoreError> {
        let mut key_results = self.lock(&self.inner.key_results)?;
        match key_results.iter_mut().find(|kr| kr.id() == key_result.id()) {
            Some(row) => {
                *row = key_result.clone();
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

#[async_trait]
impl ProgressHistoryRepository for InMemoryStore {
    async fn append(&self, entry: &ProgressHistoryEntry) -> Result<(), StoreError> {
        self.lock(&self.inner.history)?.push(entry.clone());
        Ok(())
    }

    async fn find_by_key_result(
        &self,
        key_result_id: &KeyResultId,
    ) -> Result<Vec<ProgressHistoryEntry>, StoreError> {
        let history = self.lock(&self.inner.history)?;
        let mut entries: Vec<ProgressHistoryEntry> = history
            .iter()
            .filter(|entry| entry.key_result_id() == key_result_id)
            .cloned()
            .collect();
        entries.sort_by(|a, b| a.recorded_at().cmp(b.recorded_at()));
        Ok(entries)
    }
}

#[async_trait]
impl ChatSessionRepository for InMemoryStore {
    async fn insert(&self, session: &ChatSession) -> Result<(), StoreError> {
        self.lock(&self.inner.sessions)?.push(session.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: &ChatSessionId) -> Result<Option<ChatSession>, StoreError> {
        let sessions = self.lock(&self.inner.sessions)?;
        Ok(sessions.iter().find(|s| s.id() == id).cloned())
    }

    async fn find_by_owner(
        &self,
        owner: &UserId,
        kind: SessionKind,
        limit: u32,
    ) -> Result<Vec<ChatSession>, StoreError> {
        let sessions = self.lock(&self.inner.sessions)?;
        let mut owned: Vec<ChatSession> = sessions
            .iter()
            .filter(|s| s.owner() == owner && s.kind() == kind)
            .cloned()
            .collect();
        owned.sort_by(|a, b| b.updated_at().cmp(a.updated_at()));
        owned.truncate(limit as usize);
        Ok(owned)
    }

    async fn touch(&self, id: &ChatSessionId, at: Timestamp) -> Result<bool, StoreError> {
        let mut sessions = self.lock(&self.inner.sessions)?;
        match sessions.iter_mut().find(|s| s.id() == id) {
            Some(session) => {
                let refreshed = ChatSession::reconstitute(
                    *session.id(),
                    session.owner().clone(),
                    session.kind(),
                    session.title().to_string(),
                    *session.created_at(),
                    at,
                );
                *session = refreshed;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete(&self, id: &ChatSessionId) -> Result<bool, StoreError> {
        let mut sessions = self.lock(&self.inner.sessions)?;
        let before = sessions.len();
        sessions.retain(|s| s.id() != id);
        if sessions.len() == before {
            return Ok(false);
        }
        drop(sessions);

        // Cascade: messages
        let mut messages = self.lock(&self.inner.messages)?;
        messages.retain(|m| m.session_id() != id);
        Ok(true)
    }
}

#[async_trait]
impl ChatMessageRepository for InMemoryStore {
    async fn append(&self, message: &ChatMessage) -> Result<(), StoreError> {
        self.lock(&self.inner.messages)?.push(message.clone());
        Ok(())
    }

    async fn find_by_session(
        &self,
        session_id: &ChatSessionId,
        limit: u32,
    ) -> Result<Vec<ChatMessage>, StoreError> {
        let messages = self.lock(&self.inner.messages)?;
        let mut found: Vec<ChatMessage> = messages
            .iter()
            .filter(|m| m.session_id() == session_id)
            .cloned()
            .collect();
        found.sort_by(|a, b| a.created_at().cmp(b.created_at()));
        found.truncate(limit as usize);
        Ok(found)
    }

    async fn count_by_session(&self, session_id: &ChatSessionId) -> Result<u64, StoreError> {
        let messages = self.lock(&self.inner.messages)?;
        Ok(messages.iter().filter(|m| m.session_id() == session_id).count() as u64)
    }
}
