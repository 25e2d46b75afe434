//! Session management for interactive chat

use std::sync::Arc;
use std::time::Duration;
use std::time::SystemTime;

use dashmap::DashMap;
use serde::Deserialize;
use serde::Serialize;
use uuid::Uuid;

/// One turn in a session transcript
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatTurn {
    pub role: String, // "user" or "assistant"
    pub content: String,
    pub timestamp: u64,
}

/// Chat session data
///
/// The transcript is append-only and unbounded for the life of the
/// session; it lives in memory only and is not persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatSession {
    pub session_id: String,
    pub transcript: Vec<ChatTurn>,
    pub created_at: u64,
    pub last_activity: u64,
}

impl ChatSession {
    #[must_use]
    pub fn new() -> Self {
        let now = unix_now();
        Self {
            session_id: Uuid::new_v4().to_string(),
            transcript: Vec::new(),
            created_at: now,
            last_activity: now,
        }
    }

    pub fn add_turn(&mut self, role: &str, content: String) {
        let timestamp = unix_now();
        self.transcript.push(ChatTurn {
            role: role.to_string(),
            content,
            timestamp,
        });
        self.last_activity = timestamp;
    }

    #[must_use]
    pub fn is_expired(&self, timeout_secs: u64) -> bool {
        unix_now().saturating_sub(self.last_activity) > timeout_secs
    }
}

impl Default for ChatSession {
    fn default() -> Self {
        Self::new()
    }
}

fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(SystemTime::UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}

/// Session manager with automatic cleanup of expired sessions
pub struct SessionManager {
    sessions: Arc<DashMap<String, ChatSession>>,
    session_timeout: Duration,
}

impl SessionManager {
    #[must_use]
    pub fn new(session_timeout_secs: u64) -> Self {
        let sessions = Arc::new(DashMap::new());
        let session_timeout = Duration::from_secs(session_timeout_secs);

        let sessions_clone = sessions.clone();
        tokio::spawn(async move {
            loop {
                tokio::time::sleep(Duration::from_secs(60)).await;
                Self::cleanup_expired_sessions(&sessions_clone, session_timeout_secs);
            }
        });

        Self {
            sessions,
            session_timeout,
        }
    }

    #[must_use]
    pub fn create_session(&self) -> ChatSession {
        let session = ChatSession::new();
        self.sessions
            .insert(session.session_id.clone(), session.clone());
        session
    }

    #[must_use]
    pub fn get_session(&self, session_id: &str) -> Option<ChatSession> {
        self.sessions.get(session_id).map(|s| s.clone())
    }

    /// Get an existing session or create a fresh one
    #[must_use]
    pub fn get_or_create(&self, session_id: Option<&str>) -> ChatSession {
        session_id
            .and_then(|id| self.get_session(id))
            .unwrap_or_else(|| self.create_session())
    }

    pub fn update_session(&self, session: ChatSession) {
        self.sessions.insert(session.session_id.clone(), session);
    }

    pub fn delete_session(&self, session_id: &str) {
        self.sessions.remove(session_id);
    }

    #[must_use]
    pub fn session_count(&self) -> usize {
        self.sessions.len()
    }

    #[must_use]
    pub fn timeout(&self) -> Duration {
        self.session_timeout
    }

    fn cleanup_expired_sessions(sessions: &DashMap<String, ChatSession>, timeout_secs: u64) {
        let expired: Vec<String> = sessions
            .iter()
            .filter(|entry| entry.value().is_expired(timeout_secs))
            .map(|entry| entry.key().clone())
            .collect();

        for session_id in expired {
            sessions.remove(&session_id);
            tracing::info!("Cleaned up expired session: {session_id}");
        }
    }
}

impl Default for SessionManager {
    fn default() -> Self {
        Self::new(3600) // 1 hour timeout
    }
}
