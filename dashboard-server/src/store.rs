//! Session store - in-memory uploads and predictions
//!
//! Each session owns its uploaded table and, once predicted, its annotated
//! table. Nothing is persisted; the oldest session is evicted at capacity.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use uuid::Uuid;

use nids_core::{AnnotatedTable, Table};

use crate::models::SessionStatus;

#[derive(Debug, Clone)]
pub struct Session {
    pub id: Uuid,
    pub filename: String,
    pub uploaded_at: DateTime<Utc>,
    pub table: Arc<Table>,
    pub predictions: Option<Arc<AnnotatedTable>>,
}

impl Session {
    pub fn status(&self) -> SessionStatus {
        SessionStatus {
            session_id: self.id,
            filename: self.filename.clone(),
            uploaded_at: self.uploaded_at,
            rows: self.table.row_count(),
            columns: self.table.headers().to_vec(),
            predicted: self.predictions.is_some(),
        }
    }
}

#[derive(Debug)]
pub struct SessionStore {
    sessions: RwLock<HashMap<Uuid, Session>>,
    max_sessions: usize,
}

impl SessionStore {
    pub fn new(max_sessions: usize) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            max_sessions: max_sessions.max(1),
        }
    }

    /// Start a session for a freshly uploaded table
    pub fn create(&self, filename: String, table: Table) -> Session {
        let session = Session {
            id: Uuid::new_v4(),
            filename,
            uploaded_at: Utc::now(),
            table: Arc::new(table),
            predictions: None,
        };

        let mut sessions = self.sessions.write();
        while sessions.len() >= self.max_sessions {
            let oldest = sessions
                .values()
                .min_by_key(|s| s.uploaded_at)
                .map(|s| s.id);
            match oldest {
                Some(id) => {
                    sessions.remove(&id);
                    tracing::debug!("Evicted session {}", id);
                }
                None => break,
            }
        }
        sessions.insert(session.id, session.clone());

        session
    }

    pub fn get(&self, id: Uuid) -> Option<Session> {
        self.sessions.read().get(&id).cloned()
    }

    /// Attach predictions; false if the session is gone
    pub fn set_predictions(&self, id: Uuid, predictions: AnnotatedTable) -> bool {
        match self.sessions.write().get_mut(&id) {
            Some(session) => {
                session.predictions = Some(Arc::new(predictions));
                true
            }
            None => false,
        }
    }

    pub fn remove(&self, id: Uuid) -> Option<Session> {
        self.sessions.write().remove(&id)
    }

    pub fn len(&self) -> usize {
        self.sessions.read().len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> Table {
        Table::from_csv_bytes(b"sport\n80\n").unwrap()
    }

    #[test]
    fn test_create_and_get() {
        let store = SessionStore::new(4);
        let session = store.create("traffic.csv".to_string(), table());

        let found = store.get(session.id).unwrap();
        assert_eq!(found.filename, "traffic.csv");
        assert!(found.predictions.is_none());
        assert!(!found.status().predicted);
    }

    #[test]
    fn test_set_predictions() {
        let store = SessionStore::new(4);
        let session = store.create("a.csv".to_string(), table());
        let annotated = AnnotatedTable::new(&session.table, vec!["Normal".to_string()]).unwrap();

        assert!(store.set_predictions(session.id, annotated.clone()));
        assert!(store.get(session.id).unwrap().status().predicted);
        assert!(!store.set_predictions(Uuid::new_v4(), annotated));
    }

    #[test]
    fn test_evicts_oldest() {
        let store = SessionStore::new(2);
        let first = store.create("1.csv".to_string(), table());
        std::thread::sleep(std::time::Duration::from_millis(2));
        let second = store.create("2.csv".to_string(), table());
        std::thread::sleep(std::time::Duration::from_millis(2));
        let third = store.create("3.csv".to_string(), table());

        assert_eq!(store.len(), 2);
        assert!(store.get(first.id).is_none());
        assert!(store.get(second.id).is_some());
        assert!(store.get(third.id).is_some());
    }

    #[test]
    fn test_remove() {
        let store = SessionStore::new(2);
        let session = store.create("a.csv".to_string(), table());
        assert!(store.remove(session.id).is_some());
        assert!(store.get(session.id).is_none());
    }
}
