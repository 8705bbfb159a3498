//! Concurrency-safe in-memory session store.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError, RwLock};

use hashcrack_core::{Error, Result, SessionId, SessionSnapshot};
use hashcrack_launcher::Terminator;

/// Holds every session record plus the live process handles.
///
/// Each record sits behind its own mutex; the map is only write-locked to add
/// or remove entries, so updates to different sessions never contend.
/// Terminators live in a separate table and can be taken exactly once.
#[derive(Debug, Default)]
pub struct SessionRegistry {
    sessions: RwLock<HashMap<SessionId, Arc<Mutex<SessionSnapshot>>>>,
    terminators: Mutex<HashMap<SessionId, Terminator>>,
}

impl SessionRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new session.
    pub fn create(&self, record: SessionSnapshot, terminator: Option<Terminator>) -> Result<()> {
        let id = record.id;
        let mut sessions = self.sessions.write().unwrap_or_else(PoisonError::into_inner);
        if sessions.contains_key(&id) {
            return Err(Error::SessionExists(id));
        }
        sessions.insert(id, Arc::new(Mutex::new(record)));

        if let Some(terminator) = terminator {
            self.terminators
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .insert(id, terminator);
        }

        Ok(())
    }

    /// Attach the termination capability of a registered session's process.
    pub fn attach_terminator(&self, id: SessionId, terminator: Terminator) {
        self.terminators
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(id, terminator);
    }

    /// Copy of a session record.
    pub fn get(&self, id: &SessionId) -> Result<SessionSnapshot> {
        let entry = self.entry(id)?;
        let record = entry.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(record.clone())
    }

    /// Copies of all records, in no particular order.
    ///
    /// Each record is copied under its own lock, so no copy is ever a
    /// half-applied update.
    pub fn list_all(&self) -> Vec<SessionSnapshot> {
        let entries: Vec<_> = self
            .sessions
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .cloned()
            .collect();

        entries
            .iter()
            .map(|e| e.lock().unwrap_or_else(PoisonError::into_inner).clone())
            .collect()
    }

    /// Apply `f` to a record atomically with respect to every other access
    /// to the same session.
    pub fn update<F, R>(&self, id: &SessionId, f: F) -> Result<R>
    where
        F: FnOnce(&mut SessionSnapshot) -> R,
    {
        let entry = self.entry(id)?;
        let mut record = entry.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(f(&mut record))
    }

    /// Remove and return a session's terminator. Only the first caller gets it.
    pub fn take_terminator(&self, id: &SessionId) -> Option<Terminator> {
        self.terminators
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(id)
    }

    /// Whether a terminator is still held for a session.
    pub fn has_terminator(&self, id: &SessionId) -> bool {
        self.terminators
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(id)
    }

    /// Drop a session and its terminator, returning the final record.
    pub fn remove(&self, id: &SessionId) -> Result<SessionSnapshot> {
        let entry = self
            .sessions
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(id)
            .ok_or(Error::SessionNotFound(*id))?;
        self.take_terminator(id);

        let record = entry.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(record.clone())
    }

    /// Number of registered sessions.
    pub fn len(&self) -> usize {
        self.sessions
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Whether the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of sessions still running.
    pub fn count_running(&self) -> usize {
        self.list_all()
            .iter()
            .filter(|s| !s.status.is_terminal())
            .count()
    }

    fn entry(&self, id: &SessionId) -> Result<Arc<Mutex<SessionSnapshot>>> {
        self.sessions
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(id)
            .cloned()
            .ok_or(Error::SessionNotFound(*id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hashcrack_core::SessionStatus;
    use std::thread;

    fn record() -> SessionSnapshot {
        SessionSnapshot::new(SessionId::new(), "5f4dcc3b5aa765d61d8327deb882cf99", 0)
    }

    #[test]
    fn test_create_and_get() {
        let registry = SessionRegistry::new();
        let rec = record();
        let id = rec.id;

        registry.create(rec, None).unwrap();

        let got = registry.get(&id).unwrap();
        assert_eq!(got.id, id);
        assert_eq!(got.status, SessionStatus::Running);
        assert_eq!(registry.len(), 1);
        assert!(!registry.has_terminator(&id));
    }

    #[test]
    fn test_create_duplicate_id() {
        let registry = SessionRegistry::new();
        let rec = record();
        let id = rec.id;

        registry.create(rec.clone(), None).unwrap();
        let err = registry.create(rec, None).unwrap_err();
        assert!(matches!(err, Error::SessionExists(dup) if dup == id));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_get_unknown() {
        let registry = SessionRegistry::new();
        let id = SessionId::new();
        assert!(matches!(registry.get(&id), Err(Error::SessionNotFound(missing)) if missing == id));
        assert!(matches!(
            registry.update(&id, |_| ()),
            Err(Error::SessionNotFound(_))
        ));
        assert!(registry.take_terminator(&id).is_none());
    }

    #[test]
    fn test_update_returns_closure_result() {
        let registry = SessionRegistry::new();
        let rec = record();
        let id = rec.id;
        registry.create(rec, None).unwrap();

        let changed = registry.update(&id, |s| s.stop()).unwrap();
        assert!(changed);
        let changed_again = registry.update(&id, |s| s.stop()).unwrap();
        assert!(!changed_again);

        assert_eq!(registry.get(&id).unwrap().status, SessionStatus::Stopped);
        assert_eq!(registry.count_running(), 0);
    }

    #[test]
    fn test_remove() {
        let registry = SessionRegistry::new();
        let rec = record();
        let id = rec.id;
        registry.create(rec, None).unwrap();

        let removed = registry.remove(&id).unwrap();
        assert_eq!(removed.id, id);
        assert!(registry.is_empty());
        assert!(matches!(registry.remove(&id), Err(Error::SessionNotFound(_))));
    }

    #[test]
    fn test_concurrent_updates_are_not_lost() {
        let registry = Arc::new(SessionRegistry::new());
        let rec = record();
        let id = rec.id;
        registry.create(rec, None).unwrap();

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let registry = Arc::clone(&registry);
                thread::spawn(move || {
                    for _ in 0..100 {
                        registry
                            .update(&id, |s| {
                                let next = s.temperature.unwrap_or(0) + 1;
                                s.temperature = Some(next);
                            })
                            .unwrap();
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(registry.get(&id).unwrap().temperature, Some(800));
    }

    #[test]
    fn test_list_all_never_sees_partial_record() {
        let registry = Arc::new(SessionRegistry::new());
        let rec = record();
        let id = rec.id;
        registry.create(rec, None).unwrap();

        let writer = {
            let registry = Arc::clone(&registry);
            thread::spawn(move || {
                for i in 0..=100u8 {
                    registry
                        .update(&id, |s| {
                            // Two fields that must always agree
                            s.progress_percent = i;
                            s.speed = Some(format!("{i} H/s"));
                        })
                        .unwrap();
                }
            })
        };

        for _ in 0..200 {
            for snapshot in registry.list_all() {
                match &snapshot.speed {
                    Some(speed) => {
                        assert_eq!(speed, &format!("{} H/s", snapshot.progress_percent))
                    }
                    None => assert_eq!(snapshot.progress_percent, 0),
                }
            }
        }

        writer.join().unwrap();
    }

    #[test]
    fn test_many_sessions_count_running() {
        let registry = SessionRegistry::new();
        let ids: Vec<_> = (0..5)
            .map(|_| {
                let rec = record();
                let id = rec.id;
                registry.create(rec, None).unwrap();
                id
            })
            .collect();

        registry.update(&ids[0], |s| s.finish(Some(0))).unwrap();
        registry.update(&ids[1], |s| s.finish(Some(1))).unwrap();

        assert_eq!(registry.len(), 5);
        assert_eq!(registry.count_running(), 3);
        assert_eq!(registry.list_all().len(), 5);
    }
}
