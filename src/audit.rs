// 📜 Action Log - audit trail of rental actions
//
// Every mutating rental action produces an ActionEvent. Where it goes is up
// to the ActionLog injected into the rental: a tracing event, an in-memory
// list, or (with the `sqlite` feature) an append-only SQLite table.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::cell::RefCell;

/// One recorded action
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionEvent {
    pub event_id: String,
    pub timestamp: DateTime<Utc>,
    pub event_type: String,
    pub entity_type: String,
    pub entity_id: String,
    pub data: serde_json::Value,
    pub actor: String,
}

impl ActionEvent {
    pub fn new(
        event_type: &str,
        entity_type: &str,
        entity_id: &str,
        data: serde_json::Value,
        actor: &str,
    ) -> Self {
        Self {
            event_id: uuid::Uuid::new_v4().to_string(),
            timestamp: Utc::now(),
            event_type: event_type.to_string(),
            entity_type: entity_type.to_string(),
            entity_id: entity_id.to_string(),
            data,
            actor: actor.to_string(),
        }
    }
}

/// ActionLog - fire-and-forget sink for action events
///
/// Recording never fails from the caller's point of view; sinks that can
/// fail report the problem through tracing instead.
pub trait ActionLog {
    fn record(&self, event: ActionEvent);
}

// ============================================================================
// TRACING SINK
// ============================================================================

/// Emits each action as a structured `tracing` event
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingActionLog;

impl ActionLog for TracingActionLog {
    fn record(&self, event: ActionEvent) {
        tracing::info!(
            event_type = %event.event_type,
            entity_type = %event.entity_type,
            entity_id = %event.entity_id,
            actor = %event.actor,
            data = %event.data,
            "Rental action"
        );
    }
}

// ============================================================================
// IN-MEMORY SINK
// ============================================================================

#[derive(Debug, Default)]
pub struct MemoryActionLog {
    events: RefCell<Vec<ActionEvent>>,
}

impl MemoryActionLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<ActionEvent> {
        self.events.borrow().clone()
    }

    /// Event types in recording order
    pub fn event_types(&self) -> Vec<String> {
        self.events
            .borrow()
            .iter()
            .map(|e| e.event_type.clone())
            .collect()
    }
}

impl ActionLog for MemoryActionLog {
    fn record(&self, event: ActionEvent) {
        self.events.borrow_mut().push(event);
    }
}

// ============================================================================
// SQLITE SINK
// ============================================================================

#[cfg(feature = "sqlite")]
pub use sqlite::SqliteActionLog;

#[cfg(feature = "sqlite")]
mod sqlite {
    use super::{ActionEvent, ActionLog};
    use anyhow::{Context, Result};
    use chrono::{DateTime, Utc};
    use rusqlite::{params, Connection};
    use std::path::Path;

    /// Append-only `events` table
    pub struct SqliteActionLog {
        conn: Connection,
    }

    impl SqliteActionLog {
        /// Open (or create) the event database at `path`
        pub fn open(path: &Path) -> Result<Self> {
            let conn = Connection::open(path)
                .with_context(|| format!("Failed to open event database: {}", path.display()))?;
            Self::from_connection(conn)
        }

        pub fn in_memory() -> Result<Self> {
            let conn = Connection::open_in_memory().context("Failed to open in-memory database")?;
            Self::from_connection(conn)
        }

        fn from_connection(conn: Connection) -> Result<Self> {
            setup_events_table(&conn)?;
            Ok(Self { conn })
        }

        /// Insert one event
        pub fn insert(&self, event: &ActionEvent) -> Result<()> {
            let data_json = serde_json::to_string(&event.data)?;

            self.conn.execute(
                "INSERT INTO events (
                    event_id, timestamp, event_type, entity_type, entity_id, data, actor
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                params![
                    event.event_id,
                    event.timestamp.to_rfc3339(),
                    event.event_type,
                    event.entity_type,
                    event.entity_id,
                    data_json,
                    event.actor,
                ],
            )?;

            Ok(())
        }

        /// Events for one entity, oldest first
        pub fn events_for_entity(&self, entity_type: &str, entity_id: &str) -> Result<Vec<ActionEvent>> {
            let mut stmt = self.conn.prepare(
                "SELECT event_id, timestamp, event_type, entity_type, entity_id, data, actor
                 FROM events
                 WHERE entity_type = ?1 AND entity_id = ?2
                 ORDER BY id ASC",
            )?;

            let rows = stmt
                .query_map(params![entity_type, entity_id], |row| {
                    Ok((
                        row.get::<_, String>(0)?,
                        row.get::<_, String>(1)?,
                        row.get::<_, String>(2)?,
                        row.get::<_, String>(3)?,
                        row.get::<_, String>(4)?,
                        row.get::<_, String>(5)?,
                        row.get::<_, String>(6)?,
                    ))
                })?
                .collect::<Result<Vec<_>, _>>()?;

            rows.into_iter()
                .map(|(event_id, timestamp, event_type, entity_type, entity_id, data, actor)| {
                    Ok(ActionEvent {
                        event_id,
                        timestamp: DateTime::parse_from_rfc3339(&timestamp)
                            .context("Invalid event timestamp")?
                            .with_timezone(&Utc),
                        event_type,
                        entity_type,
                        entity_id,
                        data: serde_json::from_str(&data).context("Invalid event data")?,
                        actor,
                    })
                })
                .collect()
        }

        pub fn count(&self) -> Result<i64> {
            let count = self
                .conn
                .query_row("SELECT COUNT(*) FROM events", [], |row| row.get(0))?;
            Ok(count)
        }
    }

    impl ActionLog for SqliteActionLog {
        fn record(&self, event: ActionEvent) {
            if let Err(e) = self.insert(&event) {
                tracing::warn!(error = %e, event_type = %event.event_type, "Failed to store action event");
            }
        }
    }

    fn setup_events_table(conn: &Connection) -> Result<()> {
        conn.execute(
            "CREATE TABLE IF NOT EXISTS events (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                event_id TEXT UNIQUE NOT NULL,
                timestamp TEXT NOT NULL,
                event_type TEXT NOT NULL,
                entity_type TEXT NOT NULL,
                entity_id TEXT NOT NULL,
                data TEXT NOT NULL,
                actor TEXT NOT NULL,
                created_at DATETIME DEFAULT CURRENT_TIMESTAMP
            )",
            [],
        )?;

        conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_events_entity ON events(entity_type, entity_id)",
            [],
        )?;

        Ok(())
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_log_keeps_events() {
        let log = MemoryActionLog::new();
        log.record(ActionEvent::new(
            "rental_created",
            "rental",
            "r-1",
            serde_json::json!({"total": 400.0}),
            "ivan@example.com",
        ));
        log.record(ActionEvent::new(
            "accessory_added",
            "rental",
            "r-1",
            serde_json::json!({}),
            "ivan@example.com",
        ));

        assert_eq!(log.event_types(), vec!["rental_created", "accessory_added"]);
        assert_eq!(log.events()[0].data["total"], 400.0);
    }

    #[cfg(feature = "sqlite")]
    #[test]
    fn test_sqlite_event_log() {
        let log = SqliteActionLog::in_memory().unwrap();

        let event = ActionEvent::new(
            "rental_created",
            "rental",
            "rental_123",
            serde_json::json!({"instrument": "Fender"}),
            "ivan@example.com",
        );
        log.record(event.clone());
        log.record(ActionEvent::new(
            "instrument_rented",
            "rental",
            "rental_123",
            serde_json::json!({}),
            "ivan@example.com",
        ));
        log.record(ActionEvent::new(
            "rental_created",
            "rental",
            "other",
            serde_json::json!({}),
            "petr@example.com",
        ));

        let events = log.events_for_entity("rental", "rental_123").unwrap();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].event_id, event.event_id);
        assert_eq!(events[0].data["instrument"], "Fender");
        assert_eq!(events[1].event_type, "instrument_rented");
        assert_eq!(log.count().unwrap(), 3);
    }

    #[cfg(feature = "sqlite")]
    #[test]
    fn test_sqlite_duplicate_event_is_not_fatal() {
        let log = SqliteActionLog::in_memory().unwrap();
        let event = ActionEvent::new("rental_created", "rental", "r", serde_json::json!({}), "a");

        log.record(event.clone());
        log.record(event);

        assert_eq!(log.count().unwrap(), 1);
    }
}
