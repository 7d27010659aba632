//! SQLite-backed host: settings, users, and rooms

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rusqlite::{Connection, OptionalExtension, Result as SqliteResult};
use std::path::Path;
use std::sync::Mutex;

use crate::application::errors::HostError;
use crate::domain::entities::{DirectParticipants, NewRoom, Room, RoomType, User};
use crate::domain::traits::{ChannelDirectory, SettingDefinition, SettingsReader, SettingsStore, UserDirectory};

pub struct SqliteHost {
    conn: Mutex<Connection>,
}

impl SqliteHost {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, HostError> {
        Self::with_connection(Connection::open(path)?)
    }

    #[cfg(test)]
    pub fn in_memory() -> Result<Self, HostError> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> Result<Self, HostError> {
        init_tables(&conn)?;
        Ok(Self { conn: Mutex::new(conn) })
    }

    fn with_conn<T>(&self, f: impl FnOnce(&mut Connection) -> SqliteResult<T>) -> Result<T, HostError> {
        let mut conn = self.conn.lock().map_err(|_| HostError::LockPoisoned)?;
        Ok(f(&mut *conn)?)
    }

    /// Register the app's service account. Only one user is the app user at a time.
    pub fn register_app_user(&self, user: &User) -> Result<(), HostError> {
        self.with_conn(|conn| {
            let tx = conn.transaction()?;
            tx.execute("UPDATE users SET is_app = 0 WHERE username != ?1", [&user.username])?;
            tx.execute(
                "INSERT INTO users (id, username, name, is_bot, is_app) VALUES (?1, ?2, ?3, ?4, 1)
                 ON CONFLICT(username) DO UPDATE SET name = excluded.name, is_bot = excluded.is_bot, is_app = 1",
                rusqlite::params![user.id, user.username, user.name, user.is_bot],
            )?;
            tx.commit()
        })
    }

    #[cfg(test)]
    pub fn room_count(&self) -> Result<usize, HostError> {
        self.with_conn(|conn| {
            conn.query_row("SELECT COUNT(*) FROM rooms", [], |row| row.get::<_, i64>(0))
                .map(|n| n as usize)
        })
    }
}

fn init_tables(conn: &Connection) -> SqliteResult<()> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS settings (
            id TEXT PRIMARY KEY,
            setting_type TEXT NOT NULL,
            package_value TEXT NOT NULL,
            value TEXT,
            required INTEGER NOT NULL DEFAULT 0,
            public INTEGER NOT NULL DEFAULT 0,
            multiline INTEGER NOT NULL DEFAULT 0,
            i18n_label TEXT NOT NULL,
            i18n_description TEXT NOT NULL,
            updated_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE TABLE IF NOT EXISTS users (
            id TEXT PRIMARY KEY,
            username TEXT UNIQUE NOT NULL,
            name TEXT,
            is_bot INTEGER NOT NULL DEFAULT 0,
            is_app INTEGER NOT NULL DEFAULT 0
        );

        CREATE TABLE IF NOT EXISTS rooms (
            id TEXT PRIMARY KEY,
            room_type TEXT NOT NULL,
            display_name TEXT,
            creator_id TEXT,
            direct_key TEXT UNIQUE,
            created_at TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS room_members (
            room_id TEXT NOT NULL,
            username TEXT NOT NULL,
            position INTEGER NOT NULL,
            PRIMARY KEY (room_id, username),
            FOREIGN KEY (room_id) REFERENCES rooms(id)
        );

        CREATE INDEX IF NOT EXISTS idx_room_members_room ON room_members(room_id);",
    )
}

fn load_room(conn: &Connection, id: &str) -> SqliteResult<Option<Room>> {
    let row = conn
        .query_row(
            "SELECT id, room_type, display_name, creator_id, created_at FROM rooms WHERE id = ?1",
            [id],
            |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, Option<String>>(2)?,
                    row.get::<_, Option<String>>(3)?,
                    row.get::<_, String>(4)?,
                ))
            },
        )
        .optional()?;

    let Some((id, room_type, display_name, creator_id, created_at)) = row else {
        return Ok(None);
    };

    let room_type = RoomType::parse(&room_type).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            1,
            rusqlite::types::Type::Text,
            format!("unknown room type {:?}", room_type).into(),
        )
    })?;
    let created_at = DateTime::parse_from_rfc3339(&created_at)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(4, rusqlite::types::Type::Text, Box::new(e)))?;

    let mut stmt = conn.prepare("SELECT username FROM room_members WHERE room_id = ?1 ORDER BY position")?;
    let usernames = stmt
        .query_map([&id], |row| row.get::<_, String>(0))?
        .collect::<SqliteResult<Vec<_>>>()?;

    Ok(Some(Room {
        id,
        room_type,
        display_name,
        creator_id,
        usernames,
        created_at,
    }))
}

#[async_trait]
impl SettingsReader for SqliteHost {
    async fn get_value(&self, id: &str) -> Result<Option<String>, HostError> {
        self.with_conn(|conn| {
            conn.query_row(
                "SELECT COALESCE(value, package_value) FROM settings WHERE id = ?1",
                [id],
                |row| row.get(0),
            )
            .optional()
        })
    }
}

#[async_trait]
impl SettingsStore for SqliteHost {
    async fn provide_setting(&self, setting: &SettingDefinition) -> Result<(), HostError> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO settings (id, setting_type, package_value, required, public, multiline, i18n_label, i18n_description)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
                 ON CONFLICT(id) DO UPDATE SET
                    setting_type = excluded.setting_type,
                    package_value = excluded.package_value,
                    required = excluded.required,
                    public = excluded.public,
                    multiline = excluded.multiline,
                    i18n_label = excluded.i18n_label,
                    i18n_description = excluded.i18n_description",
                rusqlite::params![
                    setting.id,
                    setting.setting_type.as_str(),
                    setting.package_value,
                    setting.required,
                    setting.public,
                    setting.multiline,
                    setting.i18n_label,
                    setting.i18n_description,
                ],
            )
            .map(|_| ())
        })
    }

    async fn set_value(&self, id: &str, value: &str) -> Result<(), HostError> {
        let rows = self.with_conn(|conn| {
            conn.execute(
                "UPDATE settings SET value = ?2, updated_at = datetime('now') WHERE id = ?1",
                [id, value],
            )
        })?;
        if rows == 0 {
            return Err(HostError::NotFound(format!("setting {}", id)));
        }
        Ok(())
    }

    async fn reset_value(&self, id: &str) -> Result<(), HostError> {
        self.with_conn(|conn| {
            conn.execute(
                "UPDATE settings SET value = NULL, updated_at = datetime('now') WHERE id = ?1",
                [id],
            )
            .map(|_| ())
        })
    }
}

#[async_trait]
impl UserDirectory for SqliteHost {
    async fn app_user(&self) -> Result<Option<User>, HostError> {
        self.with_conn(|conn| {
            conn.query_row(
                "SELECT id, username, name, is_bot FROM users WHERE is_app = 1",
                [],
                |row| {
                    Ok(User {
                        id: row.get(0)?,
                        username: row.get(1)?,
                        name: row.get(2)?,
                        is_bot: row.get(3)?,
                    })
                },
            )
            .optional()
        })
    }
}

#[async_trait]
impl ChannelDirectory for SqliteHost {
    async fn find_direct(&self, participants: &DirectParticipants) -> Result<Option<Room>, HostError> {
        self.with_conn(|conn| {
            let id: Option<String> = conn
                .query_row(
                    "SELECT id FROM rooms WHERE room_type = ?1 AND direct_key = ?2",
                    [RoomType::DirectMessage.as_str(), participants.key().as_str()],
                    |row| row.get(0),
                )
                .optional()?;
            match id {
                Some(id) => load_room(conn, &id),
                None => Ok(None),
            }
        })
    }

    /// Direct rooms are unique per participant pair; a second create fails.
    async fn create_room(&self, request: &NewRoom) -> Result<String, HostError> {
        let id = uuid::Uuid::new_v4().to_string();
        let direct_key = request.participants().map(|p| p.key());

        self.with_conn(|conn| {
            let tx = conn.transaction()?;
            tx.execute(
                "INSERT INTO rooms (id, room_type, display_name, creator_id, direct_key, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                rusqlite::params![
                    id,
                    request.room_type.as_str(),
                    request.display_name,
                    request.creator.id,
                    direct_key,
                    Utc::now().to_rfc3339(),
                ],
            )?;
            for (position, username) in request.member_usernames.iter().enumerate() {
                tx.execute(
                    "INSERT OR IGNORE INTO room_members (room_id, username, position) VALUES (?1, ?2, ?3)",
                    rusqlite::params![id, username, position as i64],
                )?;
            }
            tx.commit()
        })?;

        Ok(id)
    }

    async fn get_by_id(&self, id: &str) -> Result<Option<Room>, HostError> {
        self.with_conn(|conn| load_room(conn, id))
    }
}
