//! SQLite database management for game data

use crate::{GameRecord, HoopsError, Result, Team, TeamId};
use chrono::NaiveDate;
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;

/// Database connection and operations
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open or create database at the given path
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let conn = Connection::open(path)?;
        let db = Database { conn };
        db.init_schema()?;
        Ok(db)
    }

    /// Create an in-memory database (for testing)
    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let db = Database { conn };
        db.init_schema()?;
        Ok(db)
    }

    /// Initialize database schema
    fn init_schema(&self) -> Result<()> {
        self.conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS teams (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL UNIQUE
            );

            CREATE TABLE IF NOT EXISTS games (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                date TEXT NOT NULL,
                home_team_id INTEGER NOT NULL REFERENCES teams(id),
                away_team_id INTEGER NOT NULL REFERENCES teams(id),
                home_score INTEGER NOT NULL,
                away_score INTEGER NOT NULL,
                UNIQUE(date, home_team_id, away_team_id)
            );

            CREATE INDEX IF NOT EXISTS idx_games_date ON games(date);
            CREATE INDEX IF NOT EXISTS idx_games_teams ON games(home_team_id, away_team_id);
            "#,
        )?;
        Ok(())
    }

    // ==================== Team Operations ====================

    /// Get or create a team by canonical name
    pub fn get_or_create_team(&self, name: &str) -> Result<Team> {
        if let Some(team) = self.find_team_by_name(name)? {
            return Ok(team);
        }

        self.conn
            .execute("INSERT INTO teams (name) VALUES (?1)", params![name])?;

        let id = TeamId(self.conn.last_insert_rowid());
        Ok(Team {
            id,
            name: name.to_string(),
        })
    }

    /// Find a team by name (case-insensitive)
    pub fn find_team_by_name(&self, name: &str) -> Result<Option<Team>> {
        let team = self
            .conn
            .query_row(
                "SELECT id, name FROM teams WHERE LOWER(name) = LOWER(?1)",
                params![name],
                |row| {
                    Ok(Team {
                        id: TeamId(row.get(0)?),
                        name: row.get(1)?,
                    })
                },
            )
            .optional()?;
        Ok(team)
    }

    /// Get team by ID
    pub fn get_team(&self, id: TeamId) -> Result<Team> {
        self.conn
            .query_row(
                "SELECT id, name FROM teams WHERE id = ?1",
                params![id.0],
                |row| {
                    Ok(Team {
                        id: TeamId(row.get(0)?),
                        name: row.get(1)?,
                    })
                },
            )
            .map_err(|_| HoopsError::TeamNotFound(id))
    }

    /// Get all teams ordered by name
    pub fn get_all_teams(&self) -> Result<Vec<Team>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, name FROM teams ORDER BY name")?;
        let teams = stmt
            .query_map([], |row| {
                Ok(Team {
                    id: TeamId(row.get(0)?),
                    name: row.get(1)?,
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(teams)
    }

    // ==================== Game Operations ====================

    /// Insert or update a game record
    pub fn upsert_game(&self, record: &GameRecord) -> Result<()> {
        self.conn.execute(
            r#"
            INSERT INTO games (date, home_team_id, away_team_id, home_score, away_score)
            VALUES (?1, ?2, ?3, ?4, ?5)
            ON CONFLICT(date, home_team_id, away_team_id) DO UPDATE SET
                home_score = excluded.home_score,
                away_score = excluded.away_score
            "#,
            params![
                record.date.format("%Y-%m-%d").to_string(),
                record.home_team.0,
                record.away_team.0,
                record.home_score,
                record.away_score,
            ],
        )?;
        Ok(())
    }

    /// Insert multiple game records
    pub fn upsert_games(&self, records: &[GameRecord]) -> Result<usize> {
        let mut count = 0;
        for record in records {
            self.upsert_game(record)?;
            count += 1;
        }
        Ok(count)
    }

    /// Get all games in chronological order.
    ///
    /// Same-date games come back in insertion order (rowid tiebreak),
    /// which is the order the feature builders rely on for ties.
    pub fn get_all_games(&self) -> Result<Vec<GameRecord>> {
        let mut stmt = self.conn.prepare(
            "SELECT date, home_team_id, away_team_id, home_score, away_score
             FROM games
             ORDER BY date, id",
        )?;
        let games = stmt
            .query_map([], Self::row_to_game)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(games)
    }

    /// Get games strictly before a given date, in chronological order
    pub fn get_games_before(&self, date: NaiveDate) -> Result<Vec<GameRecord>> {
        let mut stmt = self.conn.prepare(
            "SELECT date, home_team_id, away_team_id, home_score, away_score
             FROM games
             WHERE date < ?1
             ORDER BY date, id",
        )?;
        let games = stmt
            .query_map(
                params![date.format("%Y-%m-%d").to_string()],
                Self::row_to_game,
            )?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(games)
    }

    fn row_to_game(row: &rusqlite::Row) -> rusqlite::Result<GameRecord> {
        let date_str: String = row.get(0)?;
        let date = NaiveDate::parse_from_str(&date_str, "%Y-%m-%d").map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(0, rusqlite::types::Type::Text, Box::new(e))
        })?;

        Ok(GameRecord {
            date,
            home_team: TeamId(row.get(1)?),
            away_team: TeamId(row.get(2)?),
            home_score: row.get(3)?,
            away_score: row.get(4)?,
        })
    }

    // ==================== Statistics ====================

    /// Get database statistics
    pub fn get_stats(&self) -> Result<DatabaseStats> {
        let team_count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM teams", [], |row| row.get(0))?;

        let game_count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM games", [], |row| row.get(0))?;

        let min_date: Option<String> = self
            .conn
            .query_row("SELECT MIN(date) FROM games", [], |row| row.get(0))
            .optional()?
            .flatten();

        let max_date: Option<String> = self
            .conn
            .query_row("SELECT MAX(date) FROM games", [], |row| row.get(0))
            .optional()?
            .flatten();

        Ok(DatabaseStats {
            team_count: team_count as usize,
            game_count: game_count as usize,
            earliest_game: min_date.and_then(|s| NaiveDate::parse_from_str(&s, "%Y-%m-%d").ok()),
            latest_game: max_date.and_then(|s| NaiveDate::parse_from_str(&s, "%Y-%m-%d").ok()),
        })
    }
}

/// Database statistics
#[derive(Debug, Clone)]
pub struct DatabaseStats {
    pub team_count: usize,
    pub game_count: usize,
    pub earliest_game: Option<NaiveDate>,
    pub latest_game: Option<NaiveDate>,
}
