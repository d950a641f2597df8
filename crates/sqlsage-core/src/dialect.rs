//! SQL dialect tag

use serde::{Deserialize, Serialize};

/// SQL dialect a query is written in.
///
/// The tag is advisory: analysis falls back to generic SQL parsing when the
/// dialect is unknown, and drivers report the dialect of their backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QueryDialect {
    /// Generic ANSI-ish SQL
    #[default]
    Generic,
    /// SQLite
    Sqlite,
    /// PostgreSQL
    Postgres,
    /// MySQL
    MySql,
}

impl QueryDialect {
    /// Returns the dialect identifier as a display string
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Generic => "generic",
            Self::Sqlite => "sqlite",
            Self::Postgres => "postgres",
            Self::MySql => "mysql",
        }
    }
}

impl std::fmt::Display for QueryDialect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for QueryDialect {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "generic" | "ansi" => Ok(Self::Generic),
            "sqlite" | "sqlite3" => Ok(Self::Sqlite),
            "postgres" | "postgresql" => Ok(Self::Postgres),
            "mysql" => Ok(Self::MySql),
            other => Err(format!("unknown SQL dialect: {}", other)),
        }
    }
}
