#[derive(Debug, Clone)]
pub struct LeagueSettings {
    /// Top ranks of a group that move up when a group above exists.
    pub promotion_slots: usize,
    /// Bottom ranks of a group that move down when a group below exists.
    pub relegation_slots: usize,
}

impl Default for LeagueSettings {
    fn default() -> Self {
        Self {
            promotion_slots: 2,
            relegation_slots: 2,
        }
    }
}

#[derive(Debug, Clone)]
pub struct DatabaseSettings {
    pub path: String,
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        Self {
            path: "league.db".to_string(),
        }
    }
}

impl DatabaseSettings {
    pub fn from_env() -> Self {
        std::env::var("DATABASE_PATH")
            .map(|path| Self { path })
            .unwrap_or_default()
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub league: LeagueSettings,
    pub database: DatabaseSettings,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl AppConfig {
    pub fn new() -> Self {
        Self {
            league: LeagueSettings::default(),
            database: DatabaseSettings::from_env(),
        }
    }
}
