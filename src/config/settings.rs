#[derive(Debug, Clone)]
pub struct SchedulingSettings {
    /// Booking window per tour when the operator does not pass one.
    pub default_tour_duration_days: i64,
}

impl Default for SchedulingSettings {
    fn default() -> Self {
        Self {
            default_tour_duration_days: 7,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ServerSettings {
    pub default_port: u16,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self { default_port: 3000 }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub scheduling: SchedulingSettings,
    pub server: ServerSettings,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl AppConfig {
    pub fn new() -> Self {
        Self {
            scheduling: SchedulingSettings::default(),
            server: ServerSettings::default(),
        }
    }
}

/// Database location, overridable per deployment.
pub fn database_path() -> String {
    std::env::var("DATABASE_PATH").unwrap_or_else(|_| "ladder_league.db".to_string())
}
