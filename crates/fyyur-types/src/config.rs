use clap::Parser;
use std::path::PathBuf;

#[derive(Debug, Clone, Parser)]
pub struct BackendConfig {
    #[arg(
        long,
        env = "FYYUR_DATABASE_URL",
        help = "Database URL e.g. sqlite://file.db, default is sqlite://[data-dir]/fyyur.db, where data-dir is set by --data-dir"
    )]
    database_url: Option<String>,

    #[arg(
        long,
        env = "FYYUR_DATA_DIR",
        help = "Data directory (database etc.), default is system default like ~/.local/share/fyyur",
        default_value_t = default_data_dir()
    )]
    data_dir: String,
}

fn default_data_dir() -> String {
    dirs::data_dir()
        .map(|p| p.join("fyyur"))
        .unwrap_or_else(|| PathBuf::from("fyyur"))
        .to_string_lossy()
        .to_string()
}

impl BackendConfig {
    pub fn data_dir(&self) -> PathBuf {
        PathBuf::from(&self.data_dir)
    }

    pub fn database_url(&self) -> String {
        self.database_url
            .clone()
            .unwrap_or_else(|| format!("sqlite://{}/fyyur.db", self.data_dir))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_database_url() {
        let config =
            BackendConfig::try_parse_from(["fyyur", "--data-dir", "/tmp/fyyur-data"]).unwrap();
        assert_eq!(config.database_url(), "sqlite:///tmp/fyyur-data/fyyur.db");
        assert_eq!(config.data_dir(), PathBuf::from("/tmp/fyyur-data"));
    }

    #[test]
    fn test_explicit_database_url() {
        let config = BackendConfig::try_parse_from([
            "fyyur",
            "--data-dir",
            "/tmp/fyyur-data",
            "--database-url",
            "sqlite::memory:",
        ])
        .unwrap();
        assert_eq!(config.database_url(), "sqlite::memory:");
    }
}
