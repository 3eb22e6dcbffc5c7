use std::path::PathBuf;
use std::time::Duration;

use aerodex_api::ServerConfig;
use aerodex_core::config::{DbConfig, FileConfig, HttpConfig};
use aerodex_core::error::AppError;
use clap::{Parser, Subcommand, ValueEnum};

/// Registry used when neither flags, environment nor config file name one.
pub const DEFAULT_AVIATION_API_URL: &str = "https://api.aviationapi.com/v1";

/// CLI configuration parsed from command line arguments and environment variables
#[derive(Parser, Debug)]
#[command(name = "aerodex")]
#[command(
    author,
    version,
    about = "Keeps a local airport directory in sync with the aviation registry"
)]
#[command(after_help = "Examples:
  aerodex migrate
  aerodex sync KJFK KSEA KLAX
  aerodex sync --file seeds.txt --output result.json
  aerodex serve --port 8080
  aerodex export --format csv > airports.csv")]
pub struct Config {
    /// PostgreSQL database connection URL
    #[arg(long, env = "DATABASE_URL")]
    pub database_url: Option<String>,

    /// Base URL of the aviation registry API
    #[arg(long, env = "AVIATION_API_URL")]
    pub aviation_api_url: Option<String>,

    /// Registry request timeout in seconds
    #[arg(long, env = "AVIATION_TIMEOUT_SECS", value_name = "SECS")]
    pub aviation_timeout_secs: Option<u64>,

    /// Custom path to config.toml
    #[arg(long, value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Reconcile facility codes against the local directory
    #[command(after_help = "Examples:
  aerodex sync KJFK KSEA             # Codes as arguments
  aerodex sync --file seeds.txt      # One code per line, '#' starts a comment
  aerodex sync KSEA --output out.json")]
    Sync {
        /// Facility codes to reconcile
        #[arg(value_name = "CODE", conflicts_with = "file")]
        codes: Vec<String>,

        /// Read codes from a seed file
        #[arg(short, long, value_name = "PATH")]
        file: Option<PathBuf>,

        /// Write the outcome JSON to a file instead of stdout
        #[arg(short, long, value_name = "PATH")]
        output: Option<PathBuf>,
    },
    /// Apply, revert or inspect database migrations
    #[command(after_help = "Examples:
  aerodex migrate            # Apply pending migrations
  aerodex migrate --status   # List applied and pending migrations
  aerodex migrate --down     # Revert every applied migration")]
    Migrate {
        /// Revert all applied migrations instead of applying
        #[arg(long, conflicts_with = "status")]
        down: bool,

        /// Show which migrations are applied without changing anything
        #[arg(long)]
        status: bool,
    },
    /// Run the HTTP API server
    Serve {
        /// Bind address
        #[arg(long, env = "HOST")]
        host: Option<String>,
        /// Bind port
        #[arg(long, env = "PORT")]
        port: Option<u16>,
    },
    /// Show one stored airport
    Show {
        /// ICAO code of the airport
        icao: String,
    },
    /// Export stored airports to various formats
    #[command(after_help = "Examples:
  aerodex export --format jsonl > airports.jsonl
  aerodex export --format csv --limit 100")]
    Export {
        /// Output format for exported data
        #[arg(short, long, default_value = "jsonl")]
        format: ExportFormat,
        /// Maximum number of airports to export
        #[arg(short, long)]
        limit: Option<usize>,
    },
    /// Show directory statistics
    Stats,
}

/// Supported export formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ExportFormat {
    /// JSON Lines format (one JSON object per line)
    Jsonl,
    /// Standard JSON array format
    Json,
    /// CSV format (comma-separated values)
    Csv,
}

/// Effective settings after merging flags and environment over the config
/// file over built-in defaults.
#[derive(Debug, Clone)]
pub struct Settings {
    pub database_url: Option<String>,
    pub aviation_api_url: String,
    pub http: HttpConfig,
    pub db: DbConfig,
    pub server: ServerConfig,
}

impl Settings {
    /// Database URL, required by every command that touches the store.
    pub fn require_database_url(&self) -> Result<&str, AppError> {
        self.database_url.as_deref().ok_or_else(|| {
            AppError::Config(
                "no database URL; set DATABASE_URL, pass --database-url or add [database] url"
                    .to_string(),
            )
        })
    }
}

impl Config {
    /// Merges this command line over `file`.
    pub fn resolve(&self, file: &FileConfig) -> Settings {
        let database_url = self
            .database_url
            .clone()
            .or_else(|| file.database.url.clone());

        let aviation_api_url = self
            .aviation_api_url
            .clone()
            .or_else(|| file.upstream.base_url.clone())
            .unwrap_or_else(|| DEFAULT_AVIATION_API_URL.to_string());

        let http = match self.aviation_timeout_secs {
            Some(secs) => HttpConfig {
                timeout: Duration::from_secs(secs),
            },
            None => file.http_config(),
        };

        let mut server = ServerConfig::from_file(file);
        if let Command::Serve { host, port } = &self.command {
            if let Some(host) = host {
                server.host = host.clone();
            }
            if let Some(port) = port {
                server.port = *port;
            }
        }

        Settings {
            database_url,
            aviation_api_url,
            http,
            db: file.db_config(),
            server,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aerodex_core::config::{DatabaseSection, ServerSection, UpstreamSection};

    fn bare(command: Command) -> Config {
        Config {
            database_url: None,
            aviation_api_url: None,
            aviation_timeout_secs: None,
            config: None,
            verbose: false,
            command,
        }
    }

    fn file() -> FileConfig {
        FileConfig {
            database: DatabaseSection {
                url: Some("postgresql://file/aerodex".to_string()),
                max_connections: Some(12),
            },
            upstream: UpstreamSection {
                base_url: Some("https://registry.example/v1".to_string()),
                timeout_secs: Some(15),
            },
            server: ServerSection {
                host: Some("127.0.0.1".to_string()),
                port: Some(8080),
                request_timeout_secs: None,
            },
        }
    }

    #[test]
    fn test_parse_sync_with_codes() {
        let config = Config::try_parse_from([
            "aerodex",
            "--database-url",
            "postgresql://localhost/aerodex",
            "sync",
            "KJFK",
            "KSEA",
        ])
        .unwrap();

        match config.command {
            Command::Sync { codes, file, output } => {
                assert_eq!(codes, vec!["KJFK", "KSEA"]);
                assert!(file.is_none());
                assert!(output.is_none());
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_parse_sync_codes_conflict_with_file() {
        let result = Config::try_parse_from(["aerodex", "sync", "KJFK", "--file", "seeds.txt"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_export_format() {
        let config =
            Config::try_parse_from(["aerodex", "export", "--format", "csv", "--limit", "5"])
                .unwrap();
        match config.command {
            Command::Export { format, limit } => {
                assert_eq!(format, ExportFormat::Csv);
                assert_eq!(limit, Some(5));
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_parse_migrate_flags() {
        let config = Config::try_parse_from(["aerodex", "migrate"]).unwrap();
        assert!(matches!(
            config.command,
            Command::Migrate {
                down: false,
                status: false
            }
        ));

        let config = Config::try_parse_from(["aerodex", "migrate", "--status"]).unwrap();
        assert!(matches!(config.command, Command::Migrate { status: true, .. }));

        let config = Config::try_parse_from(["aerodex", "migrate", "--down"]).unwrap();
        assert!(matches!(config.command, Command::Migrate { down: true, .. }));
    }

    #[test]
    fn test_parse_migrate_down_conflicts_with_status() {
        let result = Config::try_parse_from(["aerodex", "migrate", "--down", "--status"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_global_verbose_after_subcommand() {
        let config = Config::try_parse_from(["aerodex", "stats", "--verbose"]).unwrap();
        assert!(config.verbose);
    }

    #[test]
    fn test_resolve_defaults_without_file() {
        let settings = bare(Command::Stats).resolve(&FileConfig::default());

        assert!(settings.database_url.is_none());
        assert_eq!(settings.aviation_api_url, DEFAULT_AVIATION_API_URL);
        assert_eq!(settings.http.timeout, Duration::from_secs(60));
        assert_eq!(settings.db.max_connections, 5);
        assert_eq!(settings.server.bind_addr(), "0.0.0.0:3000");
        assert!(settings.require_database_url().is_err());
    }

    #[test]
    fn test_resolve_file_fills_gaps() {
        let settings = bare(Command::Stats).resolve(&file());

        assert_eq!(
            settings.require_database_url().unwrap(),
            "postgresql://file/aerodex"
        );
        assert_eq!(settings.aviation_api_url, "https://registry.example/v1");
        assert_eq!(settings.http.timeout, Duration::from_secs(15));
        assert_eq!(settings.db.max_connections, 12);
        assert_eq!(settings.server.bind_addr(), "127.0.0.1:8080");
    }

    #[test]
    fn test_resolve_flags_override_file() {
        let mut config = bare(Command::Serve {
            host: None,
            port: Some(9000),
        });
        config.database_url = Some("postgresql://flag/aerodex".to_string());
        config.aviation_api_url = Some("http://localhost:9999".to_string());
        config.aviation_timeout_secs = Some(5);

        let settings = config.resolve(&file());

        assert_eq!(settings.database_url.as_deref(), Some("postgresql://flag/aerodex"));
        assert_eq!(settings.aviation_api_url, "http://localhost:9999");
        assert_eq!(settings.http.timeout, Duration::from_secs(5));
        assert_eq!(settings.server.host, "127.0.0.1");
        assert_eq!(settings.server.port, 9000);
    }
}
