use std::path::PathBuf;
use clap::Parser;
use log::LevelFilter;
use serde::Serialize;
use crate::assets::DEFAULT_ASSET_BASE_URL;
use crate::entities::Year;

const COMING_SOON_MESSAGE: &str = "준비중입니다!";

#[derive(Parser, Debug)]
#[command(name = "gradshow", version, about = "Graduation exhibition showcase server")]
pub struct FlatConfig {
    #[arg(long, env = "GRADSHOW_BIND_ADDR", default_value = "127.0.0.1:3000", help = "Address the HTTP server listens on")]
    bind_addr: String,

    #[arg(long, env = "GRADSHOW_DATA_DIR", default_value = "data", help = "Directory holding <year>.json documents")]
    data_dir: PathBuf,

    #[arg(long, env = "GRADSHOW_DATA_URL", help = "Base URL serving <year>.json documents; overrides the data directory")]
    data_url: Option<String>,

    #[arg(long, env = "GRADSHOW_CURRENT_YEAR", default_value_t = 2025, help = "Year used when a request names none")]
    current_year: u16,

    #[arg(long, env = "GRADSHOW_OPEN_YEARS", value_delimiter = ',', default_value = "2025,2023", help = "Exhibition years that are published")]
    open_years: Vec<u16>,

    #[arg(long, env = "GRADSHOW_UPCOMING_YEARS", value_delimiter = ',', default_value = "2024", help = "Exhibition years announced as coming soon")]
    upcoming_years: Vec<u16>,

    #[arg(long, env = "GRADSHOW_ASSET_BASE_URL", default_value = DEFAULT_ASSET_BASE_URL, help = "Object storage endpoint for images")]
    asset_base_url: String,

    #[arg(long, env = "GRADSHOW_COMMENTS_DIR", default_value = "comments", help = "Directory of the guestbook store")]
    comments_dir: PathBuf,

    #[arg(long, env = "GRADSHOW_LOG_LEVEL", default_value = "info", help = "Log level (error, warn, info, debug, trace)")]
    log_level: LevelFilter,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub server: ServerConfiguration,
    pub data: DataConfiguration,
    pub assets: AssetConfiguration,
    pub comments: CommentConfiguration,
    pub exhibition: ExhibitionConfiguration,
    pub log_level: LevelFilter,
}

#[derive(Debug, Clone)]
pub struct ServerConfiguration {
    pub bind_addr: String, // GRADSHOW_BIND_ADDR
}

#[derive(Debug, Clone)]
pub enum DataConfiguration {
    Directory(PathBuf), // GRADSHOW_DATA_DIR
    Remote(String),     // GRADSHOW_DATA_URL
}

#[derive(Debug, Clone)]
pub struct AssetConfiguration {
    pub base_url: String, // GRADSHOW_ASSET_BASE_URL
}

#[derive(Debug, Clone)]
pub struct CommentConfiguration {
    pub dir: PathBuf, // GRADSHOW_COMMENTS_DIR
}

#[derive(Debug, Clone)]
pub struct ExhibitionConfiguration {
    pub current_year: Year,
    pub years: Vec<ExhibitionYear>,
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum YearStatus {
    Active,
    ComingSoon { message: String },
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct ExhibitionYear {
    pub year: Year,
    #[serde(flatten)]
    pub status: YearStatus,
}

impl ExhibitionConfiguration {
    /// Newest year first; a year listed as both open and upcoming counts as open.
    fn from_lists(current_year: u16, open_years: &[u16], upcoming_years: &[u16]) -> Self {
        let mut years = open_years.iter()
            .map(|x| ExhibitionYear { year: Year::new(*x), status: YearStatus::Active })
            .chain(upcoming_years.iter()
                .filter(|x| !open_years.contains(x))
                .map(|x| ExhibitionYear {
                    year: Year::new(*x),
                    status: YearStatus::ComingSoon { message: COMING_SOON_MESSAGE.to_string() },
                }))
            .collect::<Vec<ExhibitionYear>>();
        years.sort_by(|a, b| b.year.cmp(&a.year));
        years.dedup_by_key(|x| x.year);
        Self { current_year: Year::new(current_year), years }
    }
}

impl From<FlatConfig> for Config {
    fn from(value: FlatConfig) -> Self {
        let data = match value.data_url {
            Some(url) if !url.trim().is_empty() => DataConfiguration::Remote(url),
            _ => DataConfiguration::Directory(value.data_dir),
        };
        Config {
            server: ServerConfiguration {
                bind_addr: value.bind_addr,
            },
            data,
            assets: AssetConfiguration {
                base_url: value.asset_base_url,
            },
            comments: CommentConfiguration {
                dir: value.comments_dir,
            },
            exhibition: ExhibitionConfiguration::from_lists(value.current_year, &value.open_years, &value.upcoming_years),
            log_level: value.log_level,
        }
    }
}

impl Config {
    pub fn parse() -> Self {
        FlatConfig::parse().into()
    }
}
