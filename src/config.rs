use serde::Deserialize;

/// Application configuration loaded from environment variables
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Path to the movie reference dataset (JSON array)
    #[serde(default = "default_movies_path")]
    pub movies_path: String,

    /// Path to the show reference dataset (JSON array)
    #[serde(default = "default_shows_path")]
    pub shows_path: String,

    /// Path to the anime candidate dataset (JSON array)
    #[serde(default = "default_animes_path")]
    pub animes_path: String,

    /// Path to the persisted keyword graph
    #[serde(default = "default_keyword_graph_path")]
    pub keyword_graph_path: String,

    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_movies_path() -> String {
    "datasets/filtered/final_imdb_movies.json".to_string()
}

fn default_shows_path() -> String {
    "datasets/filtered/final_imdb_shows.json".to_string()
}

fn default_animes_path() -> String {
    "datasets/filtered/final_animes.json".to_string()
}

fn default_keyword_graph_path() -> String {
    "datasets/filtered/keyword_graph.txt".to_string()
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        envy::from_env::<Config>().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))
    }
}
