use std::path::PathBuf;

use anyhow::{bail, ensure, Context, Result};

const DEFAULT_ALPHA_VANTAGE_URL: &str = "https://www.alphavantage.co/query";
const DEFAULT_OPENAI_URL: &str = "https://api.openai.com/v1";
const DEFAULT_OLLAMA_URL: &str = "http://localhost:11434";
const DEFAULT_QDRANT_URL: &str = "http://localhost:6334";
const DEFAULT_QDRANT_COLLECTION: &str = "cv_embeddings";

/// Application configuration loaded from environment variables.
/// Fails at startup if the API keys are missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub alpha_vantage_api_key: String,
    pub alpha_vantage_base_url: String,
    pub openai_api_key: String,
    pub openai_base_url: String,
    pub ollama_url: String,
    pub qdrant_url: String,
    pub qdrant_collection: String,
    pub dirs: WorkDirs,
    pub chunking: ChunkingConfig,
    pub smtp: Option<SmtpConfig>,
    pub port: u16,
    pub rust_log: String,
}

/// The two sibling directories used by the recruiting pipeline.
#[derive(Debug, Clone)]
pub struct WorkDirs {
    /// Uploaded CVs, stored under their original file names.
    pub working: PathBuf,
    /// Persisted chunks, two files per chunk.
    pub chunks: PathBuf,
}

impl WorkDirs {
    pub fn under(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        Self {
            working: root.join("working_cvs"),
            chunks: root.join("chunks"),
        }
    }

    /// Creates every directory that does not exist yet.
    pub fn ensure(&self) -> std::io::Result<()> {
        for dir in [&self.working, &self.chunks] {
            std::fs::create_dir_all(dir)?;
        }
        Ok(())
    }
}

/// Window size and overlap (in characters) used by the chunker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkingConfig {
    pub chunk_size: usize,
    pub chunk_overlap: usize,
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            chunk_size: 1000,
            chunk_overlap: 100,
        }
    }
}

impl ChunkingConfig {
    pub fn new(chunk_size: usize, chunk_overlap: usize) -> Result<Self> {
        ensure!(chunk_size > 0, "CHUNK_SIZE must be greater than zero");
        ensure!(
            chunk_overlap < chunk_size,
            "CHUNK_OVERLAP ({chunk_overlap}) must be smaller than CHUNK_SIZE ({chunk_size})"
        );
        Ok(Self {
            chunk_size,
            chunk_overlap,
        })
    }

    /// Distance between the starts of two consecutive windows.
    pub fn step(&self) -> usize {
        self.chunk_size - self.chunk_overlap
    }
}

/// How the mail session is secured.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SmtpTls {
    /// Plain connect, then upgrade with STARTTLS.
    #[default]
    StartTls,
    /// TLS from the first byte (usually port 465).
    Implicit,
    /// No encryption. Only for local relays.
    None,
}

impl SmtpTls {
    pub fn parse(raw: &str) -> Result<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "starttls" => Ok(SmtpTls::StartTls),
            "tls" | "implicit" => Ok(SmtpTls::Implicit),
            "none" => Ok(SmtpTls::None),
            other => bail!("SMTP_TLS must be one of starttls, tls, none (got '{other}')"),
        }
    }
}

/// Authenticated mail transport settings.
#[derive(Clone)]
pub struct SmtpConfig {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub tls: SmtpTls,
}

impl std::fmt::Debug for SmtpConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SmtpConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("user", &self.user)
            .field("password", &"<redacted>")
            .field("tls", &self.tls)
            .finish()
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let dirs = WorkDirs {
            working: optional_env("WORKING_DIR", "working_cvs").into(),
            chunks: optional_env("CHUNKS_DIR", "chunks").into(),
        };
        let chunking = ChunkingConfig::new(
            parse_env("CHUNK_SIZE", 1000)?,
            parse_env("CHUNK_OVERLAP", 100)?,
        )?;

        Ok(Config {
            alpha_vantage_api_key: require_env("ALPHA_VANTAGE_API_KEY")?,
            alpha_vantage_base_url: optional_env(
                "ALPHA_VANTAGE_BASE_URL",
                DEFAULT_ALPHA_VANTAGE_URL,
            ),
            openai_api_key: require_env("OPENAI_API_KEY")?,
            openai_base_url: optional_env("OPENAI_BASE_URL", DEFAULT_OPENAI_URL),
            ollama_url: optional_env("OLLAMA_URL", DEFAULT_OLLAMA_URL),
            qdrant_url: optional_env("QDRANT_URL", DEFAULT_QDRANT_URL),
            qdrant_collection: optional_env("QDRANT_COLLECTION", DEFAULT_QDRANT_COLLECTION),
            dirs,
            chunking,
            smtp: smtp_from_env()?,
            port: parse_env("PORT", 8080).context("PORT must be a valid port number")?,
            rust_log: optional_env("RUST_LOG", "info"),
        })
    }
}

/// Mail settings are only usable when all four variables are present.
fn smtp_from_env() -> Result<Option<SmtpConfig>> {
    let vars = (
        std::env::var("SMTP_SERVER"),
        std::env::var("SMTP_PORT"),
        std::env::var("SMTP_USER"),
        std::env::var("SMTP_PASSWORD"),
    );
    let (Ok(host), Ok(port), Ok(user), Ok(password)) = vars else {
        return Ok(None);
    };
    let port = port
        .trim()
        .parse::<u16>()
        .context("SMTP_PORT must be a valid port number")?;
    let tls = match std::env::var("SMTP_TLS") {
        Ok(raw) => SmtpTls::parse(&raw)?,
        Err(_) => SmtpTls::default(),
    };
    Ok(Some(SmtpConfig {
        host,
        port,
        user,
        password,
        tls,
    }))
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn optional_env(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("Environment variable '{key}' has an invalid value")),
        Err(_) => Ok(default),
    }
}
