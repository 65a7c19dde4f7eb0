//! Configuration module
//!
//! Settings are read from the process environment (a `.env` file is honoured
//! through `dotenvy`). Every value has a default except the credentials that
//! the selected backends require; `validate` reports those.

use std::env;

use crate::storage_types::{DatabaseBackend, StorageBackend};

const SERVER_PORT: u16 = 5000;
const MAX_CONNECTIONS: u32 = 10;
const CONNECTION_TIMEOUT_SECS: u64 = 30;
const MAX_FILE_SIZE_MB: usize = 10;
const UPLOAD_TIMEOUT_SECS: u64 = 30;
const REQUEST_TIMEOUT_SECS: u64 = 60;
const IMAGE_WIDTH: u32 = 450;
const IMAGE_HEIGHT: u32 = 350;
const DEFAULT_FRONTEND_URL: &str = "http://localhost:5173";
const DEFAULT_IMAGE_FOLDER: &str = "landmark-real-estate";
const DEFAULT_CLOUDINARY_API_BASE: &str = "https://api.cloudinary.com/v1_1";

/// Settings shared by the HTTP server and its collaborators
#[derive(Clone, Debug)]
pub struct BaseConfig {
    pub server_port: u16,
    pub cors_origins: Vec<String>,
    pub environment: String,
    pub request_timeout_secs: u64,
}

/// Document store settings
#[derive(Clone, Debug)]
pub struct DatabaseConfig {
    pub backend: DatabaseBackend,
    pub url: Option<String>,
    pub max_connections: u32,
    pub timeout_seconds: u64,
}

/// Image pipeline settings
#[derive(Clone, Debug)]
pub struct ImageConfig {
    pub backend: StorageBackend,
    pub cloudinary_cloud_name: Option<String>,
    pub cloudinary_api_key: Option<String>,
    pub cloudinary_api_secret: Option<String>,
    pub cloudinary_api_base: String,
    pub folder: String,
    pub width: u32,
    pub height: u32,
    pub max_file_size_bytes: usize,
    pub upload_timeout_secs: u64,
    pub local_storage_path: String,
    pub public_base_url: String,
}

/// Upload limits and transform target handed to the pipeline components.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UploadSettings {
    pub max_file_size_bytes: usize,
    pub folder: String,
    pub width: u32,
    pub height: u32,
}

impl Default for UploadSettings {
    fn default() -> Self {
        Self {
            max_file_size_bytes: MAX_FILE_SIZE_MB * 1024 * 1024,
            folder: DEFAULT_IMAGE_FOLDER.to_string(),
            width: IMAGE_WIDTH,
            height: IMAGE_HEIGHT,
        }
    }
}

/// Application configuration.
#[derive(Clone, Debug)]
pub struct Config {
    pub base: BaseConfig,
    pub database: DatabaseConfig,
    pub images: ImageConfig,
}

impl Config {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();

        let environment = env::var("ENVIRONMENT")
            .or_else(|_| env::var("APP_ENV"))
            .unwrap_or_else(|_| "development".to_string());

        let cors_origins: Vec<String> = env::var("CORS_ORIGINS")
            .or_else(|_| env::var("FRONTEND_URL"))
            .unwrap_or_else(|_| DEFAULT_FRONTEND_URL.to_string())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let server_port: u16 = env::var("PORT")
            .unwrap_or_else(|_| SERVER_PORT.to_string())
            .parse()
            .map_err(|_| anyhow::anyhow!("PORT must be a valid number"))?;

        let base = BaseConfig {
            server_port,
            cors_origins,
            environment,
            request_timeout_secs: env::var("REQUEST_TIMEOUT_SECS")
                .unwrap_or_else(|_| REQUEST_TIMEOUT_SECS.to_string())
                .parse()
                .unwrap_or(REQUEST_TIMEOUT_SECS),
        };

        let database = DatabaseConfig {
            backend: env::var("DATABASE_BACKEND")
                .unwrap_or_else(|_| DatabaseBackend::Postgres.to_string())
                .parse()?,
            url: env::var("DATABASE_URL").ok(),
            max_connections: env::var("DB_MAX_CONNECTIONS")
                .unwrap_or_else(|_| MAX_CONNECTIONS.to_string())
                .parse()
                .unwrap_or(MAX_CONNECTIONS),
            timeout_seconds: env::var("DB_TIMEOUT_SECONDS")
                .unwrap_or_else(|_| CONNECTION_TIMEOUT_SECS.to_string())
                .parse()
                .unwrap_or(CONNECTION_TIMEOUT_SECS),
        };

        let max_file_size_mb = env::var("MAX_FILE_SIZE_MB")
            .unwrap_or_else(|_| MAX_FILE_SIZE_MB.to_string())
            .parse::<usize>()
            .unwrap_or(MAX_FILE_SIZE_MB);

        let images = ImageConfig {
            backend: env::var("IMAGE_STORE_BACKEND")
                .unwrap_or_else(|_| StorageBackend::Cloudinary.to_string())
                .parse()?,
            cloudinary_cloud_name: env::var("CLOUDINARY_CLOUD_NAME").ok(),
            cloudinary_api_key: env::var("CLOUDINARY_API_KEY").ok(),
            cloudinary_api_secret: env::var("CLOUDINARY_API_SECRET").ok(),
            cloudinary_api_base: env::var("CLOUDINARY_API_BASE")
                .unwrap_or_else(|_| DEFAULT_CLOUDINARY_API_BASE.to_string()),
            folder: env::var("IMAGE_FOLDER").unwrap_or_else(|_| DEFAULT_IMAGE_FOLDER.to_string()),
            width: env::var("IMAGE_WIDTH")
                .unwrap_or_else(|_| IMAGE_WIDTH.to_string())
                .parse()
                .unwrap_or(IMAGE_WIDTH),
            height: env::var("IMAGE_HEIGHT")
                .unwrap_or_else(|_| IMAGE_HEIGHT.to_string())
                .parse()
                .unwrap_or(IMAGE_HEIGHT),
            max_file_size_bytes: max_file_size_mb * 1024 * 1024,
            upload_timeout_secs: env::var("UPLOAD_TIMEOUT_SECS")
                .unwrap_or_else(|_| UPLOAD_TIMEOUT_SECS.to_string())
                .parse()
                .unwrap_or(UPLOAD_TIMEOUT_SECS),
            local_storage_path: env::var("LOCAL_STORAGE_PATH")
                .unwrap_or_else(|_| "uploads".to_string()),
            public_base_url: env::var("PUBLIC_BASE_URL")
                .unwrap_or_else(|_| format!("http://localhost:{}", server_port)),
        };

        let config = Config {
            base,
            database,
            images,
        };
        config.validate()?;
        Ok(config)
    }

    /// Configuration for tests and the in-memory backend: no credentials needed.
    pub fn for_memory(local_storage_path: impl Into<String>) -> Self {
        Config {
            base: BaseConfig {
                server_port: SERVER_PORT,
                cors_origins: vec![DEFAULT_FRONTEND_URL.to_string()],
                environment: "test".to_string(),
                request_timeout_secs: REQUEST_TIMEOUT_SECS,
            },
            database: DatabaseConfig {
                backend: DatabaseBackend::Memory,
                url: None,
                max_connections: MAX_CONNECTIONS,
                timeout_seconds: CONNECTION_TIMEOUT_SECS,
            },
            images: ImageConfig {
                backend: StorageBackend::Local,
                cloudinary_cloud_name: None,
                cloudinary_api_key: None,
                cloudinary_api_secret: None,
                cloudinary_api_base: DEFAULT_CLOUDINARY_API_BASE.to_string(),
                folder: DEFAULT_IMAGE_FOLDER.to_string(),
                width: IMAGE_WIDTH,
                height: IMAGE_HEIGHT,
                max_file_size_bytes: MAX_FILE_SIZE_MB * 1024 * 1024,
                upload_timeout_secs: UPLOAD_TIMEOUT_SECS,
                local_storage_path: local_storage_path.into(),
                public_base_url: format!("http://localhost:{}", SERVER_PORT),
            },
        }
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if self.base.cors_origins.is_empty() {
            return Err(anyhow::anyhow!("At least one CORS origin must be configured"));
        }
        if self.is_production() && self.base.cors_origins.iter().any(|o| o == "*") {
            return Err(anyhow::anyhow!(
                "CORS_ORIGINS cannot be '*' in production. Please specify explicit origins."
            ));
        }
        if self.database.backend == DatabaseBackend::Postgres && self.database.url.is_none() {
            return Err(anyhow::anyhow!(
                "DATABASE_URL must be set when DATABASE_BACKEND=postgres"
            ));
        }
        if self.images.backend == StorageBackend::Cloudinary {
            for (name, value) in [
                ("CLOUDINARY_CLOUD_NAME", &self.images.cloudinary_cloud_name),
                ("CLOUDINARY_API_KEY", &self.images.cloudinary_api_key),
                ("CLOUDINARY_API_SECRET", &self.images.cloudinary_api_secret),
            ] {
                if value.as_deref().map_or(true, str::is_empty) {
                    return Err(anyhow::anyhow!(
                        "{} must be set when IMAGE_STORE_BACKEND=cloudinary",
                        name
                    ));
                }
            }
        }
        if self.images.width == 0 || self.images.height == 0 {
            return Err(anyhow::anyhow!("IMAGE_WIDTH and IMAGE_HEIGHT must be positive"));
        }
        if self.images.max_file_size_bytes == 0 {
            return Err(anyhow::anyhow!("MAX_FILE_SIZE_MB must be positive"));
        }
        Ok(())
    }

    /// Check if the application is running in production mode
    pub fn is_production(&self) -> bool {
        let env = self.base.environment.to_lowercase();
        env == "production" || env == "prod"
    }

    pub fn upload_settings(&self) -> UploadSettings {
        UploadSettings {
            max_file_size_bytes: self.images.max_file_size_bytes,
            folder: self.images.folder.clone(),
            width: self.images.width,
            height: self.images.height,
        }
    }

    pub fn server_port(&self) -> u16 {
        self.base.server_port
    }

    pub fn cors_origins(&self) -> &[String] {
        &self.base.cors_origins
    }

    pub fn environment(&self) -> &str {
        &self.base.environment
    }

    pub fn request_timeout_secs(&self) -> u64 {
        self.base.request_timeout_secs
    }

    pub fn database_backend(&self) -> DatabaseBackend {
        self.database.backend
    }

    pub fn database_url(&self) -> Option<&str> {
        self.database.url.as_deref()
    }

    pub fn db_max_connections(&self) -> u32 {
        self.database.max_connections
    }

    pub fn db_timeout_seconds(&self) -> u64 {
        self.database.timeout_seconds
    }

    pub fn storage_backend(&self) -> StorageBackend {
        self.images.backend
    }

    pub fn cloudinary_cloud_name(&self) -> Option<&str> {
        self.images.cloudinary_cloud_name.as_deref()
    }

    pub fn cloudinary_api_key(&self) -> Option<&str> {
        self.images.cloudinary_api_key.as_deref()
    }

    pub fn cloudinary_api_secret(&self) -> Option<&str> {
        self.images.cloudinary_api_secret.as_deref()
    }

    pub fn cloudinary_api_base(&self) -> &str {
        &self.images.cloudinary_api_base
    }

    pub fn max_file_size_bytes(&self) -> usize {
        self.images.max_file_size_bytes
    }

    pub fn upload_timeout_secs(&self) -> u64 {
        self.images.upload_timeout_secs
    }

    pub fn local_storage_path(&self) -> &str {
        &self.images.local_storage_path
    }

    pub fn public_base_url(&self) -> &str {
        &self.images.public_base_url
    }
}
