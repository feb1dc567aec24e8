//! Configuration module
//!
//! Environment-backed configuration for the ingestion pipeline and the
//! tooling around it: storage backend selection, validation ceilings,
//! transcoding envelope and authorization settings.

use std::env;
use std::str::FromStr;

use crate::constants;
use crate::models::UserRole;
use crate::storage_types::StorageBackend;

/// Application configuration.
#[derive(Clone, Debug)]
pub struct Config {
    pub environment: String,
    // Storage configuration
    pub storage_backend: Option<StorageBackend>,
    pub s3_bucket: Option<String>,
    pub s3_region: Option<String>,
    pub s3_endpoint: Option<String>, // Custom endpoint for S3-compatible providers
    pub aws_region: Option<String>,
    pub local_storage_path: Option<String>,
    pub local_storage_base_url: Option<String>,
    // Ingestion configuration
    pub max_file_size_mb: u32,
    pub allowed_content_types: Vec<String>,
    pub max_image_width: u32,
    pub max_image_height: u32,
    pub jpeg_quality: u8,
    pub default_upload_prefix: String,
    // Authorization configuration
    pub jwt_secret: String,
    pub privileged_roles: Vec<UserRole>,
    pub profile_service_url: Option<String>,
}

impl Config {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();

        let environment = env::var("ENVIRONMENT")
            .or_else(|_| env::var("APP_ENV"))
            .unwrap_or_else(|_| "development".to_string());

        let storage_backend = env::var("STORAGE_BACKEND")
            .ok()
            .map(|s| StorageBackend::from_str(&s))
            .transpose()?;

        let max_file_size_mb = env::var("MAX_FILE_SIZE_MB")
            .unwrap_or_else(|_| constants::DEFAULT_MAX_FILE_SIZE_MB.to_string())
            .parse::<u32>()
            .unwrap_or(constants::DEFAULT_MAX_FILE_SIZE_MB);

        let allowed_content_types = env::var("ALLOWED_CONTENT_TYPES")
            .unwrap_or_else(|_| constants::DEFAULT_ALLOWED_CONTENT_TYPES.join(","))
            .split(',')
            .map(|s| s.trim().to_lowercase())
            .filter(|s| !s.is_empty())
            .collect();

        let privileged_roles = env::var("PRIVILEGED_ROLES")
            .unwrap_or_else(|_| "admin,supervisor".to_string())
            .split(',')
            .map(|s| UserRole::from_str(s.trim()))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Config {
            environment,
            storage_backend,
            s3_bucket: env::var("S3_BUCKET").ok(),
            s3_region: env::var("S3_REGION").ok(),
            s3_endpoint: env::var("S3_ENDPOINT").ok(),
            aws_region: env::var("AWS_REGION").ok(),
            local_storage_path: env::var("LOCAL_STORAGE_PATH").ok(),
            local_storage_base_url: env::var("LOCAL_STORAGE_BASE_URL").ok(),
            max_file_size_mb,
            allowed_content_types,
            max_image_width: env::var("MAX_IMAGE_WIDTH")
                .unwrap_or_else(|_| constants::DEFAULT_MAX_IMAGE_WIDTH.to_string())
                .parse()
                .unwrap_or(constants::DEFAULT_MAX_IMAGE_WIDTH),
            max_image_height: env::var("MAX_IMAGE_HEIGHT")
                .unwrap_or_else(|_| constants::DEFAULT_MAX_IMAGE_HEIGHT.to_string())
                .parse()
                .unwrap_or(constants::DEFAULT_MAX_IMAGE_HEIGHT),
            jpeg_quality: env::var("JPEG_QUALITY")
                .unwrap_or_else(|_| constants::DEFAULT_JPEG_QUALITY.to_string())
                .parse()
                .unwrap_or(constants::DEFAULT_JPEG_QUALITY),
            default_upload_prefix: env::var("UPLOAD_PREFIX")
                .unwrap_or_else(|_| "maintenance-reports".to_string()),
            jwt_secret: env::var("JWT_SECRET")
                .map_err(|_| anyhow::anyhow!("JWT_SECRET must be set for authentication"))?,
            privileged_roles,
            profile_service_url: env::var("PROFILE_SERVICE_URL").ok(),
        })
    }

    /// Check if the application is running in production mode
    pub fn is_production(&self) -> bool {
        let env = self.environment.to_lowercase();
        env == "production" || env == "prod"
    }

    pub fn max_file_size_bytes(&self) -> usize {
        self.max_file_size_mb as usize * 1024 * 1024
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if self.allowed_content_types.is_empty() {
            return Err(anyhow::anyhow!(
                "ALLOWED_CONTENT_TYPES must contain at least one content type"
            ));
        }
        if self.privileged_roles.is_empty() {
            return Err(anyhow::anyhow!(
                "PRIVILEGED_ROLES must contain at least one role"
            ));
        }
        if self.max_file_size_mb == 0 {
            return Err(anyhow::anyhow!("MAX_FILE_SIZE_MB must be greater than 0"));
        }
        if self.jpeg_quality == 0 || self.jpeg_quality > 100 {
            return Err(anyhow::anyhow!("JPEG_QUALITY must be between 1 and 100"));
        }
        if self.max_image_width == 0 || self.max_image_height == 0 {
            return Err(anyhow::anyhow!("Image envelope dimensions must be non-zero"));
        }
        match self.storage_backend {
            Some(StorageBackend::S3) => {
                if self.s3_bucket.is_none() {
                    return Err(anyhow::anyhow!("S3_BUCKET not configured"));
                }
                if self.s3_region.is_none() && self.aws_region.is_none() {
                    return Err(anyhow::anyhow!("S3_REGION or AWS_REGION not configured"));
                }
            }
            Some(StorageBackend::Local) => {
                if self.local_storage_path.is_none() {
                    return Err(anyhow::anyhow!("LOCAL_STORAGE_PATH not configured"));
                }
                if self.local_storage_base_url.is_none() {
                    return Err(anyhow::anyhow!("LOCAL_STORAGE_BASE_URL not configured"));
                }
            }
            None => {}
        }
        Ok(())
    }
}
