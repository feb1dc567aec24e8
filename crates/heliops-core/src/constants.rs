//! Application-wide constants.

use uuid::Uuid;

/// Default tenant ID used for single-tenant deployments and tooling.
/// Deterministic UUID distinct from Uuid::nil() to avoid confusion with
/// uninitialized or sentinel values. Stable across deployments.
/// Format: 7a1c9e52-4d8b-5f3a-9c6d-2e0b1f4a8c7d
pub const DEFAULT_TENANT_ID: Uuid = Uuid::from_u128(0x7a1c9e52_4d8b_5f3a_9c6d_2e0b1f4a8c7d);

/// Per-file size ceiling applied when a form does not override it.
pub const DEFAULT_MAX_FILE_SIZE_MB: u32 = 10;

/// Raster image content types accepted by default.
pub const DEFAULT_ALLOWED_CONTENT_TYPES: [&str; 4] =
    ["image/jpeg", "image/png", "image/gif", "image/webp"];

/// Pixel envelope applied by the transcoder.
pub const DEFAULT_MAX_IMAGE_WIDTH: u32 = 1920;
pub const DEFAULT_MAX_IMAGE_HEIGHT: u32 = 1080;

/// JPEG quality used for transcoded output.
pub const DEFAULT_JPEG_QUALITY: u8 = 75;
