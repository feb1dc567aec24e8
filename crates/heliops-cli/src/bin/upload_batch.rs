use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;

use heliops_cli::{content_type_for_path, identity_from_env};
use heliops_core::Config;
use heliops_ingest::{ProgressSink, RawFile, UploadBatchRequest, UploadOrchestrator};
use heliops_storage::create_object_store;

#[derive(Parser, Debug)]
#[command(name = "upload_batch")]
#[command(about = "Upload a batch of report images to object storage")]
struct Args {
    /// Image files to upload
    #[arg(required = true)]
    files: Vec<PathBuf>,

    /// Storage path prefix (defaults to UPLOAD_PREFIX from the environment)
    #[arg(long)]
    prefix: Option<String>,

    /// Per-file size ceiling in megabytes
    #[arg(long)]
    max_size_mb: Option<u32>,

    /// Print the batch result as JSON
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    let config = Config::from_env()?;
    config.validate()?;

    let store = create_object_store(&config).await?;
    let identity = identity_from_env(&config)?;
    let orchestrator = UploadOrchestrator::from_config(&config, store);

    let mut files = Vec::new();
    for path in &args.files {
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("file")
            .to_string();
        let content_type = content_type_for_path(path)
            .unwrap_or("application/octet-stream")
            .to_string();
        let data = tokio::fs::read(path).await?;
        files.push(RawFile::new(name, content_type, data));
    }

    let prefix = args
        .prefix
        .unwrap_or_else(|| config.default_upload_prefix.clone());

    let progress: Arc<dyn ProgressSink> = Arc::new(|completed: usize, total: usize| {
        eprintln!("  {}/{} files processed", completed, total);
    });

    let mut request = UploadBatchRequest::new(files, prefix).with_progress(progress);
    if let Some(max_size_mb) = args.max_size_mb {
        request = request.with_max_size_mb(max_size_mb);
    }

    let result = orchestrator.upload_batch(&identity, request).await?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
        return Ok(());
    }

    for url in &result.urls {
        println!("{}", url);
    }
    if !result.failures.is_empty() {
        eprintln!("{} file(s) failed:", result.failures.len());
        for failure in &result.failures {
            eprintln!("  {}: {}", failure.name, failure.reason);
        }
    }

    Ok(())
}
