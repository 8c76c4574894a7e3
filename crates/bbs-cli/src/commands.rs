use std::path::Path;
use std::sync::Arc;

use anyhow::{bail, Context};
use bbs_blob::BlobBackend;
use bbs_posts::PostStoreConfig;
use bbs_server::{AppState, BbsServer, ServerConfig};
use colored::Colorize;
use tracing::{info, warn};

use crate::cli::*;

pub async fn run_command(cli: Cli) -> anyhow::Result<()> {
    let Cli {
        command, config, ..
    } = cli;
    match command {
        Command::Serve(args) => cmd_serve(resolve_config(config.as_deref(), &args)?).await,
        Command::CheckConfig(args) => cmd_check_config(&resolve_config(config.as_deref(), &args)?),
    }
}

/// Defaults, then the TOML file, then flag/environment overrides.
pub fn resolve_config(path: Option<&Path>, args: &ServeArgs) -> anyhow::Result<ServerConfig> {
    let mut config = match path {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("reading config file {}", path.display()))?;
            toml::from_str(&text)
                .with_context(|| format!("parsing config file {}", path.display()))?
        }
        None => ServerConfig::default(),
    };

    if let Some(port) = args.port {
        config.bind_addr.set_port(port);
    }
    if let Some(ip) = args.bind {
        config.bind_addr.set_ip(ip);
    }
    if let Some(url) = &args.database_url {
        config.posts = PostStoreConfig::from_url(url).context("DATABASE_URL")?;
    }
    if let Some(max) = args.max_attachment_size {
        config.ingest.max_attachment_size = max;
    }
    config.blobs.backend = apply_blob_overrides(config.blobs.backend, args)?;
    Ok(config)
}

fn apply_blob_overrides(current: BlobBackend, args: &ServeArgs) -> anyhow::Result<BlobBackend> {
    // Switching backends starts from that backend's defaults.
    let mut backend = match (args.blob_backend, current) {
        (None, current) => current,
        (Some(BlobBackendKind::Memory), _) => BlobBackend::Memory,
        (Some(BlobBackendKind::Filesystem), current @ BlobBackend::Filesystem { .. }) => current,
        (Some(BlobBackendKind::Filesystem), _) => BlobBackend::Filesystem {
            root: "uploads".into(),
            public_base_url: None,
        },
        (Some(BlobBackendKind::S3), current @ BlobBackend::S3 { .. }) => current,
        (Some(BlobBackendKind::S3), _) => {
            let Some(bucket) = args.blob_bucket.clone() else {
                bail!("the s3 blob backend needs a bucket (--blob-bucket or BLOB_BUCKET)");
            };
            BlobBackend::S3 {
                bucket,
                endpoint: None,
                region: None,
                public_base_url: bbs_blob::s3::DEFAULT_PUBLIC_BASE_URL.to_string(),
            }
        }
    };

    match &mut backend {
        BlobBackend::Memory => {}
        BlobBackend::Filesystem {
            root,
            public_base_url,
        } => {
            if let Some(r) = &args.blob_root {
                *root = r.clone();
            }
            if let Some(url) = &args.blob_public_url {
                *public_base_url = Some(url.clone());
            }
        }
        BlobBackend::S3 {
            bucket,
            endpoint,
            public_base_url,
            ..
        } => {
            if let Some(b) = &args.blob_bucket {
                *bucket = b.clone();
            }
            if let Some(e) = &args.blob_endpoint {
                *endpoint = Some(e.clone());
            }
            if let Some(url) = &args.blob_public_url {
                *public_base_url = url.clone();
            }
        }
    }
    Ok(backend)
}

async fn cmd_serve(config: ServerConfig) -> anyhow::Result<()> {
    let posts = config.posts.open().await.context("opening post store")?;
    let blobs = config.blobs.open().await.context("opening blob store")?;
    info!(
        posts = posts.backend(),
        blobs = blobs.backend(),
        max_attachment_size = config.ingest.max_attachment_size,
        "stores opened"
    );

    let state = AppState::new(blobs, Arc::clone(&posts), config.ingest.clone());
    let served = BbsServer::new(config, state).serve(shutdown_signal()).await;

    posts.close().await.context("closing post store")?;
    served.context("server failed")?;
    println!("{} Server stopped.", "✓".green());
    Ok(())
}

fn cmd_check_config(config: &ServerConfig) -> anyhow::Result<()> {
    print!("{}", render_config(config)?);
    eprintln!("{} Configuration OK.", "✓".green().bold());
    Ok(())
}

/// TOML view of the resolved configuration with database credentials removed.
fn render_config(config: &ServerConfig) -> anyhow::Result<String> {
    let mut shown = config.clone();
    shown.posts = config.posts.redacted();
    toml::to_string_pretty(&shown).context("rendering configuration")
}

/// Resolves on Ctrl-C or, on Unix, SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("cannot listen for Ctrl-C: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                warn!("cannot listen for SIGTERM: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    info!("shutdown signal received");
}
