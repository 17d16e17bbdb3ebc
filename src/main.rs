use std::path::Path;
use std::sync::Arc;

use clap::Parser;
use color_eyre::eyre::{Result, WrapErr, eyre};
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use stickerforge::application::{
    NormalizeStickerUseCase, Normalizer, StickerSource, UploadedAttachment,
};
use stickerforge::domain::{CandidateSource, ImageFormat, StickerId};
use stickerforge::infrastructure::{
    AppConfig, CliArgs, Command, HttpMediaFetcher, MediaFetcherConfig, StorageManager,
};

fn init_logging(config: &AppConfig) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.log_level.to_string()));

    if let Some(log_path) = &config.log_path {
        if let Some(parent) = log_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(log_path)?;

        let file_layer = fmt::layer()
            .with_writer(file)
            .with_ansi(false)
            .with_target(true)
            .with_thread_ids(false);

        tracing_subscriber::registry()
            .with(filter)
            .with(file_layer)
            .init();

        info!(path = %log_path.display(), "Logging initialized");
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_writer(std::io::stderr))
            .init();
    }

    Ok(())
}

fn load_config(args: &CliArgs) -> Result<AppConfig> {
    let storage = StorageManager::new()?;
    let mut config = storage.load_config(args.config.as_deref())?;
    config.merge_with_args(args);
    config.validate()?;
    Ok(config)
}

async fn build_source(command: &Command, config: &AppConfig) -> Result<StickerSource> {
    match command {
        Command::Normalize {
            file, content_type, ..
        } => {
            let bytes = tokio::fs::read(file)
                .await
                .wrap_err_with(|| format!("failed to read {}", file.display()))?;

            let filename = file.file_name().and_then(|n| n.to_str());
            // Without an explicit claim, claim what the extension says, as an
            // uploading client would.
            let claimed = content_type.clone().or_else(|| {
                filename
                    .and_then(ImageFormat::from_filename)
                    .map(|format| format.mime_type().to_string())
            });

            let mut attachment = UploadedAttachment::new(bytes);
            if let Some(ct) = claimed {
                attachment = attachment.with_content_type(ct);
            }
            if let Some(name) = filename {
                attachment = attachment.with_filename(name);
            }
            Ok(StickerSource::Upload(attachment))
        }
        Command::Copy { sticker_id, .. } => {
            let id = StickerId::new(sticker_id.as_str())
                .ok_or_else(|| eyre!("invalid sticker id: {sticker_id}"))?;
            Ok(StickerSource::Copy(CandidateSource::for_sticker(
                &id,
                &config.pipeline.cdn_base_url,
            )))
        }
    }
}

fn output_path(command: &Command) -> &Path {
    match command {
        Command::Normalize { output, .. } | Command::Copy { output, .. } => output,
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    dotenvy::dotenv().ok();

    let args = CliArgs::parse();
    let config = load_config(&args)?;

    init_logging(&config)?;

    info!(version = stickerforge::VERSION, "Starting {}", stickerforge::NAME);

    let fetcher = HttpMediaFetcher::new(&MediaFetcherConfig::from(&config.pipeline))?;
    let normalizer = Normalizer::new(config.pipeline.normalizer_config());
    let use_case = NormalizeStickerUseCase::new(Arc::new(fetcher), normalizer);

    let source = build_source(&args.command, &config).await?;
    let description = source.default_description();
    let asset = use_case.execute(source).await?;

    let output = output_path(&args.command);
    tokio::fs::write(output, asset.bytes())
        .await
        .wrap_err_with(|| format!("failed to write {}", output.display()))?;

    println!(
        "{} {} ({} bytes) \"{}\"",
        output.display(),
        asset.format(),
        asset.byte_len(),
        description
    );

    Ok(())
}
