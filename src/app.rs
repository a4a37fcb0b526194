use crate::cli::{Cli, Commands};
use anyhow::{Context, Result};
use pdf_preview::{DirectorySaver, PdfiumRenderer, PreviewConfig, PreviewSession, QpdfWrapper};
use std::path::{Path, PathBuf};

/// File name without extension, used as the base name of produced parts
fn base_name(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "document".to_string())
}

/// Message for the terminal. Library errors are reduced to their
/// client-facing text; the full chain goes to the log.
pub fn user_message(err: &anyhow::Error) -> String {
    let preview_error = err
        .chain()
        .find_map(|cause| cause.downcast_ref::<pdf_preview::Error>());
    let has_context = !err
        .chain()
        .next()
        .is_some_and(|outer| outer.is::<pdf_preview::Error>());
    match preview_error {
        Some(e) if has_context => format!("{}: {}", err, e.client_message()),
        Some(e) => e.client_message(),
        None => format!("{:#}", err),
    }
}

async fn read_input(path: &Path) -> Result<Vec<u8>> {
    tokio::fs::read(path)
        .await
        .with_context(|| format!("failed to read {}", path.display()))
}

/// Run the selected producer; returns the parts and their base name
async fn produce(command: &Commands) -> Result<(Vec<Vec<u8>>, String)> {
    let (inputs, base): (Vec<PathBuf>, String) = match command {
        Commands::Merge { inputs } => (inputs.clone(), base_name(&inputs[0])),
        Commands::Split { input, .. }
        | Commands::Rotate { input, .. }
        | Commands::Compress { input }
        | Commands::Reorder { input, .. }
        | Commands::Delete { input, .. } => (vec![input.clone()], base_name(input)),
    };

    let mut data = Vec::with_capacity(inputs.len());
    for path in &inputs {
        data.push(read_input(path).await?);
    }

    let command_name = match command {
        Commands::Merge { .. } => "merge",
        Commands::Split { .. } => "split",
        Commands::Rotate { .. } => "rotate",
        Commands::Compress { .. } => "compress",
        Commands::Reorder { .. } => "reorder",
        Commands::Delete { .. } => "delete",
    };
    tracing::info!(command = command_name, inputs = inputs.len(), "running producer");

    let command = command.clone();
    let parts = tokio::task::spawn_blocking(move || {
        let parts = match command {
            Commands::Merge { .. } => {
                let refs: Vec<&[u8]> = data.iter().map(|v| v.as_slice()).collect();
                vec![QpdfWrapper::merge(&refs)?]
            }
            Commands::Split { at, .. } => {
                let (first, second) = QpdfWrapper::split_at(&data[0], at)?;
                vec![first, second]
            }
            Commands::Rotate { angle, .. } => vec![QpdfWrapper::rotate(&data[0], angle)?],
            Commands::Compress { .. } => vec![QpdfWrapper::compress(&data[0])?],
            Commands::Reorder { order, .. } => vec![QpdfWrapper::select_pages(&data[0], &order)?],
            Commands::Delete { pages, .. } => vec![QpdfWrapper::delete_pages(&data[0], &pages)?],
        };
        Ok::<_, pdf_preview::Error>(parts)
    })
    .await
    .context("producer task failed")?
    .with_context(|| format!("{} failed", command_name))?;

    Ok((parts, base))
}

pub async fn run(cli: Cli) -> Result<()> {
    let mut config = PreviewConfig::default();
    if let Some(scale) = cli.scale {
        config = config.with_render_scale(scale);
    }

    tokio::task::spawn_blocking(PdfiumRenderer::check_available)
        .await
        .context("PDFium check failed")?
        .context("PDFium library is not available")?;

    let (parts, base) = produce(&cli.command).await?;

    let renderer = PdfiumRenderer::from_config(&config);
    let saver = DirectorySaver::new(&cli.out);
    let session = PreviewSession::with_config(renderer, saver, config);

    let first = session
        .open(parts, &base)
        .await
        .context("failed to open preview")?;
    if !first.is_displayed() {
        tracing::warn!(base_name = %base, "first page was not displayed");
    }

    // Walk every part the way a user clicking "next" would
    loop {
        session.download()?;
        if cli.images {
            loop {
                session.download_page_image()?;
                if !session.change_page(1).await? {
                    break;
                }
            }
        }
        if !session.change_part(1).await? {
            break;
        }
    }

    let status = session.status();
    if cli.json {
        println!("{}", serde_json::to_string_pretty(&status)?);
    } else {
        for part in &status.parts {
            println!("{}: {} page(s), {} bytes", part.name, part.total_pages, part.size_bytes);
        }
        for path in session.saver().saved_paths() {
            println!("saved {}", path.display());
        }
    }

    session.close();
    Ok(())
}
