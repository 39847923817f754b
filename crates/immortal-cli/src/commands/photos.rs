//! Gallery photo commands.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use colored::Colorize;

use immortal_client::FilePart;
use immortal_core::ApiUrl;

use crate::output;
use crate::session::CliContext;

#[derive(Args, Debug)]
pub struct PhotosCommand {
    #[command(subcommand)]
    pub command: PhotosSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum PhotosSubcommand {
    /// List uploaded photos
    List(ListArgs),

    /// Upload photos to the gallery
    Upload(UploadArgs),
}

pub async fn handle(api: ApiUrl, cmd: PhotosCommand) -> Result<()> {
    match cmd.command {
        PhotosSubcommand::List(args) => list(api, args).await,
        PhotosSubcommand::Upload(args) => upload(api, args).await,
    }
}

#[derive(Args, Debug)]
pub struct ListArgs {}

async fn list(api: ApiUrl, _args: ListArgs) -> Result<()> {
    let ctx = CliContext::authenticated(api).await?;

    let photos = ctx
        .session
        .photos()
        .await
        .context("Failed to fetch photos")?;

    if photos.is_empty() {
        println!("No photos uploaded.");
    }

    for photo in photos {
        println!("{} {}", photo.original_filename, photo.file_path.dimmed());
    }

    ctx.save().context("Failed to save cookie store")?;

    Ok(())
}

#[derive(Args, Debug)]
pub struct UploadArgs {
    /// Image files to upload
    #[arg(required = true, value_name = "FILE")]
    pub files: Vec<PathBuf>,
}

async fn upload(api: ApiUrl, args: UploadArgs) -> Result<()> {
    let ctx = CliContext::authenticated(api).await?;

    let mut parts = Vec::with_capacity(args.files.len());
    for path in &args.files {
        let bytes =
            fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
        let file_name = path
            .file_name()
            .and_then(|name| name.to_str())
            .with_context(|| format!("Invalid file name: {}", path.display()))?;

        let mut part = FilePart::new(file_name, bytes);
        if let Some(mime) = guess_mime(path) {
            part = part.with_mime(mime);
        }
        parts.push(part);
    }

    eprintln!("{}", "Uploading...".dimmed());

    let photos = ctx
        .session
        .upload_photos(parts)
        .await
        .context("Failed to upload photos")?;

    ctx.save().context("Failed to save cookie store")?;

    output::success(&format!("Uploaded {} photo(s)", photos.len()));

    Ok(())
}

fn guess_mime(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    match ext.as_str() {
        "jpg" | "jpeg" => Some("image/jpeg"),
        "png" => Some("image/png"),
        "gif" => Some("image/gif"),
        "webp" => Some("image/webp"),
        "heic" => Some("image/heic"),
        _ => None,
    }
}
