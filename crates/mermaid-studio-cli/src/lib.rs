//! CLI logic for the Mermaid Studio tool.
//!
//! This module contains the core CLI logic: validating diagram files,
//! rendering and exporting them, and moving diagrams in and out of share
//! links and the stored session.

pub mod error_adapter;

mod args;
mod config;
mod engine;
mod storage;

pub use args::{Args, Command};
pub use engine::ProcessEngine;
pub use storage::FileStorage;

use std::{fs, io, path::Path};

use chrono::Local;
use log::{info, warn};

use mermaid_studio::{
    Studio, StudioError,
    export::{decode_state, export_filename, intrinsic_size, share_url, token_from_url},
    ports::{MemoryLocation, SystemClock},
    session::Session,
    view::ViewMode,
};

/// Run the Mermaid Studio CLI application
///
/// # Arguments
///
/// * `args` - Command-line arguments
///
/// # Errors
///
/// Returns `StudioError` for:
/// - File I/O errors
/// - Configuration loading errors
/// - Validation errors
/// - Rendering and export errors
/// - Session storage errors
pub fn run(args: &Args) -> Result<(), StudioError> {
    let app_config = config::load_config(args.config.as_ref())?;
    let studio = Studio::new(app_config);

    match &args.command {
        Command::Check { input } => check(&studio, input),
        Command::Render {
            input,
            output,
            title,
        } => render(&studio, input, output.as_deref(), title.as_deref()),
        Command::Share {
            input,
            title,
            viewer,
            base,
        } => share(&studio, input, title.as_deref(), *viewer, base.as_deref()),
        Command::Open {
            link,
            output,
            save,
            data_dir,
        } => open(&studio, link, output.as_deref(), *save, data_dir.as_deref()),
    }
}

fn check(studio: &Studio, input: &str) -> Result<(), StudioError> {
    info!(input_path = input; "Checking diagram");

    let source = fs::read_to_string(input)?;
    let warnings = studio.check(&source)?;
    for warning in &warnings {
        warn!(line = warning.line(); "{warning}");
    }

    info!(warnings = warnings.len(); "Diagram is valid");
    Ok(())
}

fn render(
    studio: &Studio,
    input: &str,
    output: Option<&str>,
    title: Option<&str>,
) -> Result<(), StudioError> {
    info!(input_path = input; "Rendering diagram");

    let source = fs::read_to_string(input)?;
    let title = title.map_or_else(|| file_title(input), str::to_string);

    let engine = ProcessEngine::new(studio.config().render());
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    let markup = runtime.block_on(studio.render(&engine, &source))?;

    let size = intrinsic_size(&markup)?;
    let timestamp = Local::now().naive_local();
    let document = studio.export(&markup, &title, size, timestamp)?;

    let output = output.map_or_else(
        || export_filename(&title, timestamp, "svg"),
        str::to_string,
    );
    fs::write(&output, document.svg())?;

    let pixels = document.layout().pixel_size();
    info!(
        output_file = output,
        width = pixels.width(),
        height = pixels.height();
        "SVG exported successfully"
    );
    Ok(())
}

fn share(
    studio: &Studio,
    input: &str,
    title: Option<&str>,
    viewer: bool,
    base: Option<&str>,
) -> Result<(), StudioError> {
    let source = fs::read_to_string(input)?;
    let title = title.map_or_else(|| file_title(input), str::to_string);
    let view_mode = if viewer {
        ViewMode::Viewer
    } else {
        ViewMode::Editor
    };

    let token = studio.share(&source, &title, view_mode);
    match base {
        Some(base) => println!("{}", share_url(base, &token)),
        None => println!("{token}"),
    }
    Ok(())
}

fn open(
    studio: &Studio,
    link: &str,
    output: Option<&str>,
    save: bool,
    data_dir: Option<&str>,
) -> Result<(), StudioError> {
    let token = token_from_url(link)
        .filter(|token| decode_state(token).is_some())
        .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "not a valid share link"))?;

    let storage = match data_dir {
        Some(dir) => FileStorage::in_dir(dir),
        None => FileStorage::platform()?,
    };
    let mut session = Session::load(
        studio.config(),
        storage,
        MemoryLocation::with_fragment(token),
        SystemClock,
    );
    info!(title = session.title(), view_mode:% = session.view_mode(); "Opened shared diagram");

    match output {
        Some(path) => fs::write(path, session.source())?,
        None => println!("{}", session.source()),
    }

    if save {
        session.save()?;
        info!(path = session.storage().path().display().to_string(); "Session saved");
    }
    Ok(())
}

/// Title derived from the input file name.
fn file_title(input: &str) -> String {
    Path::new(input)
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default()
}

