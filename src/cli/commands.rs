//! Command execution
//!
//! Wires the orchestration core to the terminal: each operation command
//! builds the canonical command text, prints it (the editable surface),
//! then runs preview or process against a sandbox engine and saves the
//! returned artifact, the CLI's stand-in for the browser download.

use std::path::Path;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use tracing::warn;

use crate::cli::args::{
    CompressArgs, CropArgs, EngineAction, EngineArgs, MixArgs, TrimArgs,
};
use crate::command::{CommandState, Crf, Operation, OperationKind, Preset};
use crate::config::{ConfigStore, EngineSource, DEFAULT_REMOTE_BASE_URL};
use crate::engine::{EngineHandle, SandboxEngine};
use crate::error::ClipdeckError;
use crate::orchestrator::Orchestrator;
use crate::session::{FileId, FileStatus, SessionStore, SourceFile};
use crate::utils::time;

/// Execute the crop command
pub async fn execute_crop(args: CropArgs) -> Result<()> {
    let op = Operation::Crop {
        width: args.width,
        height: args.height,
        x_offset: args.x_offset,
        y_offset: args.y_offset,
    };
    run_single_file(
        &args.input,
        op,
        args.preview,
        args.output,
        args.command,
        args.dry_run,
    )
    .await
}

/// Execute the trim command
pub async fn execute_trim(args: TrimArgs) -> Result<()> {
    // The core passes trim points through untouched; check the format here
    time::parse_hms(&args.start).with_context(|| format!("Invalid start time: {}", args.start))?;
    time::parse_hms(&args.end).with_context(|| format!("Invalid end time: {}", args.end))?;

    let op = Operation::Trim {
        start: args.start,
        end: args.end,
    };
    run_single_file(
        &args.input,
        op,
        args.preview,
        args.output,
        args.command,
        args.dry_run,
    )
    .await
}

/// Execute the compress command
pub async fn execute_compress(args: CompressArgs) -> Result<()> {
    let op = Operation::Compress {
        crf: Crf::new(args.crf)?,
        preset: args.preset.parse::<Preset>()?,
    };
    run_single_file(
        &args.input,
        op,
        args.preview,
        args.output,
        args.command,
        args.dry_run,
    )
    .await
}

/// Execute the mix command
pub async fn execute_mix(args: MixArgs) -> Result<()> {
    let mut orchestrator = new_orchestrator()?;
    if !args.dry_run {
        let source = ConfigStore::from_env().load()?;
        orchestrator.load_engine(&source).await?;
    }

    // Intake one path at a time so drop order matches the order given
    let mut ids = Vec::new();
    for path in &args.input {
        let file = read_source(path).await?;
        ids.extend(orchestrator.intake(vec![file]).await);
    }
    report_failed_proxies(orchestrator.session());

    let usable: Vec<FileId> = ids
        .into_iter()
        .filter(|id| {
            matches!(
                orchestrator.session().get(*id).map(|f| f.status()),
                Some(FileStatus::Processing | FileStatus::Ready)
            )
        })
        .collect();

    let op = Operation::Mix {
        ordered_file_ids: usable,
    };
    let mut state = CommandState::new();
    state.regenerate(&op);
    if let Some(command) = args.command {
        state.set_override(command);
    }
    println!("{}", state.text());

    if args.dry_run {
        return Ok(());
    }
    if state.is_empty() {
        bail!("mix needs at least 2 usable input files");
    }
    run_and_save(
        &mut orchestrator,
        &state,
        OperationKind::Mix,
        args.preview,
        args.output,
    )
    .await
}

/// Execute the engine command
pub fn execute_engine(args: EngineArgs) -> Result<()> {
    let store = ConfigStore::from_env();
    match args.action {
        EngineAction::Show { json } => {
            let source = store.load()?;
            if json {
                println!("{}", serde_json::to_string_pretty(&source)?);
            } else {
                match &source {
                    EngineSource::Remote { base_url } => {
                        println!("engine source: remote ({})", base_url)
                    }
                    EngineSource::Local { path } => println!("engine source: local ({})", path),
                }
            }
        }
        EngineAction::UseRemote { base_url } => {
            let source = EngineSource::Remote {
                base_url: base_url.unwrap_or_else(|| DEFAULT_REMOTE_BASE_URL.to_string()),
            };
            store.save(&source)?;
            println!("Engine source set to remote; takes effect on the next run");
        }
        EngineAction::UseLocal { path } => {
            store.save(&EngineSource::Local { path })?;
            println!("Engine source set to local; takes effect on the next run");
        }
    }
    Ok(())
}

/// Shared flow for the single-file operations
async fn run_single_file(
    input: &str,
    op: Operation,
    preview: bool,
    output: Option<String>,
    command_override: Option<String>,
    dry_run: bool,
) -> Result<()> {
    let kind = op.kind();
    let mut state = CommandState::new();
    state.regenerate(&op);
    if let Some(command) = command_override {
        state.set_override(command);
    }
    println!("{}", state.text());

    if dry_run {
        return Ok(());
    }

    let mut orchestrator = new_orchestrator()?;
    let source = ConfigStore::from_env().load()?;
    orchestrator.load_engine(&source).await?;

    let file = read_source(input).await?;
    orchestrator.intake(vec![file]).await;
    report_failed_proxies(orchestrator.session());

    run_and_save(&mut orchestrator, &state, kind, preview, output).await
}

async fn run_and_save(
    orchestrator: &mut Orchestrator,
    state: &CommandState,
    kind: OperationKind,
    preview: bool,
    output: Option<String>,
) -> Result<()> {
    if preview {
        match orchestrator.preview(state.text(), kind).await {
            Ok(artifact) => {
                let path = output.unwrap_or_else(|| "preview.mp4".to_string());
                std::fs::write(&path, &artifact.bytes)
                    .with_context(|| format!("Failed to write preview to {}", path))?;
                println!("Preview written to {}", path);
                Ok(())
            }
            Err(ClipdeckError::EmptyCommand) => {
                println!("Nothing to run");
                Ok(())
            }
            Err(e) => Err(e.into()),
        }
    } else {
        match orchestrator.process(state.text(), kind).await {
            Ok(artifact) => {
                let path = output.unwrap_or_else(|| artifact.file_name.clone());
                std::fs::write(&path, &artifact.bytes)
                    .with_context(|| format!("Failed to write output to {}", path))?;
                println!("Output written to {}", path);
                Ok(())
            }
            Err(ClipdeckError::EmptyCommand) => {
                println!("Nothing to run");
                Ok(())
            }
            Err(e) => Err(e.into()),
        }
    }
}

fn new_orchestrator() -> Result<Orchestrator> {
    let engine = SandboxEngine::new()?;
    Ok(Orchestrator::new(EngineHandle::new(Arc::new(engine))))
}

async fn read_source(path: &str) -> Result<SourceFile> {
    let bytes = tokio::fs::read(path)
        .await
        .with_context(|| format!("Failed to read input file {}", path))?;
    let name = Path::new(path)
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| path.to_string());
    Ok(SourceFile::new(name, "video/mp4", bytes))
}

fn report_failed_proxies(session: &SessionStore) {
    for file in session.files() {
        if file.status() == FileStatus::Error {
            warn!(file = file.name(), "proxy generation failed for this file");
        }
    }
}
