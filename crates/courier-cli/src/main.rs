//! Courier REPL - thin presentation layer over the chat use case.
//!
//! Renders timeline events and forwards user input; all orchestration
//! lives in `courier-application`.

use anyhow::Result;
use clap::Parser;
use courier_application::ChatUseCase;
use courier_core::backend::ChatBackend;
use courier_core::session::{ChatEvent, MessageRole};
use courier_interaction::{BackendConfig, HttpBackend};
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use std::path::Path;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "courier")]
#[command(about = "Courier - chat assistant client", long_about = None)]
struct Cli {
    /// Backend base URL (overrides COURIER_BACKEND_URL)
    #[arg(long)]
    backend_url: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    let cli = Cli::parse();
    let config = match cli.backend_url {
        Some(url) => BackendConfig::new(url),
        None => BackendConfig::from_env(),
    };
    let backend = Arc::new(HttpBackend::new(config)?);

    // Startup probe; a failure is worth a warning but never fatal.
    if let Err(err) = backend.health().await {
        eprintln!("warning: backend health check failed: {err}");
    }

    let (events_tx, mut events_rx) = mpsc::unbounded_channel();
    let usecase = Arc::new(ChatUseCase::new(backend.clone(), backend.clone()).with_events(events_tx));

    tokio::spawn(async move {
        while let Some(event) = events_rx.recv().await {
            render_event(event);
        }
    });

    println!("Courier ready. Type a message, /new, /files, /upload <path>, /rm <name>, or exit.");
    let mut editor = DefaultEditor::new()?;

    loop {
        let line = tokio::task::block_in_place(|| editor.readline("You: "));
        let line = match line {
            Ok(line) => line,
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => break,
            Err(err) => return Err(err.into()),
        };

        let input = line.trim();
        if input.is_empty() {
            continue;
        }
        let _ = editor.add_history_entry(input);

        if input.eq_ignore_ascii_case("exit") {
            println!("Goodbye!");
            break;
        }

        if let Some(command) = input.strip_prefix('/') {
            handle_command(&usecase, command).await;
            continue;
        }

        usecase.send(input).await;
        // Give the event task a chance to flush before the next prompt.
        tokio::task::yield_now().await;
    }

    Ok(())
}

async fn handle_command(usecase: &Arc<ChatUseCase>, command: &str) {
    let (name, rest) = match command.split_once(' ') {
        Some((name, rest)) => (name, rest.trim()),
        None => (command, ""),
    };

    match name {
        "new" => {
            usecase.start_session().await;
        }
        "files" => {
            let records = usecase.attachments().await;
            if records.is_empty() {
                println!("No files attached.");
                return;
            }
            for record in records {
                if record.size_bytes == 0 {
                    println!("  {} ({})", record.name, record.provenance.as_str());
                } else {
                    println!(
                        "  {} ({}, {} bytes)",
                        record.name,
                        record.provenance.as_str(),
                        record.size_bytes
                    );
                }
            }
        }
        "upload" => {
            if rest.is_empty() {
                println!("usage: /upload <path>");
                return;
            }
            upload(usecase, rest).await;
        }
        "rm" => {
            if rest.is_empty() {
                println!("usage: /rm <name>");
                return;
            }
            let records = usecase.attachments().await;
            match records.iter().find(|r| r.name == rest) {
                Some(record) => {
                    usecase.remove_file(&record.name, record.provenance).await;
                    println!("Removed {}.", record.name);
                }
                None => println!("No attached file named '{rest}'."),
            }
        }
        _ => println!("Unknown command: /{name}"),
    }
}

async fn upload(usecase: &Arc<ChatUseCase>, path: &str) {
    let filename = match Path::new(path).file_name().and_then(|n| n.to_str()) {
        Some(name) => name.to_string(),
        None => {
            println!("Not a file path: {path}");
            return;
        }
    };

    let bytes = match tokio::fs::read(path).await {
        Ok(bytes) => bytes,
        Err(err) => {
            println!("Could not read {path}: {err}");
            return;
        }
    };

    match usecase.upload_file(&filename, bytes).await {
        Ok(()) => println!("Uploaded {filename}."),
        Err(err) => println!("Upload failed: {err}"),
    }
}

fn render_event(event: ChatEvent) {
    match event {
        ChatEvent::PendingStarted => println!("..."),
        ChatEvent::PendingFinished => {}
        ChatEvent::MessageAppended { message } => match message.role {
            MessageRole::User => {
                if message.has_attachments {
                    println!("(attachments included with this message)");
                }
            }
            MessageRole::Assistant => {
                if message.email_mode {
                    println!("[Email Mode Activated]");
                }
                println!("\nBot: {}\n", message.content);
            }
        },
        ChatEvent::SessionReset { session_id } => {
            println!("Started a new session ({session_id}).");
        }
        ChatEvent::AttachmentsChanged { count } => {
            tracing::debug!(target: "cli", count, "attachments changed");
        }
    }
}
