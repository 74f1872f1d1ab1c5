use std::{fs, io::ErrorKind, os::unix::fs::FileTypeExt, path::Path, sync::Arc};

use anyhow::{Context, Result, bail};
use tokio::{
    io::{AsyncBufReadExt, AsyncWriteExt, BufReader},
    net::{UnixListener, UnixStream},
    signal::unix::{SignalKind, signal},
    sync::mpsc,
};

use crate::{
    clipboard::{COPIED_STATUS, ClipboardPort},
    config::ServerConfig,
    post::{PostGenerator, PostRequest},
    protocol::{ClientMessage, ServerMessage, encode_server_message, parse_client_message},
};

enum ExitReason {
    SocketMessage,
    Signal(&'static str),
}

/// Shared per-process state handed to every client task.
#[derive(Clone)]
pub struct ServiceContext {
    pub generator: Arc<PostGenerator>,
    pub clipboard: Arc<dyn ClipboardPort>,
}

pub async fn run(config: &ServerConfig, context: ServiceContext) -> Result<()> {
    prepare_socket_path(&config.socket_path)?;
    let listener = UnixListener::bind(&config.socket_path)
        .with_context(|| format!("unable to bind socket {}", config.socket_path.display()))?;

    let mut sigint =
        signal(SignalKind::interrupt()).context("unable to listen for SIGINT (Ctrl+C)")?;
    let mut sigterm = signal(SignalKind::terminate()).context("unable to listen for SIGTERM")?;
    let (exit_tx, mut exit_rx) = mpsc::unbounded_channel::<()>();

    eprintln!(
        "postcraft listening on unix socket (NDJSON): {}",
        config.socket_path.display()
    );
    tracing::info!(
        target: "server",
        socket_path = %config.socket_path.display(),
        "server_listening"
    );

    let exit_reason = loop {
        tokio::select! {
            _ = sigint.recv() => break ExitReason::Signal("SIGINT"),
            _ = sigterm.recv() => break ExitReason::Signal("SIGTERM"),
            Some(()) = exit_rx.recv() => break ExitReason::SocketMessage,
            accept_result = listener.accept() => {
                match accept_result {
                    Ok((stream, _)) => {
                        let sender = exit_tx.clone();
                        let context = context.clone();
                        tokio::spawn(async move {
                            if let Err(err) = handle_client(stream, context, sender).await {
                                tracing::warn!(
                                    target: "server",
                                    error = %format!("{err:#}"),
                                    "client_handling_failed"
                                );
                            }
                        });
                    }
                    Err(err) => {
                        tracing::warn!(target: "server", error = %err, "accept_failed");
                    }
                }
            }
        }
    };

    cleanup_socket_path(&config.socket_path)?;
    match exit_reason {
        ExitReason::SocketMessage => eprintln!("postcraft stopped: received exit message"),
        ExitReason::Signal(signal_name) => eprintln!("postcraft stopped: received {signal_name}"),
    }
    tracing::info!(target: "server", "server_stopped");

    Ok(())
}

async fn handle_client(
    stream: UnixStream,
    context: ServiceContext,
    exit_tx: mpsc::UnboundedSender<()>,
) -> Result<()> {
    let (reader, mut writer) = stream.into_split();
    let mut lines = BufReader::new(reader).lines();

    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let reply = match parse_client_message(line) {
            Ok(ClientMessage::Exit) => {
                let _ = exit_tx.send(());
                break;
            }
            Ok(message) => handle_message(message, &context).await,
            Err(err) => {
                tracing::warn!(target: "server", error = %err, "invalid_protocol_message");
                Some(ServerMessage::Error {
                    message: err.to_string(),
                })
            }
        };

        if let Some(reply) = reply {
            let mut encoded =
                encode_server_message(&reply).context("failed to encode server message")?;
            encoded.push('\n');
            writer
                .write_all(encoded.as_bytes())
                .await
                .context("failed to write server message")?;
        }
    }

    Ok(())
}

/// Produces the reply for one client message. `Exit` has no reply.
pub async fn handle_message(
    message: ClientMessage,
    context: &ServiceContext,
) -> Option<ServerMessage> {
    match message {
        ClientMessage::Generate { topic, platform } => {
            let outcome = context
                .generator
                .generate(&PostRequest::new(topic, platform))
                .await;
            Some(ServerMessage::post(outcome.state, outcome.post))
        }
        ClientMessage::Clear => Some(ServerMessage::cleared()),
        ClientMessage::Copy(post) => match context.clipboard.set_text(&post.to_clipboard_text()) {
            Ok(()) => Some(ServerMessage::Copied {
                status: COPIED_STATUS.to_string(),
            }),
            Err(err) => {
                tracing::warn!(target: "server", error = %err, "clipboard_write_failed");
                Some(ServerMessage::Error {
                    message: err.to_string(),
                })
            }
        },
        ClientMessage::Exit => None,
    }
}

fn prepare_socket_path(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("unable to create {}", parent.display()))?;
    }

    match fs::symlink_metadata(path) {
        Ok(metadata) => {
            if metadata.file_type().is_socket() || metadata.is_file() {
                fs::remove_file(path)
                    .with_context(|| format!("unable to remove stale socket {}", path.display()))?;
            } else {
                bail!(
                    "socket path exists but is not removable as file/socket: {}",
                    path.display()
                );
            }
        }
        Err(err) if err.kind() == ErrorKind::NotFound => {}
        Err(err) => {
            return Err(err).with_context(|| format!("unable to inspect {}", path.display()));
        }
    }

    Ok(())
}

fn cleanup_socket_path(path: &Path) -> Result<()> {
    match fs::remove_file(path) {
        Ok(_) => Ok(()),
        Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
        Err(err) => Err(err).with_context(|| format!("unable to remove {}", path.display())),
    }
}
