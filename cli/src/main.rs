use std::{env, path::PathBuf};

use anyhow::{Context, Result, anyhow, bail};
use serde::{Deserialize, Serialize};
use tokio::{
    io::{AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader},
    net::UnixStream,
};

const PLATFORMS: [&str; 3] = ["Instagram", "LinkedIn", "Twitter"];

const SAMPLE_INPUTS: [(&str, &str); 3] = [
    ("Morning coffee and productivity", "Instagram"),
    ("Exciting career opportunities", "LinkedIn"),
    ("Breaking news in tech", "Twitter"),
];

const USAGE: &str = "usage: postcraft-cli --socket-path <path> [--platform <name>]";

#[derive(Debug, Clone, PartialEq, Eq)]
struct CliOptions {
    socket_path: PathBuf,
    platform: &'static str,
}

fn cli_options_from_args() -> Result<CliOptions> {
    parse_cli_options(env::args().skip(1))
}

fn parse_cli_options<I>(mut args: I) -> Result<CliOptions>
where
    I: Iterator<Item = String>,
{
    let mut socket_path = None;
    let mut platform = PLATFORMS[0];

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--socket-path" => {
                let value = args
                    .next()
                    .ok_or_else(|| anyhow!("missing value for --socket-path"))?;
                socket_path = Some(PathBuf::from(value));
            }
            "--platform" => {
                let value = args
                    .next()
                    .ok_or_else(|| anyhow!("missing value for --platform"))?;
                platform = parse_platform(&value)?;
            }
            other => {
                return Err(anyhow!("unknown argument: {other}. {USAGE}"));
            }
        }
    }

    let socket_path =
        socket_path.ok_or_else(|| anyhow!("missing required argument --socket-path. {USAGE}"))?;

    Ok(CliOptions {
        socket_path,
        platform,
    })
}

fn parse_platform(raw: &str) -> Result<&'static str> {
    let raw = raw.trim();
    PLATFORMS
        .into_iter()
        .find(|platform| platform.eq_ignore_ascii_case(raw))
        .ok_or_else(|| {
            anyhow!(
                "unknown platform '{raw}', expected one of: {}",
                PLATFORMS.join(", ")
            )
        })
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Command {
    Generate(String),
    SetPlatform(&'static str),
    Clear,
    Copy,
    ListExamples,
    Example(usize),
    Quit,
}

fn parse_command(line: &str) -> Result<Command> {
    let line = line.trim();
    let Some(rest) = line.strip_prefix(':') else {
        return Ok(Command::Generate(line.to_string()));
    };

    let (name, argument) = match rest.split_once(char::is_whitespace) {
        Some((name, argument)) => (name, argument.trim()),
        None => (rest, ""),
    };

    match (name, argument) {
        ("platform", "") => bail!("usage: :platform <{}>", PLATFORMS.join("|")),
        ("platform", value) => Ok(Command::SetPlatform(parse_platform(value)?)),
        ("clear", "") => Ok(Command::Clear),
        ("copy", "") => Ok(Command::Copy),
        ("examples", "") => Ok(Command::ListExamples),
        ("example", value) => {
            let index = value
                .parse::<usize>()
                .ok()
                .filter(|index| (1..=SAMPLE_INPUTS.len()).contains(index))
                .ok_or_else(|| anyhow!("usage: :example <1-{}>", SAMPLE_INPUTS.len()))?;
            Ok(Command::Example(index))
        }
        ("quit", "") => Ok(Command::Quit),
        _ => bail!("unknown command '{line}'"),
    }
}

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ClientMessage<'a> {
    Generate {
        topic: &'a str,
        platform: &'a str,
    },
    Clear,
    Copy {
        caption: &'a str,
        emojis: &'a str,
        hashtags: &'a str,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ServerMessage {
    Post {
        state: String,
        caption: String,
        emojis: String,
        hashtags: String,
    },
    Cleared {},
    Copied {
        status: String,
    },
    Error {
        message: String,
    },
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct DisplayedPost {
    caption: String,
    emojis: String,
    hashtags: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    let options = cli_options_from_args()?;
    let stream = UnixStream::connect(&options.socket_path)
        .await
        .with_context(|| {
            format!(
                "failed to connect to postcraft socket {}",
                options.socket_path.display()
            )
        })?;

    let (read_half, mut write_half) = stream.into_split();
    let mut socket_lines = BufReader::new(read_half).lines();
    let mut stdin_lines = BufReader::new(tokio::io::stdin()).lines();

    let mut platform = options.platform;
    let mut displayed = DisplayedPost::default();

    eprintln!(
        "postcraft-cli connected: socket={} platform={platform}",
        options.socket_path.display()
    );
    eprintln!("type a topic, or :platform <name>, :clear, :copy, :examples, :example <n>, :quit");

    while let Some(line) = stdin_lines.next_line().await? {
        let command = match parse_command(&line) {
            Ok(command) => command,
            Err(err) => {
                eprintln!("[warn] {err}");
                continue;
            }
        };

        let message = match &command {
            Command::Generate(topic) => ClientMessage::Generate {
                topic,
                platform,
            },
            Command::Example(index) => {
                let (topic, sample_platform) = SAMPLE_INPUTS[index - 1];
                platform = sample_platform;
                println!("> {topic} [{platform}]");
                ClientMessage::Generate {
                    topic,
                    platform,
                }
            }
            Command::SetPlatform(next) => {
                platform = *next;
                eprintln!("platform: {platform}");
                continue;
            }
            Command::Clear => ClientMessage::Clear,
            Command::Copy => ClientMessage::Copy {
                caption: &displayed.caption,
                emojis: &displayed.emojis,
                hashtags: &displayed.hashtags,
            },
            Command::ListExamples => {
                print!("{}", render_examples());
                continue;
            }
            Command::Quit => break,
        };

        send_message(&mut write_half, &message).await?;
        let reply_line = socket_lines
            .next_line()
            .await?
            .ok_or_else(|| anyhow!("postcraft closed the connection"))?;
        let reply: ServerMessage =
            serde_json::from_str(reply_line.trim()).context("failed to decode NDJSON reply")?;

        if let Some(next) = apply_reply(&reply) {
            displayed = next;
        }
        print!("{}", render_reply(&reply));
    }

    Ok(())
}

async fn send_message<W>(writer: &mut W, message: &ClientMessage<'_>) -> Result<()>
where
    W: AsyncWrite + Unpin,
{
    let encoded = serde_json::to_string(message)?;
    writer.write_all(encoded.as_bytes()).await?;
    writer.write_all(b"\n").await?;
    writer.flush().await?;
    Ok(())
}

/// Returns the post the screen shows after this reply, if the reply changes it.
fn apply_reply(reply: &ServerMessage) -> Option<DisplayedPost> {
    match reply {
        ServerMessage::Post {
            caption,
            emojis,
            hashtags,
            ..
        } => Some(DisplayedPost {
            caption: caption.clone(),
            emojis: emojis.clone(),
            hashtags: hashtags.clone(),
        }),
        ServerMessage::Cleared {} => Some(DisplayedPost::default()),
        ServerMessage::Copied { .. } | ServerMessage::Error { .. } => None,
    }
}

fn render_reply(reply: &ServerMessage) -> String {
    match reply {
        ServerMessage::Post {
            state,
            caption,
            emojis,
            hashtags,
        } => {
            let mut out = String::new();
            if state != "complete" {
                out.push_str(&format!("[{state}] "));
            }
            out.push_str(caption);
            out.push('\n');
            for field in [emojis, hashtags] {
                if !field.is_empty() {
                    out.push('\n');
                    out.push_str(field);
                    out.push('\n');
                }
            }
            out
        }
        ServerMessage::Cleared {} => "(cleared)\n".to_string(),
        ServerMessage::Copied { status } => format!("{status}\n"),
        ServerMessage::Error { message } => format!("[error] {message}\n"),
    }
}

fn render_examples() -> String {
    SAMPLE_INPUTS
        .iter()
        .enumerate()
        .map(|(index, (topic, platform))| format!("{}. {topic} [{platform}]\n", index + 1))
        .collect()
}
