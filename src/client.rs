use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::warn;

use simple_cache::cache::Client;

#[derive(Parser, Debug)]
#[command(author, version, about = "Client for the simple-cache server")]
struct Args {
    /// Server address.
    #[arg(long, default_value = "localhost:12345")]
    addr: String,

    /// Send a single command built from the remaining arguments and exit.
    #[arg(short = 'c')]
    oneshot: bool,

    /// Command words used with -c.
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    command: Vec<String>,
}

fn init_tracing() {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    init_tracing();

    let args = Args::parse();
    if args.oneshot {
        if args.command.is_empty() {
            eprintln!("usage: simple-cache-client -c <COMMAND>");
            return Ok(ExitCode::from(2));
        }
        send_once(&args.addr, &args.command.join(" ")).await?;
        return Ok(ExitCode::SUCCESS);
    }

    let client = Client::connect(&args.addr)
        .await
        .with_context(|| format!("failed to connect to {}", args.addr))?;
    run_interactive(&client).await?;
    if let Err(err) = client.close().await {
        warn!(error = %err, "failed to close connection cleanly");
    }

    Ok(ExitCode::SUCCESS)
}

async fn send_once(addr: &str, command: &str) -> Result<()> {
    let client = Client::connect(addr)
        .await
        .with_context(|| format!("failed to connect to {addr}"))?;
    let reply = client
        .do_command(command)
        .await
        .with_context(|| format!("command '{command}' failed"))?;
    println!("{reply}");
    let _ = client.close().await;
    Ok(())
}

async fn run_interactive(client: &Client) -> Result<()> {
    let mut stdin = BufReader::new(tokio::io::stdin());
    let mut stdout = tokio::io::stdout();
    let mut input = String::new();

    loop {
        stdout.write_all(b"> ").await?;
        stdout.flush().await?;

        input.clear();
        if stdin.read_line(&mut input).await? == 0 {
            break;
        }

        let text = input.trim();
        if text.is_empty() {
            continue;
        }

        let reply = match client.do_command(text).await {
            Ok(reply) => reply,
            Err(err) => {
                warn!(error = %err, "command failed");
                break;
            }
        };
        stdout.write_all(reply.as_bytes()).await?;
        stdout.write_all(b"\n").await?;
        stdout.flush().await?;

        if text.eq_ignore_ascii_case("QUIT") {
            break;
        }
    }

    Ok(())
}
