use std::{path::PathBuf, sync::Arc};

use anyhow::{Context, Result};
use clap::Parser;
use client_core::{
    HttpGateway, Notice, NoticeLevel, Operation, Report, Session, SessionField, Workflow,
};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

mod clipboard;
mod commands;
mod config;

use clipboard::ArboardClipboard;
use commands::{ConsoleCommand, HELP};
use config::{load_settings, Settings};

#[derive(Parser, Debug)]
#[command(about = "Terminal front end for a remote RSA gateway")]
struct Args {
    /// Base URL of the RSA gateway, e.g. http://localhost:5000
    #[arg(long)]
    gateway_url: Option<String>,
    /// Directory that `export` writes firewall_logs.txt into
    #[arg(long)]
    export_dir: Option<PathBuf>,
    /// Config file to load instead of ./rsa_console.toml
    #[arg(long)]
    config: Option<PathBuf>,
}

type ConsoleWorkflow = Arc<Workflow<HttpGateway>>;

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let mut settings = load_settings(args.config.as_deref())?;
    if let Some(url) = args.gateway_url {
        settings.gateway_url = url;
    }
    if let Some(dir) = args.export_dir {
        settings.export_dir = dir;
    }

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&settings.log_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let gateway = match settings.request_timeout() {
        Some(timeout) => HttpGateway::with_timeout(&settings.gateway_url, timeout),
        None => HttpGateway::new(&settings.gateway_url),
    }
    .context("failed to configure RSA gateway client")?;
    info!(gateway_url = gateway.base_url(), "rsa console ready");

    let workflow: ConsoleWorkflow = Arc::new(Workflow::new(gateway));
    let starter = Arc::clone(&workflow);
    tokio::spawn(async move {
        print_report(&starter.start().await);
    });

    println!("RSA console using gateway {}. Type 'help' for commands.", settings.gateway_url);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines
        .next_line()
        .await
        .context("failed to read console input")?
    {
        match ConsoleCommand::parse(&line) {
            Ok(None) => {}
            Ok(Some(ConsoleCommand::Quit)) => break,
            Ok(Some(command)) => handle_command(&workflow, &settings, command).await,
            Err(err) => println!("error: {err}"),
        }
    }

    info!("rsa console closed");
    Ok(())
}

async fn handle_command(workflow: &ConsoleWorkflow, settings: &Settings, command: ConsoleCommand) {
    match command {
        ConsoleCommand::Generate => spawn_operation(workflow, Operation::GenerateKeys),
        ConsoleCommand::Encrypt => spawn_operation(workflow, Operation::Encrypt),
        ConsoleCommand::Decrypt => spawn_operation(workflow, Operation::Decrypt),
        ConsoleCommand::SetMessage(text) => workflow.set_message(text).await,
        ConsoleCommand::SetCiphertext(text) => workflow.set_encrypted_input(text).await,
        ConsoleCommand::SetPublicKey(key) => workflow.set_public_key(key).await,
        ConsoleCommand::SetPrivateKey(key) => workflow.set_private_key(key).await,
        ConsoleCommand::Copy(field) => {
            print_notice(&workflow.copy(field, &mut ArboardClipboard).await);
        }
        ConsoleCommand::Export(dir) => {
            let dir = dir.unwrap_or_else(|| settings.export_dir.clone());
            match workflow.export_logs().await.write_to(&dir) {
                Ok(path) => println!("Logs exported to {}", path.display()),
                Err(err) => {
                    warn!(dir = %dir.display(), error = %err, "log export failed");
                    println!("error: failed to export logs: {err}");
                }
            }
        }
        ConsoleCommand::Show => print_session(&workflow.session().await),
        ConsoleCommand::Logs => {
            let entries = workflow.log_snapshot().await;
            if entries.is_empty() {
                println!("(no events)");
            }
            for entry in entries {
                println!("{entry}");
            }
        }
        ConsoleCommand::Status => {
            println!("firewall status: {}", workflow.authorization_status().await);
        }
        ConsoleCommand::Help => println!("{HELP}"),
        ConsoleCommand::Quit => {}
    }
}

/// Runs a gateway operation as its own task so the prompt stays responsive.
fn spawn_operation(workflow: &ConsoleWorkflow, operation: Operation) {
    let workflow = Arc::clone(workflow);
    tokio::spawn(async move {
        let report = match operation {
            Operation::GenerateKeys => workflow.generate_keys().await,
            Operation::Encrypt => workflow.encrypt().await,
            Operation::Decrypt => workflow.decrypt().await,
        };
        print_report(&report);
    });
}

fn print_report(report: &Report) {
    print_notice(&report.notice());
}

fn print_notice(notice: &Notice) {
    let tag = match notice.level {
        NoticeLevel::Success => "ok",
        NoticeLevel::Error => "error",
        NoticeLevel::Info => "info",
    };
    println!("[{tag}] {}", notice.text);
}

fn print_session(session: &Session) {
    for field in SessionField::ALL {
        println!("{:<12} {}", field.label(), session.field(field));
    }
    println!("{:<12} {}", "status", session.authorization_status());
}
