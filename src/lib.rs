pub mod bridge;
pub mod cli;
pub mod config;
pub mod error;
pub mod handler;
pub mod report;
pub mod server;
pub mod service;

use std::io::Read;
use std::path::Path;
use std::process::ExitCode;

use clap::Parser;
use log::{error, info};

use crate::cli::{Cli, Command};
use crate::config::AppConfig;
use crate::error::AppError;
use crate::handler::{handle_event, GatewayEvent};
use crate::report::{redact_log_details, render_issues, render_users};
use crate::service::AppState;

pub fn run() -> ExitCode {
    let _ = env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or("info"),
    )
    .format_timestamp_millis()
    .try_init();

    let cli = Cli::parse();
    let state = AppState::new(AppConfig::load());

    let runtime = match tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(err) => {
            error!("Failed to start async runtime: {}", err);
            return ExitCode::FAILURE;
        }
    };

    match runtime.block_on(dispatch(state, cli.command)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{}", redact_log_details(&err.to_string()));
            ExitCode::FAILURE
        }
    }
}

async fn dispatch(state: AppState, command: Command) -> Result<(), AppError> {
    match command {
        Command::Serve { host, port } => {
            info!("Starting redmine-today server");
            server::serve(state, &host, port).await?;
        }
        Command::Today {
            user_id,
            project_id,
            json,
        } => {
            let user_id = user_id
                .or(state.config().default_target_user_id)
                .ok_or_else(|| {
                    AppError::BadRequest(
                        "pass --user-id or set DEFAULT_TARGET_USER_ID".to_string(),
                    )
                })?;
            let issues = state.todays_updates(user_id, project_id).await?;
            if json {
                println!("{}", to_pretty_json(&issues)?);
            } else {
                print!("{}", render_issues(user_id, &issues));
            }
        }
        Command::Users { json } => {
            let users = state.staff_profiles().await?;
            if json {
                println!("{}", to_pretty_json(&users)?);
            } else {
                print!("{}", render_users(&users));
            }
        }
        Command::Handle { event } => {
            let event = read_event(event.as_deref())?;
            let response = handle_event(&state, event).await;
            println!("{}", to_pretty_json(&response)?);
        }
    }
    Ok(())
}

fn read_event(path: Option<&Path>) -> Result<GatewayEvent, AppError> {
    let raw = match path {
        Some(path) => std::fs::read_to_string(path)?,
        None => {
            let mut buffer = String::new();
            std::io::stdin().read_to_string(&mut buffer)?;
            buffer
        }
    };
    parse_event(&raw)
}

fn parse_event(raw: &str) -> Result<GatewayEvent, AppError> {
    if raw.trim().is_empty() {
        return Ok(GatewayEvent::default());
    }
    serde_json::from_str(raw).map_err(|err| AppError::BadRequest(format!("invalid event JSON: {}", err)))
}

fn to_pretty_json<T: serde::Serialize>(value: &T) -> Result<String, AppError> {
    serde_json::to_string_pretty(value).map_err(|err| AppError::Redmine(err.into()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn blank_event_input_is_an_empty_event() {
        let event = parse_event("  \n").expect("event");
        assert!(event.raw_path.is_none());
        assert!(event.query_string_parameters.is_none());
    }

    #[test]
    fn malformed_event_is_rejected() {
        assert!(matches!(parse_event("{nope"), Err(AppError::BadRequest(_))));
    }

    #[test]
    fn reads_event_from_file() {
        let path = std::env::temp_dir().join(format!("redmine-today-event-{}.json", std::process::id()));
        let mut file = std::fs::File::create(&path).expect("create");
        file.write_all(br#"{"rawPath": "/users"}"#).expect("write");
        drop(file);

        let event = read_event(Some(&path)).expect("event");
        let _ = std::fs::remove_file(&path);
        assert_eq!(event.raw_path.as_deref(), Some("/users"));
    }

    #[tokio::test]
    async fn today_without_any_user_id_fails() {
        let state = AppState::new(AppConfig::default());
        let command = Command::Today {
            user_id: None,
            project_id: None,
            json: false,
        };
        let err = dispatch(state, command).await.unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
    }
}
