//! cinema-expert console entry point.

use anyhow::Result;
use clap::Parser;
use std::io::Write;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use cinema_expert::agent::{Agent, AgentError};
use cinema_expert::assistant::build_agent;
use cinema_expert::cli::{is_exit_command, Cli, Output};
use cinema_expert::config::load_settings;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::registry()
        .with(EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| format!("cinema_expert={}", cli.log_level())),
        ))
        .with(tracing_subscriber::fmt::layer().with_target(false).with_writer(std::io::stderr))
        .init();

    Output::starting();

    let agent = match load_settings(cli.config.as_deref())
        .map_err(AgentError::from)
        .and_then(|settings| build_agent(&settings))
    {
        Ok(agent) => agent,
        Err(error) => {
            Output::init_error(&error.to_string());
            return Ok(());
        }
    };

    Output::ready();
    run_repl(&agent, cli.verbose > 0).await
}

async fn run_repl(agent: &Agent, verbose: bool) -> Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        print!("{}", Output::prompt());
        std::io::stdout().flush()?;

        let line = tokio::select! {
            line = lines.next_line() => line?,
            _ = tokio::signal::ctrl_c() => None,
        };
        let Some(input) = line else {
            Output::farewell();
            return Ok(());
        };

        if is_exit_command(&input) {
            Output::farewell();
            return Ok(());
        }
        if input.trim().is_empty() {
            continue;
        }

        let spinner = Output::spinner("Обрабатываю запрос...");
        let reply = tokio::select! {
            reply = agent.run(input.trim()) => reply,
            _ = tokio::signal::ctrl_c() => {
                spinner.finish_and_clear();
                Output::farewell();
                return Ok(());
            }
        };
        spinner.finish_and_clear();

        match reply {
            Ok(reply) => {
                let text = if reply.text.trim().is_empty() {
                    "Нет ответа"
                } else {
                    reply.text.as_str()
                };
                if verbose {
                    Output::steps(&reply.steps);
                    Output::raw_reply(text);
                } else {
                    Output::reply(text);
                }
            }
            Err(error) => Output::error(&error.to_string()),
        }
    }
}
