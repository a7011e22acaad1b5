use std::{future::Future, path::PathBuf, time::Instant};

use anyhow::{Context, anyhow};
use clap::{Args, Parser, Subcommand};
use thermo_core::{
    Config, Overrides,
    client::{
        BANNER_LIFETIME, Controller, EXAMPLE_PROMPTS, HttpRelayClient, REFRESH_INTERVAL,
        example_by_label,
    },
};
use tokio::time::{self, MissedTickBehavior};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "thermo", version, about = "Temperature assistant relay and client")]
pub struct Cli {
    #[command(flatten)]
    pub overrides: OverrideArgs,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Args)]
pub struct OverrideArgs {
    /// Port the relay listens on.
    #[arg(long, global = true)]
    pub port: Option<u16>,

    /// Base URL of the upstream temperature/LLM service.
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    /// Directory of UI assets served by the relay.
    #[arg(long, global = true)]
    pub static_dir: Option<PathBuf>,

    /// Relay used by the client commands.
    #[arg(long, global = true)]
    pub relay_url: Option<String>,
}

impl From<OverrideArgs> for Overrides {
    fn from(args: OverrideArgs) -> Self {
        Overrides {
            port: args.port,
            api_url: args.api_url,
            static_dir: args.static_dir,
            relay_url: args.relay_url,
        }
    }
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run the relay server.
    Serve,

    /// Fetch the current temperature once.
    Temperature,

    /// Keep the temperature display refreshed until Ctrl+C.
    Watch,

    /// Ask the assistant a question. Prompts when no question is given.
    Ask {
        question: Option<String>,
    },

    /// Ask one of the preset questions.
    Example {
        /// Preset label, e.g. "comfort". Lists presets when omitted.
        label: Option<String>,
    },
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        let config = Config::load()?.apply(self.overrides.into());

        match self.command {
            Command::Serve => {
                thermo_core::serve(&config)
                    .await
                    .context("Relay server stopped with an error")?;
            }
            Command::Temperature => {
                let mut controller = controller(&config);
                controller.fetch_temperature().await;
                print!("{}", controller.state());
            }
            Command::Watch => watch(&config).await?,
            Command::Ask { question } => {
                let question = match question {
                    Some(q) => q,
                    None => inquire::Text::new("Question:")
                        .prompt()
                        .context("Failed to read question")?,
                };

                let mut controller = controller(&config);
                controller.set_input(&question);
                if !controller.submit_input().await {
                    return Err(anyhow!("Question is empty; nothing was sent."));
                }
                print!("{}", controller.state());
            }
            Command::Example { label: None } => {
                for example in EXAMPLE_PROMPTS {
                    println!("{:<10} {}", example.label, example.question);
                }
            }
            Command::Example { label: Some(label) } => {
                let example = example_by_label(&label).ok_or_else(|| {
                    anyhow!("Unknown example '{label}'.\nHint: run `thermo example` to list presets.")
                })?;

                let mut controller = controller(&config);
                controller.press_example(example).await;
                print!("{}", controller.state());
            }
        }

        Ok(())
    }
}

fn controller(config: &Config) -> Controller<HttpRelayClient> {
    Controller::new(HttpRelayClient::new(config.relay_url.clone()))
}

/// Refresh every [`REFRESH_INTERVAL`]; redraw when an error banner expires.
async fn watch(config: &Config) -> anyhow::Result<()> {
    let mut controller = controller(config);
    tracing::info!(relay = %config.relay_url, "Watching temperature; press Ctrl+C to stop");

    let mut refresh = time::interval(REFRESH_INTERVAL);
    refresh.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut banners = time::interval(BANNER_LIFETIME / 5);

    loop {
        tokio::select! {
            _ = refresh.tick() => {
                let fetched =
                    unless_interrupted(controller.fetch_temperature(), tokio::signal::ctrl_c())
                        .await?;
                if fetched.is_none() {
                    break;
                }
                println!("{}", controller.state());
            }
            _ = banners.tick() => {
                if controller.expire_banners(Instant::now()) {
                    println!("{}", controller.state());
                }
            }
            res = tokio::signal::ctrl_c() => {
                res.context("Failed to listen for Ctrl+C")?;
                break;
            }
        }
    }

    Ok(())
}

/// Run `work` unless `interrupt` fires first; `None` means interrupted.
async fn unless_interrupted<T>(
    work: impl Future<Output = T>,
    interrupt: impl Future<Output = std::io::Result<()>>,
) -> anyhow::Result<Option<T>> {
    tokio::select! {
        out = work => Ok(Some(out)),
        res = interrupt => {
            res.context("Failed to listen for Ctrl+C")?;
            Ok(None)
        }
    }
}
