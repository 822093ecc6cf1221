use std::str::FromStr;

use clap::{Parser, Subcommand};
use opsagent::{
    agents::MasterAgent, error::Result, input::TaskRequest, shared::GlobalConfig,
};
use tracing::Level;

#[derive(Parser)]
#[command(name = "opsagent", version, about = "Plan, run and verify operations tasks")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Process a task end to end and print the report
    Run {
        task: String,
        /// Print the full JSON response with raw execution data
        #[arg(long)]
        raw: bool,
    },
    /// Print the execution plan for a task without running it
    Plan { task: String },
    /// List the available tools
    Tools,
    /// Show configuration health
    Health,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = GlobalConfig::from_env();

    let level = Level::from_str(&config.log_level).unwrap_or(Level::INFO);
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    let agent = MasterAgent::from_config(config)?;

    match cli.command {
        Command::Run { task, raw } => {
            let request = TaskRequest::new(task).with_raw_data(raw);
            let response = agent.process_task(&request).await?;
            if raw {
                println!("{}", serde_json::to_string_pretty(&response)?);
            } else {
                println!("{}", response.formatted_output);
            }
        }
        Command::Plan { task } => {
            let plan = agent.create_plan(&task).await?;
            println!("{}", serde_json::to_string_pretty(&plan)?);
        }
        Command::Tools => {
            println!("{}", serde_json::to_string_pretty(&agent.list_tools())?);
        }
        Command::Health => {
            println!("{}", serde_json::to_string_pretty(&agent.health())?);
        }
    }
    Ok(())
}
