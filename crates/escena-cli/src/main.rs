use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use console::style;
use std::fs;
use std::io::Read;

use escena::pipeline::{self, TurnContext};

#[derive(Parser)]
#[command(author, version, about = "Roleplay reply post-processing", long_about = None)]
struct Cli {
    /// Enable debug logging
    #[arg(long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the full pipeline over a generated reply
    Process {
        /// File with the raw generated text, or "-" for stdin
        input: String,

        /// Display name of the agent (stripped from image tags)
        #[arg(long)]
        agent_name: String,

        /// Display name of the user (stripped from image tags)
        #[arg(long)]
        user_name: Option<String>,

        /// Character name allowed to survive sanitization
        #[arg(long)]
        character_name: Option<String>,

        /// Appearance hint mined for hair/eye/accessory tags
        #[arg(long)]
        image_prompt_master: Option<String>,

        /// The user's previous message (anti-echo reference)
        #[arg(long)]
        last_user: Option<String>,

        /// The agent's previous message (dialogue enrichment source)
        #[arg(long)]
        last_assistant: Option<String>,
    },
    /// Replace a message's IMAGEN line and re-sanitize it
    EditPrompt {
        /// File with the stored message content, or "-" for stdin
        input: String,

        /// New tag content for the IMAGEN line
        #[arg(long)]
        prompt: String,

        #[arg(long)]
        agent_name: String,

        #[arg(long)]
        user_name: Option<String>,

        #[arg(long)]
        character_name: Option<String>,
    },
}

fn read_input(path: &str) -> Result<String> {
    if path == "-" {
        let mut buffer = String::new();
        std::io::stdin()
            .read_to_string(&mut buffer)
            .context("reading stdin")?;
        Ok(buffer)
    } else {
        fs::read_to_string(path).with_context(|| format!("reading {}", path))
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    if cli.verbose {
        tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .init();
    }

    match cli.command {
        Command::Process {
            input,
            agent_name,
            user_name,
            character_name,
            image_prompt_master,
            last_user,
            last_assistant,
        } => {
            let raw = read_input(&input)?;
            let output = pipeline::process(
                &raw,
                &TurnContext {
                    agent_name: &agent_name,
                    user_name: user_name.as_deref(),
                    character_name: character_name.as_deref(),
                    image_prompt_master: image_prompt_master.as_deref(),
                    last_user: last_user.as_deref(),
                    last_assistant: last_assistant.as_deref(),
                },
            );
            eprintln!("{}", style("processed reply").dim());
            println!("{}", output);
        }
        Command::EditPrompt {
            input,
            prompt,
            agent_name,
            user_name,
            character_name,
        } => {
            let current = read_input(&input)?;
            let output = pipeline::apply_prompt_edit(
                &current,
                &prompt,
                &agent_name,
                user_name.as_deref(),
                character_name.as_deref(),
            );
            eprintln!("{}", style("edited message").dim());
            println!("{}", output);
        }
    }

    Ok(())
}
