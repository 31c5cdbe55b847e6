//! Command-line table driver for six-max hold'em.
//!
//! Seats six players at a local table, takes every seat's decisions from
//! the terminal, and stores finished hands on the hand history server.

use std::sync::Arc;

use anyhow::{Context, Result};
use log::{info, warn};
use pico_args::Arguments;
use sixmax::{
    Blinds, Chips, HandRepository, SeatIndex, TableActor, TableConfig, TableHandle,
    DEFAULT_SMALL_BLIND, DEFAULT_STACK,
};
use sm_client::{
    api_client::ApiClient,
    commands::{Command, HELP as COMMAND_HELP, parse_command},
    render,
};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};

const HELP: &str = "\
Play six-max hands against a local table

USAGE:
  sm_client [OPTIONS]

OPTIONS:
  --server URL          Hand history server  [default: http://localhost:8000]
  --stack N             Starting stack for every seat  [default: 1000]
  --small-blind N       Small blind, the big blind is twice this  [default: 20]
  --dealer N            Dealer seat for the first hand, 1-6  [default: 1]
  --delay-ms N          Pause between dealt streets  [default: 0]
  --seed N              Deterministic shuffles

FLAGS:
  -h, --help            Print help information
";

struct Args {
    server_url: String,
    stack: Chips,
    small_blind: Chips,
    dealer: SeatIndex,
    delay_ms: u64,
    seed: Option<u64>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let mut pargs = Arguments::from_env();

    if pargs.contains(["-h", "--help"]) {
        print!("{HELP}");
        std::process::exit(0);
    }

    let dealer: SeatIndex = pargs.opt_value_from_str("--dealer")?.unwrap_or(1);
    let args = Args {
        server_url: pargs
            .opt_value_from_str("--server")?
            .unwrap_or_else(|| "http://localhost:8000".to_string()),
        stack: pargs.opt_value_from_str("--stack")?.unwrap_or(DEFAULT_STACK),
        small_blind: pargs
            .opt_value_from_str("--small-blind")?
            .unwrap_or(DEFAULT_SMALL_BLIND),
        dealer: dealer.checked_sub(1).context("--dealer counts seats from 1")?,
        delay_ms: pargs.opt_value_from_str("--delay-ms")?.unwrap_or(0),
        seed: pargs.opt_value_from_str("--seed")?,
    };

    env_logger::builder().format_target(false).init();

    run(args).await
}

async fn run(args: Args) -> Result<()> {
    let blinds = Blinds::from_small(args.small_blind).context("--small-blind is too large")?;
    let config = TableConfig {
        blinds,
        starting_stack: args.stack,
        dealer_index: args.dealer,
        phase_delay_ms: args.delay_ms,
        deck_seed: args.seed,
        ..TableConfig::default()
    };
    let api_client = Arc::new(ApiClient::new(args.server_url));
    let store: Arc<dyn HandRepository> = api_client.clone();
    let (actor, table) = TableActor::new(config, Arc::clone(&store))
        .map_err(anyhow::Error::msg)
        .context("Invalid table settings")?;

    match api_client.health().await {
        Ok(()) => info!("Storing hands at {}", api_client.base_url()),
        Err(e) => warn!("Hand history server unavailable, finished hands won't be saved: {e}"),
    }
    let table_task = tokio::spawn(actor.run());

    println!("{COMMAND_HELP}");
    print_table(&table).await?;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = tokio::io::stdout();
    loop {
        stdout.write_all(b"> ").await?;
        stdout.flush().await?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        if line.trim().is_empty() {
            continue;
        }

        let command = match parse_command(&line) {
            Ok(command) => command,
            Err(e) => {
                println!("{e}");
                continue;
            }
        };

        if command == Command::Quit {
            break;
        }
        handle_command(command, &table, store.as_ref()).await?;
    }

    table.close().await.map_err(anyhow::Error::msg)?;
    table_task.await.context("Table task panicked")?;
    println!("Left the table.");
    Ok(())
}

async fn handle_command(
    command: Command,
    table: &TableHandle,
    store: &dyn HandRepository,
) -> Result<()> {
    match command {
        Command::Start => {
            let response = table.start_hand().await.map_err(anyhow::Error::msg)?;
            println!("{}", render::render_response(&response));
            print_table(table).await?;
        }
        Command::Act(action) => {
            let state = table.state().await.map_err(anyhow::Error::msg)?;
            let seat = state.active_player_index();
            let response = table
                .take_action(seat, action)
                .await
                .map_err(anyhow::Error::msg)?;
            println!("{}", render::render_response(&response));
            if response.is_success() {
                print_table(table).await?;
            }
        }
        Command::Stacks(stacks) => {
            let response = table.set_stacks(stacks).await.map_err(anyhow::Error::msg)?;
            println!("{}", render::render_response(&response));
        }
        Command::Next => {
            let response = table.next_hand().await.map_err(anyhow::Error::msg)?;
            println!("{}", render::render_response(&response));
            if response.is_success() {
                print_table(table).await?;
            }
        }
        Command::State => print_table(table).await?,
        Command::History => match store.list_hands().await {
            Ok(hands) => print!("{}", render::render_history(&hands)),
            Err(e) => println!("Couldn't load history: {e}"),
        },
        Command::Hand(id) => match store.get_hand(&id).await {
            Ok(Some(hand)) => print!("{}", render::render_stored_hand(&hand)),
            Ok(None) => println!("No hand with id {id}"),
            Err(e) => println!("Couldn't load hand: {e}"),
        },
        Command::Help => print!("{COMMAND_HELP}"),
        Command::Quit => {}
    }
    Ok(())
}

async fn print_table(table: &TableHandle) -> Result<()> {
    let state = table.state().await.map_err(anyhow::Error::msg)?;
    print!("{}", render::render_table(&state));
    Ok(())
}
