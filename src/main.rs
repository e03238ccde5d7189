mod console;

use anyhow::Context;
use console::{Console, Reader};
use lobby::{ChatId, Lobby, Question, Settings};
use std::{env, fs::File, io};
use tokio::{
    io::{AsyncBufReadExt, BufReader},
    runtime::Runtime,
    signal,
};

/// The console only ever hosts a single chat.
const CHAT: ChatId = 0;

fn load_settings() -> anyhow::Result<Settings> {
    let mut settings = Settings::default();
    if let Ok(length) = env::var("ROUND_LENGTH") {
        settings.round_length = length.parse().context("ROUND_LENGTH")?;
    }
    if let Ok(seconds) = env::var("QUESTION_SECONDS") {
        settings.duration = seconds.parse().context("QUESTION_SECONDS")?;
    }
    if let Ok(list) = env::var("CHECKPOINTS") {
        settings.checkpoints = list
            .split(',')
            .map(str::trim)
            .filter(|item| !item.is_empty())
            .map(str::parse::<u32>)
            .collect::<Result<Box<[u32]>, _>>()
            .context("CHECKPOINTS")?;
    }
    anyhow::ensure!(settings.duration > 0, "QUESTION_SECONDS must be positive");
    Ok(settings)
}

fn load_catalog() -> anyhow::Result<Vec<Question>> {
    let Ok(path) = env::var("QUIZ_CATALOG") else {
        return Ok(model::catalog());
    };

    let file = File::open(&path).with_context(|| format!("cannot open catalog {path}"))?;
    let catalog: Vec<Question> = serde_json::from_reader(io::BufReader::new(file))?;
    anyhow::ensure!(!catalog.is_empty(), "catalog {path} has no questions");
    Ok(catalog)
}

async fn drive(lobby: Lobby<Console>) -> anyhow::Result<()> {
    lobby.welcome(CHAT).await;

    let mut reader = Reader::default();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        if let Some(inbound) = reader.read(&line) {
            lobby.on_inbound(CHAT, inbound).await;
        }
    }
    Ok(())
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    // Parse environment variables
    let settings = load_settings()?;
    let catalog = load_catalog()?;
    log::info!("{} questions loaded, {} per round, {}s each", catalog.len(), settings.round_length, settings.duration);

    // Run the console until input ends or we are interrupted
    let lobby = Lobby::new(Console::default(), settings, catalog);
    let runtime = Runtime::new()?;
    runtime.block_on(async move {
        tokio::select! {
            result = drive(lobby) => result,
            result = signal::ctrl_c() => Ok(result?),
        }
    })
}
