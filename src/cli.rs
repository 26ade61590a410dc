//! Command-line front end for the joke board

use anyhow::{anyhow, Result};
use clap::Subcommand;

use dad_jokes::{CancellationFlag, Joke, JokeBoard, JokeSource, KeyValueStorage, Vote};

/// Board commands
#[derive(Debug, Subcommand)]
pub enum JokeCommands {
    /// Show the board, fetching a first batch if it is empty
    List,

    /// Fetch more unique jokes
    Refresh {
        /// Number of new jokes (defaults to fetch.num_jokes_to_get)
        #[arg(short, long)]
        count: Option<usize>,
    },

    /// Upvote a joke by rank or id prefix
    Up {
        joke: String,
    },

    /// Downvote a joke by rank or id prefix
    Down {
        joke: String,
    },

    /// Show one joke with its full id
    Show {
        joke: String,
    },
}

/// Run a command against the board and return what to print
pub async fn execute_command<S, J>(
    board: &mut JokeBoard<S, J>,
    command: JokeCommands,
    cancel: &CancellationFlag,
) -> Result<String>
where
    S: KeyValueStorage,
    J: JokeSource,
{
    match command {
        JokeCommands::List => {
            let jokes = board.ensure_populated(cancel).await?;
            Ok(format_board(&jokes))
        }
        JokeCommands::Refresh { count } => {
            if let Some(count) = count {
                board.set_jokes_per_refresh(count);
            }
            let jokes = board.refresh(cancel).await?;
            Ok(format_board(&jokes))
        }
        JokeCommands::Up { joke } => cast_vote(board, &joke, Vote::Up),
        JokeCommands::Down { joke } => cast_vote(board, &joke, Vote::Down),
        JokeCommands::Show { joke } => {
            let id = resolve(board, &joke)?;
            let joke = board
                .store()
                .get(id)
                .ok_or_else(|| anyhow!("No joke matches {:?}", joke))?;
            Ok(format!("{}\nvotes: {}\nid: {}", joke.text, joke.votes, joke.id))
        }
    }
}

fn cast_vote<S, J>(board: &mut JokeBoard<S, J>, reference: &str, vote: Vote) -> Result<String>
where
    S: KeyValueStorage,
    J: JokeSource,
{
    let id = resolve(board, reference)?;
    if !board.vote(id, vote) {
        return Err(anyhow!("No joke matches {:?}", reference));
    }
    Ok(format_board(&board.sorted_view()))
}

fn resolve<S, J>(board: &JokeBoard<S, J>, reference: &str) -> Result<uuid::Uuid>
where
    S: KeyValueStorage,
    J: JokeSource,
{
    board
        .store()
        .resolve(reference)
        .ok_or_else(|| {
            anyhow!(
                "No single joke matches {:?} (use a rank or a longer id prefix)",
                reference
            )
        })
}

/// One line per joke: rank, votes, short id, text
pub fn format_board(jokes: &[Joke]) -> String {
    if jokes.is_empty() {
        return "No jokes yet. Run `dad-jokes refresh`.".to_string();
    }
    jokes
        .iter()
        .enumerate()
        .map(|(i, joke)| {
            format!("{:>3}. [{:>+4}] {}  {}", i + 1, joke.votes, joke.short_id(), joke.text)
        })
        .collect::<Vec<_>>()
        .join("\n")
}
