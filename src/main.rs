use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::io::{AsyncBufReadExt, BufReader};
use weatherdash_app::{view, AppServices, Dashboard, SearchEvent};
use weatherdash_core::{AppError, Config, ConfigError};

const HELP: &str = "\
Commands:
  search <text>  look up places (suggestions appear after a short pause)
  pick <n>       show suggestion n
  hide           close the suggestion list
  show           reopen the suggestion list
  clear          empty the search box
  quick <n>      show quick pick n
  fav            toggle the displayed location as a favorite
  favs           list favorites
  open <n>       show favorite n
  unfav <n>      remove favorite n
  units          switch between metric and imperial
  dark           switch theme
  locate         use the current position
  refresh        reload the displayed location
  help           show this text
  quit           exit";

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize core
    weatherdash_core::init()?;

    let (config, _) = Config::load_validated()
        .map_err(|e| AppError::Config(ConfigError::Invalid(format!("{:#}", e))))
        .context("Failed to load configuration")?;
    if !config.api.has_api_key() {
        eprintln!(
            "No API key configured; set {} or edit {}",
            weatherdash_core::config::API_KEY_ENV,
            Config::config_path()?.display()
        );
    }

    let (services, mut search_events) =
        AppServices::from_config(&config).context("Failed to start services")?;
    tracing::info!("weatherdash started");

    println!("{}", HELP);
    println!("\nQuick picks:\n{}", view::quick_picks_panel(&Dashboard::quick_picks()));

    spawn_and_render(&services.dashboard, |dashboard| async move {
        dashboard.start().await;
    });

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            _ = services.shutdown.cancelled() => break,
            Some(event) = search_events.recv() => match event {
                SearchEvent::ResultsChanged => {
                    let panel = view::search_panel(&services.search.state());
                    if !panel.is_empty() {
                        println!("{}", panel);
                    }
                }
                SearchEvent::Notification(message) => println!("{}", message),
            },
            line = lines.next_line() => match line.context("Failed to read input")? {
                Some(line) => handle_command(&services, line.trim()),
                None => services.shutdown.cancel(),
            },
        }
    }

    tracing::info!("weatherdash shutting down");
    Ok(())
}

/// One line of user input
#[derive(Debug, Clone, PartialEq, Eq)]
enum Command {
    Empty,
    Search(String),
    ClearSearch,
    HideSuggestions,
    ShowSuggestions,
    Pick(Option<usize>),
    Quick(Option<usize>),
    Favorite,
    Favorites,
    Open(Option<usize>),
    Unfavorite(Option<usize>),
    Units,
    Dark,
    Locate,
    Refresh,
    Help,
    Quit,
    Unknown(String),
}

impl Command {
    fn parse(line: &str) -> Self {
        let line = line.trim();
        let (command, arg) = match line.split_once(' ') {
            Some((command, arg)) => (command, arg.trim()),
            None => (line, ""),
        };

        match command {
            "" => Self::Empty,
            // A bare `search` empties the box instead of scheduling a blank lookup
            "search" if arg.is_empty() => Self::ClearSearch,
            "search" => Self::Search(arg.to_string()),
            "clear" => Self::ClearSearch,
            "hide" => Self::HideSuggestions,
            "show" => Self::ShowSuggestions,
            "pick" => Self::Pick(parse_index(arg)),
            "quick" => Self::Quick(parse_index(arg)),
            "fav" => Self::Favorite,
            "favs" => Self::Favorites,
            "open" => Self::Open(parse_index(arg)),
            "unfav" => Self::Unfavorite(parse_index(arg)),
            "units" => Self::Units,
            "dark" => Self::Dark,
            "locate" => Self::Locate,
            "refresh" => Self::Refresh,
            "help" => Self::Help,
            "quit" | "exit" => Self::Quit,
            other => Self::Unknown(other.to_string()),
        }
    }
}

fn handle_command(services: &AppServices, line: &str) {
    let dashboard = &services.dashboard;

    match Command::parse(line) {
        Command::Empty => {}
        Command::Search(text) => services.search.set_query(text),
        Command::ClearSearch => services.search.clear(),
        Command::HideSuggestions => services.search.click_outside(),
        Command::ShowSuggestions => services.search.focus(),
        Command::Pick(index) => match index.and_then(|i| services.search.select(i)) {
            Some(location) => spawn_and_render(dashboard, move |d| async move {
                d.fetch_weather(location).await;
            }),
            None => println!("No such suggestion"),
        },
        Command::Quick(index) => {
            match index.and_then(|i| Dashboard::quick_picks().get(i).cloned()) {
                Some(location) => spawn_and_render(dashboard, move |d| async move {
                    d.fetch_weather(location).await;
                }),
                None => println!("No such quick pick"),
            }
        }
        Command::Favorite => match dashboard.toggle_favorite() {
            Ok(Some(true)) => println!("Added to favorites"),
            Ok(Some(false)) => println!("Removed from favorites"),
            Ok(None) => println!("Nothing displayed yet"),
            Err(e) => report(&e),
        },
        Command::Favorites => println!("{}", view::favorites_panel(&dashboard.favorites())),
        Command::Open(index) => match index.and_then(|i| dashboard.favorites().get(i).cloned()) {
            Some(location) => spawn_and_render(dashboard, move |d| async move {
                d.fetch_weather(location).await;
            }),
            None => println!("No such favorite"),
        },
        Command::Unfavorite(index) => {
            match index.and_then(|i| dashboard.favorites().get(i).cloned()) {
                Some(location) => match dashboard.remove_favorite(&location) {
                    Ok(()) => println!("{}", view::favorites_panel(&dashboard.favorites())),
                    Err(e) => report(&e),
                },
                None => println!("No such favorite"),
            }
        }
        Command::Units => spawn_and_render(dashboard, |d| async move {
            d.toggle_units().await;
        }),
        Command::Dark => {
            dashboard.toggle_dark_mode();
            println!("{}", view::render(&dashboard.view()));
        }
        Command::Locate => spawn_and_render(dashboard, |d| async move {
            d.locate().await;
        }),
        Command::Refresh => match dashboard.view().weather.map(|w| w.location()) {
            Some(location) => spawn_and_render(dashboard, move |d| async move {
                d.fetch_weather(location).await;
            }),
            None => println!("Nothing displayed yet"),
        },
        Command::Help => println!("{}", HELP),
        Command::Quit => services.shutdown.cancel(),
        Command::Unknown(other) => println!("Unknown command: {} (try \"help\")", other),
    }
}

/// Run a dashboard operation off the input loop and print the result.
fn spawn_and_render<F, Fut>(dashboard: &Arc<Dashboard>, op: F)
where
    F: FnOnce(Arc<Dashboard>) -> Fut,
    Fut: std::future::Future<Output = ()> + Send + 'static,
{
    let dashboard = Arc::clone(dashboard);
    let work = op(Arc::clone(&dashboard));
    tokio::spawn(async move {
        work.await;
        println!("{}", view::render(&dashboard.view()));
    });
}

/// One-based index from user input
fn parse_index(arg: &str) -> Option<usize> {
    arg.parse::<usize>().ok()?.checked_sub(1)
}

fn report(error: &AppError) {
    tracing::warn!("{}", error);
    println!("{}", error.user_message());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_search_clears_the_box() {
        assert_eq!(Command::parse("search"), Command::ClearSearch);
        assert_eq!(Command::parse("search   "), Command::ClearSearch);
        assert_eq!(Command::parse("clear"), Command::ClearSearch);
    }

    #[test]
    fn search_keeps_the_whole_query() {
        assert_eq!(
            Command::parse("search New York"),
            Command::Search("New York".to_string())
        );
    }

    #[test]
    fn suggestion_list_commands() {
        assert_eq!(Command::parse("hide"), Command::HideSuggestions);
        assert_eq!(Command::parse("show"), Command::ShowSuggestions);
    }

    #[test]
    fn indexes_are_one_based() {
        assert_eq!(Command::parse("pick 1"), Command::Pick(Some(0)));
        assert_eq!(Command::parse("open 3"), Command::Open(Some(2)));
        assert_eq!(Command::parse("unfav 0"), Command::Unfavorite(None));
        assert_eq!(Command::parse("quick x"), Command::Quick(None));
    }

    #[test]
    fn unknown_and_empty_lines() {
        assert_eq!(Command::parse(""), Command::Empty);
        assert_eq!(Command::parse("  quit "), Command::Quit);
        assert_eq!(
            Command::parse("forecast"),
            Command::Unknown("forecast".to_string())
        );
    }
}
