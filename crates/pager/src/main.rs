use clap::{Parser, Subcommand};
use pager::config::{self, Settings};
use pager::favorites::{ActorId, FavoritesStore};
use pager::host::{Adapter, Control, LaunchQueue};
use pager::item::MenuItem;
use pager::loadout::Loadout;
use std::io::Write;
use std::os::unix::net::UnixStream;
use std::path::PathBuf;
use std::rc::Rc;

#[derive(Parser, Debug)]
#[command(name = "pager", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug, Clone)]
enum Commands {
    /// Open the ability menu in the running overlay.
    Show,
    /// Open the build menu in the running overlay.
    Build,
    /// Close whatever menu the overlay is showing.
    Hide,
    /// Print the host bar and menu trees a loadout produces.
    Tree {
        /// Loadout file (defaults to the one in the config directory, then the demo)
        #[arg(short, long)]
        loadout: Option<PathBuf>,

        /// Actor whose favorites are applied (defaults to the loadout's actor)
        #[arg(short, long)]
        actor: Option<String>,
    },
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Show => send_command("show"),
        Commands::Build => send_command("build"),
        Commands::Hide => send_command("hide"),
        Commands::Tree { loadout, actor } => print_tree(loadout, actor),
    }
}

fn send_command(cmd: &str) -> anyhow::Result<()> {
    let mut stream = UnixStream::connect(pager::SOCKET_PATH).map_err(|e| {
        anyhow::anyhow!(
            "Failed to connect to the overlay at {}: {}. Is pager-overlay running?",
            pager::SOCKET_PATH,
            e
        )
    })?;

    writeln!(stream, "{}", cmd)?;
    Ok(())
}

fn print_tree(loadout: Option<PathBuf>, actor: Option<String>) -> anyhow::Result<()> {
    let loadout_path = match loadout {
        Some(path) => path,
        None => config::loadout_path()?,
    };
    let loadout = Loadout::load_or_demo(&loadout_path)?;
    let settings = config::settings_path()
        .and_then(|p| config::load_settings(&p))
        .unwrap_or_else(|e| {
            log::warn!("Using default settings: {}", e);
            Settings::default()
        });
    let favorites = config::favorites_path()
        .ok()
        .and_then(|p| FavoritesStore::load(&p).ok())
        .unwrap_or_default()
        .shared();

    let actor = actor.map(ActorId::new).unwrap_or_else(|| loadout.actor.clone());
    let adapter = Adapter::new(
        settings,
        favorites,
        loadout.capabilities(),
        Rc::new(LaunchQueue::new()),
    );

    let controls = loadout.controls();
    println!("Host bar:");
    for control in adapter.supplement(&actor, controls.clone()) {
        println!("  {} (order {})", control.label(), control.order());
    }

    let abilities: Vec<Rc<dyn Control>> = controls
        .into_iter()
        .filter(|c| adapter.is_ability(c.as_ref()))
        .collect();
    println!("\nAbility menu:");
    print_items(&adapter.ability_menu(&actor, &abilities), 1);

    println!("\nBuild menu:");
    print_items(&adapter.category_menu(&loadout.categories()), 1);
    Ok(())
}

fn print_items(items: &[MenuItem], depth: usize) {
    let indent = "  ".repeat(depth);
    for item in items {
        let mut line = format!("{indent}{}", item.label);
        if let Some(key) = &item.favorite_key {
            line.push_str(&format!(" [{key}]"));
        }
        if let Some(reason) = item.disabled_reason() {
            line.push_str(&format!(" (disabled: {reason})"));
        }
        println!("{line}");
        if item.has_children() {
            print_items(&item.resolve_children(), depth + 1);
        }
    }
}
