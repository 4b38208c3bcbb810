//! keyit CLI - Command-line front end for keyboarding a Bible translation
//!
//! Each invocation opens kdb.sqlite, restores the current book, chapter and
//! VerseItem, performs one command and exits. Selections persist between
//! invocations.
//!
//! ## Example Usage
//!
//! ```bash
//! # Name the Bible being keyboarded
//! keyit setup --name "Kuna Bible"
//!
//! # Choose Mark chapter 1 and keyboard verse 1
//! keyit book MRK
//! keyit chapter 1
//! keyit edit "The beginning of the gospel"
//!
//! # Show and use the popover menu of the current item
//! keyit menu
//! keyit action crParaBef
//!
//! # Write the chapter as USFM
//! keyit export --output MRK1.usfm
//! ```

use anyhow::{anyhow, Context as _};
use clap::{Parser, Subcommand};
use colored::Colorize;
use keyit::asset_names::Target;
use keyit::bible::Bible;
use keyit::books::BooksSpec;
use keyit::error::KitError;
use keyit::menu::MenuAction;
use keyit::store::Kdb;
use keyit::types::ItemType;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::process;

/// keyit: Keyboard It, one chapter at a time
#[derive(Parser)]
#[command(name = "keyit")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(author = "Graeme Costin")]
#[command(about = "Keyboard a Bible translation and export it as USFM", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Configuration file path
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Database file (default: <data_dir>/kdb.sqlite)
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Name the Bible being keyboarded
    Setup {
        /// Bible name (default: bible_name from the configuration)
        #[arg(short, long)]
        name: Option<String>,
    },

    /// List the books of the Bible
    Books,

    /// Select the current book
    Book {
        /// Book number or USFM code (e.g. 41 or MAT)
        #[arg(value_name = "BOOK")]
        book: String,
    },

    /// List the chapters of the current book
    Chapters,

    /// Select the current chapter
    Chapter {
        /// Chapter (or psalm) number
        #[arg(value_name = "N")]
        number: usize,
    },

    /// List the VerseItems of the current chapter
    Items,

    /// Select the current VerseItem
    Item {
        /// Offset of the item in the chapter
        #[arg(value_name = "OFFSET")]
        offset: usize,
    },

    /// Replace the text of a VerseItem
    Edit {
        /// New text
        #[arg(value_name = "TEXT")]
        text: String,

        /// Item offset (default: current item)
        #[arg(short, long)]
        offset: Option<usize>,
    },

    /// Show the popover menu of the current VerseItem
    Menu,

    /// Apply a popover menu action to the current VerseItem
    Action {
        /// Action code (e.g. crParaBef, brid, unBrid)
        #[arg(value_name = "CODE")]
        code: String,

        /// Character offset at which to break a verse (crParaCont)
        #[arg(long)]
        cursor: Option<usize>,
    },

    /// Export the current chapter as USFM
    Export {
        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// List the bundled image assets
    Assets,

    /// Show configuration and current selections
    Info,
}

/// Configuration file structure
#[derive(Debug, Clone, Serialize, Deserialize)]
struct Config {
    #[serde(default = "default_data_dir")]
    data_dir: PathBuf,
    #[serde(default)]
    books_spec: Option<PathBuf>,
    #[serde(default)]
    books_names: Option<PathBuf>,
    #[serde(default = "default_bible_name")]
    bible_name: String,
}

fn keyit_home() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".keyit")
}

fn default_data_dir() -> PathBuf {
    keyit_home().join("data")
}

fn default_bible_name() -> String {
    "Bible".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            books_spec: None,
            books_names: None,
            bible_name: default_bible_name(),
        }
    }
}

impl Config {
    fn load(path: Option<&Path>) -> Self {
        let (config_path, explicit) = match path {
            Some(p) => (p.to_path_buf(), true),
            None => (keyit_home().join("config.toml"), false),
        };
        if !config_path.exists() {
            if explicit {
                eprintln!(
                    "{} Config file {} not found, using defaults",
                    "Warning:".yellow(),
                    config_path.display()
                );
            }
            return Config::default();
        }

        match fs::read_to_string(&config_path) {
            Ok(contents) => match toml::from_str(&contents) {
                Ok(config) => return config,
                Err(e) => {
                    eprintln!("{} Failed to parse config: {}", "Warning:".yellow(), e);
                }
            },
            Err(e) => {
                eprintln!("{} Failed to read config: {}", "Warning:".yellow(), e);
            }
        }
        Config::default()
    }

    fn ensure_dirs(&self) -> std::io::Result<()> {
        fs::create_dir_all(&self.data_dir)
    }

    fn books_spec(&self) -> keyit::Result<BooksSpec> {
        match (&self.books_spec, &self.books_names) {
            (Some(spec), Some(names)) => BooksSpec::from_files(spec, names),
            (None, None) => BooksSpec::embedded(),
            _ => Err(KitError::ConfigError(
                "books_spec and books_names must be given together".to_string(),
            )),
        }
    }
}

/// Open database, book tables and Bible with its restored selections
struct Session {
    kdb: Kdb,
    spec: BooksSpec,
    bible: Bible,
    db_path: PathBuf,
}

impl Session {
    fn open(config: &Config, db: Option<PathBuf>) -> anyhow::Result<Self> {
        let db_path = db.unwrap_or_else(|| config.data_dir.join(Kdb::FILE_NAME));
        let kdb = Kdb::open(&db_path)?;
        let spec = config.books_spec()?;
        let mut bible = Bible::open(&kdb, &spec)?;
        bible.go_current_book(&kdb, &spec)?;
        Ok(Self {
            kdb,
            spec,
            bible,
            db_path,
        })
    }
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    let config = Config::load(cli.config.as_deref());
    if let Err(e) = config.ensure_dirs() {
        eprintln!(
            "{} Failed to create directories: {}",
            "Error:".red().bold(),
            e
        );
        process::exit(1);
    }

    if cli.verbose {
        println!("{} v{}", "keyit".cyan().bold(), env!("CARGO_PKG_VERSION"));
        println!(
            "Data dir: {}",
            config.data_dir.display().to_string().dimmed()
        );
    }

    let result = Session::open(&config, cli.db.clone()).and_then(|mut session| {
        run(&cli, &config, &mut session)?;
        session.kdb.close()?;
        Ok(())
    });

    if let Err(e) = result {
        eprintln!("{} {:#}", "Error:".red().bold(), e);
        if let Some(code) = e.downcast_ref::<KitError>().and_then(KitError::code) {
            eprintln!("Please report Error No. {} to the developers", code);
        }
        process::exit(1);
    }
}

fn run(cli: &Cli, config: &Config, session: &mut Session) -> anyhow::Result<()> {
    match &cli.command {
        Commands::Setup { name } => setup(session, name.as_deref().unwrap_or(&config.bible_name)),
        Commands::Books => list_books(session, cli.json),
        Commands::Book { book } => select_book(session, book),
        Commands::Chapters => list_chapters(session, cli.json),
        Commands::Chapter { number } => select_chapter(session, *number),
        Commands::Items => list_items(session, cli.json),
        Commands::Item { offset } => select_item(session, *offset),
        Commands::Edit { text, offset } => edit_item(session, text, *offset),
        Commands::Menu => show_menu(session, cli.json),
        Commands::Action { code, cursor } => apply_action(session, code, *cursor),
        Commands::Export { output } => export(session, output.as_deref()),
        Commands::Assets => list_assets(cli.json),
        Commands::Info => show_info(session, config),
    }
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn setup(session: &mut Session, name: &str) -> anyhow::Result<()> {
    session.bible.rename(&session.kdb, name)?;
    println!("{} {}", "Keyboarding:".bold(), name.bright_green().bold());
    println!(
        "  {} books ready in {}",
        session.bible.books().len(),
        session.db_path.display().to_string().dimmed()
    );
    Ok(())
}

fn list_books(session: &Session, json: bool) -> anyhow::Result<()> {
    let books = session.bible.books();
    if json {
        return print_json(books);
    }

    let current = session.bible.rec().current_book;
    println!("{}", session.bible.name().cyan().bold());
    println!("{}", "=".repeat(session.bible.name().chars().count()).cyan());
    for book in books {
        let marker = if book.id == current { "*" } else { " " };
        let progress = if book.chapters_created {
            format!("{} chapters, at {}", book.num_chapters, book.current_chapter_num)
        } else {
            format!("{} chapters", book.num_chapters)
        };
        println!(
            "{} {:>2} {} {:<16} {}",
            marker.bright_green().bold(),
            book.id,
            book.code.bold(),
            book.name,
            progress.dimmed()
        );
    }
    Ok(())
}

fn select_book(session: &mut Session, key: &str) -> anyhow::Result<()> {
    let book_id = session
        .bible
        .find_book(key)
        .map(|b| b.id)
        .ok_or_else(|| anyhow!("no book '{}'", key))?;
    session
        .bible
        .setup_current_book(&session.kdb, &session.spec, book_id)?;

    let book = session.bible.current_book()?;
    println!("{} {}", "Book:".bold(), book.name().bright_green().bold());
    match book.current_chapter() {
        Ok(chapter) => println!("  Current {}: {}", book.chapter_name(), chapter.number()),
        Err(_) => println!(
            "  {}",
            format!("Choose a {} ({} in all)", book.chapter_name(), book.chapters().len()).dimmed()
        ),
    }
    Ok(())
}

fn list_chapters(session: &Session, json: bool) -> anyhow::Result<()> {
    let book = session.bible.current_book()?;
    if json {
        return print_json(book.chapters());
    }

    let current = book.rec().current_chapter_num;
    println!("{}", book.name().cyan().bold());
    for chapter in book.chapters() {
        let marker = if chapter.number == current { "*" } else { " " };
        let status = if chapter.items_created { "started" } else { "" };
        println!(
            "{} {} {:>3}  {:>3} verses  {:>3} items  {}",
            marker.bright_green().bold(),
            book.chapter_name(),
            chapter.number,
            chapter.num_verses,
            chapter.num_items,
            status.dimmed()
        );
    }
    Ok(())
}

fn select_chapter(session: &mut Session, number: usize) -> anyhow::Result<()> {
    let offset = number
        .checked_sub(1)
        .ok_or_else(|| anyhow!("chapter numbers start at 1"))?;
    session.bible.setup_current_chapter(&session.kdb, offset)?;

    let book = session.bible.current_book()?;
    let chapter = book.current_chapter()?;
    println!(
        "{} {} {} {}",
        book.name().bold(),
        book.chapter_name(),
        chapter.number(),
        format!("({} items)", chapter.num_items()).dimmed()
    );
    Ok(())
}

fn list_items(session: &Session, json: bool) -> anyhow::Result<()> {
    let chapter = session.bible.current_book()?.current_chapter()?;
    if json {
        return print_json(chapter.items());
    }

    for (offset, item) in chapter.items().iter().enumerate() {
        let marker = if offset == chapter.current_offset() { ">" } else { " " };
        let label = match item.item_type {
            ItemType::Verse | ItemType::VerseCont => format!("{} {}", item.item_type, item.verse_label()),
            other => other.to_string(),
        };
        println!(
            "{} {:>3} {:<14} {}",
            marker.bright_green().bold(),
            offset,
            label.bold(),
            item.text
        );
    }
    Ok(())
}

fn select_item(session: &mut Session, offset: usize) -> anyhow::Result<()> {
    let book = session.bible.current_book_mut()?;
    book.select_item(&session.kdb, offset)?;
    if let Some(item) = book.current_chapter()?.current_item() {
        println!("{} {} {}", "Current:".bold(), item.item_type, item.verse_label());
    }
    Ok(())
}

fn edit_item(session: &mut Session, text: &str, offset: Option<usize>) -> anyhow::Result<()> {
    let book = session.bible.current_book_mut()?;
    let offset = match offset {
        Some(o) => o,
        None => book.current_chapter()?.current_offset(),
    };
    book.save_item_text(&session.kdb, offset, text)
        .with_context(|| format!("saving text of item {}", offset))?;
    println!("{} item {}", "Saved".green(), offset);
    Ok(())
}

fn show_menu(session: &Session, json: bool) -> anyhow::Result<()> {
    let chapter = session.bible.current_book()?.current_chapter()?;
    let menu = chapter
        .menu()
        .ok_or_else(|| anyhow!("chapter {} has no current item", chapter.number()))?;
    if json {
        return print_json(&menu);
    }

    println!("{} {}", "Menu for".bold(), menu.item_type.to_string().cyan().bold());
    for item in &menu.items {
        let icon = item.icon.letter().to_string();
        let icon = match item.icon.letter() {
            'C' => icon.green(),
            'D' => icon.red(),
            _ => icon.yellow(),
        };
        println!(
            "  {} {:<18} {:<11} {}",
            icon.bold(),
            item.label,
            item.action.code(),
            item.icon.asset().name().dimmed()
        );
    }
    Ok(())
}

fn apply_action(session: &mut Session, code: &str, cursor: Option<usize>) -> anyhow::Result<()> {
    let action: MenuAction = code.parse().map_err(|e: String| anyhow!(e))?;
    let book = session.bible.current_book_mut()?;
    book.apply_action(&session.kdb, action, cursor)?;

    let chapter = book.current_chapter()?;
    println!(
        "{} {} {}",
        "Applied".green(),
        action.code().bold(),
        format!("({} items)", chapter.num_items()).dimmed()
    );
    if let Some(item) = chapter.current_item() {
        println!("{} {} {}", "Current:".bold(), item.item_type, item.verse_label());
    }
    Ok(())
}

fn export(session: &Session, output: Option<&Path>) -> anyhow::Result<()> {
    let usfm = session.bible.export_current_chapter(&session.kdb)?;
    match output {
        Some(path) => {
            fs::write(path, &usfm).with_context(|| format!("writing {}", path.display()))?;
            println!("{} {}", "Exported to".green(), path.display());
        }
        None => println!("{}", usfm),
    }
    Ok(())
}

fn list_assets(json: bool) -> anyhow::Result<()> {
    if json {
        let manifest: std::collections::BTreeMap<&str, Vec<&str>> = Target::ALL
            .into_iter()
            .map(|t| (t.name(), t.manifest().map(|a| a.name()).collect()))
            .collect();
        return print_json(&manifest);
    }
    for target in Target::ALL {
        println!("{}", target.name().cyan().bold());
        for asset in target.manifest() {
            println!("  {}", asset.name());
        }
    }
    Ok(())
}

fn show_info(session: &Session, config: &Config) -> anyhow::Result<()> {
    println!(
        "{} {}",
        "keyit".cyan().bold(),
        format!("v{}", env!("CARGO_PKG_VERSION")).dimmed()
    );
    println!("{}", env!("CARGO_PKG_DESCRIPTION"));
    println!();

    println!("{}", "Configuration".bold());
    println!("{}", "=============".dimmed());
    println!("  {} {}", "Data directory:".bold(), config.data_dir.display());
    println!("  {} {}", "Database:".bold(), session.db_path.display());
    let tables = match &config.books_spec {
        Some(path) => path.display().to_string(),
        None => "embedded".to_string(),
    };
    println!("  {} {}", "Book tables:".bold(), tables);
    println!();

    println!("{}", "Keyboarding".bold());
    println!("{}", "===========".dimmed());
    println!("  {} {}", "Bible:".bold(), session.bible.name());
    match session.bible.current_book() {
        Ok(book) => {
            println!("  {} {} ({})", "Book:".bold(), book.name(), book.code());
            if let Ok(chapter) = book.current_chapter() {
                println!(
                    "  {} {} of {}",
                    format!("{}:", book.chapter_name()).bold(),
                    chapter.number(),
                    book.chapters().len()
                );
                if let Some(item) = chapter.current_item() {
                    println!("  {} {} {}", "Item:".bold(), item.item_type, item.verse_label());
                }
            }
        }
        Err(_) => println!("  {}", "No book selected".dimmed()),
    }
    println!();
    Ok(())
}
