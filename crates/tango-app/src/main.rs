use std::io;
use std::path::{Path, PathBuf};

use anyhow::Context;
use chrono::Local;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use tango_config::Config;
use tango_core::EntryId;
use tango_export::export;
use tango_lang_japanese::JMdictLoader;
use tango_resolver::Resolver;
use tango_tables::{DisplayTable, TableStore, build_display_table, build_search_index};

mod prompt;
mod wordlist;

#[derive(Parser)]
#[command(name = "tango", version, about = "JMdict to Anki flashcard pipeline")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Compile a JMdict dump into the search index and display table
    Compile {
        /// Path to the JMdict XML, optionally gzipped
        dictionary: PathBuf,
        /// Directory for the compiled tables
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Resolve a word list against the tables and export Anki batches
    Prepare {
        /// Word list: .txt (one word per line) or Kindle vocabulary .html
        word_list: PathBuf,
        /// Directory holding the compiled tables
        #[arg(long)]
        tables_dir: Option<PathBuf>,
        /// Directory for the exported batches
        #[arg(long)]
        out: Option<PathBuf>,
    },
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let config = Config::new();
    match cli.command {
        Command::Compile { dictionary, out } => compile(
            &dictionary,
            &out.unwrap_or_else(|| PathBuf::from(&config.tables_dir)),
        ),
        Command::Prepare {
            word_list,
            tables_dir,
            out,
        } => prepare(
            &word_list,
            &tables_dir.unwrap_or_else(|| PathBuf::from(&config.tables_dir)),
            &out.unwrap_or_else(|| PathBuf::from(&config.export_dir)),
        ),
    }
}

fn compile(dictionary: &Path, out: &Path) -> anyhow::Result<()> {
    let entries = JMdictLoader::load(dictionary).context("loading dictionary")?;
    let index_rows = build_search_index(&entries);
    let display_rows = build_display_table(&entries);
    TableStore::new(out)
        .write(&index_rows, &display_rows)
        .context("writing tables")?;
    Ok(())
}

fn prepare(word_list: &Path, tables_dir: &Path, out: &Path) -> anyhow::Result<()> {
    let store = TableStore::new(tables_dir);
    let index = store.read_search_index().context("loading search index")?;
    let table = store.read_display_table().context("loading display table")?;

    // An unsupported list format fails here, before any resolution work.
    let words = wordlist::read_word_list(word_list)?;
    tracing::info!(words = words.len(), "resolving word list");

    if !atty::is(atty::Stream::Stdin) {
        tracing::warn!("stdin is not a terminal; resolution prompts will read piped input");
    }

    let selected = {
        let stdin = io::stdin().lock();
        let stdout = io::stdout().lock();
        Resolver::new(&index, &table, stdin, stdout).resolve_all(&words)?
    };

    list_selection(&table, &selected)?;

    let size = {
        let stdin = io::stdin().lock();
        let stdout = io::stdout().lock();
        prompt::batch_size(stdin, stdout)?
    };
    match size {
        Some(size) => {
            let files = export(&table, &selected, out, size, Local::now().date_naive())
                .context("exporting batches")?;
            println!("Saved {} file(s).", files.len());
        }
        None => println!("Did not save tables."),
    }
    Ok(())
}

fn list_selection(table: &DisplayTable, selected: &[EntryId]) -> anyhow::Result<()> {
    for &id in selected {
        let row = table
            .get(id)
            .with_context(|| format!("id {id} missing from display table"))?;
        println!(
            "{id} {} {} {} {}",
            row.expression, row.meaning, row.reading, row.part_of_speech
        );
    }
    println!("{} entries in total.", selected.len());
    Ok(())
}
