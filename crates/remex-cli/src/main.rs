use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use log::LevelFilter;
use remex_core::languages::{default_language, filter_catalog, select_language};
use remex_core::problems::KEY_AUTH_TOKEN;
use remex_core::{
    load_config, ExecutionSession, FileStore, JudgeClient, KeyValueStore, Language, MemoryStore,
    ProblemClient, RemexConfig,
};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser, Debug)]
#[clap(name = "remex", author, version = "0.1.0", about = "Remote code-execution runner")]
struct Cli {
    #[clap(subcommand)]
    command: Commands,

    #[clap(
        long,
        short,
        default_value = "remex.yaml",
        help = "Path to the YAML configuration file"
    )]
    config: String,

    #[clap(long, short, default_value = "info")]
    log_level: String,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run a source file on the judge and print the classified output
    Run {
        /// Source file to submit
        file: PathBuf,

        #[clap(long, help = "Language name or catalog id (e.g. \"python\" or 71)")]
        language: Option<String>,

        #[clap(long, help = "File to read the program's stdin from")]
        stdin: Option<PathBuf>,
    },
    /// List the judge's language catalog
    Languages {
        #[clap(long, help = "Show the full catalog instead of the supported subset")]
        all: bool,
    },
    /// Show a problem's title and description
    Problem {
        /// Problem identifier
        id: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    env_logger::Builder::new()
        .filter_level(cli.log_level.parse().unwrap_or(LevelFilter::Info))
        .init();

    let config = load_config(&cli.config)
        .await
        .with_context(|| format!("failed to load configuration from {}", cli.config))?;

    match cli.command {
        Commands::Run { file, language, stdin } => run(config, file, language, stdin).await,
        Commands::Languages { all } => languages(config, all).await,
        Commands::Problem { id } => problem(config, id).await,
    }
}

fn open_storage(config: &RemexConfig) -> Result<Arc<dyn KeyValueStore>> {
    let storage: Arc<dyn KeyValueStore> = match &config.storage.path {
        Some(path) => Arc::new(FileStore::open(path)?),
        None => Arc::new(MemoryStore::new()),
    };
    Ok(storage)
}

fn resolve_language(catalog: &[Language], query: Option<String>) -> Result<Language> {
    match query {
        Some(query) => {
            if let Ok(id) = query.parse::<u32>() {
                return catalog
                    .iter()
                    .find(|l| l.id == id)
                    .cloned()
                    .with_context(|| format!("language id {} is not in the catalog", id));
            }
            select_language(catalog, &query)
                .cloned()
                .with_context(|| format!("no catalog language matches {:?}", query))
        }
        None => {
            let filtered = filter_catalog(catalog);
            default_language(&filtered)
                .cloned()
                .context("the language catalog has no supported entries")
        }
    }
}

async fn run(
    config: RemexConfig,
    file: PathBuf,
    language: Option<String>,
    stdin: Option<PathBuf>,
) -> Result<()> {
    let judge = Arc::new(config.judge_client());
    let storage = open_storage(&config)?;

    let catalog = judge.languages().await?;
    let selected = resolve_language(&catalog, language)?;
    log::info!("running as {} (id {})", selected.name, selected.id);

    let mut session = ExecutionSession::new(judge, storage, config.poll.policy());
    session.set_language(&selected)?;

    let source = tokio::fs::read_to_string(&file)
        .await
        .with_context(|| format!("failed to read {}", file.display()))?;
    session.set_code(source)?;

    if let Some(path) = stdin {
        let input = tokio::fs::read_to_string(&path)
            .await
            .with_context(|| format!("failed to read {}", path.display()))?;
        session.set_stdin(input)?;
    }

    let outcome = session.run().await;

    print!("{}", outcome.output);
    if !outcome.output.ends_with('\n') && !outcome.output.is_empty() {
        println!();
    }
    if !outcome.warnings.is_empty() {
        eprintln!("warnings:");
        eprintln!("{}", outcome.warnings);
    }
    if outcome.is_error {
        std::process::exit(1);
    }
    Ok(())
}

async fn languages(config: RemexConfig, all: bool) -> Result<()> {
    let judge = config.judge_client();
    let catalog = judge.languages().await?;
    let listed = if all { catalog } else { filter_catalog(&catalog) };
    for language in listed {
        println!("{}\t{}", language.id, language.name);
    }
    Ok(())
}

async fn problem(config: RemexConfig, id: String) -> Result<()> {
    let problems = config
        .problems
        .clone()
        .context("problems.base_url is not configured")?;

    let token = open_storage(&config)?.get(KEY_AUTH_TOKEN)?;
    let client = ProblemClient::new(problems.base_url).with_bearer_token(token);

    let problem = client.fetch_problem(&id).await?;
    println!("{}", problem.title);
    if !problem.description.is_empty() {
        println!();
        println!("{}", problem.description);
    }
    Ok(())
}
