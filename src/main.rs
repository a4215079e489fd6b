//! gitstory - CLI entry point.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;

use gitstory::commit::{DiffExtractor, digest_commits};
use gitstory::git::{
    Commit, GitRepository, RepositoryAccessor, detect_default_branch, list_commits,
    list_unique_commits, repo_info,
};
use gitstory::llm::{
    ClientConfig, EnvCredentials, Platform, Provider, ProviderClient, SummaryBackend,
    SummaryRequest, build_prompt, detect_available, select_provider,
};
use gitstory::report::{render_document, requirements_warning, write_document};

/// Commit count used when none (or zero) is given.
const DEFAULT_COUNT: usize = 5;

/// Base-branch value that triggers default-branch detection.
const AUTO_BASE: &str = "auto";

/// Turn git commits into summaries for blogs, social posts and notes.
#[derive(Parser, Debug)]
#[command(name = "gitstory")]
#[command(about = "Turn git commits into summaries for blogs, social posts and notes")]
#[command(version)]
struct Cli {
    /// Repository path (defaults to the current directory)
    #[arg(short = 'C', long = "repo", global = true, default_value = ".")]
    repo: PathBuf,

    /// Enable debug logging on stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List recent commits
    List {
        #[command(flatten)]
        selection: Selection,
    },

    /// Show per-commit change statistics
    Analyze {
        #[command(flatten)]
        selection: Selection,

        /// Print the commit summaries as JSON
        #[arg(long)]
        json: bool,
    },

    /// Generate a summary with an LLM provider
    Summarize {
        #[command(flatten)]
        selection: Selection,

        /// Provider to use (openai, gemini, claude); auto-detected if omitted
        #[arg(long)]
        provider: Option<String>,

        /// Output platform (blog, twitter, linkedin, technical, note)
        #[arg(long, default_value = "technical")]
        platform: String,

        /// Extra project context for the prompt
        #[arg(long)]
        context: Option<String>,

        /// Model override
        #[arg(long)]
        model: Option<String>,

        /// Write the summary document to this file
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Print the prompt instead of calling the provider
        #[arg(long)]
        dry_run: bool,
    },

    /// Show repository and provider status
    Status,
}

/// Which commits to operate on.
#[derive(Args, Debug)]
struct Selection {
    /// Number of commits
    #[arg(short = 'n', long = "count", default_value_t = DEFAULT_COUNT)]
    count: usize,

    /// Only commits not reachable from the base branch
    #[arg(long)]
    unique: bool,

    /// Base branch for --unique ("auto" detects main/master)
    #[arg(long, default_value = "main")]
    base: String,
}

impl Selection {
    fn limit(&self) -> usize {
        if self.count < 1 {
            DEFAULT_COUNT
        } else {
            self.count
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let repo = GitRepository::open(&cli.repo).with_context(|| {
        format!(
            "Not a git repository: {}. Run gitstory inside a repository or pass -C <path>.",
            cli.repo.display()
        )
    })?;

    match cli.command {
        Command::List { selection } => list(&repo, &selection),
        Command::Analyze { selection, json } => analyze(&repo, &selection, json),
        Command::Summarize {
            selection,
            provider,
            platform,
            context,
            model,
            output,
            dry_run,
        } => {
            let options = SummarizeOptions {
                provider,
                platform,
                context,
                model,
                output,
                dry_run,
            };
            summarize(&repo, &selection, options).await
        }
        Command::Status => status(&repo),
    }
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Resolve the selection into commits, newest first.
fn select_commits(repo: &GitRepository, selection: &Selection) -> Result<Vec<Commit>> {
    let limit = selection.limit();
    if !selection.unique {
        return list_commits(repo, limit).context("Failed to list commits");
    }

    let base = if selection.base == AUTO_BASE {
        let detected = detect_default_branch(repo).context("Failed to detect default branch")?;
        debug!("Detected default branch: {}", detected);
        detected
    } else {
        selection.base.clone()
    };

    list_unique_commits(repo, &base, limit)
        .with_context(|| format!("Failed to list commits unique to HEAD against '{}'", base))
}

fn list(repo: &GitRepository, selection: &Selection) -> Result<()> {
    let commits = select_commits(repo, selection)?;
    if commits.is_empty() {
        println!("No commits found.");
        return Ok(());
    }

    for commit in &commits {
        println!(
            "{} {} {:<20} {}",
            commit.id.short(),
            commit.timestamp.format("%Y-%m-%d"),
            commit.author,
            commit.subject()
        );
    }
    Ok(())
}

fn analyze(repo: &GitRepository, selection: &Selection, json: bool) -> Result<()> {
    let commits = select_commits(repo, selection)?;
    let summaries = DiffExtractor::new(repo)
        .summarize_all(&commits)
        .context("Failed to extract commit changes")?;

    if json {
        let rendered =
            serde_json::to_string_pretty(&summaries).context("Failed to serialize summaries")?;
        println!("{}", rendered);
        return Ok(());
    }

    for summary in &summaries {
        let stats = &summary.stats;
        println!(
            "{} {} ({} files, +{} -{}{})",
            summary.hash,
            summary.message.lines().next().unwrap_or(""),
            stats.total_files,
            stats.additions,
            stats.deletions,
            stats
                .primary_language
                .as_deref()
                .map(|l| format!(", {}", l))
                .unwrap_or_default()
        );
        for file in &summary.files {
            println!(
                "    {:<10} {} [+{} -{}]",
                file.status.to_string(),
                file.path,
                file.additions,
                file.deletions
            );
        }
    }

    println!("\n{}", digest_commits(&summaries));
    Ok(())
}

struct SummarizeOptions {
    provider: Option<String>,
    platform: String,
    context: Option<String>,
    model: Option<String>,
    output: Option<PathBuf>,
    dry_run: bool,
}

async fn summarize(
    repo: &GitRepository,
    selection: &Selection,
    options: SummarizeOptions,
) -> Result<()> {
    let platform: Platform = options.platform.parse()?;
    let explicit = options
        .provider
        .as_deref()
        .map(str::parse::<Provider>)
        .transpose()?;

    let commits = select_commits(repo, selection)?;
    if commits.is_empty() {
        println!("No commits to summarize.");
        return Ok(());
    }

    let summaries = DiffExtractor::new(repo)
        .summarize_all(&commits)
        .context("Failed to extract commit changes")?;

    let mut request = SummaryRequest::new(summaries, platform);
    if let Some(context) = options.context {
        request = request.with_context(context);
    }

    if options.dry_run {
        println!("--- System ---\n{}\n", platform.system_prompt());
        println!("--- Prompt ---\n{}", build_prompt(&request));
        return Ok(());
    }

    let creds = EnvCredentials;
    let provider = select_provider(explicit, &creds)?;
    let config = ClientConfig::resolve(provider, &creds, options.model.as_deref())?;
    let client = ProviderClient::new(config)?;

    let cancel = CancellationToken::new();
    let on_interrupt = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupted, cancelling request");
            on_interrupt.cancel();
        }
    });

    eprintln!(
        "Generating {} summary of {} commit(s) with {} ({})...",
        platform,
        request.commits.len(),
        provider.display_name(),
        client.model()
    );

    let response = client
        .summarize(&cancel, &request)
        .await
        .with_context(|| format!("Failed to generate summary with {}", provider.display_name()))?;

    match options.output {
        Some(path) => {
            write_document(&path, &response)?;
            println!("{}\n", response.summary);
            println!("✓ Summary written to {}", path.display());
            println!("Stats: {}", response.stats_line());
        }
        None => print!("{}", render_document(&response)),
    }
    if let Some(warning) = requirements_warning(&response) {
        eprintln!("{}", warning);
    }
    Ok(())
}

fn status(repo: &GitRepository) -> Result<()> {
    let info = repo_info(repo);
    let branch = if info.current_branch.is_empty() {
        "(no commits yet)"
    } else {
        info.current_branch.as_str()
    };

    println!("Repository: {}", info.path);
    println!("Branch:     {}", branch);
    println!(
        "Remote:     {}",
        info.remote_url.as_deref().unwrap_or("(none)")
    );
    println!("Commits:    {}", info.commit_count);

    match detect_default_branch(repo) {
        Ok(default) => println!("Default:    {}", default),
        Err(e) => debug!("No default branch: {}", e),
    }

    let available = detect_available(&EnvCredentials);
    if available.is_empty() {
        println!("Providers:  none configured");
        for provider in Provider::PRIORITY {
            println!("            set {} to enable {}", provider.env_var(), provider);
        }
    } else {
        let names: Vec<&str> = available.iter().map(|p| p.as_str()).collect();
        println!("Providers:  {}", names.join(", "));
    }

    debug!("Repository root: {}", repo.path().display());
    Ok(())
}
