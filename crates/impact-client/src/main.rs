//! Impact Tracker dashboard CLI.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use chrono::Utc;
use clap::{Args, Parser, Subcommand};
use impact_client::{
    ApiClient, CachedPostSource, DashboardPipeline, DashboardView, HttpEmbeddingModel, LocalCache,
    PostSource, SentimentAnalyzer,
};
use impact_core::{DateRange, Filters, Item, SortKey};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "impact-dashboard", version, about = "Impact Tracker dashboard client")]
struct Cli {
    #[command(flatten)]
    connection: ConnectionArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct ConnectionArgs {
    /// API base URL
    #[arg(long, env = "IMPACT_API_URL", default_value = "http://localhost:5000", global = true)]
    base_url: String,

    /// Raw Cookie header carrying the session (e.g. `impact.sid=...`)
    #[arg(long, env = "IMPACT_SESSION_COOKIE", global = true)]
    cookie: Option<String>,

    /// Request timeout in seconds
    #[arg(long, default_value_t = 10, global = true)]
    timeout_secs: u64,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch, score, filter and sort posts
    Dashboard(DashboardArgs),
    /// Score a single text
    Analyze {
        text: String,
        #[arg(long, env = "IMPACT_EMBEDDING_URL")]
        embedding_url: String,
    },
    Items {
        #[command(subcommand)]
        command: ItemsCommand,
    },
    /// Show the signed-in user
    Whoami,
    Logout,
}

#[derive(Args)]
struct DashboardArgs {
    /// Topic to show, `All` for every topic
    #[arg(long, default_value = "All")]
    topic: String,

    /// `7days` or `all`
    #[arg(long, default_value = "7days")]
    date_range: String,

    /// `date` or `likes`; anything else keeps the API order
    #[arg(long, default_value = "date")]
    sort: String,

    /// Embedding endpoint; posts stay unscored without it
    #[arg(long, env = "IMPACT_EMBEDDING_URL")]
    embedding_url: Option<String>,

    /// Directory of the local post cache
    #[arg(long, env = "IMPACT_CACHE_DIR", default_value = ".impact-cache")]
    cache_dir: PathBuf,

    /// Seconds a local copy stays fresh
    #[arg(long, default_value_t = 60)]
    freshness_secs: u64,

    /// Always fetch from the API
    #[arg(long)]
    no_local_cache: bool,

    /// Print the view as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Subcommand)]
enum ItemsCommand {
    List,
    Get { id: String },
    Create { name: String },
    Update { id: String, name: String },
    Delete { id: String },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();

    // Logs go to stderr; stdout carries the command output
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let http = reqwest::Client::builder()
        .timeout(Duration::from_secs(cli.connection.timeout_secs))
        .build()
        .context("failed to build HTTP client")?;

    let mut api = ApiClient::new(&cli.connection.base_url, http.clone())?;
    if let Some(cookie) = &cli.connection.cookie {
        api = api.with_cookie(cookie);
    }

    match cli.command {
        Commands::Dashboard(args) => {
            if args.no_local_cache {
                run_dashboard(api, http, &args).await
            } else {
                let cache = LocalCache::new(&args.cache_dir)
                    .with_freshness(Duration::from_secs(args.freshness_secs));
                run_dashboard(CachedPostSource::new(api, cache), http, &args).await
            }
        },
        Commands::Analyze {
            text,
            embedding_url,
        } => {
            let analyzer = SentimentAnalyzer::new(HttpEmbeddingModel::new(embedding_url, http));
            match analyzer.analyze(&text).await? {
                Some(sentiment) => println!("{} ({:.4})", sentiment.label, sentiment.score),
                None => println!("No sentiment for blank text"),
            }
            Ok(())
        },
        Commands::Items { command } => run_items(&api, command).await,
        Commands::Whoami => {
            let user = api.current_user().await?;
            match &user.email {
                Some(email) => println!("{} <{}>", user.display_name, email),
                None => println!("{}", user.display_name),
            }
            Ok(())
        },
        Commands::Logout => {
            println!("{}", api.logout().await?);
            Ok(())
        },
    }
}

async fn run_dashboard<S: PostSource>(
    source: S,
    http: reqwest::Client,
    args: &DashboardArgs,
) -> Result<()> {
    let analyzer = args
        .embedding_url
        .as_ref()
        .map(|url| SentimentAnalyzer::new(HttpEmbeddingModel::new(url.clone(), http)));

    let filters = Filters::default()
        .with_topic(&args.topic)
        .with_date_range(args.date_range.parse().unwrap_or(DateRange::AllTime));
    let sort: SortKey = args.sort.parse().unwrap_or_default();

    let view = DashboardPipeline::new(source, analyzer)
        .load(&filters, &sort, Utc::now())
        .await?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&view)?);
    } else {
        print_view(&view);
    }
    Ok(())
}

fn print_view(view: &DashboardView) {
    println!(
        "Posts: {}  Likes: {}",
        view.summary.total_posts, view.summary.total_likes
    );
    println!("Topics: {}", view.topics.join(", "));
    for (topic, count) in &view.summary.topic_counts {
        println!("  {:<16} {}", topic, count);
    }
    if !view.sentiment_counts.is_empty() {
        let counts: Vec<String> = view
            .sentiment_counts
            .iter()
            .map(|(label, count)| format!("{}: {}", label, count))
            .collect();
        println!("Sentiment: {}", counts.join("  "));
    }
    println!();

    for annotated in &view.posts {
        let post = &annotated.post;
        let sentiment = annotated
            .sentiment
            .map(|s| s.label.to_string())
            .unwrap_or_else(|| "-".to_string());
        println!(
            "{}  {:<14} {:>5} likes {:>4} shares  {:<8}  {}",
            post.date.format("%Y-%m-%d"),
            post.topic,
            post.likes,
            post.shares,
            sentiment,
            post.text
        );
    }
}

fn print_item(item: &Item) {
    println!("{}  {}  (updated {})", item.id, item.name, item.updated_at);
}

async fn run_items(api: &ApiClient, command: ItemsCommand) -> Result<()> {
    match command {
        ItemsCommand::List => {
            for item in api.list_items().await? {
                print_item(&item);
            }
        },
        ItemsCommand::Get { id } => print_item(&api.get_item(&id).await?),
        ItemsCommand::Create { name } => print_item(&api.create_item(&name).await?),
        ItemsCommand::Update { id, name } => print_item(&api.update_item(&id, &name).await?),
        ItemsCommand::Delete { id } => println!("{}", api.delete_item(&id).await?),
    }
    Ok(())
}
