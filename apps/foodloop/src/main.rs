use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::Utc;
use clap::{Args, Parser, Subcommand};
use mimalloc::MiMalloc;
use runtime::{AppConfig, AppConfigProvider, CliArgs, ConfigProvider};
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use food_share::config::FoodShareConfig;
use food_share::contract::{
    Credentials, FoodPost, FoodShareApi, GeoPoint, NewFoodPost, PostStatus, Role, User,
};
use food_share::domain::access::{authorize, Access, Route};
use food_share::domain::{badges, insights};
use food_share::FoodShare;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

/// FoodLoop - surplus food sharing between donors and volunteers
#[derive(Parser)]
#[command(name = "foodloop")]
#[command(about = "FoodLoop - surplus food sharing between donors and volunteers")]
#[command(version = "0.1.0")]
struct Cli {
    /// Path to configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Print current configuration and exit
    #[arg(long)]
    print_config: bool,

    /// Log verbosity level (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Keep posts in memory only
    #[arg(long)]
    ephemeral: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Check configuration and storage
    Check,
    /// Work with food posts
    #[command(subcommand)]
    Posts(PostsCommand),
    /// Show a volunteer's badge progress
    Badges(SessionArgs),
    /// Resolve a page path for a visitor
    Route {
        path: String,
        /// Visitor email; anonymous when omitted
        #[arg(long)]
        email: Option<String>,
        #[arg(long, default_value = "donor")]
        role: Role,
    },
}

#[derive(Subcommand)]
enum PostsCommand {
    /// List posts, newest first
    List {
        #[arg(long)]
        status: Option<PostStatus>,
        /// Match food or donor name
        #[arg(long)]
        search: Option<String>,
        /// Only posts whose pickup is under two hours away
        #[arg(long)]
        urgent: bool,
        #[arg(long)]
        json: bool,
    },
    /// Publish a donation as a donor
    Create(CreateArgs),
    /// Claim an available post as a volunteer
    Claim {
        id: Uuid,
        #[command(flatten)]
        session: SessionArgs,
    },
    /// Overwrite a post's status
    Status {
        id: Uuid,
        status: PostStatus,
        #[arg(long)]
        claimed_by: Option<String>,
    },
    /// Remove a post
    Delete { id: Uuid },
}

#[derive(Args)]
struct SessionArgs {
    #[arg(long)]
    email: String,
    #[arg(long, default_value = "foodloop")]
    password: String,
}

#[derive(Args)]
struct CreateArgs {
    #[command(flatten)]
    session: SessionArgs,
    #[arg(long)]
    food: String,
    #[arg(long)]
    quantity: String,
    /// YYYY-MM-DD
    #[arg(long)]
    date: String,
    /// HH:MM
    #[arg(long)]
    time: String,
    #[arg(long)]
    contact: String,
    #[arg(long)]
    address: String,
    /// Kilograms
    #[arg(long)]
    weight: Option<f64>,
    #[arg(long)]
    description: Option<String>,
    #[arg(long, requires = "lng")]
    lat: Option<f64>,
    #[arg(long, requires = "lat")]
    lng: Option<f64>,
    /// Photo URL or data URI (repeatable)
    #[arg(long = "photo")]
    photos: Vec<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let args = CliArgs {
        config: cli.config.as_ref().map(|p| p.to_string_lossy().to_string()),
        print_config: cli.print_config,
        verbose: cli.verbose,
    };

    // Load configuration (normalized home_dir is applied inside)
    let mut config = AppConfig::load_or_default(cli.config.as_deref())?;
    config.apply_cli_overrides(&args);

    let logging_config = config.logging.as_ref().cloned().unwrap_or_default();
    runtime::logging::init_logging_from_config(&logging_config, &config.home_dir());
    tracing::info!("FoodLoop starting");

    if cli.print_config {
        println!("{}", config.to_yaml()?);
        return Ok(());
    }

    let provider = AppConfigProvider::new(config.clone());
    let module_cfg: FoodShareConfig = provider.module_config("food_share")?;

    match cli.command.unwrap_or(Commands::Check) {
        Commands::Check => check_config(config, module_cfg, cli.ephemeral).await,
        Commands::Posts(cmd) => {
            let module = open(&config, module_cfg, cli.ephemeral).await?;
            run_posts(module.client(), cmd).await
        }
        Commands::Badges(session) => {
            let module = open(&config, module_cfg, cli.ephemeral).await?;
            show_badges(module.client(), session).await
        }
        Commands::Route { path, email, role } => {
            let module = open(&config, module_cfg, true).await?;
            let client = module.client();
            let visitor = match email {
                Some(email) => Some(sign_in(&client, &email, "foodloop", role).await?),
                None => None,
            };
            let route = Route::parse(&path);
            match authorize(route, visitor.as_ref()) {
                Access::Allow => println!("allow {route}"),
                Access::Redirect(to) => println!("redirect {to}"),
            }
            Ok(())
        }
    }
}

async fn open(config: &AppConfig, cfg: FoodShareConfig, ephemeral: bool) -> Result<FoodShare> {
    FoodShare::init(cfg, &config.home_dir(), ephemeral)
        .await
        .context("failed to initialise food_share")
}

async fn check_config(config: AppConfig, cfg: FoodShareConfig, ephemeral: bool) -> Result<()> {
    tracing::info!("Checking configuration...");
    let module = open(&config, cfg, ephemeral).await?;
    tracing::info!("Configuration is valid");
    println!("Configuration check passed");
    match module.storage_path() {
        Some(path) => println!("Storage: {}", path.display()),
        None => println!("Storage: in-memory"),
    }
    println!("Posts: {}", module.client().posts().len());
    println!("{}", config.to_yaml()?);
    Ok(())
}

/// Sign in, abandoning the attempt on Ctrl+C.
async fn sign_in(
    client: &Arc<dyn FoodShareApi>,
    email: &str,
    password: &str,
    role: Role,
) -> Result<User> {
    let cancel = CancellationToken::new();
    let on_signal = cancel.clone();
    let watcher = tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("interrupt received; cancelling sign-in");
            on_signal.cancel();
        }
    });

    let result = client
        .login(
            Credentials {
                email: email.to_string(),
                password: password.to_string(),
                role,
            },
            cancel,
        )
        .await;
    watcher.abort();
    result.with_context(|| format!("sign-in as {role} failed"))
}

async fn run_posts(client: Arc<dyn FoodShareApi>, cmd: PostsCommand) -> Result<()> {
    match cmd {
        PostsCommand::List {
            status,
            search,
            urgent,
            json,
        } => {
            let now = Utc::now();
            let posts = client.posts();
            let scoped: Vec<&FoodPost> = posts
                .iter()
                .filter(|p| status.map_or(true, |s| p.status == s))
                .filter(|p| !urgent || insights::is_urgent(p, now))
                .collect();
            let shown = insights::search(&scoped, search.as_deref().unwrap_or_default());

            if json {
                println!("{}", serde_json::to_string_pretty(&shown)?);
                return Ok(());
            }
            if shown.is_empty() {
                println!("No posts");
                return Ok(());
            }
            for p in shown {
                print_post(p, now);
            }
            Ok(())
        }
        PostsCommand::Create(a) => {
            sign_in(&client, &a.session.email, &a.session.password, Role::Donor).await?;
            let location = a.lat.zip(a.lng).map(|(lat, lng)| GeoPoint { lat, lng });
            let post = client
                .create_food_post(NewFoodPost {
                    food_name: a.food,
                    quantity: a.quantity,
                    pickup_date: a.date,
                    pickup_time: a.time,
                    contact_number: a.contact,
                    address: a.address,
                    estimated_weight: a.weight,
                    description: a.description,
                    location,
                    photos: a.photos,
                })
                .await?;
            println!("Created {}", post.id);
            print_notifications(&client);
            Ok(())
        }
        PostsCommand::Claim { id, session } => {
            sign_in(&client, &session.email, &session.password, Role::Volunteer).await?;
            let post = client.claim_post(id).await?;
            println!(
                "Claimed {} from {} at {}",
                post.food_name, post.donor_name, post.address
            );
            println!("Directions: {}", insights::directions_url(&post.address));
            print_notifications(&client);
            Ok(())
        }
        PostsCommand::Status {
            id,
            status,
            claimed_by,
        } => {
            let post = client.update_post_status(id, status, claimed_by).await?;
            println!("{} is now {}", post.id, post.status);
            Ok(())
        }
        PostsCommand::Delete { id } => {
            client.delete_post(id).await?;
            println!("Deleted {id}");
            Ok(())
        }
    }
}

async fn show_badges(client: Arc<dyn FoodShareApi>, session: SessionArgs) -> Result<()> {
    let user = sign_in(&client, &session.email, &session.password, Role::Volunteer).await?;
    let summary = insights::VolunteerSummary::compute(&client.posts(), user.id, Utc::now());
    println!(
        "{}: {} claims, {:.1} kg saved, {} this month",
        user.name, summary.total_claims, summary.total_food_saved, summary.this_month
    );
    for badge in badges::CATALOG.iter() {
        let mark = if badges::is_earned(badge, &user.stats) {
            "x"
        } else {
            " "
        };
        println!(
            "[{mark}] {} {:<16} {:>5.1}%  {}",
            badge.icon,
            badge.name,
            badges::progress(badge, &user.stats),
            badge.description
        );
    }
    if let Some(next) = badges::next_badge(&user.stats) {
        println!(
            "Next: {} ({} to go)",
            next.name,
            badges::remaining(next, &user.stats)
        );
    }
    Ok(())
}

fn print_post(p: &FoodPost, now: chrono::DateTime<Utc>) {
    let mut flags = Vec::new();
    if insights::is_recent(p, now) {
        flags.push("new");
    }
    if p.status == PostStatus::Available && insights::is_urgent(p, now) {
        flags.push("urgent");
    }
    println!(
        "{}  {:<9} {} ({}) from {}, pickup {} {} at {}{}",
        p.id,
        p.status,
        p.food_name,
        p.quantity,
        p.donor_name,
        p.pickup_date,
        p.pickup_time,
        p.address,
        if flags.is_empty() {
            String::new()
        } else {
            format!(" [{}]", flags.join(", "))
        }
    );
    if let Some(by) = &p.claimed_by {
        println!("    claimed by {by}");
    }
}

fn print_notifications(client: &Arc<dyn FoodShareApi>) {
    for n in client.notifications() {
        println!("{} {}: {}", n.kind.icon(), n.title, n.message);
    }
}
