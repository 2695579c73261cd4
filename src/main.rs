//! # Digital Hub CLI (`hub`)
//!
//! Reads site content from the configured store, talks to the chat
//! webhook, submits contact forms, and runs the content API server.
//!
//! ## Usage
//!
//! ```bash
//! hub --config ./config/hub.toml <command>
//! ```
//!
//! ## Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `hub list <collection>` | Print every record of a collection |
//! | `hub get <collection> <id>` | Print one record |
//! | `hub faqs` | FAQs in display order, optionally by category |
//! | `hub home` | Fetch the home page snapshot |
//! | `hub blog` | Blog index: first posts with author and date |
//! | `hub team` | Team members with initials and role |
//! | `hub solutions` | Solutions with their top key benefits |
//! | `hub chat` | Chat with the site assistant |
//! | `hub session show\|reset` | Inspect or clear the chat identity |
//! | `hub contact` | Submit the contact form |
//! | `hub serve` | Start the content API server |
//!
//! Logging goes to stderr and is controlled by `RUST_LOG`.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use digital_hub::chat::{ChatTexts, ChatWidget, ExchangeOutcome};
use digital_hub::config::{self, Config};
use digital_hub::contact::{ContactFormController, ContactStatus};
use digital_hub::content;
use digital_hub::models::{Faq, Solution, TeamMember};
use digital_hub::server;
use digital_hub::session::{ChatSession, FileTokenStorage, TokenStorage, SESSION_KEY};
use digital_hub::store::{create_store, DataService, DocumentStore};
use digital_hub::webhook::{ChatTransport, ChatWebhook, ContactForm, ContactWebhook};

const DEFAULT_CONFIG: &str = "./config/hub.toml";

/// Log filter used when `RUST_LOG` is unset.
const DEFAULT_LOG_FILTER: &str = "warn";

/// Digital Hub CLI: content store client, chat and contact webhooks.
///
/// All commands accept a `--config` flag pointing to a TOML configuration
/// file. When the default path does not exist, built-in defaults are used.
#[derive(Parser)]
#[command(name = "hub", version, about = "Digital Hub: site content, chat and contact tooling")]
struct Cli {
    /// Path to configuration file (TOML).
    #[arg(long, global = true, default_value = DEFAULT_CONFIG)]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print every record of a collection, in store order.
    List {
        /// Collection key (e.g. `blogposts`, `faqs`, `teammembers`).
        collection: String,

        /// Only print the first N records.
        #[arg(long)]
        limit: Option<usize>,

        /// Print raw JSON instead of a table.
        #[arg(long)]
        json: bool,
    },

    /// Print one record by id.
    Get {
        collection: String,
        id: String,

        #[arg(long)]
        json: bool,
    },

    /// FAQs with featured entries first, then by display order.
    Faqs {
        /// Only show this category (`All` shows everything).
        #[arg(long, default_value = content::ALL_CATEGORIES)]
        category: String,
    },

    /// Fetch everything the home page shows and print the counts.
    Home,

    /// Posts listed on the blog index.
    Blog,

    /// Team members as shown on the about page.
    Team,

    /// Solutions with their leading key benefits.
    Solutions,

    /// Chat with the site assistant.
    ///
    /// With `--message`, sends one message and prints the reply. Without it,
    /// reads messages from stdin until EOF or `/quit`.
    Chat {
        #[arg(long)]
        message: Option<String>,
    },

    /// Inspect or clear the stored chat identity.
    Session {
        #[command(subcommand)]
        action: SessionAction,
    },

    /// Submit the contact form.
    Contact {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long, default_value = "")]
        phone: String,
        #[arg(long, default_value = "")]
        company: String,
        #[arg(long)]
        message: String,
    },

    /// Start the content API server.
    Serve,
}

#[derive(Subcommand)]
enum SessionAction {
    /// Print the token, creating one if none is stored.
    Show,
    /// Delete the stored token.
    Reset,
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    let _ = tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(filter)
        .try_init();
}

fn resolve_config(path: &Path) -> Result<Config> {
    if !path.exists() && path == Path::new(DEFAULT_CONFIG) {
        return Ok(Config::minimal());
    }
    config::load_config(path)
}

#[tokio::main]
async fn main() -> Result<()> {
    init_logging();
    let cli = Cli::parse();
    let cfg = resolve_config(&cli.config)?;

    match cli.command {
        Commands::List {
            collection,
            limit,
            json,
        } => run_list(&cfg, &collection, limit, json).await?,
        Commands::Get {
            collection,
            id,
            json,
        } => run_get(&cfg, &collection, &id, json).await?,
        Commands::Faqs { category } => run_faqs(&cfg, &category).await?,
        Commands::Home => run_home(&cfg).await?,
        Commands::Blog => run_blog(&cfg).await?,
        Commands::Team => run_team(&cfg).await?,
        Commands::Solutions => run_solutions(&cfg).await?,
        Commands::Chat { message } => run_chat(&cfg, message).await?,
        Commands::Session { action } => run_session(&cfg, action)?,
        Commands::Contact {
            name,
            email,
            phone,
            company,
            message,
        } => {
            let form = ContactForm {
                name,
                email,
                phone,
                company,
                message,
            };
            run_contact(&cfg, form).await?;
        }
        Commands::Serve => server::run_server(&cfg).await?,
    }

    Ok(())
}

fn data_service(cfg: &Config) -> Result<DataService<Box<dyn DocumentStore>>> {
    Ok(DataService::new(create_store(&cfg.store)?))
}

/// A short human label for a raw record.
fn record_label(record: &serde_json::Value) -> &str {
    const LABEL_FIELDS: [&str; 7] = [
        "title",
        "serviceName",
        "planName",
        "memberName",
        "clientName",
        "question",
        "slug",
    ];
    LABEL_FIELDS
        .iter()
        .find_map(|field| record.get(*field).and_then(|v| v.as_str()))
        .unwrap_or("(untitled)")
}

async fn run_list(cfg: &Config, collection: &str, limit: Option<usize>, json: bool) -> Result<()> {
    let service = data_service(cfg)?;
    let mut page = service
        .get_all::<serde_json::Value>(collection)
        .await
        .with_context(|| format!("Failed to fetch collection '{}'", collection))?;
    if let Some(n) = limit {
        page.items = content::take_front(page.items, n);
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&page)?);
        return Ok(());
    }

    println!("{:<28} TITLE", "ID");
    for record in &page.items {
        let id = record.get("_id").and_then(|v| v.as_str()).unwrap_or("?");
        println!("{:<28} {}", id, record_label(record));
    }
    println!();
    println!("{} records", page.items.len());
    Ok(())
}

async fn run_get(cfg: &Config, collection: &str, id: &str, json: bool) -> Result<()> {
    let service = data_service(cfg)?;
    let record = service
        .get_by_id::<serde_json::Value>(collection, id)
        .await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&record)?);
        return Ok(());
    }

    println!("--- {} ---", record_label(&record));
    if let Some(fields) = record.as_object() {
        for (key, value) in fields {
            match value {
                serde_json::Value::String(s) => println!("{:<24} {}", key, s),
                other => println!("{:<24} {}", key, other),
            }
        }
    }
    Ok(())
}

async fn run_faqs(cfg: &Config, category: &str) -> Result<()> {
    let service = data_service(cfg)?;
    let faqs = content::sort_faqs(service.get_all_of::<Faq>().await?.items);

    println!("categories: {}", content::faq_categories(&faqs).join(", "));
    println!();
    for faq in content::filter_by_category(&faqs, category) {
        let marker = if faq.is_featured.unwrap_or(false) { "*" } else { " " };
        println!("{} Q: {}", marker, faq.question.as_deref().unwrap_or(""));
        println!("  A: {}", faq.answer.as_deref().unwrap_or(""));
    }
    Ok(())
}

async fn run_home(cfg: &Config) -> Result<()> {
    let service = data_service(cfg)?;
    let home = content::load_home(&service)
        .await
        .context("Failed to load home page content")?;

    println!("testimonials:  {}", home.testimonials.len());
    println!("services:      {}", home.services.len());
    println!("solutions:     {}", home.solutions.len());
    println!("case studies:  {}", home.case_studies.len());
    println!("blog posts:    {}", home.blog_posts.len());
    println!("team members:  {}", home.team_members.len());
    println!("pricing plans: {}", home.pricing_plans.len());
    println!("faqs:          {}", home.faqs.len());
    Ok(())
}

async fn run_blog(cfg: &Config) -> Result<()> {
    let service = data_service(cfg)?;
    let posts = content::load_blog(&service).await?;

    for post in &posts {
        println!("{}", post.title.as_deref().unwrap_or("(untitled)"));
        let date = content::format_date(post.publish_date.as_deref());
        match (post.author.as_deref(), date.is_empty()) {
            (Some(author), false) => println!("  by {} on {}", author, date),
            (Some(author), true) => println!("  by {}", author),
            (None, false) => println!("  {}", date),
            (None, true) => {}
        }
    }
    Ok(())
}

async fn run_team(cfg: &Config) -> Result<()> {
    let service = data_service(cfg)?;
    let members = service.get_all_of::<TeamMember>().await?.items;

    for member in &members {
        let name = member.member_name.as_deref().unwrap_or("");
        println!(
            "[{:<2}] {:<28} {}",
            content::initials(name),
            name,
            member.member_role.as_deref().unwrap_or("")
        );
    }
    Ok(())
}

async fn run_solutions(cfg: &Config) -> Result<()> {
    let service = data_service(cfg)?;
    let solutions = service.get_all_of::<Solution>().await?.items;

    for solution in &solutions {
        println!("{}", solution.title.as_deref().unwrap_or("(untitled)"));
        for benefit in content::key_benefits(solution) {
            println!("  - {}", benefit);
        }
    }
    Ok(())
}

async fn run_chat(cfg: &Config, message: Option<String>) -> Result<()> {
    let storage = FileTokenStorage::new(&cfg.session.path);
    let session = ChatSession::init_or_load(&storage)
        .with_context(|| format!("Failed to load chat session from {}", storage.path().display()))?;
    let transport = ChatWebhook::new(&cfg.chat.webhook_url, cfg.chat.timeout_secs)?;
    let mut widget = ChatWidget::new(session, transport, ChatTexts::from(&cfg.chat));
    widget.open();

    if let Some(text) = message {
        widget.set_input(text);
        if widget.send().await != ExchangeOutcome::Ignored {
            print_last(&widget);
        }
        return Ok(());
    }

    print_last(&widget);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        if line.trim() == "/quit" {
            break;
        }
        widget.set_input(line);
        if widget.send().await != ExchangeOutcome::Ignored {
            print_last(&widget);
        }
    }
    widget.close();
    Ok(())
}

fn print_last<T: ChatTransport>(widget: &ChatWidget<T>) {
    if let Some(msg) = widget.transcript().last() {
        println!("bot: {}", msg.text);
    }
}

fn run_session(cfg: &Config, action: SessionAction) -> Result<()> {
    let storage = FileTokenStorage::new(&cfg.session.path);
    match action {
        SessionAction::Show => {
            let session = ChatSession::init_or_load(&storage)?;
            println!("{}", session.token());
        }
        SessionAction::Reset => {
            let had_token = storage.get(SESSION_KEY)?.is_some();
            ChatSession::clear(&storage)?;
            if had_token {
                println!("Chat session cleared.");
            } else {
                println!("No chat session stored.");
            }
        }
    }
    Ok(())
}

async fn run_contact(cfg: &Config, form: ContactForm) -> Result<()> {
    form.validate()?;

    let transport = ContactWebhook::new(&cfg.contact.webhook_url, cfg.contact.timeout_secs)?;
    let mut controller = ContactFormController::new(transport);
    *controller.form_mut() = form;

    match controller.submit().await {
        ContactStatus::Success => {
            println!("Thank you! Your message has been sent.");
            Ok(())
        }
        _ => anyhow::bail!("Failed to send message. Please try again or email info@swadhindigitalhub.com"),
    }
}
