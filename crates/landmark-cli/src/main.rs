//! Landmark CLI: admin command-line client for the Landmark API.
//!
//! Set LANDMARK_API_URL (default http://localhost:5000).

use std::path::{Path, PathBuf};

use anyhow::{bail, Context};
use clap::{Args, Parser, Subcommand};
use landmark_api_client::{ApiClient, ContentForm, FormSubmitter};
use landmark_cli::{
    crop_source, init_tracing, parse_selection, prepare_image, read_source, truncate_string,
};
use landmark_core::{ApiResponse, Client, ContentKind, Pagination, Project};
use landmark_processing::Rect;
use serde::Serialize;
use uuid::Uuid;

#[derive(Parser)]
#[command(name = "landmark", about = "Landmark back-office CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Crop an image to 450x350 locally
    Crop {
        /// Source image
        input: PathBuf,
        /// Where to write the JPEG
        #[arg(short, long)]
        output: PathBuf,
        /// Selection in source pixels: x,y,width,height
        #[arg(long, value_parser = parse_selection)]
        selection: Option<Rect>,
    },
    /// Manage portfolio projects
    Projects {
        #[command(subcommand)]
        sub: ContentCommands,
    },
    /// Manage client testimonials
    Clients {
        #[command(subcommand)]
        sub: ContentCommands,
    },
    /// Read and triage contact-form submissions
    Contacts {
        #[command(subcommand)]
        sub: ContactCommands,
    },
    /// Newsletter subscriptions
    Subscriptions {
        #[command(subcommand)]
        sub: SubscriptionCommands,
    },
}

#[derive(Args)]
struct PageArgs {
    #[arg(long)]
    page: Option<i64>,
    #[arg(long)]
    limit: Option<i64>,
}

#[derive(Args)]
struct ImageArgs {
    /// Image file to upload
    #[arg(long)]
    image: Option<PathBuf>,
    /// Upload the file as-is instead of cropping it first
    #[arg(long)]
    no_crop: bool,
    /// Crop selection in source pixels: x,y,width,height
    #[arg(long, value_parser = parse_selection)]
    selection: Option<Rect>,
}

#[derive(Subcommand)]
enum ContentCommands {
    List {
        #[command(flatten)]
        paging: PageArgs,
        /// Print raw JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    Get {
        id: Uuid,
    },
    Create {
        #[arg(long)]
        name: String,
        #[arg(long)]
        description: String,
        /// Client designation (clients only)
        #[arg(long)]
        designation: Option<String>,
        #[command(flatten)]
        image: ImageArgs,
    },
    /// Update the given fields; others are kept
    Update {
        id: Uuid,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        description: Option<String>,
        /// Client designation (clients only)
        #[arg(long)]
        designation: Option<String>,
        #[command(flatten)]
        image: ImageArgs,
    },
    Delete {
        id: Uuid,
    },
}

#[derive(Subcommand)]
enum ContactCommands {
    List {
        #[command(flatten)]
        paging: PageArgs,
    },
    /// Number of unread submissions
    Unread,
    /// Mark a submission as read
    Read {
        id: Uuid,
    },
    Delete {
        id: Uuid,
    },
}

#[derive(Subcommand)]
enum SubscriptionCommands {
    /// List active subscriptions
    List {
        #[command(flatten)]
        paging: PageArgs,
    },
    Stats,
    Unsubscribe {
        email: String,
    },
}

fn print_json(value: &impl Serialize) -> anyhow::Result<()> {
    let out = serde_json::to_string_pretty(value).context("Serialize response")?;
    println!("{}", out);
    Ok(())
}

fn print_pagination(pagination: Option<&Pagination>) {
    if let Some(p) = pagination {
        println!("page {}/{} ({} total)", p.page, p.pages.max(1), p.total);
    }
}

fn print_content_table(rows: &[(Uuid, String, String)], pagination: Option<&Pagination>) {
    println!("{:<36}  {:<30}  DESCRIPTION", "ID", "NAME");
    for (id, name, description) in rows {
        println!(
            "{:<36}  {:<30}  {}",
            id,
            truncate_string(name, 30),
            truncate_string(description, 50)
        );
    }
    print_pagination(pagination);
}

fn build_form(
    name: Option<String>,
    description: Option<String>,
    designation: Option<String>,
    image: &ImageArgs,
) -> anyhow::Result<ContentForm> {
    let mut form = ContentForm::new();
    if let Some(name) = name {
        form = form.text("name", name);
    }
    if let Some(description) = description {
        form = form.text("description", description);
    }
    if let Some(designation) = designation {
        form = form.text("designation", designation);
    }
    if let Some(path) = &image.image {
        form = form.image(prepare_image(path, !image.no_crop, image.selection)?);
    }
    Ok(form)
}

fn api_client() -> anyhow::Result<ApiClient> {
    ApiClient::from_env().context("Failed to create API client. Check LANDMARK_API_URL")
}

fn run_crop(input: &Path, output: &Path, selection: Option<Rect>) -> anyhow::Result<()> {
    let source = read_source(input)?;
    let cropped = crop_source(source, selection)
        .with_context(|| format!("Failed to crop {}", input.display()))?;
    std::fs::write(output, &cropped.data)
        .with_context(|| format!("Failed to write {}", output.display()))?;
    println!("Wrote {} ({} bytes)", output.display(), cropped.data.len());
    Ok(())
}

async fn run_content(
    client: ApiClient,
    kind: ContentKind,
    sub: ContentCommands,
) -> anyhow::Result<()> {
    match sub {
        ContentCommands::List { paging, json } => {
            if kind == ContentKind::Project {
                let response = client.list_projects(paging.page, paging.limit).await?;
                if json {
                    return print_json(&response);
                }
                let rows: Vec<_> = response
                    .data
                    .unwrap_or_default()
                    .into_iter()
                    .map(|p| (p.id, p.name, p.description))
                    .collect();
                print_content_table(&rows, response.pagination.as_ref());
            } else {
                let response = client.list_clients(paging.page, paging.limit).await?;
                if json {
                    return print_json(&response);
                }
                let rows: Vec<_> = response
                    .data
                    .unwrap_or_default()
                    .into_iter()
                    .map(|c| (c.id, format!("{} ({})", c.name, c.designation), c.description))
                    .collect();
                print_content_table(&rows, response.pagination.as_ref());
            }
        }
        ContentCommands::Get { id } => match kind {
            ContentKind::Project => print_json(&client.get_project(id).await?)?,
            ContentKind::Client => print_json(&client.get_client(id).await?)?,
        },
        ContentCommands::Create {
            name,
            description,
            designation,
            image,
        } => {
            if kind == ContentKind::Project && designation.is_some() {
                bail!("--designation only applies to clients");
            }
            if image.image.is_none() {
                bail!("{}", kind.image_required());
            }
            let form = build_form(Some(name), Some(description), designation, &image)?;
            let submitter = FormSubmitter::new(client, kind);
            match kind {
                ContentKind::Project => {
                    let response: ApiResponse<Project> = submitter.create(form).await?;
                    print_json(&response)?;
                }
                ContentKind::Client => {
                    let response: ApiResponse<Client> = submitter.create(form).await?;
                    print_json(&response)?;
                }
            }
        }
        ContentCommands::Update {
            id,
            name,
            description,
            designation,
            image,
        } => {
            if kind == ContentKind::Project && designation.is_some() {
                bail!("--designation only applies to clients");
            }
            let form = build_form(name, description, designation, &image)?;
            let submitter = FormSubmitter::new(client, kind);
            match kind {
                ContentKind::Project => {
                    let response: ApiResponse<Project> = submitter.update(id, form).await?;
                    print_json(&response)?;
                }
                ContentKind::Client => {
                    let response: ApiResponse<Client> = submitter.update(id, form).await?;
                    print_json(&response)?;
                }
            }
        }
        ContentCommands::Delete { id } => {
            let response = match kind {
                ContentKind::Project => client.delete_project(id).await?,
                ContentKind::Client => client.delete_client(id).await?,
            };
            print_json(&response)?;
        }
    }
    Ok(())
}

async fn run_contacts(client: ApiClient, sub: ContactCommands) -> anyhow::Result<()> {
    match sub {
        ContactCommands::List { paging } => {
            let response = client.list_contacts(paging.page, paging.limit).await?;
            println!("{:<36}  {:<4}  {:<24}  {:<28}  MESSAGE", "ID", "READ", "NAME", "EMAIL");
            for contact in response.data.unwrap_or_default() {
                println!(
                    "{:<36}  {:<4}  {:<24}  {:<28}  {}",
                    contact.id,
                    if contact.is_read { "yes" } else { "no" },
                    truncate_string(&contact.full_name, 24),
                    truncate_string(&contact.email, 28),
                    truncate_string(contact.message.as_deref().unwrap_or(""), 40)
                );
            }
            print_pagination(response.pagination.as_ref());
        }
        ContactCommands::Unread => {
            let count = client.unread_contacts().await?;
            print_json(&serde_json::json!({ "unreadCount": count }))?;
        }
        ContactCommands::Read { id } => print_json(&client.mark_contact_read(id).await?)?,
        ContactCommands::Delete { id } => print_json(&client.delete_contact(id).await?)?,
    }
    Ok(())
}

async fn run_subscriptions(client: ApiClient, sub: SubscriptionCommands) -> anyhow::Result<()> {
    match sub {
        SubscriptionCommands::List { paging } => {
            let response = client.list_subscriptions(paging.page, paging.limit).await?;
            for subscription in response.data.unwrap_or_default() {
                println!(
                    "{:<36}  {:<40}  {}",
                    subscription.id,
                    subscription.email,
                    subscription.subscribed_at.format("%Y-%m-%d")
                );
            }
            print_pagination(response.pagination.as_ref());
        }
        SubscriptionCommands::Stats => print_json(&client.subscription_stats().await?)?,
        SubscriptionCommands::Unsubscribe { email } => {
            print_json(&client.unsubscribe(&email).await?)?
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    match cli.command {
        Commands::Crop {
            input,
            output,
            selection,
        } => run_crop(&input, &output, selection)?,
        Commands::Projects { sub } => run_content(api_client()?, ContentKind::Project, sub).await?,
        Commands::Clients { sub } => run_content(api_client()?, ContentKind::Client, sub).await?,
        Commands::Contacts { sub } => run_contacts(api_client()?, sub).await?,
        Commands::Subscriptions { sub } => run_subscriptions(api_client()?, sub).await?,
    }

    Ok(())
}
