//! `rolo` — command-line front end for the rolo contact store.
//!
//! # Usage
//!
//! ```
//! rolo list --limit 10 --search ada
//! rolo show 3 --json
//! rolo add --name "Ada Lovelace" --phone 555-0100:mobile --email ada@example.com:work
//! rolo star 3
//! rolo rm 3
//! ```
//!
//! The store path comes from `--db`, the `ROLO_DB_PATH` environment
//! variable, or `config.toml`, in that order of precedence.

use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use rolo_core::{
  field::FieldSet,
  id::ContactId,
  label::{EmailLabel, PhoneLabel},
  record::{Contact, EmailEntry, NoteEntry, PhoneEntry},
  store::SortOrder,
  write::NewContact,
};
use rolo_engine::ContactRepository;
use rolo_store_sqlite::SqliteClient;
use serde::Deserialize;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

// ─── CLI args ─────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "rolo", about = "Contacts from the command line")]
struct Cli {
  /// Path to a TOML configuration file.
  #[arg(short, long, default_value = "config.toml")]
  config: PathBuf,

  /// Path to the SQLite store (overrides config and environment).
  #[arg(long, value_name = "FILE")]
  db: Option<PathBuf>,

  #[command(subcommand)]
  command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
  /// List contacts, paginated and optionally filtered by name.
  List {
    #[arg(long, default_value_t = 25)]
    limit:  u32,
    #[arg(long, default_value_t = 0)]
    offset: u32,
    /// Substring filter on the display name.
    #[arg(long)]
    search: Option<String>,
    /// Sort Z→A instead of A→Z.
    #[arg(long)]
    reverse: bool,
  },
  /// Show one contact with all of its fields.
  Show {
    id: String,
    /// Emit the record as JSON instead of text.
    #[arg(long)]
    json: bool,
  },
  /// Create a contact.
  Add {
    #[arg(long)]
    name: Option<String>,
    /// Phone entry as `number[:label]`; repeatable.
    #[arg(long)]
    phone: Vec<String>,
    /// Email entry as `address[:label]`; repeatable.
    #[arg(long)]
    email: Vec<String>,
    #[arg(long)]
    note: Option<String>,
    #[arg(long)]
    starred: bool,
  },
  /// Delete a contact.
  Rm { id: String },
  /// Set or clear the starred flag.
  Star {
    id: String,
    #[arg(long)]
    unset: bool,
  },
}

// ─── Config file ──────────────────────────────────────────────────────────────

/// Shape of the optional TOML config file.
#[derive(Debug, Clone, Deserialize)]
struct CliConfig {
  #[serde(default = "default_db_path")]
  db_path: PathBuf,
}

fn default_db_path() -> PathBuf {
  PathBuf::from("rolo.db")
}

// ─── Entry point ──────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::WARN.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();

  let settings = config::Config::builder()
    .add_source(config::File::from(cli.config.clone()).required(false))
    .add_source(config::Environment::with_prefix("ROLO"))
    .build()
    .context("failed to read configuration")?;
  let file_cfg: CliConfig = settings
    .try_deserialize()
    .context("failed to parse configuration")?;

  // CLI flag overrides config file and environment.
  let db_path = expand_tilde(&cli.db.unwrap_or(file_cfg.db_path));

  tracing::debug!(?db_path, "opening store");
  let client = SqliteClient::open(&db_path)
    .await
    .with_context(|| format!("failed to open store at {db_path:?}"))?;
  let repo = ContactRepository::new(client);

  match cli.command {
    Command::List { limit, offset, search, reverse } => {
      let sort = if reverse {
        SortOrder::NameDesc
      } else {
        SortOrder::NameAsc
      };
      let ids = repo
        .get_all_ids(limit, offset, search.as_deref(), Some(sort))
        .await?;
      let contacts = repo
        .get_all(&FieldSet::all(), Some(&ids))
        .await?;
      if contacts.is_empty() {
        println!("no contacts");
      }
      for contact in &contacts {
        println!("{}", summary_line(contact));
      }
    }

    Command::Show { id, json } => {
      let id = ContactId(id);
      let Some(contact) = repo.get_by_id(&FieldSet::all(), &id).await? else {
        anyhow::bail!("contact {id} not found");
      };
      if json {
        println!("{}", serde_json::to_string_pretty(&contact)?);
      } else {
        print_contact(&contact);
      }
    }

    Command::Add { name, phone, email, note, starred } => {
      let mut new = NewContact { name, starred, ..Default::default() };
      for raw in &phone {
        let (number, label) = split_entry(raw);
        new
          .phones
          .push(PhoneEntry::new(number, PhoneLabel::from_store(label)));
      }
      for raw in &email {
        let (address, label) = split_entry(raw);
        new
          .emails
          .push(EmailEntry::new(address, EmailLabel::from_store(label)));
      }
      if let Some(text) = note {
        new.note = Some(NoteEntry::new(text));
      }
      let id = repo.insert(new).await?;
      println!("created contact {id}");
    }

    Command::Rm { id } => {
      let id = ContactId(id);
      if repo.delete(&id).await? {
        println!("deleted contact {id}");
      } else {
        println!("contact {id} was already gone");
      }
    }

    Command::Star { id, unset } => {
      let id = ContactId(id);
      if repo.starred().set(&id, !unset).await? {
        println!("contact {id} {}", if unset { "unstarred" } else { "starred" });
      } else {
        anyhow::bail!("contact {id} not found");
      }
    }
  }

  Ok(())
}

// ─── Output helpers ───────────────────────────────────────────────────────────

fn summary_line(contact: &Contact) -> String {
  let star = if contact.starred == Some(true) { "*" } else { " " };
  let name = contact.name.as_deref().unwrap_or("(unnamed)");
  let mut line = format!("{star} {:>4}  {name}", contact.id);
  if let Some(phone) = contact.phones.first() {
    line.push_str(&format!("  {}", phone.number));
  }
  if let Some(email) = contact.emails.first() {
    line.push_str(&format!("  <{}>", email.address));
  }
  line
}

fn print_contact(contact: &Contact) {
  println!("id:      {}", contact.id);
  println!("name:    {}", contact.name.as_deref().unwrap_or("(unnamed)"));
  if contact.starred == Some(true) {
    println!("starred: yes");
  }
  for phone in &contact.phones {
    println!("phone:   {} ({})", phone.number, phone.label.as_store());
  }
  for email in &contact.emails {
    println!("email:   {} ({})", email.address, email.label.as_store());
  }
  for address in &contact.addresses {
    let parts: Vec<&str> = [
      address.street.as_deref(),
      address.city.as_deref(),
      address.region.as_deref(),
      address.postal_code.as_deref(),
      address.country.as_deref(),
    ]
    .into_iter()
    .flatten()
    .collect();
    println!(
      "address: {} ({})",
      parts.join(", "),
      address.label.as_store()
    );
  }
  if let Some(org) = &contact.organization {
    match &org.title {
      Some(title) => println!("org:     {title} at {}", org.company),
      None => println!("org:     {}", org.company),
    }
  }
  for event in &contact.events {
    println!("event:   {} ({})", event.date, event.label.as_store());
  }
  for relation in &contact.relations {
    println!("rel:     {} ({})", relation.name, relation.label.as_store());
  }
  for website in &contact.websites {
    println!("url:     {} ({})", website.url, website.label.as_store());
  }
  if let Some(note) = &contact.note {
    println!("note:    {}", note.text);
  }
}

/// Split `value[:label]`, defaulting the label to blank (which label
/// mappers read as their default variant).
fn split_entry(raw: &str) -> (&str, &str) {
  match raw.rsplit_once(':') {
    Some((value, label)) => (value, label),
    None => (raw, ""),
  }
}

/// Expand a leading `~` to the user's home directory.
fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}
