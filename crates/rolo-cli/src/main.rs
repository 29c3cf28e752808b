//! `rolo` — command-line client for the rolo contact manager.
//!
//! # Usage
//!
//! ```
//! rolo signup --email alice@example.com
//! rolo --user <uuid> list
//! rolo --user <uuid> search --mode school --query mit
//! rolo --user <uuid> add --name "Bob Jones" --born 1985-07-01 --met "school reunion"
//! ```

mod client;
mod registry;
mod session;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use chrono::{NaiveDate, Utc};
use clap::{Parser, Subcommand};
use rolo_core::{
  contact::{ChannelKind, Comment, Contact, ContactChannel, ContactDraft},
  filter::SearchMode,
  subscription::{self, EntryRoute},
};
use serde::Deserialize;
use uuid::Uuid;

use client::{ApiConfig, ApiStore};
use registry::{Registry, default_professions};
use session::ContactSession;

// ─── CLI args ─────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "rolo", about = "Command-line client for the rolo contact manager")]
struct Args {
  /// Path to a TOML config file (url, user_id, data_dir).
  #[arg(short, long, value_name = "FILE")]
  config: Option<PathBuf>,

  /// Base URL of the rolo server (default: http://localhost:8374).
  #[arg(long, env = "ROLO_URL")]
  url: Option<String>,

  /// Acting user's account id.
  #[arg(long, env = "ROLO_USER")]
  user: Option<Uuid>,

  /// Directory for the advisory registry files.
  #[arg(long, env = "ROLO_DATA_DIR")]
  data_dir: Option<PathBuf>,

  #[command(subcommand)]
  command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
  /// Create an account and print its id.
  Signup {
    #[arg(long)]
    email: String,
  },
  /// Show the account's subscription status and where it routes.
  Status,
  /// Create a hosted checkout session and print its URL.
  Upgrade {
    #[arg(long)]
    email: String,
  },
  /// List contacts, optionally filtered.
  List {
    /// Search mode: name, dob, school, or profession.
    #[arg(long, default_value = "name")]
    mode:  String,
    #[arg(long, default_value = "")]
    query: String,
  },
  /// Add a contact.
  Add {
    #[arg(long)]
    name:            String,
    /// Date of birth (YYYY-MM-DD).
    #[arg(long)]
    born:            NaiveDate,
    /// How you met.
    #[arg(long)]
    met:             String,
    #[arg(long)]
    school:          Option<String>,
    #[arg(long)]
    profession_text: Option<String>,
    /// Profession tags (repeatable).
    #[arg(long = "profession")]
    professions:     Vec<String>,
    /// Email addresses (repeatable).
    #[arg(long = "email")]
    emails:          Vec<String>,
    /// Phone numbers (repeatable).
    #[arg(long = "phone")]
    phones:          Vec<String>,
  },
  /// Add a profession tag to an existing contact.
  Tag { id: Uuid, tag: String },
  /// Append a comment to a contact.
  Comment { id: Uuid, text: String },
  /// Delete a contact.
  Delete { id: Uuid },
}

// ─── Config file ──────────────────────────────────────────────────────────────

/// Shape of the optional TOML config file.
#[derive(Deserialize, Default)]
struct ConfigFile {
  #[serde(default)]
  url:      String,
  #[serde(default)]
  user_id:  Option<Uuid>,
  #[serde(default)]
  data_dir: Option<PathBuf>,
}

fn default_data_dir() -> PathBuf {
  match std::env::var("HOME") {
    Ok(home) => PathBuf::from(home).join(".local/share/rolo"),
    Err(_) => PathBuf::from(".rolo"),
  }
}

// ─── Entry point ──────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
  let args = Args::parse();

  // Load config file if provided.
  let file_cfg: ConfigFile = if let Some(path) = &args.config {
    let raw = std::fs::read_to_string(path)
      .with_context(|| format!("reading config file {}", path.display()))?;
    toml::from_str(&raw).context("parsing config file")?
  } else {
    ConfigFile::default()
  };

  // CLI flags override config file, which overrides defaults.
  let base_url = args
    .url
    .or_else(|| (!file_cfg.url.is_empty()).then(|| file_cfg.url.clone()))
    .unwrap_or_else(|| "http://localhost:8374".to_string());
  let user = args.user.or(file_cfg.user_id);
  let data_dir = args
    .data_dir
    .or(file_cfg.data_dir)
    .unwrap_or_else(default_data_dir);

  let api = ApiStore::new(ApiConfig { base_url })?;

  match args.command {
    Command::Signup { email } => {
      let account = api.create_account(&email).await?;
      println!("created account {}", account.user_id);
      println!("pass it as --user (or set user_id in the config file)");
      Ok(())
    }
    command => {
      let user = user.context("no user id: pass --user or run `rolo signup`")?;
      run_command(api, user, data_dir, command).await
    }
  }
}

async fn run_command(
  api: ApiStore,
  user: Uuid,
  data_dir: PathBuf,
  command: Command,
) -> Result<()> {
  match command {
    Command::Signup { .. } => unreachable!("handled before user resolution"),

    Command::Status => {
      let account = api.fetch_account(user).await?;
      let status = account.subscription_status.as_deref();
      println!("email:  {}", account.email);
      println!("status: {}", status.unwrap_or("none"));
      match subscription::entry_route(status) {
        EntryRoute::Contacts => println!("route:  contacts"),
        EntryRoute::PlanSelection => println!("route:  plan selection"),
      }
      Ok(())
    }

    Command::Upgrade { email } => {
      let url = api.create_checkout_session(user, &email).await?;
      println!("open to finish checkout:\n{url}");
      Ok(())
    }

    Command::List { mode, query } => {
      let mut session = open_session(api, user).await?;
      session.set_filter(parse_mode(&mode)?, query);
      for contact in session.visible() {
        print_contact(contact);
      }
      Ok(())
    }

    Command::Add {
      name,
      born,
      met,
      school,
      profession_text,
      professions,
      emails,
      phones,
    } => {
      let mut session = open_session(api, user).await?;

      let channels: Vec<ContactChannel> = emails
        .into_iter()
        .map(|value| ContactChannel { kind: ChannelKind::Email, value })
        .chain(
          phones
            .into_iter()
            .map(|value| ContactChannel { kind: ChannelKind::Phone, value }),
        )
        .collect();

      let draft = ContactDraft {
        owner_id:        user,
        name,
        date_of_birth:   born,
        when_we_met:     met,
        school:          school.clone(),
        profession_text,
        professions:     (!professions.is_empty()).then(|| professions.clone()),
        channels:        (!channels.is_empty()).then_some(channels),
        social_media:    None,
        comments:        None,
      };

      let created = session.add_contact(draft).await?;
      note_registries(&data_dir, school.as_deref(), &professions)?;
      println!("created {}", created.id);
      Ok(())
    }

    Command::Tag { id, tag } => {
      let mut session = open_session(api, user).await?;
      let Some(record) = session.open_contact(id).cloned() else {
        bail!("no contact with id {id}");
      };
      // Entry-point duplicate guard; the store itself stays permissive.
      if record.professions.iter().any(|p| p == &tag) {
        println!("{} already tagged {tag:?}", record.name);
        return Ok(());
      }
      let mut edited = record;
      edited.professions.push(tag.clone());
      session.update_contact(edited).await?;
      note_registries(&data_dir, None, std::slice::from_ref(&tag))?;
      println!("tagged");
      Ok(())
    }

    Command::Comment { id, text } => {
      let mut session = open_session(api, user).await?;
      let Some(record) = session.open_contact(id).cloned() else {
        bail!("no contact with id {id}");
      };
      let mut edited = record;
      edited.comments.push(Comment {
        id: Uuid::new_v4(),
        text,
        created_at: Utc::now(),
      });
      session.update_contact(edited).await?;
      println!("commented");
      Ok(())
    }

    Command::Delete { id } => {
      let mut session = open_session(api, user).await?;
      session.delete_contact(id).await?;
      println!("deleted");
      Ok(())
    }
  }
}

// ─── Helpers ──────────────────────────────────────────────────────────────────

/// Apply the subscription gate, then establish the session. The status is
/// whatever the account carries right now; it is not re-checked afterwards.
async fn open_session(api: ApiStore, user: Uuid) -> Result<ContactSession<ApiStore>> {
  let account = api.fetch_account(user).await?;
  match subscription::entry_route(account.subscription_status.as_deref()) {
    EntryRoute::Contacts => Ok(ContactSession::start(api, user).await?),
    EntryRoute::PlanSelection => {
      bail!("subscription required — run `rolo upgrade --email {}`", account.email)
    }
  }
}

fn parse_mode(s: &str) -> Result<SearchMode> {
  Ok(match s {
    "name" => SearchMode::Name,
    "dob" | "dateOfBirth" | "date-of-birth" => SearchMode::DateOfBirth,
    "school" => SearchMode::School,
    "profession" => SearchMode::Profession,
    other => bail!("unknown search mode: {other:?}"),
  })
}

fn print_contact(contact: &Contact) {
  let school = contact.school.as_deref().unwrap_or("-");
  println!(
    "{}  {}  {}  {}",
    contact.id, contact.name, contact.date_of_birth, school
  );
}

fn note_registries(
  data_dir: &Path,
  school: Option<&str>,
  professions: &[String],
) -> Result<()> {
  if let Some(school) = school {
    let mut schools = Registry::load(data_dir.join("schools.json"), Vec::new());
    schools.note(school)?;
  }
  if !professions.is_empty() {
    let mut known =
      Registry::load(data_dir.join("professions.json"), default_professions());
    for profession in professions {
      known.note(profession)?;
    }
  }
  Ok(())
}
