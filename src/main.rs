use anyhow::Result;
use clap::{Parser, Subcommand};

use dossier::cli::{category, contact, interaction, profile, reminder};
use dossier::config::Config;
use dossier::seed;
use dossier::store::DossierStore;

#[derive(Parser)]
#[command(name = "dossier")]
#[command(about = "Local-first personal relationship manager")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Config file path
    #[arg(short, long, default_value = "dossier.yaml")]
    config: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize the database and seed the default categories
    Init,

    /// Contact management
    Contact {
        #[command(subcommand)]
        command: ContactCommands,
    },

    /// Log an interaction with a contact
    Log {
        /// Contact (ID, ID prefix, or name substring)
        contact: String,

        /// Channel: meeting, call, chat, email, other
        #[arg(short = 'n', long, default_value = "other")]
        channel: String,

        /// What happened
        #[arg(short, long)]
        summary: Option<String>,

        /// Interaction timestamp (ISO 8601, defaults to now)
        #[arg(long)]
        date: Option<String>,

        /// Duration in minutes
        #[arg(long)]
        duration: Option<i64>,

        /// Subjective usefulness, 1..5
        #[arg(long)]
        usefulness: Option<i64>,

        /// Agreed next step
        #[arg(long)]
        next_step: Option<String>,

        /// Next step due date (ISO 8601)
        #[arg(long)]
        next_step_due: Option<String>,

        /// The next step agreed earlier was completed
        #[arg(long)]
        next_step_done: bool,
    },

    /// Interaction history for a contact
    History {
        /// Contact (ID, ID prefix, or name substring)
        contact: String,

        #[arg(short, long, default_value_t = 20)]
        limit: usize,

        #[arg(short, long, default_value_t = 0)]
        offset: usize,
    },

    /// Category taxonomy
    Category {
        #[command(subcommand)]
        command: CategoryCommands,
    },

    /// Reminders
    Remind {
        #[command(subcommand)]
        command: RemindCommands,
    },

    /// Social profiles
    Profile {
        #[command(subcommand)]
        command: ProfileCommands,
    },

    /// Set the user-assigned 1..5 value rating for a contact
    Value {
        /// Contact (ID, ID prefix, or name substring)
        contact: String,
        /// Rating, 1..5
        value: i64,
    },
}

#[derive(Subcommand)]
enum ContactCommands {
    /// Create a contact
    Add {
        first_name: String,
        last_name: Option<String>,

        #[arg(long = "phone")]
        phones: Vec<String>,

        #[arg(long = "email")]
        emails: Vec<String>,

        #[arg(short, long)]
        organization: Option<String>,

        #[arg(short, long)]
        position: Option<String>,

        /// Birthday (ISO date)
        #[arg(short, long)]
        birthday: Option<String>,

        #[arg(short, long)]
        notes: Option<String>,

        #[arg(long = "tag")]
        tags: Vec<String>,
    },
    /// Show a contact's dossier
    Show { contact: String },
    /// Search contacts by name or organization
    Search {
        #[arg(default_value = "")]
        query: String,
    },
    /// Delete a contact
    Delete { contact: String },
}

#[derive(Subcommand)]
enum CategoryCommands {
    /// List categories with contact counts
    List,
    /// Create a category
    Create {
        name: String,
        /// Kind: simple, fixed, org, interest
        #[arg(short, long, default_value = "simple")]
        kind: String,
    },
    /// Delete a category, its subcategories and all links into them
    Delete { category: String },
    /// Add a subcategory to a category
    Subcategory { category: String, name: String },
    /// Put a contact into a category
    Assign { contact: String, category: String },
    /// Take a contact out of a category
    Unassign { contact: String, category: String },
    /// Put a contact into a category's subcategory
    AssignSub {
        contact: String,
        category: String,
        subcategory: String,
    },
    /// Contacts with no category at all
    Unsorted,
    /// Contacts in a category but in none of its subcategories
    Refine { category: String },
}

#[derive(Subcommand)]
enum RemindCommands {
    /// Create a reminder
    Add {
        title: String,

        #[arg(short, long)]
        contact: Option<String>,

        /// Kind: birthday, followup, nextStep
        #[arg(short, long, default_value = "followup")]
        kind: String,

        /// Due date (ISO 8601)
        #[arg(short, long)]
        due: String,
    },
    /// List reminders: due ones, or everything for a contact
    List {
        #[arg(short, long)]
        contact: Option<String>,
    },
    /// Mark a reminder done
    Done { id: String },
}

#[derive(Subcommand)]
enum ProfileCommands {
    /// List a contact's social profiles
    List { contact: String },
    /// Attach a social profile URL to a contact
    Attach {
        contact: String,
        url: String,
        /// Source: linkedin, facebook, telegram, github, website, other
        #[arg(short, long, default_value = "website")]
        source: String,
    },
    /// Remove a profile by ID
    Detach { id: String },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load config
    let config = Config::load(&cli.config).unwrap_or_default();

    // Initialize store
    let store = DossierStore::open(&config.database_path())?;

    match cli.command {
        Commands::Init => {
            if config.seed.default_categories {
                let created = seed::default_categories(&store)?;
                println!(
                    "Database ready at {} ({} taxonomy records seeded)",
                    config.database_path().display(),
                    created
                );
            } else {
                println!("Database ready at {}", config.database_path().display());
            }
        }
        Commands::Contact { command } => match command {
            ContactCommands::Add {
                first_name,
                last_name,
                phones,
                emails,
                organization,
                position,
                birthday,
                notes,
                tags,
            } => {
                contact::add(
                    &store,
                    first_name,
                    last_name,
                    phones,
                    emails,
                    organization,
                    position,
                    birthday,
                    notes,
                    tags,
                )?;
            }
            ContactCommands::Show { contact } => {
                contact::show(&store, &contact)?;
            }
            ContactCommands::Search { query } => {
                contact::search(&store, &query, config.search.limit)?;
            }
            ContactCommands::Delete { contact } => {
                contact::delete(&store, &contact)?;
            }
        },
        Commands::Log {
            contact,
            channel,
            summary,
            date,
            duration,
            usefulness,
            next_step,
            next_step_due,
            next_step_done,
        } => {
            interaction::log(
                &store,
                &contact,
                &channel,
                summary,
                date,
                duration,
                usefulness,
                next_step,
                next_step_due,
                next_step_done,
            )?;
        }
        Commands::History {
            contact,
            limit,
            offset,
        } => {
            interaction::history(&store, &contact, limit, offset)?;
        }
        Commands::Category { command } => match command {
            CategoryCommands::List => {
                category::list(&store)?;
            }
            CategoryCommands::Create { name, kind } => {
                category::create(&store, name, &kind)?;
            }
            CategoryCommands::Delete { category } => {
                category::delete(&store, &category)?;
            }
            CategoryCommands::Subcategory { category, name } => {
                category::add_subcategory(&store, &category, name)?;
            }
            CategoryCommands::Assign { contact, category } => {
                category::assign(&store, &contact, &category)?;
            }
            CategoryCommands::Unassign { contact, category } => {
                category::unassign(&store, &contact, &category)?;
            }
            CategoryCommands::AssignSub {
                contact,
                category,
                subcategory,
            } => {
                category::assign_subcategory(&store, &contact, &category, &subcategory)?;
            }
            CategoryCommands::Unsorted => {
                category::unsorted(&store)?;
            }
            CategoryCommands::Refine { category } => {
                category::refine(&store, &category)?;
            }
        },
        Commands::Remind { command } => match command {
            RemindCommands::Add {
                title,
                contact,
                kind,
                due,
            } => {
                reminder::add(&store, title, contact, &kind, due)?;
            }
            RemindCommands::List { contact } => {
                reminder::list(&store, contact)?;
            }
            RemindCommands::Done { id } => {
                reminder::done(&store, &id)?;
            }
        },
        Commands::Profile { command } => match command {
            ProfileCommands::List { contact } => {
                profile::list(&store, &contact)?;
            }
            ProfileCommands::Attach {
                contact,
                url,
                source,
            } => {
                profile::attach(&store, &contact, url, &source)?;
            }
            ProfileCommands::Detach { id } => {
                profile::detach(&store, &id)?;
            }
        },
        Commands::Value { contact, value } => {
            contact::set_value(&store, &contact, value)?;
        }
    }

    Ok(())
}
