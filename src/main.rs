use anyhow::Result;
use clap::Parser;
use snote::auth::SignupRequest;
use snote::commands::{self, Config, NoteListing, Options};
use snote::notes::{NoteFilter, NoteKind};
use std::path::PathBuf;
use std::time::Duration;

/// snote - SimpleNote command-line client
///
/// Sign in once with `snote login`; the access and refresh tokens are kept in
/// the config directory and refreshed automatically when the access token
/// expires.
///
/// Examples:
///   snote login alice --password secret
///   snote notes list --pinned
#[derive(Parser, Debug)]
#[command(author, version = env!("SNOTE_VERSION"), about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Backend base URL (defaults to http://127.0.0.1:8000/)
    #[arg(long = "api-url", env = "SNOTE_API_URL", value_name = "URL", global = true)]
    pub api_url: Option<String>,

    /// Directory holding the stored credentials
    #[arg(
        long = "config-dir",
        env = "SNOTE_CONFIG_DIR",
        value_name = "PATH",
        global = true
    )]
    pub config_dir: Option<PathBuf>,

    /// Request timeout in seconds
    #[arg(long, env = "SNOTE_TIMEOUT", value_name = "SECS", global = true)]
    pub timeout: Option<u64>,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Sign in and store the tokens
    Login(LoginArgs),

    /// Forget the stored tokens
    Logout,

    /// Create a new account
    Signup(SignupArgs),

    /// Show the signed-in user
    Whoami,

    /// Show whether credentials are stored
    Status,

    /// Change the account password
    Passwd(PasswdArgs),

    /// Work with notes
    #[command(subcommand)]
    Notes(NotesCommand),
}

#[derive(clap::Args, Debug)]
pub struct LoginArgs {
    #[arg(value_name = "USERNAME")]
    pub username: String,

    #[arg(long, env = "SNOTE_PASSWORD", hide_env_values = true)]
    pub password: String,
}

#[derive(clap::Args, Debug)]
pub struct SignupArgs {
    #[arg(value_name = "USERNAME")]
    pub username: String,

    #[arg(long)]
    pub email: String,

    #[arg(long, env = "SNOTE_PASSWORD", hide_env_values = true)]
    pub password: String,

    #[arg(long)]
    pub first_name: Option<String>,

    #[arg(long)]
    pub last_name: Option<String>,
}

#[derive(clap::Args, Debug)]
pub struct PasswdArgs {
    #[arg(long = "old")]
    pub old_password: String,

    #[arg(long = "new")]
    pub new_password: String,
}

#[derive(clap::Subcommand, Debug)]
enum NotesCommand {
    /// List notes, most recently updated first
    List {
        /// Only pinned notes
        #[arg(long)]
        pinned: bool,

        /// Filter by title
        #[arg(long, value_name = "TEXT")]
        search: Option<String>,
    },

    /// The 20 most recently updated notes
    Recent,

    /// The 10 most recently finished notes
    Finished,

    /// Print a note as JSON
    Show { id: String },

    /// Create a note
    Create {
        /// shopping, ideas, goals or routine
        #[arg(long, default_value = "ideas")]
        kind: NoteKind,

        #[arg(long)]
        title: String,

        /// Free text (ideas notes only)
        #[arg(long)]
        body: Option<String>,

        #[arg(long)]
        pinned: bool,

        #[arg(long = "label", value_name = "LABEL")]
        labels: Vec<String>,
    },

    /// Delete a note
    Delete { id: String },

    /// Pin a note
    Pin { id: String },

    /// Unpin a note
    Unpin { id: String },

    /// Mark a note as done
    Done { id: String },

    /// Mark a note as not done
    Undone { id: String },
}

impl Cli {
    fn options(&self) -> Options {
        Options {
            api_url: self.api_url.clone(),
            config_dir: self.config_dir.clone(),
            timeout: self.timeout.map(Duration::from_secs),
        }
    }
}

async fn run_notes(config: &Config, command: NotesCommand) -> Result<()> {
    match command {
        NotesCommand::List { pinned, search } => {
            let filter = NoteFilter {
                pinned: pinned.then_some(true),
                search,
            };
            commands::list_notes(config, &NoteListing::All(filter)).await
        }
        NotesCommand::Recent => commands::list_notes(config, &NoteListing::Recent).await,
        NotesCommand::Finished => commands::list_notes(config, &NoteListing::Finished).await,
        NotesCommand::Show { id } => commands::show_note(config, &id).await,
        NotesCommand::Create {
            kind,
            title,
            body,
            pinned,
            labels,
        } => {
            let upsert = commands::build_upsert(kind, &title, body.as_deref(), pinned, &labels)?;
            commands::create_note(config, &upsert).await
        }
        NotesCommand::Delete { id } => commands::delete_note(config, &id).await,
        NotesCommand::Pin { id } => commands::set_pinned(config, &id, true).await,
        NotesCommand::Unpin { id } => commands::set_pinned(config, &id, false).await,
        NotesCommand::Done { id } => commands::set_done(config, &id, true).await,
        NotesCommand::Undone { id } => commands::set_done(config, &id, false).await,
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();
    let config = Config::new(snote::runtime::RealRuntime, &cli.options())?;

    match cli.command {
        Commands::Login(args) => commands::login(&config, &args.username, &args.password).await?,
        Commands::Logout => commands::logout(&config).await?,
        Commands::Signup(args) => {
            let request = SignupRequest {
                username: args.username,
                password: args.password,
                email: args.email,
                first_name: args.first_name,
                last_name: args.last_name,
            };
            commands::signup(&config, &request).await?
        }
        Commands::Whoami => commands::whoami(&config).await?,
        Commands::Status => commands::status(&config).await?,
        Commands::Passwd(args) => {
            commands::change_password(&config, &args.old_password, &args.new_password).await?
        }
        Commands::Notes(command) => run_notes(&config, command).await?,
    }
    Ok(())
}
