//! Command-line definitions.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "stretchfs")]
#[command(about = "StretchFS file, content and job client", long_about = None)]
pub struct Cli {
    #[command(flatten)]
    pub connection: ConnectionArgs,

    #[command(subcommand)]
    pub command: Commands,
}

/// Connection overrides layered on top of the config file and environment.
#[derive(Args, Debug, Default)]
pub struct ConnectionArgs {
    /// Configuration file path (TOML)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Server host name
    #[arg(long, global = true)]
    pub domain: Option<String>,

    /// Server port
    #[arg(long, global = true)]
    pub port: Option<u16>,

    /// Existing session token
    #[arg(long, global = true, env = "STRETCHFS_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Username for login
    #[arg(short, long, global = true, env = "STRETCHFS_USERNAME")]
    pub username: Option<String>,

    /// Password for login
    #[arg(short, long, global = true, env = "STRETCHFS_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,

    /// Talk plain http instead of https
    #[arg(long, global = true)]
    pub insecure_http: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Log in and print the session token
    Login,
    /// Invalidate the current session token
    Logout,
    /// Folder operations
    #[command(subcommand)]
    Folder(FolderCommand),
    /// List a folder
    Ls {
        #[arg(default_value = "/")]
        path: String,
    },
    /// Upload a local file into a remote folder (must end with '/')
    Upload {
        file: PathBuf,
        #[arg(default_value = "/")]
        folder: String,
    },
    /// Download a remote file
    Download {
        path: String,
        /// Local destination, defaults to the remote file name
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Lifetime of the temporary URL in seconds
        #[arg(long)]
        life: Option<u64>,
    },
    /// Show file metadata
    Detail { path: String },
    /// Remove a file
    Rm { path: String },
    /// Link job output into the file tree
    Link {
        handle: String,
        hash: String,
        path: String,
    },
    /// Content lookups and purchases
    #[command(subcommand)]
    Content(ContentCommand),
    /// Job lifecycle
    #[command(subcommand)]
    Job(JobCommand),
    /// Print the public static URL for content
    StaticUrl { hash: String, name: String },
}

#[derive(Subcommand, Debug)]
pub enum FolderCommand {
    Create { path: String },
    Delete { path: String },
}

#[derive(Subcommand, Debug)]
pub enum ContentCommand {
    Exists {
        hash: String,
    },
    Detail {
        hash: String,
    },
    Purchase {
        hash: String,
        /// Grant lifetime in seconds
        #[arg(long, default_value_t = 21600)]
        life: u64,
    },
    PurchaseRemove {
        purchase_token: String,
    },
    Retrieve {
        /// Retrieval request as JSON
        request: String,
        extension: String,
    },
}

#[derive(Subcommand, Debug)]
pub enum JobCommand {
    /// Create a job from a JSON description file
    Create {
        description: PathBuf,
        #[arg(long)]
        priority: Option<u32>,
        #[arg(long)]
        category: Option<String>,
    },
    Detail {
        handle: String,
    },
    /// Apply a JSON object of changes to a job
    Update {
        handle: String,
        changes: String,
    },
    Start {
        handle: String,
    },
    Abort {
        handle: String,
    },
    Retry {
        handle: String,
    },
    Remove {
        handle: String,
    },
    ContentExists {
        handle: String,
        file: String,
    },
    ContentUrl {
        handle: String,
        file: String,
    },
}
