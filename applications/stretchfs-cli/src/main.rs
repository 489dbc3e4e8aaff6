/// StretchFS command-line client
mod cli;

use anyhow::Context;
use clap::Parser;
use cli::{Cli, Commands, ConnectionArgs, ContentCommand, FolderCommand, JobCommand};
use serde_json::Value;
use std::path::PathBuf;
use stretchfs_client::{ClientConfig, Session, StretchFsClient};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logs go to stderr so JSON output on stdout stays clean
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "stretchfs=info,stretchfs_client=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let config = load_config(&cli.connection)?;
    tracing::debug!(domain = %config.domain, port = config.port, "Connecting");
    let client = StretchFsClient::new(config)?;

    let output = match cli.command {
        Commands::Login => Output::Text(client.generate_token().await?),
        Commands::Logout => Output::Json(logout(&client).await?),
        Commands::StaticUrl { hash, name } => Output::Text(client.url_static(&hash, &name)),
        Commands::Folder(FolderCommand::Create { path }) => {
            Output::Json(open_session(&client).await?.files().folder_create(&path).await?)
        }
        Commands::Folder(FolderCommand::Delete { path }) => {
            Output::Json(open_session(&client).await?.files().folder_delete(&path).await?)
        }
        Commands::Ls { path } => Output::Json(open_session(&client).await?.files().list(&path).await?),
        Commands::Upload { file, folder } => {
            Output::Json(open_session(&client).await?.files().upload(&file, &folder).await?)
        }
        Commands::Download { path, output, life } => {
            let session = open_session(&client).await?;
            let envelope = session.files().download_url(&path, life).await?;
            let dest = output.unwrap_or_else(|| default_output(&path));
            let written = session.files().download_to_file(&envelope, &dest).await?;
            Output::Json(serde_json::json!({
                "path": path,
                "dest": dest.display().to_string(),
                "bytes": written,
            }))
        }
        Commands::Detail { path } => {
            Output::Json(open_session(&client).await?.files().detail(&path).await?)
        }
        Commands::Rm { path } => Output::Json(open_session(&client).await?.files().delete(&path).await?),
        Commands::Link { handle, hash, path } => Output::Json(
            open_session(&client)
                .await?
                .files()
                .link(&handle, &hash, &path)
                .await?,
        ),
        Commands::Content(command) => Output::Json(run_content(&client, command).await?),
        Commands::Job(command) => run_job(&client, command).await?,
    };

    output.print()
}

/// What a command prints on stdout.
enum Output {
    Text(String),
    Json(Value),
}

impl Output {
    fn print(&self) -> anyhow::Result<()> {
        match self {
            Self::Text(text) => println!("{}", text),
            Self::Json(value) => println!("{}", serde_json::to_string_pretty(value)?),
        }
        Ok(())
    }
}

/// Log in if needed and hand back a session.
async fn open_session(client: &StretchFsClient) -> anyhow::Result<Session> {
    client.ensure_token().await?;
    Ok(client.session().await?)
}

/// Logout only makes sense for a token carried over from an earlier login.
async fn logout(client: &StretchFsClient) -> anyhow::Result<Value> {
    if !client.is_authenticated().await {
        anyhow::bail!("logout needs a session token: pass --token or set STRETCHFS_TOKEN");
    }
    Ok(client.destroy_token().await?)
}

async fn run_content(client: &StretchFsClient, command: ContentCommand) -> anyhow::Result<Value> {
    let session = open_session(client).await?;
    let content = session.content();

    let response = match command {
        ContentCommand::Exists { hash } => content.exists(&hash).await?,
        ContentCommand::Detail { hash } => content.detail(&hash).await?,
        ContentCommand::Purchase { hash, life } => content.purchase(&hash, life).await?,
        ContentCommand::PurchaseRemove { purchase_token } => {
            content.purchase_remove(&purchase_token).await?
        }
        ContentCommand::Retrieve { request, extension } => {
            let request: Value =
                serde_json::from_str(&request).context("retrieve request is not valid JSON")?;
            content.retrieve(&request, &extension).await?
        }
    };
    Ok(response)
}

async fn run_job(client: &StretchFsClient, command: JobCommand) -> anyhow::Result<Output> {
    let response = match command {
        JobCommand::ContentUrl { handle, file } => {
            return Ok(Output::Text(client.job_content_url(&handle, &file)));
        }
        JobCommand::Create {
            description,
            priority,
            category,
        } => {
            let contents = std::fs::read_to_string(&description)
                .with_context(|| format!("reading {}", description.display()))?;
            let description: Value =
                serde_json::from_str(&contents).context("job description is not valid JSON")?;
            open_session(client)
                .await?
                .jobs()
                .create(&description, priority, category.as_deref())
                .await?
        }
        JobCommand::Update { handle, changes } => {
            let changes: Value =
                serde_json::from_str(&changes).context("job changes are not valid JSON")?;
            open_session(client).await?.jobs().update(&handle, &changes).await?
        }
        JobCommand::Detail { handle } => open_session(client).await?.jobs().detail(&handle).await?,
        JobCommand::Start { handle } => open_session(client).await?.jobs().start(&handle).await?,
        JobCommand::Abort { handle } => open_session(client).await?.jobs().abort(&handle).await?,
        JobCommand::Retry { handle } => open_session(client).await?.jobs().retry(&handle).await?,
        JobCommand::Remove { handle } => open_session(client).await?.jobs().remove(&handle).await?,
        JobCommand::ContentExists { handle, file } => {
            let exists = open_session(client)
                .await?
                .jobs()
                .content_exists(&handle, &file)
                .await?;
            serde_json::json!({ "exists": exists })
        }
    };
    Ok(Output::Json(response))
}

/// Layer command-line flags over the config file and environment.
fn load_config(args: &ConnectionArgs) -> anyhow::Result<ClientConfig> {
    let config =
        ClientConfig::load(args.config.as_deref()).context("failed to load configuration")?;
    Ok(apply_overrides(config, args))
}

fn apply_overrides(mut config: ClientConfig, args: &ConnectionArgs) -> ClientConfig {
    if let Some(domain) = &args.domain {
        config.domain = domain.clone();
    }
    if let Some(port) = args.port {
        config.port = port;
    }
    if args.token.is_some() {
        config.token = args.token.clone();
    }
    if args.username.is_some() {
        config.username = args.username.clone();
    }
    if args.password.is_some() {
        config.password = args.password.clone();
    }
    if args.insecure_http {
        config.tls = false;
    }
    config
}

fn default_output(remote: &str) -> PathBuf {
    let name = remote.rsplit('/').next().filter(|n| !n.is_empty());
    PathBuf::from(name.unwrap_or("download"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_output_uses_file_name() {
        assert_eq!(default_output("/docs/report.pdf"), PathBuf::from("report.pdf"));
        assert_eq!(default_output("/docs/"), PathBuf::from("download"));
    }

    #[test]
    fn test_flags_override_config() {
        let base = ClientConfig::with_credentials("localhost", "alice", "secret");
        let args = ConnectionArgs {
            domain: Some("files.example.com".into()),
            port: Some(9000),
            token: Some("abc".into()),
            insecure_http: true,
            ..ConnectionArgs::default()
        };

        let config = apply_overrides(base, &args);
        assert_eq!(config.domain, "files.example.com");
        assert_eq!(config.port, 9000);
        assert_eq!(config.token.as_deref(), Some("abc"));
        assert_eq!(config.username.as_deref(), Some("alice"));
        assert!(!config.tls);
    }

    #[test]
    fn test_no_flags_keep_config() {
        let base = ClientConfig::with_token("files.example.com", "abc").port(9000);
        let config = apply_overrides(base, &ConnectionArgs::default());
        assert_eq!(config.domain, "files.example.com");
        assert_eq!(config.port, 9000);
        assert_eq!(config.token.as_deref(), Some("abc"));
        assert!(config.tls);
    }

    #[tokio::test]
    async fn test_logout_without_token_explains_flag() {
        let config = ClientConfig::with_credentials("127.0.0.1", "alice", "secret")
            .port(1)
            .tls(false);
        let client = StretchFsClient::new(config).unwrap();

        let err = logout(&client).await.unwrap_err();
        assert!(err.to_string().contains("--token"), "{}", err);
    }

    #[tokio::test]
    async fn test_job_content_url_needs_no_session() {
        let config = ClientConfig::with_credentials("cdn.example.com", "alice", "secret")
            .port(1)
            .tls(false);
        let client = StretchFsClient::new(config).unwrap();

        let command = JobCommand::ContentUrl {
            handle: "H1".into(),
            file: "f.zip".into(),
        };
        match run_job(&client, command).await.unwrap() {
            Output::Text(url) => assert_eq!(url, "//cdn.example.com:1/job/content/download/H1/f.zip"),
            Output::Json(value) => panic!("unexpected JSON output: {}", value),
        }
        assert!(!client.is_authenticated().await);
    }
}
