use clap::{Args, Parser, Subcommand};
use serde::Deserialize;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "blogdesk", about = "A command-line client for a blogging REST API")]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Base URL of the blog API
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    /// Path to data directory
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Log in and store the session
    Login { username: String, password: String },
    /// Forget the stored session
    Logout,
    /// Show the stored session
    Whoami,
    /// Exchange the refresh token for a new access token
    Refresh,
    /// Create an account
    Register {
        username: String,
        email: String,
        password: String,
        password2: String,
    },
    /// Request a password reset email
    PasswordReset { email: String },
    /// Set a new password using the emailed uid and token
    PasswordResetConfirm {
        uid: String,
        token: String,
        new_password: String,
        re_new_password: String,
    },
    /// List posts
    Posts(ListArgs),
    /// Show a single post
    Show { slug: String },
    /// Create a post
    Create(PostArgs),
    /// Update a post you authored
    Update {
        slug: String,
        #[command(flatten)]
        post: PostArgs,
    },
    /// Delete a post you authored
    Delete { slug: String },
    /// Like or unlike a post
    Like { slug: String },
    /// Bookmark or unbookmark a post
    Bookmark { slug: String },
    /// Show the comment thread of a post
    Comments { slug: String },
    /// Comment on a post, or reply to a comment
    Comment {
        slug: String,
        content: String,
        #[arg(long)]
        reply_to: Option<u64>,
    },
    /// Delete one of your comments
    Uncomment { slug: String, comment_id: u64 },
    /// List categories and tags
    Taxonomy,
    /// Show notifications
    Notifications {
        /// Mark all notifications as read after listing
        #[arg(long)]
        mark_read: bool,
    },
    /// Show your profile
    Profile,
    /// Update your profile bio and picture
    EditProfile {
        #[arg(long)]
        bio: Option<String>,
        #[arg(long)]
        picture: Option<PathBuf>,
    },
    /// List your bookmarked posts
    Bookmarked,
    /// List posts you authored
    Mine,
}

#[derive(Args, Debug, Default)]
pub struct ListArgs {
    #[arg(long)]
    pub search: Option<String>,
    #[arg(long)]
    pub category: Option<u64>,
    #[arg(long)]
    pub tag: Option<u64>,
    #[arg(long)]
    pub page: Option<u32>,
}

#[derive(Args, Debug, Default)]
pub struct PostArgs {
    #[arg(long)]
    pub title: String,
    #[arg(long)]
    pub content: String,
    #[arg(long)]
    pub category: Option<u64>,
    #[arg(long = "tag")]
    pub tags: Vec<u64>,
    #[arg(long)]
    pub image: Option<PathBuf>,
}

#[derive(Deserialize, Debug, Clone, Default)]
#[serde(default)]
pub struct Config {
    pub api: ApiConfig,
    pub storage: StorageConfig,
}

#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct ApiConfig {
    pub base_url: String,
    pub timeout_secs: u64,
    pub user_agent: String,
}

#[derive(Deserialize, Debug, Clone, Default)]
#[serde(default)]
pub struct StorageConfig {
    pub path: Option<PathBuf>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000/api/".to_string(),
            timeout_secs: 30,
            user_agent: concat!("blogdesk/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl Config {
    pub fn load(cli: &Cli) -> anyhow::Result<Self> {
        let data_dir = Self::data_dir(cli)?;
        let config_path = cli
            .config
            .clone()
            .unwrap_or_else(|| data_dir.join("config.toml"));

        let mut config = if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            toml::from_str(&content)?
        } else {
            Config::default()
        };

        // CLI overrides
        if let Some(ref url) = cli.api_url {
            config.api.base_url = url.clone();
        }

        if config.storage.path.is_none() {
            config.storage.path = Some(data_dir.join("blogdesk.db"));
        }

        Ok(config)
    }

    pub fn data_dir(cli: &Cli) -> anyhow::Result<PathBuf> {
        if let Some(ref dir) = cli.data_dir {
            return Ok(dir.clone());
        }
        let home = dirs::home_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not determine home directory"))?;
        Ok(home.join(".blogdesk"))
    }

    pub fn db_path(&self) -> Option<&PathBuf> {
        self.storage.path.as_ref()
    }
}
