use std::path::PathBuf;

use blogpilot_core::models::{InquiryCategory, InquiryStatus};
use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser)]
#[command(name = "blogpilot")]
#[command(about = "BlogPilot CLI: manage automated blog posting from the terminal")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// API base URL (overrides config and BLOGPILOT_URL env var)
    #[arg(short, long, global = true, env = "BLOGPILOT_URL")]
    pub server: Option<String>,

    /// Config profile name
    #[arg(short, long, global = true, env = "BLOGPILOT_PROFILE", default_value = "default")]
    pub profile: String,

    /// Output format
    #[arg(short, long, global = true)]
    pub format: Option<OutputFormat>,

    /// Client configuration file (defaults to ./blogpilot.toml)
    #[arg(short, long, global = true, env = "BLOGPILOT_CONFIG")]
    pub config: Option<String>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Clone, Copy, ValueEnum, Default, PartialEq, Eq, Debug)]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
}

impl OutputFormat {
    pub fn parse(s: &str) -> Option<Self> {
        <Self as ValueEnum>::from_str(s, true).ok()
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Sign up, sign in and inspect the session
    Auth(AuthArgs),
    /// Generated blog posts
    Posts(PostsArgs),
    /// The posting template
    Template(TemplateArgs),
    /// Notices
    Notices(NoticesArgs),
    /// Customer inquiries
    Inquiries(InquiriesArgs),
    /// Frequently asked questions
    Faqs,
    /// User profile
    Profile(ProfileArgs),
    /// Admin dashboard summary
    Dashboard,
    /// Upload an image and print its public URL
    Upload(UploadArgs),
    /// Manage CLI configuration
    Config(ConfigArgs),
}

// ===== auth =====

#[derive(clap::Args)]
pub struct AuthArgs {
    #[command(subcommand)]
    pub command: AuthCommands,
}

#[derive(Subcommand)]
pub enum AuthCommands {
    /// Sign in and store the session for this profile
    Login(LoginArgs),
    /// Sign out and remove the stored session
    Logout,
    /// Show the stored session
    Whoami,
    /// Create an account
    Signup(SignupArgs),
    /// Check whether an email is still free
    CheckEmail(CheckEmailArgs),
}

#[derive(clap::Args)]
pub struct LoginArgs {
    /// Account email
    #[arg(short, long)]
    pub email: String,
    /// Password
    #[arg(long, env = "BLOGPILOT_PASSWORD", hide_env_values = true)]
    pub password: String,
}

#[derive(clap::Args)]
pub struct SignupArgs {
    #[arg(long)]
    pub username: String,
    #[arg(long)]
    pub email: String,
    #[arg(long)]
    pub department: String,
    /// At least 8 characters
    #[arg(long, env = "BLOGPILOT_PASSWORD", hide_env_values = true)]
    pub password: String,
}

#[derive(clap::Args)]
pub struct CheckEmailArgs {
    pub email: String,
}

// ===== posts =====

#[derive(clap::Args)]
pub struct PostsArgs {
    #[command(subcommand)]
    pub command: PostsCommands,
}

#[derive(Subcommand)]
pub enum PostsCommands {
    /// List your generated posts
    List(PostsListArgs),
    /// Edit a post
    Edit(PostEditArgs),
}

#[derive(clap::Args)]
pub struct PostsListArgs {
    /// Page number (1-based)
    #[arg(long, default_value_t = 1)]
    pub page: u32,
    /// Only posts in this category
    #[arg(long)]
    pub category: Option<String>,
}

#[derive(clap::Args)]
pub struct PostEditArgs {
    /// Post id
    pub id: i64,
    #[arg(long)]
    pub title: String,
    /// Post body; reads from --file when omitted
    #[arg(long, conflicts_with = "file")]
    pub content: Option<String>,
    /// Path to a file holding the post body
    #[arg(long)]
    pub file: Option<PathBuf>,
    #[arg(long)]
    pub category: String,
}

// ===== template =====

#[derive(clap::Args)]
pub struct TemplateArgs {
    #[command(subcommand)]
    pub command: TemplateCommands,
}

#[derive(Subcommand)]
pub enum TemplateCommands {
    /// Show your template
    Show,
    /// Create your template (only one per account)
    Create(TemplateFields),
    /// Change fields of your template
    Update(TemplateFields),
    /// List the categories and platforms a template can use
    Options,
}

#[derive(clap::Args, Default)]
pub struct TemplateFields {
    #[arg(long)]
    pub title: Option<String>,
    /// Content category, repeatable
    #[arg(long = "category")]
    pub categories: Vec<String>,
    /// Publishing platform slug (naver, tistory, ...), repeatable
    #[arg(long = "platform")]
    pub platforms: Vec<String>,
    #[arg(long)]
    pub shop_url: Option<String>,
    /// Attach generated images to posts
    #[arg(long)]
    pub include_images: Option<bool>,
    #[arg(long)]
    pub image_count: Option<u32>,
    /// Maximum characters per post
    #[arg(long)]
    pub char_limit: Option<u32>,
    /// Daily posting time, HH:MM or HH:MM:SS
    #[arg(long)]
    pub post_time: Option<String>,
}

// ===== notices =====

#[derive(clap::Args)]
pub struct NoticesArgs {
    #[command(subcommand)]
    pub command: NoticesCommands,
}

#[derive(Subcommand)]
pub enum NoticesCommands {
    /// List notices
    List(PageArgs),
    /// Show one notice
    Show(IdArg),
    /// Publish a notice (admin)
    Create(NoticeFields),
    /// Replace a notice (admin)
    Update(NoticeUpdateArgs),
    /// Delete a notice (admin)
    Delete(IdArg),
}

#[derive(clap::Args)]
pub struct PageArgs {
    #[arg(long, default_value_t = 1)]
    pub page: u32,
    #[arg(long)]
    pub size: Option<u32>,
}

#[derive(clap::Args)]
pub struct IdArg {
    pub id: i64,
}

#[derive(clap::Args)]
pub struct NoticeFields {
    #[arg(long)]
    pub title: String,
    #[arg(long, conflicts_with = "file")]
    pub content: Option<String>,
    /// Path to a file holding the notice body
    #[arg(long)]
    pub file: Option<PathBuf>,
    /// Pin the notice
    #[arg(long)]
    pub important: bool,
}

#[derive(clap::Args)]
pub struct NoticeUpdateArgs {
    pub id: i64,
    #[command(flatten)]
    pub fields: NoticeFields,
}

// ===== inquiries =====

#[derive(clap::Args)]
pub struct InquiriesArgs {
    #[command(subcommand)]
    pub command: InquiriesCommands,
}

#[derive(Subcommand)]
pub enum InquiriesCommands {
    /// List your inquiries
    My(InquiryListArgs),
    /// Show one of your inquiries
    Show(IdArg),
    /// Send an inquiry
    Create(InquiryCreateArgs),
    /// Answer and triage inquiries (admin)
    Admin(InquiriesAdminArgs),
}

#[derive(clap::Args)]
pub struct InquiryListArgs {
    #[arg(long, default_value_t = 1)]
    pub page: u32,
    #[arg(long)]
    pub size: Option<u32>,
    /// PENDING, IN_PROGRESS or COMPLETED
    #[arg(long)]
    pub status: Option<InquiryStatus>,
}

#[derive(clap::Args)]
pub struct InquiryCreateArgs {
    #[arg(long)]
    pub title: String,
    /// FEATURE, PAYMENT, ACCOUNT or ETC
    #[arg(long)]
    pub category: InquiryCategory,
    /// At least 10 characters
    #[arg(long)]
    pub content: String,
}

#[derive(clap::Args)]
pub struct InquiriesAdminArgs {
    #[command(subcommand)]
    pub command: InquiriesAdminCommands,
}

#[derive(Subcommand)]
pub enum InquiriesAdminCommands {
    /// List all inquiries
    List(InquiryListArgs),
    /// Show any inquiry
    Show(IdArg),
    /// Answer an inquiry
    Answer(AnswerArgs),
    /// Remove the answer of an inquiry
    DeleteAnswer(IdArg),
}

#[derive(clap::Args)]
pub struct AnswerArgs {
    pub id: i64,
    #[arg(long)]
    pub content: String,
}

// ===== profile =====

#[derive(clap::Args)]
pub struct ProfileArgs {
    #[command(subcommand)]
    pub command: ProfileCommands,
}

#[derive(Subcommand)]
pub enum ProfileCommands {
    /// Show your profile
    Show,
    /// Change your name and department
    Update(ProfileUpdateArgs),
    /// Show another user's profile (admin)
    User(IdArg),
}

#[derive(clap::Args)]
pub struct ProfileUpdateArgs {
    #[arg(long)]
    pub username: String,
    #[arg(long, default_value = "")]
    pub department: String,
}

// ===== upload =====

#[derive(clap::Args)]
pub struct UploadArgs {
    /// Image file to upload
    pub file: PathBuf,
    /// MIME type; guessed from the file extension when omitted
    #[arg(long)]
    pub content_type: Option<String>,
}

// ===== config =====

#[derive(clap::Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommands,
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Show current config
    Show,
    /// Set config value
    Set(ConfigSetArgs),
    /// List configured profiles
    Profiles,
}

#[derive(clap::Args)]
pub struct ConfigSetArgs {
    /// Key to set (server, format)
    pub key: String,
    /// Value
    pub value: String,
}
