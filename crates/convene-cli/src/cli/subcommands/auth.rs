use clap::{Args, Subcommand};

/// Authentication commands.
#[derive(Clone, Debug, Subcommand)]
pub enum AuthCommands {
    /// Create an account with email and password.
    Register(AuthRegisterArgs),
    /// Sign in with email and password, or with Google (--google).
    Login(AuthLoginArgs),
    /// Sign out and clear the stored token.
    Logout,
    /// Show the current session.
    Status,
}

#[derive(Clone, Debug, Args)]
pub struct AuthRegisterArgs {
    #[arg(long)]
    pub email: String,
    /// At least 6 characters with an uppercase and a lowercase letter.
    #[arg(long)]
    pub password: String,
    /// Display name.
    #[arg(long)]
    pub name: String,
    #[arg(long)]
    pub photo_url: Option<String>,
}

#[derive(Clone, Debug, Args)]
pub struct AuthLoginArgs {
    #[arg(long, required_unless_present = "google", conflicts_with = "google")]
    pub email: Option<String>,
    #[arg(long, required_unless_present = "google", conflicts_with = "google")]
    pub password: Option<String>,
    /// Sign in through the browser with a Google account.
    #[arg(long)]
    pub google: bool,
}
