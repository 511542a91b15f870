use clap::Subcommand;

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create an empty identity map in the workspace
    Init {
        /// Overwrite an existing map
        #[arg(long)]
        force: bool,
    },

    /// Resolve a channel contact to its canonical id
    Resolve {
        /// Channel name (telegram, whatsapp, discord, ...)
        #[arg(long, env = "IDMAP_CHANNEL")]
        channel: Option<String>,
        /// Provider-specific user id on that channel
        #[arg(long, env = "IDMAP_USER_ID")]
        user_id: Option<String>,
    },

    /// Map a channel contact to a canonical id
    Add {
        /// Canonical id (sanitized before use)
        #[arg(long)]
        canonical: String,
        #[arg(long)]
        channel: String,
        #[arg(long)]
        user_id: String,
        /// Display name, used only when the identity is new
        #[arg(long)]
        display_name: Option<String>,
    },

    /// Remove a channel mapping from a canonical id
    Remove {
        #[arg(long)]
        canonical: String,
        #[arg(long)]
        channel: String,
        #[arg(long)]
        user_id: String,
    },

    /// List every identity
    List,

    /// Show the channels of one identity
    Channels {
        #[arg(long)]
        canonical: String,
    },

    /// Check whether an identity is the owner
    IsOwner {
        #[arg(long)]
        canonical: String,
    },
}
