use crate::{Cli, CliError, CliResult, Commands, Output};

use std::path::{Path, PathBuf};

use idmap_config::{Config, workspace_dir};
use idmap_core::{
    ChannelId, IdentityMap, IdentityStore, OwnerDirectory, owner_id_from_name, sanitize,
};
use log::info;

/// Resolve the workspace root and load its validated config.
pub fn load_config(cli: &Cli) -> CliResult<(PathBuf, Config)> {
    let workspace = workspace_dir(cli.workspace.as_deref())?;
    let config = Config::load(&workspace)?;
    config.validate()?;
    Ok((workspace, config))
}

/// Run one command against a workspace.
pub fn dispatch(command: &Commands, workspace: &Path, config: &Config) -> CliResult<Output> {
    let map = IdentityMap::open(workspace, config);

    match command {
        Commands::Init { force } => init(&map, *force),

        Commands::Resolve { channel, user_id } => {
            let channel = required(channel.as_deref(), "--channel (or IDMAP_CHANNEL)")?;
            let user_id = required(user_id.as_deref(), "--user-id (or IDMAP_USER_ID)")?;
            let canonical_id = map.resolver().resolve(channel, user_id)?;
            Ok(Output::Resolved { canonical_id })
        }

        Commands::Add {
            canonical,
            channel,
            user_id,
            display_name,
        } => {
            let canonical_id =
                map.channels()
                    .add_channel(canonical, channel, user_id, display_name.as_deref())?;
            Ok(Output::Added {
                canonical_id,
                channel_id: ChannelId::new(channel, user_id).to_string(),
            })
        }

        Commands::Remove {
            canonical,
            channel,
            user_id,
        } => {
            let removed = map.channels().remove_channel(canonical, channel, user_id)?;
            Ok(Output::Removed {
                canonical_id: sanitize(canonical)?,
                channel_id: ChannelId::new(channel, user_id).to_string(),
                removed,
            })
        }

        Commands::List => Ok(Output::Identities(map.channels().list_identities()?)),

        Commands::Channels { canonical } => Ok(Output::Channels {
            canonical_id: sanitize(canonical)?,
            channels: map.channels().get_channels(canonical)?,
        }),

        Commands::IsOwner { canonical } => Ok(Output::IsOwner {
            canonical_id: sanitize(canonical)?,
            is_owner: map.channels().check_is_owner(canonical)?,
        }),
    }
}

/// Write an empty map unless one exists (or `force`), and report which owner
/// id the profile would register.
fn init(map: &IdentityMap, force: bool) -> CliResult<Output> {
    let store = map.store();
    if store.exists() && !force {
        return Err(CliError::already_initialized(store.path().to_path_buf()));
    }

    store.save(&IdentityStore::new())?;
    info!("Initialized identity map at {:?}", store.path());

    let owner_id = map
        .profile()
        .preferred_owner_name()?
        .map(|name| owner_id_from_name(Some(&name)));

    Ok(Output::Initialized {
        path: store.path().to_path_buf(),
        owner_id,
    })
}

#[track_caller]
fn required<'a>(value: Option<&'a str>, name: &'static str) -> CliResult<&'a str> {
    match value {
        Some(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(CliError::missing_argument(name)),
    }
}
