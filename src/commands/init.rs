//! Init command handler.

use crate::args::InitArgs;
use crate::commands::Out;
use crate::{Config, Result};
use std::path::Path;

/// Creates the hearth home directory and its initial `config.json`, moving
/// the service-account key into the secrets directory when one is given.
pub async fn init(home: &Path, args: InitArgs) -> Result<Out<String>> {
    let config = Config::create(
        home,
        args.credentials(),
        args.sheet_url(),
        args.password().map(str::to_string),
    )
    .await?;

    let message = format!("Initialized hearth home at '{}'", config.root().display());
    let root = config.root().display().to_string();
    Ok(Out::new(message, root))
}
