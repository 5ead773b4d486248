use memos_core::StoredSession;

use crate::commands::common::GlobalOptions;
use crate::error::CliError;

pub async fn run_session_use(options: &GlobalOptions, username: &str) -> Result<(), CliError> {
    let session = StoredSession::new(username).ok_or(CliError::EmptyUsername)?;
    let preferences = options.open_preferences().await?;
    preferences.save_session(&session).await?;
    println!("{}", session.username);
    Ok(())
}

pub async fn run_session_clear(options: &GlobalOptions) -> Result<(), CliError> {
    options.open_preferences().await?.clear_session().await?;
    println!("Session cleared");
    Ok(())
}
