use crate::commands::input::Input;
use crate::core::{
    config_store::{CreateOutcome, DEFAULT_CONFIG_FILE},
    error::{DenError, Result},
    print_success,
    session::Session,
};

/// Write the default `den.yml` into the first workspace root. An existing
/// file is only replaced after confirmation (or with `--yes`); declining
/// aborts without a message.
pub async fn execute_init(session: &Session, yes: bool, input: &mut Input) -> Result<()> {
    let target = session
        .config()
        .lock()
        .roots()
        .first()
        .map(|root| root.join(DEFAULT_CONFIG_FILE))
        .ok_or(DenError::NoWorkspace)?;

    let overwrite = if target.exists() && !yes {
        input
            .confirm(&format!("{} already exists. Overwrite?", target.display()))
            .await
    } else {
        true
    };

    match session.config().lock().create_default(|_| overwrite)? {
        CreateOutcome::Created(path) => {
            print_success(&format!("Created default configuration at {}", path.display()));
        }
        CreateOutcome::Declined(path) => {
            log::debug!("Kept existing {}", path.display());
        }
    }
    Ok(())
}
