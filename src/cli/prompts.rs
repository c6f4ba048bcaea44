//! Interactive prompts using dialoguer

use anyhow::Result;
use dialoguer::Confirm;

/// Prompt user to confirm proceeding with an action
pub fn confirm_step(message: &str) -> Result<bool> {
    let confirmed = Confirm::new()
        .with_prompt(message)
        .default(true)
        .interact()?;
    Ok(confirmed)
}

/// Ask before starting the analysis; `skip` answers yes without prompting.
pub fn confirm_run(skip: bool) -> Result<bool> {
    if skip {
        return Ok(true);
    }
    confirm_step("Run the analysis with this configuration?")
}
