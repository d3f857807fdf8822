use crate::output::Output;
use color_eyre::Result;
use dialoguer::{Confirm, Input};
use std::io::IsTerminal;

/// Prompt for a string value with optional default
pub fn prompt_string(prompt: &str, default: Option<&str>) -> Result<String> {
    let mut input_builder = Input::<String>::new().with_prompt(prompt).allow_empty(true);

    if let Some(default_value) = default {
        input_builder = input_builder.default(default_value.to_string());
    }

    input_builder
        .interact_text()
        .map_err(|e| color_eyre::eyre::eyre!("Failed to read input: {}", e))
}

/// Asks before a destructive or bulk change. `assume_yes` skips the prompt;
/// without a terminal the answer is no.
pub fn confirm(prompt: &str, assume_yes: bool, output: &Output) -> Result<bool> {
    if assume_yes {
        return Ok(true);
    }
    if !std::io::stdin().is_terminal() {
        output.warn("Not running interactively; pass --yes to confirm");
        return Ok(false);
    }

    Confirm::new()
        .with_prompt(prompt)
        .default(false)
        .interact()
        .map_err(|e| {
            output.error(format!("Failed to read confirmation: {}", e));
            color_eyre::eyre::eyre!("Failed to read confirmation: {}", e)
        })
}
