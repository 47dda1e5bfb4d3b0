//! `folio languages` command implementation.

use clap::Args;
use folio_renderer::{LanguageId, resolve_language, supported_languages};

use crate::error::CliError;
use crate::output::Output;

/// Arguments for the languages command.
#[derive(Args)]
pub(crate) struct LanguagesArgs {
    /// Fence tags to resolve. Lists the supported set when omitted.
    inputs: Vec<String>,
}

impl LanguagesArgs {
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        if self.inputs.is_empty() {
            for name in supported_languages() {
                output.info(name);
            }
            return Ok(());
        }

        for input in &self.inputs {
            let resolved = resolve_language(Some(input.as_str()));
            let line = describe(input, resolved);
            if resolved.is_plain_text() && !input.trim().eq_ignore_ascii_case("text") {
                output.warning(&line);
            } else {
                output.info(&line);
            }
        }
        Ok(())
    }
}

fn describe(input: &str, resolved: LanguageId) -> String {
    format!("{input} -> {resolved}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_describe() {
        assert_eq!(describe("ts", resolve_language(Some("ts"))), "ts -> typescript");
        assert_eq!(describe("Yml", resolve_language(Some("Yml"))), "Yml -> yaml");
        assert_eq!(
            describe("unknownlang", resolve_language(Some("unknownlang"))),
            "unknownlang -> text"
        );
    }
}
