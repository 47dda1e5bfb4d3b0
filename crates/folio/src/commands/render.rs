//! `folio render` command implementation.

use std::io::Write as _;
use std::path::{Path, PathBuf};

use clap::Args;
use folio_config::{CliSettings, Config};
use folio_renderer::Theme;
use folio_shell::{DocumentShell, FileLoader, Pipeline, ShellState};

use crate::error::CliError;
use crate::output::Output;

/// Arguments for the render command.
#[derive(Args)]
pub(crate) struct RenderArgs {
    /// Document to render: markdown, or a compiled `.json` node tree.
    path: PathBuf,

    /// Path to configuration file (default: auto-discover folio.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Color theme (overrides config).
    #[arg(long, value_parser = parse_theme)]
    theme: Option<Theme>,

    /// Kroki server URL for diagram rendering (overrides config).
    #[arg(long, env = "FOLIO_KROKI_URL")]
    kroki_url: Option<String>,

    /// Base path for resolving relative `.md` links (overrides config).
    #[arg(long)]
    base_path: Option<String>,

    /// Do not fetch link card metadata.
    #[arg(long)]
    no_link_previews: bool,

    /// Write the page here instead of stdout.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Enable verbose output (show render warnings and timing logs).
    #[arg(short, long)]
    pub verbose: bool,
}

fn parse_theme(value: &str) -> Result<Theme, String> {
    value.parse().map_err(|e: folio_renderer::ParseThemeError| e.to_string())
}

impl RenderArgs {
    /// Execute the render command.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration fails, the document fails to load,
    /// or the output cannot be written.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        let cli_settings = CliSettings {
            theme: self.theme,
            kroki_url: self.kroki_url,
            link_previews_enabled: self.no_link_previews.then_some(false),
            base_path: self.base_path,
        };
        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;
        if let Some(path) = &config.config_path {
            output.detail(&format!("Using config: {}", path.display()));
        }

        let loader = FileLoader::new(&self.path);
        let mut shell = DocumentShell::new();
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;
        runtime.block_on(shell.load(&loader));

        let document = match shell.state() {
            ShellState::Loaded(document) => document,
            ShellState::Errored(message) => return Err(CliError::Load(message.clone())),
            ShellState::Loading => {
                return Err(CliError::Load(format!(
                    "{} did not finish loading",
                    self.path.display()
                )));
            }
        };

        let pipeline = Pipeline::from_config(&config);
        let key = loader.path().to_string_lossy();
        let page = pipeline.render_page(document, &key);

        // Details are logged through tracing with --verbose.
        if !page.warnings.is_empty() && !self.verbose {
            output.warning(&format!(
                "{} render warning(s); rerun with --verbose for details",
                page.warnings.len()
            ));
        }

        write_page(self.output.as_deref(), &page.html)?;
        if let Some(path) = &self.output {
            output.success(&format!(
                "Rendered {} -> {}",
                self.path.display(),
                path.display()
            ));
        }
        Ok(())
    }
}

fn write_page(path: Option<&Path>, page: &str) -> Result<(), CliError> {
    match path {
        Some(path) => {
            if let Some(parent) = path.parent()
                && !parent.as_os_str().is_empty()
            {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(path, page)?;
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(page.as_bytes())?;
            stdout.flush()?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_theme() {
        assert_eq!(parse_theme("dark"), Ok(Theme::Dark));
        assert!(parse_theme("neon").unwrap_err().contains("neon"));
    }

    #[test]
    fn test_write_page_creates_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out/site/page.html");
        write_page(Some(&path), "<p>hi</p>").unwrap();
        assert_eq!(std::fs::read_to_string(path).unwrap(), "<p>hi</p>");
    }
}
