pub mod store;
pub mod terminal;
pub mod view;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context as _, Result};
use tokio::io::AsyncReadExt;

use embedkit_application::{EmbedManager, Invoker, RenderSink};
use embedkit_core::PermissionLevel;
use embedkit_core::convert::{Attachment, ConversionSource};
use embedkit_infrastructure::ConfigService;

use crate::InputArgs;
use terminal::TerminalSink;

/// Everything a subcommand needs.
pub struct Context {
    pub manager: EmbedManager,
    pub invoker: Invoker,
    pub partition: String,
    pub config_path: PathBuf,
}

impl Context {
    pub async fn load(config: Option<PathBuf>, partition: Option<String>) -> Result<Self> {
        let service = match config {
            Some(path) => ConfigService::with_path(path),
            None => ConfigService::new()?,
        };
        let config = service
            .get_config()
            .with_context(|| format!("Failed to load {}", service.path().display()))?;

        let partition = partition.unwrap_or_else(|| config.storage.default_partition.clone());
        let sink: Arc<dyn RenderSink> = Arc::new(TerminalSink::default());
        let manager = EmbedManager::with_file_store(config, sink).await?;

        Ok(Self {
            manager,
            invoker: local_operator(),
            partition,
            config_path: service.path().to_path_buf(),
        })
    }
}

/// The local user owns the store.
fn local_operator() -> Invoker {
    let name = std::env::var("USER")
        .or_else(|_| std::env::var("USERNAME"))
        .unwrap_or_else(|_| "operator".to_string());
    Invoker::new(name, PermissionLevel::Owner)
}

/// Resolves `--file`, `--text` or stdin into a conversion source.
pub async fn read_input(input: InputArgs) -> Result<ConversionSource> {
    if let Some(source) = read_named_input(input).await? {
        return Ok(source);
    }

    let mut text = String::new();
    tokio::io::stdin()
        .read_to_string(&mut text)
        .await
        .context("Failed to read stdin")?;
    Ok(ConversionSource::text(text))
}

/// Like [`read_input`] for commands that keep stdin for interactive controls.
pub async fn require_named_input(input: InputArgs) -> Result<ConversionSource> {
    read_named_input(input)
        .await?
        .context("This command reads controls from stdin; pass --file or --text")
}

async fn read_named_input(input: InputArgs) -> Result<Option<ConversionSource>> {
    if let Some(path) = input.file {
        let bytes = tokio::fs::read(&path)
            .await
            .with_context(|| format!("Failed to read {}", path.display()))?;
        return Ok(Some(ConversionSource::file(Attachment::new(
            file_name(&path),
            bytes,
        ))));
    }
    Ok(input.text.map(ConversionSource::text))
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_interactive_commands_need_named_input() {
        let err = require_named_input(InputArgs::default()).await.unwrap_err();
        assert!(err.to_string().contains("--file or --text"));

        let source = require_named_input(InputArgs {
            text: Some("title: x".to_string()),
            ..InputArgs::default()
        })
        .await
        .unwrap();
        assert!(matches!(source, ConversionSource::Text(_)));
    }
}
