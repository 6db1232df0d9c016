//! Embed manager use cases.
//!
//! [`EmbedManager`] is what a host adapter calls after parsing a command: it
//! checks the invoker's tier, runs the converter, talks to the repository and
//! hands pages to the render sink or a paginator.

use std::sync::Arc;

use tracing::{info, warn};

use embedkit_core::config::EmbedManagerConfig;
use embedkit_core::convert::{Attachment, ConversionSource, Converter};
use embedkit_core::embed::{EmbedDocument, source_pages};
use embedkit_core::error::{EmbedError, Result};
use embedkit_core::pager::{NavigationEvent, Page, PaginatorSession, SessionId};
use embedkit_core::store::{EmbedRepository, Identifier, SaveOutcome, StoredRecord};
use embedkit_core::PermissionLevel;
use embedkit_infrastructure::{EmbedkitPaths, JsonEmbedRepository};

use crate::host::{ChannelId, Invoker, MessageHandle, RenderSink};
use crate::pager::{OpenedPaginator, PaginatorRegistry};

const ENTITY: &str = "embed";

pub struct EmbedManager {
    config: EmbedManagerConfig,
    converter: Converter,
    repository: Arc<dyn EmbedRepository>,
    sink: Arc<dyn RenderSink>,
    paginators: PaginatorRegistry,
}

impl EmbedManager {
    pub fn new(
        config: EmbedManagerConfig,
        repository: Arc<dyn EmbedRepository>,
        sink: Arc<dyn RenderSink>,
    ) -> Self {
        Self {
            converter: config.converter.converter(),
            paginators: PaginatorRegistry::new(Arc::clone(&sink)),
            config,
            repository,
            sink,
        }
    }

    /// Builds a manager over the JSON file store named by `[storage]`.
    pub async fn with_file_store(
        config: EmbedManagerConfig,
        sink: Arc<dyn RenderSink>,
    ) -> Result<Self> {
        let base_dir = EmbedkitPaths::storage_dir(&config.storage)?;
        let repository = JsonEmbedRepository::new_with_base(base_dir).await?;
        Ok(Self::new(config, Arc::new(repository), sink))
    }

    pub fn config(&self) -> &EmbedManagerConfig {
        &self.config
    }

    pub fn converter(&self) -> &Converter {
        &self.converter
    }

    pub fn paginators(&self) -> &PaginatorRegistry {
        &self.paginators
    }

    pub fn default_partition(&self) -> &str {
        &self.config.storage.default_partition
    }

    // ============================================================================
    // Mutating use cases
    // ============================================================================

    /// Converts `source` and renders it once.
    pub async fn post(
        &self,
        invoker: &Invoker,
        channel: &ChannelId,
        source: ConversionSource,
    ) -> Result<MessageHandle> {
        self.authorize(invoker, self.config.permissions.mutate)?;
        let document = self.converter.convert(source)?;
        self.sink
            .render_page(channel, &Page::Embed(document), None)
            .await
    }

    /// Converts `source` and stores it under `name`.
    pub async fn save(
        &self,
        invoker: &Invoker,
        partition: &str,
        name: &str,
        source: ConversionSource,
    ) -> Result<SaveOutcome> {
        self.authorize(invoker, self.config.permissions.mutate)?;
        let id = Identifier::parse(name)?;
        let document = self.converter.convert(source)?;

        let outcome = self.repository.save(partition, &id, document).await?;
        info!(partition, id = %id, actor = %invoker.actor, ?outcome, "Saved embed");
        Ok(outcome)
    }

    /// Renders the document stored under `name`.
    pub async fn send(
        &self,
        invoker: &Invoker,
        partition: &str,
        channel: &ChannelId,
        name: &str,
    ) -> Result<MessageHandle> {
        self.authorize(invoker, self.config.permissions.mutate)?;
        let record = self.find(partition, name).await?;
        self.sink
            .render_page(channel, &Page::Embed(record.document), None)
            .await
    }

    /// Replaces an already rendered message with the converted `source`.
    pub async fn edit(
        &self,
        invoker: &Invoker,
        handle: &MessageHandle,
        source: ConversionSource,
    ) -> Result<EmbedDocument> {
        self.authorize(invoker, self.config.permissions.mutate)?;
        let document = self.converter.convert(source)?;
        self.sink
            .update_page(handle, &Page::Embed(document.clone()), None)
            .await?;
        info!(message_id = %handle.message_id, actor = %invoker.actor, "Edited embed");
        Ok(document)
    }

    /// Deletes `name`. Returns `false` if nothing was stored under it.
    pub async fn delete(&self, invoker: &Invoker, partition: &str, name: &str) -> Result<bool> {
        self.authorize(invoker, self.config.permissions.mutate)?;
        let id = Identifier::parse(name)?;

        let removed = self.repository.delete(partition, &id).await?;
        if removed {
            info!(partition, id = %id, actor = %invoker.actor, "Deleted embed");
        }
        Ok(removed)
    }

    // ============================================================================
    // Read-only use cases
    // ============================================================================

    pub async fn get(&self, invoker: &Invoker, partition: &str, name: &str) -> Result<StoredRecord> {
        self.authorize(invoker, self.config.permissions.view)?;
        self.find(partition, name).await
    }

    pub async fn list(&self, invoker: &Invoker, partition: &str) -> Result<Vec<Identifier>> {
        self.authorize(invoker, self.config.permissions.view)?;
        self.repository.list(partition).await
    }

    /// Opens a paginator over every stored document, one page each.
    pub async fn show(
        &self,
        invoker: &Invoker,
        partition: &str,
        channel: &ChannelId,
    ) -> Result<OpenedPaginator> {
        self.authorize(invoker, self.config.permissions.view)?;
        let pages: Vec<Page> = self
            .repository
            .list_records(partition)
            .await?
            .into_iter()
            .map(|record| Page::Embed(record.document))
            .collect();
        if pages.is_empty() {
            return Err(EmbedError::not_found("partition", partition));
        }
        self.open_paginator(invoker, pages, channel).await
    }

    /// Opens a paginator over the pretty JSON of the converted `source`.
    pub async fn source(
        &self,
        invoker: &Invoker,
        channel: &ChannelId,
        source: ConversionSource,
    ) -> Result<OpenedPaginator> {
        self.authorize(invoker, self.config.permissions.view)?;
        let document = self.converter.convert(source)?;
        let pages = source_pages(&document)?
            .into_iter()
            .map(Page::Text)
            .collect();
        self.open_paginator(invoker, pages, channel).await
    }

    /// Exports the stored document as `<name>.json`.
    ///
    /// The file name comes from [`Identifier::file_stem`], so it is always a
    /// bare name.
    pub async fn download(
        &self,
        invoker: &Invoker,
        partition: &str,
        name: &str,
    ) -> Result<Attachment> {
        self.authorize(invoker, self.config.permissions.view)?;
        let record = self.find(partition, name).await?;
        let json = record.document.to_json_pretty()?;
        Ok(Attachment::new(
            format!("{}.json", record.id.file_stem()),
            json.into_bytes(),
        ))
    }

    /// Routes a control activation to its paginator.
    pub async fn dispatch(&self, event: NavigationEvent) -> Result<()> {
        self.paginators.dispatch(event).await
    }

    // ============================================================================
    // Helpers
    // ============================================================================

    fn authorize(&self, invoker: &Invoker, required: PermissionLevel) -> Result<()> {
        invoker.level.require(required).inspect_err(|_| {
            warn!(
                actor = %invoker.actor,
                level = %invoker.level,
                required = %required,
                "Permission denied"
            );
        })
    }

    async fn find(&self, partition: &str, name: &str) -> Result<StoredRecord> {
        let id = Identifier::parse(name)?;
        self.repository
            .get(partition, &id)
            .await?
            .ok_or_else(|| EmbedError::not_found(ENTITY, id.as_str()))
    }

    async fn open_paginator(
        &self,
        invoker: &Invoker,
        pages: Vec<Page>,
        channel: &ChannelId,
    ) -> Result<OpenedPaginator> {
        let session = PaginatorSession::new_at(
            SessionId::generate(),
            pages,
            Some(invoker.actor.clone()),
            self.config.paginator.options(),
            tokio::time::Instant::now().into_std(),
        )?;
        self.paginators.open(session, channel).await
    }
}
