//! Persistence for embedkit: file-backed and in-memory repositories, the
//! on-disk DTOs, path resolution and the configuration service.

pub mod config_service;
pub mod dto;
pub mod in_memory_embed_repository;
pub mod json_embed_repository;
pub mod paths;
pub mod storage;

pub use crate::config_service::ConfigService;
pub use crate::in_memory_embed_repository::InMemoryEmbedRepository;
pub use crate::json_embed_repository::JsonEmbedRepository;
pub use crate::paths::EmbedkitPaths;
