pub mod ingest_service;
pub mod telegram_service;
