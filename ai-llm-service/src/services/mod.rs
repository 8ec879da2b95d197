pub mod ollama_cli_service;
pub mod ollama_service;
