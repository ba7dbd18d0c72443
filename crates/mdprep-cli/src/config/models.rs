use mdprep::engine::config::PipelineConfig;
use mdprep::engine::tasks::command::ToolCommand;
use std::time::Duration;

/// How to reach the outside collaborators.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolsConfig {
    pub download_base_url: String,
    pub download_timeout: Duration,
    pub pdbfixer: ToolCommand,
    pub python: ToolCommand,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub pipeline: PipelineConfig,
    pub tools: ToolsConfig,
}
