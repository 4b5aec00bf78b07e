use mnemo_config::Config;

/// Strategy for displaying configuration information (masked secrets,
/// embedding variant, data directory, auth posture).
#[derive(Debug, Clone, Copy)]
pub struct InfoStrategy;

impl super::CommandStrategy for InfoStrategy {
    type Input = ();

    async fn execute(&self, _input: Self::Input) -> anyhow::Result<()> {
        let config = Config::load()?;

        println!("=== mnemo configuration ===\n");
        println!("Environment: {:?}", config.environment);
        println!("Data dir:    {}", config.data_dir.display());
        println!("Embedding:   {:?}", config.embedding_model);
        println!("Auth:        {}", if config.auth_required() { "required" } else { "optional" });
        println!("API key:     {}", mask(config.api_key.as_deref()));
        println!("Reply key:   {}", mask(Some(&config.reply_llm_api_key)));
        println!("Host:        {}:{}", config.host, config.port);
        println!("Extraction threshold: {}", config.memory_extract_threshold);
        println!("Max context memories: {}", config.max_context_memories);

        Ok(())
    }
}

fn mask(key: Option<&str>) -> String {
    match key {
        None => "(not set)".to_string(),
        Some(k) if k.len() > 8 => format!("{}...{}", &k[..4], &k[k.len() - 4..]),
        Some(_) => "***".to_string(),
    }
}
