use std::path::PathBuf;

const ENV_TEMPLATE: &str = "\
# mnemo environment configuration
ENVIRONMENT=development
REPLY_LLM_API_KEY=
EMBEDDING_API_KEY=
API_KEY=
EMBEDDING_MODEL=simple
DATA_DIR=./data
MEMORY_EXTRACT_THRESHOLD=5
MAX_CONTEXT_MEMORIES=5
HOST=0.0.0.0
PORT=8080
";

/// Strategy for initializing a fresh deployment: writes a `.env` template
/// (if one is not already present) and creates the on-disk layout
/// `mnemo_identity`/`mnemo_store` expect under `DATA_DIR`.
#[derive(Debug, Clone, Copy)]
pub struct InitStrategy;

impl super::CommandStrategy for InitStrategy {
    type Input = ();

    async fn execute(&self, _input: Self::Input) -> anyhow::Result<()> {
        let env_path = PathBuf::from(".env");
        if env_path.exists() {
            println!(".env already exists, leaving it untouched");
        } else {
            tokio::fs::write(&env_path, ENV_TEMPLATE).await?;
            println!("wrote {}", env_path.display());
        }

        let data_dir = std::env::var("DATA_DIR").unwrap_or_else(|_| "./data".to_string());
        for sub in ["users", "sessions", "vectordb"] {
            let path = PathBuf::from(&data_dir).join(sub);
            tokio::fs::create_dir_all(&path).await?;
            println!("created {}", path.display());
        }

        Ok(())
    }
}
