//! Process-wide configuration.
//!
//! Built once at startup from the environment and passed explicitly to the
//! composition root; nothing reads the environment after this.

/// Immutable configuration for the whole process.
#[derive(Debug, Clone)]
pub struct Config {
    pub server_host: String,
    pub server_port: u16,
    pub llm: LlmConfig,
    pub images: ImageConfig,
    /// Comma-separated origin list or `*`; `None` disables CORS entirely.
    pub cors_allowed_origins: Option<String>,
    /// Extra safety-denylist regexes appended to the compiled-in defaults.
    pub safety_patterns: Vec<String>,
}

/// Text-generation service settings.
#[derive(Debug, Clone)]
pub struct LlmConfig {
    pub base_url: String,
    /// Bearer token; absent for local OpenAI-compatible servers.
    pub api_key: Option<String>,
    pub model: String,
}

/// Image-generation service settings.
#[derive(Debug, Clone)]
pub struct ImageConfig {
    pub base_url: String,
    pub api_key: Option<String>,
    pub model: Option<String>,
    pub width: u32,
    pub height: u32,
}

/// Default text-generation base URL.
pub const DEFAULT_LLM_BASE_URL: &str = "https://api.openai.com";

/// Default text-generation model.
pub const DEFAULT_LLM_MODEL: &str = "gpt-4o-mini";

const DEFAULT_IMAGE_SIZE: (u32, u32) = (1024, 1024);

impl Config {
    /// Load configuration from environment variables, with defaults.
    pub fn from_env() -> Self {
        let server_host = std::env::var("SERVER_HOST").unwrap_or_else(|_| "0.0.0.0".into());
        let server_port: u16 = std::env::var("SERVER_PORT")
            .or_else(|_| std::env::var("PORT"))
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(3000);

        let llm_base_url = std::env::var("LLM_BASE_URL")
            .unwrap_or_else(|_| DEFAULT_LLM_BASE_URL.into());
        let llm_api_key = std::env::var("LLM_API_KEY")
            .or_else(|_| std::env::var("OPENAI_API_KEY"))
            .ok()
            .filter(|k| !k.trim().is_empty());
        let llm_model = std::env::var("LLM_MODEL").unwrap_or_else(|_| DEFAULT_LLM_MODEL.into());

        // The image service defaults to the same provider as the text service.
        let image_base_url =
            std::env::var("IMAGE_BASE_URL").unwrap_or_else(|_| llm_base_url.clone());
        let image_api_key = std::env::var("IMAGE_API_KEY")
            .ok()
            .filter(|k| !k.trim().is_empty())
            .or_else(|| llm_api_key.clone());
        let image_model = std::env::var("IMAGE_MODEL")
            .ok()
            .filter(|m| !m.trim().is_empty());
        let (width, height) = std::env::var("IMAGE_SIZE")
            .ok()
            .and_then(|s| parse_image_size(&s))
            .unwrap_or(DEFAULT_IMAGE_SIZE);

        let cors_allowed_origins = std::env::var("CORS_ALLOWED_ORIGINS")
            .ok()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());

        let safety_patterns = std::env::var("SAFETY_PATTERNS")
            .map(|raw| {
                raw.split(";;")
                    .map(str::trim)
                    .filter(|p| !p.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();

        Self {
            server_host,
            server_port,
            llm: LlmConfig {
                base_url: llm_base_url,
                api_key: llm_api_key,
                model: llm_model,
            },
            images: ImageConfig {
                base_url: image_base_url,
                api_key: image_api_key,
                model: image_model,
                width,
                height,
            },
            cors_allowed_origins,
            safety_patterns,
        }
    }
}

fn parse_image_size(raw: &str) -> Option<(u32, u32)> {
    let (w, h) = raw.trim().split_once('x')?;
    Some((w.parse().ok()?, h.parse().ok()?))
}
