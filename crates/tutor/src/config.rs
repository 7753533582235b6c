/// Language-model connection settings.
#[derive(Debug, Clone)]
pub struct TutorConfig {
    /// Base URL of an OpenAI-compatible API, without the trailing
    /// `/chat/completions`.
    pub api_url: String,
    /// Bearer key. When absent the tutor answers with canned replies only.
    pub api_key: Option<String>,
    pub model: String,
    pub timeout_secs: u64,
}

/// Default base URL.
const DEFAULT_API_URL: &str = "https://api.openai.com/v1";
const DEFAULT_MODEL: &str = "gpt-4o-mini";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

impl TutorConfig {
    /// Load from environment variables.
    ///
    /// | Env Var              | Default                      |
    /// |----------------------|------------------------------|
    /// | `TUTOR_API_URL`      | `https://api.openai.com/v1`  |
    /// | `TUTOR_API_KEY`      | unset (canned replies only)  |
    /// | `TUTOR_MODEL`        | `gpt-4o-mini`                |
    /// | `TUTOR_TIMEOUT_SECS` | `30`                         |
    pub fn from_env() -> Self {
        let api_url = std::env::var("TUTOR_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.into());

        let api_key = std::env::var("TUTOR_API_KEY")
            .ok()
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty());

        let model = std::env::var("TUTOR_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.into());

        let timeout_secs: u64 = std::env::var("TUTOR_TIMEOUT_SECS")
            .unwrap_or_else(|_| DEFAULT_TIMEOUT_SECS.to_string())
            .parse()
            .expect("TUTOR_TIMEOUT_SECS must be a valid u64");

        Self {
            api_url,
            api_key,
            model,
            timeout_secs,
        }
    }

    /// Settings with no API key: every reply is canned.
    pub fn offline() -> Self {
        Self {
            api_url: DEFAULT_API_URL.into(),
            api_key: None,
            model: DEFAULT_MODEL.into(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}
