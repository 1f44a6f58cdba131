use std::env;

const DEFAULT_ENDPOINT: &str = "https://huggingface.co";

/// Checked in order; the first non-empty one wins.
const ENDPOINT_VARS: [&str; 2] = ["KIPEPEO_HUB_ENDPOINT", "HF_ENDPOINT"];
const TOKEN_VARS: [&str; 1] = ["HF_TOKEN"];

/// Where the hub lives and how to authenticate against it.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct HubConfig {
    pub endpoint: String,
    pub token: Option<String>,
}

impl Default for HubConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            token: None,
        }
    }
}

impl HubConfig {
    pub fn from_env() -> Self {
        Self {
            endpoint: first_set(&ENDPOINT_VARS).unwrap_or_else(|| DEFAULT_ENDPOINT.to_string()),
            token: first_set(&TOKEN_VARS),
        }
    }
}

fn first_set(vars: &[&str]) -> Option<String> {
    vars.iter()
        .filter_map(|var| env::var(var).ok())
        .map(|value| value.trim().to_string())
        .find(|value| !value.is_empty())
}
