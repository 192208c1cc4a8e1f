use {
    secrecy::Secret,
    serde::Deserialize,
};

/// Root configuration for the bot process.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct BistroConfig {
    pub server: ServerConfig,
    pub messenger: MessengerConfig,
    pub replies: RepliesConfig,
}

/// HTTP listener settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address to bind to. Defaults to "0.0.0.0".
    pub bind: String,
    /// Port to listen on. Defaults to 5000.
    pub port: u16,
    /// Externally reachable base URL, used to build image and asset links
    /// in outbound templates. Required.
    pub server_url: String,
    /// Directory served as static assets (menu images, logo).
    pub assets_dir: String,
    /// Upper bound on accepted webhook bodies, in bytes.
    pub max_body_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "0.0.0.0".into(),
            port: 5000,
            server_url: String::new(),
            assets_dir: "public".into(),
            max_body_bytes: 1024 * 1024,
        }
    }
}

/// What to do with a webhook POST that carries no `X-Hub-Signature` header.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MissingSignaturePolicy {
    /// Refuse the request with 403.
    Reject,
    /// Log an error and process the body anyway.
    #[default]
    #[serde(alias = "allow")]
    AllowAndLog,
}

impl std::str::FromStr for MissingSignaturePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "reject" => Ok(Self::Reject),
            "allow" | "allow-and-log" => Ok(Self::AllowAndLog),
            other => Err(format!(
                "unknown missing-signature policy '{other}' (expected 'reject' or 'allow')"
            )),
        }
    }
}

impl std::fmt::Display for MissingSignaturePolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Reject => write!(f, "reject"),
            Self::AllowAndLog => write!(f, "allow-and-log"),
        }
    }
}

/// Messenger Platform credentials and API settings.
#[derive(Clone, Deserialize)]
#[serde(default)]
pub struct MessengerConfig {
    /// App secret used to verify `X-Hub-Signature`.
    pub app_secret: Secret<String>,

    /// Token echoed back during webhook subscription (`hub.verify_token`).
    pub verify_token: Secret<String>,

    /// Page access token for the Send API.
    pub page_access_token: Secret<String>,

    /// Graph API base URL including the version segment.
    pub graph_api_url: String,

    /// Missing-signature handling.
    pub missing_signature: MissingSignaturePolicy,

    /// Timeout for a single Send API call, in seconds.
    pub send_timeout_secs: u64,
}

impl Default for MessengerConfig {
    fn default() -> Self {
        Self {
            app_secret: Secret::new(String::new()),
            verify_token: Secret::new(String::new()),
            page_access_token: Secret::new(String::new()),
            graph_api_url: "https://graph.facebook.com/v19.0".into(),
            missing_signature: MissingSignaturePolicy::default(),
            send_timeout_secs: 10,
        }
    }
}

impl std::fmt::Debug for MessengerConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MessengerConfig")
            .field("app_secret", &"[REDACTED]")
            .field("verify_token", &"[REDACTED]")
            .field("page_access_token", &"[REDACTED]")
            .field("graph_api_url", &self.graph_api_url)
            .field("missing_signature", &self.missing_signature)
            .field("send_timeout_secs", &self.send_timeout_secs)
            .finish()
    }
}

/// Reply behaviour knobs.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RepliesConfig {
    /// Delay before follow-up messages (greeting, quick-reply prompts).
    pub follow_up_delay_ms: u64,
    /// Send a `typing_on` action before each reply.
    pub typing_indicator: bool,
}

impl Default for RepliesConfig {
    fn default() -> Self {
        Self {
            follow_up_delay_ms: 1000,
            typing_indicator: false,
        }
    }
}
