/// Connection settings for the hosted record store.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Base URL without trailing slash (default: `http://127.0.0.1:8090`).
    pub base_url: String,
    /// Collection holding appraisal records (default: `data_properti`).
    pub record_collection: String,
    /// Auth collection users sign in against (default: `users`).
    pub user_collection: String,
    /// Service token sent on record calls, if the collection rules need one.
    pub token: Option<String>,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:8090".into(),
            record_collection: "data_properti".into(),
            user_collection: "users".into(),
            token: None,
        }
    }
}

impl StoreConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var              | Default                 |
    /// |----------------------|-------------------------|
    /// | `RECORD_STORE_URL`   | `http://127.0.0.1:8090` |
    /// | `RECORD_COLLECTION`  | `data_properti`         |
    /// | `USER_COLLECTION`    | `users`                 |
    /// | `RECORD_STORE_TOKEN` | unset                   |
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let base_url = std::env::var("RECORD_STORE_URL")
            .unwrap_or(defaults.base_url)
            .trim_end_matches('/')
            .to_string();

        let record_collection =
            std::env::var("RECORD_COLLECTION").unwrap_or(defaults.record_collection);

        let user_collection = std::env::var("USER_COLLECTION").unwrap_or(defaults.user_collection);

        let token = std::env::var("RECORD_STORE_TOKEN")
            .ok()
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty());

        Self {
            base_url,
            record_collection,
            user_collection,
            token,
        }
    }

    /// Builder-style override of the base URL, used when pointing at a
    /// local server in tests.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }
}
