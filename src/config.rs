use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::Deserialize;

use crate::adapters::google_books::{GoogleBooksConfig, catalog::DEFAULT_BASE_URL};
use crate::application::ListPolicy;

const ENV_PREFIX: &str = "SHAREREADS";
const CONFIG_FILE_ENV: &str = "SHAREREADS_CONFIG";
const DEFAULT_CONFIG_FILE: &str = "sharereads.toml";

/// リストストアのバックエンド
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    /// プロセス内メモリ（再起動で消える）
    Memory,
    /// ローカルのJSONファイル
    File,
    /// PostgreSQL
    Postgres,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StoreConfig {
    pub backend: StoreBackend,
    pub file_dir: PathBuf,
    pub database_url: String,
    pub max_connections: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CatalogConfig {
    pub base_url: String,
    pub max_results: u32,
    pub timeout_secs: u64,
    #[serde(default)]
    pub api_key: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SharingConfig {
    pub public_origin: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ListsConfig {
    pub require_edit_token: bool,
}

/// アプリケーション設定
///
/// 優先順位（後勝ち）：
/// 1. 組み込みのデフォルト値
/// 2. 設定ファイル（`SHAREREADS_CONFIG`、なければ`sharereads.toml`。なくてもよい）
/// 3. `SHAREREADS__SECTION__KEY`形式の環境変数
/// 4. `PORT`と`DATABASE_URL`
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub store: StoreConfig,
    pub catalog: CatalogConfig,
    pub sharing: SharingConfig,
    pub lists: ListsConfig,
}

impl AppConfig {
    /// `.env`を読み込んだうえで設定を構築する
    pub fn load() -> anyhow::Result<Self> {
        // .envがなくても失敗しない
        let _ = dotenvy::dotenv();

        let path = std::env::var(CONFIG_FILE_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_CONFIG_FILE));

        Self::load_from(Some(&path))
    }

    /// 指定した設定ファイルと環境変数から設定を構築する
    pub fn load_from(path: Option<&Path>) -> anyhow::Result<Self> {
        let mut builder = config::Config::builder()
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 3000)?
            .set_default("store.backend", "memory")?
            .set_default("store.file_dir", "data")?
            .set_default("store.database_url", "postgres://localhost/sharereads")?
            .set_default("store.max_connections", 5)?
            .set_default("catalog.base_url", DEFAULT_BASE_URL)?
            .set_default("catalog.max_results", 20)?
            .set_default("catalog.timeout_secs", 10)?
            .set_default("sharing.public_origin", "http://localhost:3000")?
            .set_default("lists.require_edit_token", true)?;

        if let Some(path) = path {
            builder = builder.add_source(config::File::from(path).required(false));
        }

        let cfg = builder
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true),
            )
            .set_override_option("server.port", std::env::var("PORT").ok())?
            .set_override_option("store.database_url", std::env::var("DATABASE_URL").ok())?
            .build()
            .context("failed to build configuration")?;

        cfg.try_deserialize()
            .context("failed to deserialize configuration")
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    pub fn list_policy(&self) -> ListPolicy {
        ListPolicy {
            require_edit_token: self.lists.require_edit_token,
            public_origin: self.sharing.public_origin.clone(),
        }
    }

    pub fn google_books(&self) -> GoogleBooksConfig {
        GoogleBooksConfig {
            base_url: self.catalog.base_url.clone(),
            max_results: self.catalog.max_results,
            timeout_secs: self.catalog.timeout_secs,
            api_key: self.catalog.api_key.clone(),
        }
    }
}
