pub mod client;
pub mod config;
pub mod credential;
pub mod error;
pub mod gateway;
pub mod image_search;
pub mod normalizer;
pub mod refresh;
pub mod server;
pub mod signer;
pub mod terms;
pub mod translate;
pub mod types;

pub use client::{AffiliateClient, ClientOptions};
pub use config::ProxyConfig;
pub use credential::{CredentialStore, Credentials};
pub use error::ProxyError;
pub use gateway::{ApiGateway, Endpoints};
pub use image_search::ImageSearchClient;
pub use normalizer::KeywordNormalizer;
pub use server::{AppState, build_app};
pub use signer::sign;
pub use terms::TermTable;
pub use translate::{QueryTranslator, Translator};
pub use types::{CallStyle, ProductQuery};
