//! Article engine: sequential job runner and wiki article creators.
mod creator;
mod mediawiki;
mod runner;
mod settings;
mod types;

pub use creator::{ArticleCreator, CreateError, DryRunCreator};
pub use mediawiki::{api_endpoint, CreatorSettings, Credentials, MediaWikiCreator};
pub use runner::{start, RunCanceller, RunHandle, RunObserver};
pub use settings::{DelayRange, RunSettings, SettingsError};
pub use types::{Article, RunEvent, RunId, RunStatus};
