pub mod config;
pub mod embed;
pub mod error;
pub mod layout;
pub mod motion;
pub mod nav_links;
pub mod navigator;
pub mod observe;
pub mod page;
pub mod transition;

pub use config::AppConfig;
pub use error::{Error, Result};
pub use page::{PageHost, PageInput, PageSpec};
