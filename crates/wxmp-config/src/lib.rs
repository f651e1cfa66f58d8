pub mod discovery;
pub mod error;
pub mod options;
pub mod settings;

pub use discovery::{ConfigDiscovery, ConfigSource, WxmpConfig, discover};
pub use error::*;
pub use options::*;
pub use settings::*;
