pub mod errors;
pub mod id;
pub mod notifications;
pub mod types;

pub use errors::{ConfigError, GlanceError, RenderError, TransportError};
pub use id::{new_correlation_id, SessionToken, TokenSource};
pub use notifications::{Banner, BannerLevel};
pub use types::{Color, Point, Size};

pub type Result<T> = std::result::Result<T, GlanceError>;
