pub mod health;
pub mod index;
pub mod progress;
pub mod upload;

use serde::Deserialize;

/// `?session=<id>` shared by the upload and progress routes
#[derive(Debug, Default, Deserialize)]
pub struct SessionQuery {
    pub session: Option<String>,
}
