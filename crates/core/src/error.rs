use thiserror::Error;

#[derive(Error, Debug)]
pub enum GistError {
    #[error("Configuration error: {0}")]
    Config(String),
}
