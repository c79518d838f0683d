use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExplorerError {
    #[error("unknown structure kind: {0}")]
    UnknownStructure(String),
    #[error("bad command: {0}")]
    BadCommand(String),
    #[error("command `{command}` is not supported by {structure}")]
    Unsupported {
        command: &'static str,
        structure: &'static str,
    },
    #[error(transparent)]
    Tree(#[from] step_forest::TreeError),
    #[error(transparent)]
    Serialize(#[from] serde_json::Error),
}
