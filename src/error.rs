use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, AnalyzeError>;

#[derive(Error, Debug)]
pub enum AnalyzeError {
    /// The grammar could not be attached to the parser. Fatal for the whole run.
    #[error("failed to load python grammar: {0}")]
    GrammarLoad(#[from] tree_sitter::LanguageError),

    #[error("failed to compile query {pattern:?}: {message}")]
    QueryCompile { pattern: String, message: String },

    #[error("parser produced no tree")]
    Parse,

    #[error("could not parse {}", path.display())]
    FileParse { path: PathBuf },

    #[error("could not read {}: {source}", path.display())]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("edge endpoint {0} is not in the graph")]
    MissingNode(String),

    #[error("walk error: {0}")]
    Walk(#[from] ignore::Error),
}

impl AnalyzeError {
    /// Errors that only cost one file its declarations.
    pub fn is_per_file(&self) -> bool {
        matches!(self, Self::FileParse { .. } | Self::FileRead { .. })
    }
}
