#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("entry near {near:?} is missing its ent_seq id")]
    MissingId { near: String },

    #[error("entry has a non-numeric ent_seq id: {0:?}")]
    InvalidId(String),

    #[error("XML error at byte {position}: {source}")]
    Xml {
        position: usize,
        source: quick_xml::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
