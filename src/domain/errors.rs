use derive_more::Display;

/// Failures reported by the dataset collaborator (headers, matrix metadata).
#[derive(Debug, Clone, PartialEq, Display)]
pub enum DatasetError {
    #[display(fmt = "matrix {}-{} unavailable: {}", chr1, chr2, reason)]
    MatrixUnavailable { chr1: usize, chr2: usize, reason: String },
    #[display(fmt = "zoom index {} out of range ({} resolutions)", zoom, available)]
    ZoomOutOfRange { zoom: usize, available: usize },
    #[display(fmt = "\"B\" map genome ({}) does not match \"A\" map genome ({})", found, expected)]
    GenomeMismatch { expected: String, found: String },
    #[display(fmt = "invalid dataset descriptor: {}", _0)]
    InvalidDescriptor(String),
}

impl std::error::Error for DatasetError {}

/// Why a navigation request did not produce a new view state.
#[derive(Debug, Clone, PartialEq, Display)]
pub enum NavigationError {
    #[display(fmt = "no dataset loaded")]
    NoDataset,
    #[display(fmt = "unknown chromosome index {}", _0)]
    UnknownChromosome(usize),
    #[display(fmt = "No feature found with name \"{}\"", _0)]
    LocusNotFound(String),
    #[display(fmt = "superseded by a newer navigation request")]
    Superseded,
    #[display(fmt = "{}", _0)]
    Dataset(DatasetError),
}

impl std::error::Error for NavigationError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            NavigationError::Dataset(err) => Some(err),
            _ => None,
        }
    }
}

impl From<DatasetError> for NavigationError {
    fn from(err: DatasetError) -> Self {
        NavigationError::Dataset(err)
    }
}

/// Malformed compact state string (`chr1,chr2,zoom,x,y,pixelSize,normalization`).
#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum ViewStateParseError {
    #[display(fmt = "state string is missing field `{}`", _0)]
    MissingField(&'static str),
    #[display(fmt = "state field `{}` has invalid value `{}`", field, value)]
    InvalidField { field: &'static str, value: String },
}

impl std::error::Error for ViewStateParseError {}

#[derive(Debug, Display)]
pub enum ConfigError {
    #[display(fmt = "invalid browser config: {}", _0)]
    Json(serde_json::Error),
    #[display(fmt = "invalid initial state: {}", _0)]
    State(ViewStateParseError),
}

impl std::error::Error for ConfigError {}

impl From<serde_json::Error> for ConfigError {
    fn from(err: serde_json::Error) -> Self {
        ConfigError::Json(err)
    }
}

impl From<ViewStateParseError> for ConfigError {
    fn from(err: ViewStateParseError) -> Self {
        ConfigError::State(err)
    }
}

pub type DatasetResult<T> = Result<T, DatasetError>;
pub type NavResult<T> = Result<T, NavigationError>;
