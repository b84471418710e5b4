#[non_exhaustive]
#[derive(Debug)]
pub enum Error {
    /// The lattice or the sites of a structure are not usable
    InvalidStructure(String),
    /// The neighbor search radius is not a positive number, or requires too
    /// many periodic images of the unit cell
    InvalidRadius(f64),
    /// The coordination thresholds are not positive numbers
    UnresolvableCoordination(String),
    /// The structure parser could not read a file
    ParseFailure(String),
    /// Got an invalid parameter value in a function
    InvalidParameter(String),
    /// Error while serializing/deserializing data
    Json(serde_json::Error),
    /// Error while accessing the file system
    Io(std::io::Error),
    /// Error related to reading structure files with chemfiles
    Chemfiles(String),
}

impl Error {
    /// Does this error come from the caller's configuration rather than from
    /// the data? Such errors would affect every structure in a batch the same
    /// way, so they abort it.
    pub fn is_configuration_error(&self) -> bool {
        matches!(self,
            Error::InvalidRadius(_) |
            Error::UnresolvableCoordination(_) |
            Error::InvalidParameter(_)
        )
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::InvalidStructure(e) => write!(f, "invalid structure: {}", e),
            Error::InvalidRadius(radius) => write!(f, "invalid search radius: expected a positive value, not too large compared to the unit cell, got {}", radius),
            Error::UnresolvableCoordination(e) => write!(f, "unresolvable coordination: {}", e),
            Error::ParseFailure(e) => write!(f, "failed to parse structure: {}", e),
            Error::InvalidParameter(e) => write!(f, "invalid parameter: {}", e),
            Error::Json(e) => write!(f, "json error: {}", e),
            Error::Io(e) => write!(f, "io error: {}", e),
            Error::Chemfiles(e) => write!(f, "chemfiles error: {}", e),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::InvalidStructure(_) |
            Error::InvalidRadius(_) |
            Error::UnresolvableCoordination(_) |
            Error::ParseFailure(_) |
            Error::InvalidParameter(_) |
            Error::Chemfiles(_) => None,
            Error::Json(e) => Some(e),
            Error::Io(e) => Some(e),
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(error: serde_json::Error) -> Error {
        Error::Json(error)
    }
}

impl From<std::io::Error> for Error {
    fn from(error: std::io::Error) -> Error {
        Error::Io(error)
    }
}

impl From<glob::PatternError> for Error {
    fn from(error: glob::PatternError) -> Error {
        Error::InvalidParameter(format!("invalid file pattern: {}", error))
    }
}

impl From<glob::GlobError> for Error {
    fn from(error: glob::GlobError) -> Error {
        Error::Io(error.into_error())
    }
}
