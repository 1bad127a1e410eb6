use crate::config::ConfigError;
use crate::stations::error::StationIndexError;
use crate::types::criteria::CriteriaError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MetroNearbyError {
    #[error(transparent)]
    StationIndex(#[from] StationIndexError),

    #[error(transparent)]
    Criteria(#[from] CriteriaError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}
