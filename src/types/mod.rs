pub mod coordinate;
pub mod criteria;
pub mod entity;
pub mod offer;
pub mod station;
