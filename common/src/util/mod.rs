pub mod df;
pub mod distance;
pub mod logging;
pub mod speed;
pub mod wkt;
