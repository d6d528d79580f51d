pub mod classification;
pub mod transform;
pub mod scan;

pub use classification::*;
pub use transform::*;
pub use scan::*;
