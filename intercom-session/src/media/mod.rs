mod devices;
mod remote;
mod track;

pub use devices::*;
pub use remote::*;
pub use track::*;
