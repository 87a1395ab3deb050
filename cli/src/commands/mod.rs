mod convert;
mod info;
mod validate;

pub use convert::run as convert;
pub use info::run as info;
pub use validate::run as validate;
