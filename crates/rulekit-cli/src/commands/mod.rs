pub mod canonicalize;
pub mod compare;
pub mod placeholder;
pub mod stamp;
