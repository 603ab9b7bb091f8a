use crate::error::Error as DotErr;
pub type Result<T> = std::result::Result<T, DotErr>;
