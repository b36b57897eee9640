pub mod romberg;

pub use self::romberg::{integrate, Romberg, RombergResult};
