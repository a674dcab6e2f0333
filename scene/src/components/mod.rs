mod asset;
mod name;

pub use asset::AssetRef;
pub use name::Name;
