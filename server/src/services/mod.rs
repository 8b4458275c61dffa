// server/src/services/mod.rs

pub mod cloudinary;

pub use cloudinary::CloudinaryUploader;
