pub mod lens_shading;
pub mod logger;
