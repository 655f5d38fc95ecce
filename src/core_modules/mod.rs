pub mod gaussian;
pub mod mask;
pub mod pixel_model;
pub mod scene_model;
