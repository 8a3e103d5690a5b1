// Presentation of harvested events (text, JSON, CSV).

pub mod render;

pub use render::OutputFormat;
