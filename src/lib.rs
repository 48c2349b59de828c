pub mod astro;
pub mod data;
pub mod labels;
