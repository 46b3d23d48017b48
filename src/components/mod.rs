pub mod help;
pub mod scene_view;
