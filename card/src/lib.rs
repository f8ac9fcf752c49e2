pub mod dodge;
pub mod error;
pub mod headful;
pub mod motion;
pub mod particles;
pub mod playtest;
pub mod render;
pub mod scene;
pub mod scheduler;
pub mod screen;
pub mod settings;
pub mod state;
pub mod ui_ids;
