//! UIコンポーネント

pub mod header;
pub mod upload_area;
pub mod action_buttons;
pub mod status_bar;
pub mod detected_tags;
pub mod recommendations;
