//! Clothing Recommender CLI library
//!
//! 画像をバックエンドへ送信し、タグと類似アイテムを表示する

pub mod cli;
pub mod client;
pub mod config;
pub mod error;
pub mod image_file;
pub mod render;
