//! APIクライアント

pub mod backend;
