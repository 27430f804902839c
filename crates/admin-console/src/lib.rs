pub mod abstract_trait;
pub mod cache;
pub mod config;
pub mod di;
pub mod domain;
pub mod guard;
pub mod handler;
pub mod menu;
pub mod middleware;
pub mod modal;
pub mod resolver;
pub mod service;
pub mod state;
