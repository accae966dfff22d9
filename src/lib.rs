pub mod app;
pub mod catalog;
pub mod config;
pub mod models;
pub mod omdb;
pub mod pages;
