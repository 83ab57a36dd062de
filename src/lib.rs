pub mod astro;
pub mod config;
pub mod feeds;
pub mod observer;
pub mod scan;
pub mod target;
pub mod web;
