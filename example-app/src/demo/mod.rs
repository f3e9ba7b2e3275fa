//! 演示组件

pub mod config;
pub mod controller;
pub mod dao;
pub mod greeting;
pub mod service;
