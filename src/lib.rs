#![doc = "The `taskbox` library crate."]
#![doc = ""]
#![doc = "Core logic for the Taskbox backend: credential and token handling, the"]
#![doc = "per-request authentication gate, task CRUD scoped to the calling user,"]
#![doc = "storage backends, routing and error mapping. The binary (`main.rs`)"]
#![doc = "assembles these into the running HTTP server."]

pub mod auth;
pub mod config;
pub mod error;
pub mod models;
pub mod routes;
pub mod services;
pub mod storage;
