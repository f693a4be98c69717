//! Types shared between the bulk editor (wasm) and the create-record service.

pub mod usecases;
