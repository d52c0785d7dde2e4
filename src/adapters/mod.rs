//! Adapters implementing domain ports.

pub mod msgpack_repository;

pub use msgpack_repository::MsgPackRepository;
