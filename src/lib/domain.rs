//! Domain logic: messages, addresses and MIME composition

pub mod communication;
