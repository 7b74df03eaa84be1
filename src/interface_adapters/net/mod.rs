// Network adapter modules split by client sockets vs HTTP room routes.

pub mod client;
pub mod internal;

pub use client::{spawn_room_serializer, ws_handler};
pub use internal::{create_room_handler, get_room_handler};
