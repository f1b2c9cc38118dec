pub mod api;
pub mod card;
pub mod model;
pub mod openapi;
pub mod state;
pub mod storage;
pub mod util;
