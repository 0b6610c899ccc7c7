#![recursion_limit = "256"]

#[macro_use]
extern crate custom_derive;
#[macro_use]
extern crate enum_derive;

pub mod events;
pub mod input;
pub mod picking;
pub mod scene;
pub mod time;
pub mod util;
