pub mod prelude;

pub mod photo;
