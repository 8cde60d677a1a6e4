pub use super::photo;
pub use super::photo::Entity as Photo;
