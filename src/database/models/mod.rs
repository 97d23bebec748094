pub mod file;
pub mod product;
pub mod user;

pub use file::{Avatar, File, FileUrls};
pub use product::{NewProduct, Owner, Product, ProductChanges, ProductEcho, ProductSummary};
pub use user::{NewUser, RegisteredUser, User, UserChanges, UserProfile};
