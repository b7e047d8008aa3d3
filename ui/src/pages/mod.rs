//! Pages of the application, chosen by the authentication status:
//! - `auth_page`: login and registration for signed-out users
//! - `gallery_page`: the library of a signed-in user

mod auth_page;
mod gallery_page;

pub use auth_page::auth_page;
pub use gallery_page::gallery_page;
