mod auth_form;
mod lightbox;
pub mod media_grid;
mod modals;
mod upload_progress;

pub use auth_form::auth_form;
pub use lightbox::lightbox;
pub use media_grid::{CardAction, media_card, media_grid};
pub use modals::{confirm_delete, notice};
pub use upload_progress::{skipped_panel, upload_progress};
