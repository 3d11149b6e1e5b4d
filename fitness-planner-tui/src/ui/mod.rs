mod form_view;
mod layout;
mod modals;
mod status_bar;
mod toasts;

// Re-export the main render function
pub use layout::render_ui;
