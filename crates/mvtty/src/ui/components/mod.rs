pub mod console;
pub mod footer_bar;
pub mod form_panel;
pub mod message_overlay;
pub mod path_picker;
pub mod status_bar;
pub mod tab;
