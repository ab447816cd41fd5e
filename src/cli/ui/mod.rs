pub mod formatting;
pub mod menu_renderer;
pub mod prompts;
pub mod test_mode;
